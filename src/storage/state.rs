//! On-disk format of the data file
//!
//! Saving writes one JSON object with `transactions`, `bills` and `settings`
//! at the top level. Loading decodes each record on its own: a record that
//! is missing a required field or carries an invalid value is skipped with a
//! warning, and everything else is kept.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::settings::Settings;
use crate::models::{
    Bill, BillId, BillStatus, Money, NewBill, NewTransaction, Transaction, TransactionId,
};

use super::bills::BillRepository;
use super::transactions::TransactionRepository;

/// Current data file schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Category assigned to stored transactions that have none
const FALLBACK_CATEGORY: &str = "misc";

/// Persisted ID counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NextIds {
    #[serde(default)]
    pub transaction: u64,
    #[serde(default)]
    pub bill: u64,
}

/// Borrowed view of the state, used for saving
#[derive(Debug, Serialize)]
pub(crate) struct StateFile<'a> {
    pub schema_version: u32,
    pub last_updated: DateTime<Utc>,
    pub next_ids: NextIds,
    pub transactions: &'a [Transaction],
    pub bills: &'a [Bill],
    pub settings: &'a Settings,
}

/// Summary of what a load found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// No data file existed yet
    pub fresh: bool,
    pub transactions_loaded: usize,
    pub bills_loaded: usize,
    pub skipped_transactions: usize,
    pub skipped_bills: usize,
    /// Some or all settings were unreadable or out of range and defaults were used
    pub settings_reset: bool,
    /// Top-level sections that had the wrong shape and were ignored
    pub ignored_sections: Vec<String>,
    /// The whole file was unreadable; state was initialized empty
    pub recovered_error: Option<String>,
}

impl LoadReport {
    /// True when every record in the file was loaded as-is
    pub fn is_clean(&self) -> bool {
        self.skipped_transactions == 0
            && self.skipped_bills == 0
            && !self.settings_reset
            && self.ignored_sections.is_empty()
            && self.recovered_error.is_none()
    }
}

/// Decoded state ready to be installed into `Storage`
#[derive(Debug)]
pub(crate) struct LoadedState {
    pub transactions: TransactionRepository,
    pub bills: BillRepository,
    pub settings: Settings,
}

impl LoadedState {
    pub fn empty() -> Self {
        Self {
            transactions: TransactionRepository::new(),
            bills: BillRepository::new(),
            settings: Settings::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TransactionRecord {
    id: Option<TransactionId>,
    amount: Option<Money>,
    category: Option<String>,
    date: Option<String>,
    description: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct BillRecord {
    id: Option<BillId>,
    title: Option<String>,
    due_date: Option<String>,
    amount: Option<Money>,
    status: Option<BillStatus>,
    paid_on: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("missing required field '{}'", field))
}

/// The last ID value can never be followed, so records holding it are rejected
fn require_id<T: Copy>(value: Option<T>, raw: impl Fn(T) -> u64) -> Result<T, String> {
    let id = require(value, "id")?;
    if raw(id) == u64::MAX {
        return Err(format!("id {} is out of range", raw(id)));
    }
    Ok(id)
}

fn decode_transaction(value: Value, now: DateTime<Utc>) -> Result<Transaction, String> {
    let record: TransactionRecord = serde_json::from_value(value).map_err(|e| e.to_string())?;

    let id = require_id(record.id, |id: TransactionId| id.value())?;
    let amount = require(record.amount, "amount")?;
    let date = require(record.date, "date")?;

    let input = NewTransaction {
        amount,
        category: record
            .category
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_string()),
        date,
        description: record.description,
    };
    let mut txn = input.into_transaction(id).map_err(|e| e.to_string())?;
    txn.created_at = record.created_at.unwrap_or(now);
    txn.updated_at = record.updated_at.unwrap_or(txn.created_at);
    Ok(txn)
}

fn decode_bill(value: Value, now: DateTime<Utc>) -> Result<Bill, String> {
    let record: BillRecord = serde_json::from_value(value).map_err(|e| e.to_string())?;

    let id = require_id(record.id, |id: BillId| id.value())?;
    let title = require(record.title, "title")?;
    let due_date = require(record.due_date, "due_date")?;
    let amount = require(record.amount, "amount")?;

    let mut bill = NewBill::new(title, due_date, amount)
        .into_bill(id)
        .map_err(|e| e.to_string())?;
    bill.status = record.status.unwrap_or_default();
    bill.paid_on = record
        .paid_on
        .as_deref()
        .map(crate::models::parse_date)
        .transpose()
        .map_err(|e| e.to_string())?;
    bill.created_at = record.created_at.unwrap_or(now);
    bill.validate().map_err(|e| e.to_string())?;
    Ok(bill)
}

/// Pull an array out of the root object, tolerating its absence
fn take_array(
    root: &mut serde_json::Map<String, Value>,
    key: &str,
    report: &mut LoadReport,
) -> Vec<Value> {
    match root.remove(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            warn!(key, "expected a list in data file, ignoring");
            report.ignored_sections.push(key.to_string());
            Vec::new()
        }
    }
}

/// Decode a parsed data file, skipping bad records
pub(crate) fn decode_state(value: Value, report: &mut LoadReport) -> LoadedState {
    let mut root = match value {
        Value::Object(map) => map,
        _ => {
            let reason = "data file root is not a JSON object".to_string();
            warn!("{}; starting with empty state", reason);
            report.recovered_error = Some(reason);
            return LoadedState::empty();
        }
    };

    let now = Utc::now();

    let next_ids = match root.remove("next_ids") {
        Some(v) => serde_json::from_value::<NextIds>(v).unwrap_or_else(|e| {
            warn!(error = %e, "unreadable ID counters, recomputing from records");
            NextIds::default()
        }),
        None => NextIds::default(),
    };

    let mut seen = HashSet::new();
    let mut transactions = Vec::new();
    for (index, raw) in take_array(&mut root, "transactions", report).into_iter().enumerate() {
        match decode_transaction(raw, now) {
            Ok(txn) if !seen.insert(txn.id) => {
                warn!(index, id = %txn.id, "skipping transaction with duplicate id");
                report.skipped_transactions += 1;
            }
            Ok(txn) => transactions.push(txn),
            Err(reason) => {
                warn!(index, %reason, "skipping malformed transaction record");
                report.skipped_transactions += 1;
            }
        }
    }

    let mut seen = HashSet::new();
    let mut bills = Vec::new();
    for (index, raw) in take_array(&mut root, "bills", report).into_iter().enumerate() {
        match decode_bill(raw, now) {
            Ok(bill) if !seen.insert(bill.id) => {
                warn!(index, id = %bill.id, "skipping bill with duplicate id");
                report.skipped_bills += 1;
            }
            Ok(bill) => bills.push(bill),
            Err(reason) => {
                warn!(index, %reason, "skipping malformed bill record");
                report.skipped_bills += 1;
            }
        }
    }

    let mut settings = match root.remove("settings") {
        None | Some(Value::Null) => Settings::default(),
        Some(v) => serde_json::from_value(v).unwrap_or_else(|e| {
            warn!(error = %e, "unreadable settings, using defaults");
            report.settings_reset = true;
            Settings::default()
        }),
    };
    let reset = settings.sanitize();
    if !reset.is_empty() {
        warn!(fields = ?reset, "out of range settings replaced with defaults");
        report.settings_reset = true;
    }

    report.transactions_loaded = transactions.len();
    report.bills_loaded = bills.len();

    LoadedState {
        transactions: TransactionRepository::from_records(transactions, next_ids.transaction),
        bills: BillRepository::from_records(bills, next_ids.bill),
        settings,
    }
}
