//! Bill model
//!
//! Bills are upcoming payments with a due date. A bill starts out pending and
//! can be marked paid exactly once.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BillId;
use super::money::Money;
use super::validation::{parse_date, require_text, validate_amount};
use crate::error::{FinanceError, FinanceResult};

/// Payment state of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Paid,
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.pad("Pending"),
            Self::Paid => f.pad("Paid"),
        }
    }
}

/// A scheduled payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Unique identifier
    pub id: BillId,

    /// What the bill is for
    pub title: String,

    /// Day the payment is due
    pub due_date: NaiveDate,

    /// Amount owed
    pub amount: Money,

    /// Payment state
    #[serde(default)]
    pub status: BillStatus,

    /// Day the bill was marked paid
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,

    /// When the bill was created
    pub created_at: DateTime<Utc>,
}

impl Bill {
    /// Create a pending bill from already-validated parts
    pub fn new(id: BillId, title: impl Into<String>, due_date: NaiveDate, amount: Money) -> Self {
        Self {
            id,
            title: title.into(),
            due_date,
            amount,
            status: BillStatus::Pending,
            paid_on: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == BillStatus::Paid
    }

    /// A pending bill whose due date has passed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_paid() && self.due_date < today
    }

    /// Days from `today` until the due date (negative when overdue)
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    /// Transition pending -> paid. Paid bills never go back to pending.
    pub fn mark_paid(&mut self, on: NaiveDate) -> FinanceResult<()> {
        if self.is_paid() {
            return Err(FinanceError::Validation(format!(
                "Bill {} is already paid",
                self.id
            )));
        }
        self.status = BillStatus::Paid;
        self.paid_on = Some(on);
        Ok(())
    }

    /// Check the record invariants
    ///
    /// A paid bill carries its payment date and a pending one has none.
    pub fn validate(&self) -> FinanceResult<()> {
        require_text("Title", &self.title)?;
        validate_amount(self.amount)?;
        match (self.status, self.paid_on) {
            (BillStatus::Paid, None) => Err(FinanceError::Validation(format!(
                "Bill {} is paid but has no payment date",
                self.id
            ))),
            (BillStatus::Pending, Some(_)) => Err(FinanceError::Validation(format!(
                "Bill {} is pending but has a payment date",
                self.id
            ))),
            _ => Ok(()),
        }
    }

    /// Apply a set of changes, validating every field before touching any
    pub fn apply(&mut self, changes: &BillUpdate) -> FinanceResult<()> {
        let title = changes
            .title
            .as_deref()
            .map(|t| require_text("Title", t))
            .transpose()?;
        let due_date = changes.due_date.as_deref().map(parse_date).transpose()?;
        if let Some(amount) = changes.amount {
            validate_amount(amount)?;
        }

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(due_date) = due_date {
            self.due_date = due_date;
        }
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        Ok(())
    }
}

impl fmt::Display for Bill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} due {} {} ({})",
            self.title,
            self.due_date.format("%Y-%m-%d"),
            self.amount,
            self.status
        )
    }
}

/// Input for scheduling a new bill
#[derive(Debug, Clone)]
pub struct NewBill {
    pub title: String,
    /// Due date as typed by the user (`YYYY-MM-DD`)
    pub due_date: String,
    pub amount: Money,
}

impl NewBill {
    pub fn new(title: impl Into<String>, due_date: impl Into<String>, amount: Money) -> Self {
        Self {
            title: title.into(),
            due_date: due_date.into(),
            amount,
        }
    }

    /// Validate the input and build the record under the given ID
    pub fn into_bill(self, id: BillId) -> FinanceResult<Bill> {
        let title = require_text("Title", &self.title)?;
        let due_date = parse_date(&self.due_date)?;
        validate_amount(self.amount)?;
        Ok(Bill::new(id, title, due_date, self.amount))
    }
}

/// Changes to an existing bill; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct BillUpdate {
    pub title: Option<String>,
    pub due_date: Option<String>,
    pub amount: Option<Money>,
}

impl BillUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.due_date.is_none() && self.amount.is_none()
    }
}
