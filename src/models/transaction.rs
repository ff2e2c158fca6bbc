//! Transaction model
//!
//! A transaction is a single recorded expense: an amount spent in a category
//! on a given day.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::ids::TransactionId;
use super::money::Money;
use super::validation::{parse_date, validate_amount};
use crate::error::FinanceResult;

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Amount spent (always positive)
    pub amount: Money,

    /// Spending category
    pub category: Category,

    /// Day the money was spent
    pub date: NaiveDate,

    /// Free-text notes
    #[serde(default)]
    pub description: String,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a transaction from already-validated parts
    pub fn new(id: TransactionId, amount: Money, category: Category, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id,
            amount,
            category,
            date,
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a set of changes, validating every field before touching any
    pub fn apply(&mut self, changes: &TransactionUpdate) -> FinanceResult<()> {
        if let Some(amount) = changes.amount {
            validate_amount(amount)?;
        }
        let category = changes.category.as_deref().map(Category::new).transpose()?;
        let date = changes.date.as_deref().map(parse_date).transpose()?;

        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(description) = &changes.description {
            self.description = description.trim().to_string();
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.category,
            self.amount
        )
    }
}

/// Input for recording a new transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub amount: Money,
    pub category: String,
    /// Date as typed by the user (`YYYY-MM-DD`)
    pub date: String,
    pub description: Option<String>,
}

impl NewTransaction {
    pub fn new(amount: Money, category: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            amount,
            category: category.into(),
            date: date.into(),
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate the input and build the record under the given ID
    pub fn into_transaction(self, id: TransactionId) -> FinanceResult<Transaction> {
        validate_amount(self.amount)?;
        let category = Category::new(&self.category)?;
        let date = parse_date(&self.date)?;

        let mut txn = Transaction::new(id, self.amount, category, date);
        if let Some(description) = self.description {
            txn.description = description.trim().to_string();
        }
        Ok(txn)
    }
}

/// Changes to an existing transaction; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.description.is_none()
    }
}
