//! Bill service
//!
//! Upcoming payments with due dates. A bill starts pending, is paid at
//! most once, and can be deleted in either state.

use chrono::{Days, NaiveDate};
use tracing::info;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Bill, BillId, BillUpdate, NewBill};
use crate::storage::Storage;

/// Service for bill management
pub struct BillService<'a> {
    storage: &'a mut Storage,
}

impl<'a> BillService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Schedule a new bill
    pub fn add(&mut self, input: NewBill) -> FinanceResult<Bill> {
        let bill = self.storage.commit(|s| s.bills.add(input))?;
        info!(id = %bill.id, due = %bill.due_date, amount = %bill.amount, "bill added");
        Ok(bill)
    }

    pub fn get(&self, id: BillId) -> FinanceResult<Bill> {
        self.storage.bills.get(id)
    }

    /// Find a bill by ID string (`3` or `bill-3`)
    pub fn find(&self, identifier: &str) -> FinanceResult<Bill> {
        self.get(parse_bill_id(identifier)?)
    }

    /// All bills in insertion order, optionally only the unpaid ones
    pub fn list(&self, pending_only: bool) -> Vec<Bill> {
        self.storage
            .bills
            .records()
            .iter()
            .filter(|b| !pending_only || !b.is_paid())
            .cloned()
            .collect()
    }

    pub fn update(&mut self, id: BillId, changes: BillUpdate) -> FinanceResult<Bill> {
        let bill = self.storage.commit(|s| s.bills.update(id, &changes))?;
        info!(id = %bill.id, "bill updated");
        Ok(bill)
    }

    /// Mark a bill paid on `on`; paying twice is a validation error
    pub fn pay(&mut self, id: BillId, on: NaiveDate) -> FinanceResult<Bill> {
        let bill = self.storage.commit(|s| s.bills.mark_paid(id, on))?;
        info!(id = %bill.id, paid_on = %on, "bill paid");
        Ok(bill)
    }

    pub fn delete(&mut self, id: BillId) -> FinanceResult<Bill> {
        let bill = self.storage.commit(|s| s.bills.delete(id))?;
        info!(id = %bill.id, "bill deleted");
        Ok(bill)
    }

    /// Pending bills due on or before `today + days`, overdue ones included
    ///
    /// Sorted by due date, then by ID. A look-ahead past the last
    /// representable date covers every pending bill.
    pub fn due_within(&self, today: NaiveDate, days: u32) -> Vec<Bill> {
        let horizon = today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);

        let mut due: Vec<Bill> = self
            .storage
            .bills
            .records()
            .iter()
            .filter(|b| !b.is_paid() && b.due_date <= horizon)
            .cloned()
            .collect();
        due.sort_by_key(|b| (b.due_date, b.id));
        due
    }
}

/// Parse a bill ID, turning bad input into a validation error
pub fn parse_bill_id(identifier: &str) -> FinanceResult<BillId> {
    identifier
        .trim()
        .parse::<BillId>()
        .map_err(|_| FinanceError::Validation(format!("Invalid bill ID '{}'", identifier.trim())))
}
