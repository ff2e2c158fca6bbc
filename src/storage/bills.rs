//! Bill repository

use chrono::NaiveDate;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Bill, BillId, BillUpdate, NewBill};

/// In-memory bill collection, kept in insertion order
#[derive(Debug, Clone)]
pub struct BillRepository {
    items: Vec<Bill>,
    next_id: BillId,
}

impl Default for BillRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl BillRepository {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: BillId::new(1),
        }
    }

    pub(crate) fn from_records(mut items: Vec<Bill>, stored_next: u64) -> Self {
        items.sort_by_key(|b| b.id);
        let after_max = items.last().map_or(1, |b| b.id.value().saturating_add(1));
        Self {
            items,
            next_id: BillId::new(stored_next.max(after_max).max(1)),
        }
    }

    /// Validate and append a new pending bill
    pub fn add(&mut self, input: NewBill) -> FinanceResult<Bill> {
        let following = self
            .next_id
            .next()
            .ok_or_else(|| FinanceError::Validation("No bill IDs left to assign".into()))?;
        let bill = input.into_bill(self.next_id)?;
        self.next_id = following;
        self.items.push(bill.clone());
        Ok(bill)
    }

    pub fn get(&self, id: BillId) -> FinanceResult<Bill> {
        self.position(id).map(|idx| self.items[idx].clone())
    }

    pub fn update(&mut self, id: BillId, changes: &BillUpdate) -> FinanceResult<Bill> {
        let idx = self.position(id)?;
        let bill = &mut self.items[idx];
        bill.apply(changes)?;
        Ok(bill.clone())
    }

    /// Mark a pending bill as paid on the given day
    pub fn mark_paid(&mut self, id: BillId, on: NaiveDate) -> FinanceResult<Bill> {
        let idx = self.position(id)?;
        let bill = &mut self.items[idx];
        bill.mark_paid(on)?;
        Ok(bill.clone())
    }

    /// Remove a bill in any state and return it
    pub fn delete(&mut self, id: BillId) -> FinanceResult<Bill> {
        let idx = self.position(id)?;
        Ok(self.items.remove(idx))
    }

    /// Snapshot of all bills in insertion order
    pub fn list(&self) -> Vec<Bill> {
        self.items.clone()
    }

    pub fn records(&self) -> &[Bill] {
        &self.items
    }

    pub fn next_id(&self) -> BillId {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: BillId) -> FinanceResult<usize> {
        self.items
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| FinanceError::bill_not_found(id.to_string()))
    }
}
