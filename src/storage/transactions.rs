//! Transaction repository
//!
//! Holds transactions in insertion order (which is also ascending ID order)
//! and hands out monotonic IDs.

use chrono::NaiveDate;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{NewTransaction, Transaction, TransactionId, TransactionUpdate};

/// In-memory transaction collection
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    items: Vec<Transaction>,
    next_id: TransactionId,
}

impl Default for TransactionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: TransactionId::new(1),
        }
    }

    /// Rebuild a repository from loaded records
    ///
    /// The ID counter never goes backwards: it is the larger of the stored
    /// counter and one past the highest loaded ID.
    pub(crate) fn from_records(mut items: Vec<Transaction>, stored_next: u64) -> Self {
        items.sort_by_key(|t| t.id);
        let after_max = items.last().map_or(1, |t| t.id.value().saturating_add(1));
        Self {
            items,
            next_id: TransactionId::new(stored_next.max(after_max).max(1)),
        }
    }

    /// Validate and append a new transaction under a fresh ID
    pub fn add(&mut self, input: NewTransaction) -> FinanceResult<Transaction> {
        let following = self.next_id.next().ok_or_else(|| {
            FinanceError::Validation("No transaction IDs left to assign".into())
        })?;
        let txn = input.into_transaction(self.next_id)?;
        self.next_id = following;
        self.items.push(txn.clone());
        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> FinanceResult<Transaction> {
        self.position(id).map(|idx| self.items[idx].clone())
    }

    /// Apply changes to an existing transaction
    pub fn update(
        &mut self,
        id: TransactionId,
        changes: &TransactionUpdate,
    ) -> FinanceResult<Transaction> {
        let idx = self.position(id)?;
        let txn = &mut self.items[idx];
        txn.apply(changes)?;
        Ok(txn.clone())
    }

    /// Remove a transaction and return it
    pub fn delete(&mut self, id: TransactionId) -> FinanceResult<Transaction> {
        let idx = self.position(id)?;
        Ok(self.items.remove(idx))
    }

    /// Snapshot of all transactions in insertion order
    pub fn list(&self) -> Vec<Transaction> {
        self.items.clone()
    }

    /// Borrowed view for read-only calculations
    pub fn records(&self) -> &[Transaction] {
        &self.items
    }

    /// Transactions dated within `[start, end]`, in insertion order
    pub fn in_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<Transaction> {
        self.items
            .iter()
            .filter(|t| t.date >= start && t.date <= end)
            .cloned()
            .collect()
    }

    /// The ID the next `add` will assign
    pub fn next_id(&self) -> TransactionId {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: TransactionId) -> FinanceResult<usize> {
        self.items
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| FinanceError::transaction_not_found(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    fn input(cents: i64, category: &str, date: &str) -> NewTransaction {
        NewTransaction::new(Money::from_cents(cents), category, date)
    }

    #[test]
    fn test_add_and_get_round_trip() {
        let mut repo = TransactionRepository::new();
        let added = repo
            .add(input(1250, "food", "2025-01-15").description("lunch"))
            .unwrap();

        let fetched = repo.get(added.id).unwrap();
        assert_eq!(fetched, added);
        assert_eq!(added.id, TransactionId::new(1));
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut repo = TransactionRepository::new();
        let a = repo.add(input(100, "food", "2025-01-01")).unwrap();
        let b = repo.add(input(200, "food", "2025-01-02")).unwrap();
        repo.delete(b.id).unwrap();
        let c = repo.add(input(300, "food", "2025-01-03")).unwrap();

        assert!(a.id < b.id);
        assert!(b.id < c.id);
    }

    #[test]
    fn test_add_invalid_does_not_consume_id() {
        let mut repo = TransactionRepository::new();
        assert!(repo.add(input(0, "food", "2025-01-01")).is_err());
        assert!(repo.add(input(100, "food", "yesterday")).is_err());
        assert!(repo.is_empty());
        assert_eq!(repo.next_id(), TransactionId::new(1));
    }

    #[test]
    fn test_exhausted_id_space_is_an_error() {
        let mut repo = TransactionRepository::from_records(Vec::new(), u64::MAX);
        let err = repo.add(input(100, "food", "2025-01-01")).unwrap_err();
        assert!(err.is_validation());
        assert!(repo.is_empty());
        assert_eq!(repo.next_id(), TransactionId::new(u64::MAX));
    }

    #[test]
    fn test_update() {
        let mut repo = TransactionRepository::new();
        let txn = repo.add(input(1000, "books", "2025-01-10")).unwrap();

        let changes = TransactionUpdate {
            amount: Some(Money::from_cents(1500)),
            description: Some("used textbook".into()),
            ..Default::default()
        };
        let updated = repo.update(txn.id, &changes).unwrap();
        assert_eq!(updated.amount.cents(), 1500);
        assert_eq!(repo.get(txn.id).unwrap().description, "used textbook");

        let missing = repo.update(TransactionId::new(99), &changes).unwrap_err();
        assert!(missing.is_not_found());
    }

    #[test]
    fn test_delete() {
        let mut repo = TransactionRepository::new();
        let txn = repo.add(input(1000, "books", "2025-01-10")).unwrap();

        let removed = repo.delete(txn.id).unwrap();
        assert_eq!(removed, txn);
        assert!(repo.list().is_empty());
        assert!(repo.get(txn.id).unwrap_err().is_not_found());
        assert!(repo.delete(txn.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_is_snapshot_in_insertion_order() {
        let mut repo = TransactionRepository::new();
        repo.add(input(100, "food", "2025-03-01")).unwrap();
        repo.add(input(200, "rent", "2025-01-01")).unwrap();

        let snapshot = repo.list();
        repo.add(input(300, "misc", "2025-02-01")).unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].amount.cents(), 100);
        assert_eq!(snapshot[1].amount.cents(), 200);
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn test_in_date_range() {
        let mut repo = TransactionRepository::new();
        repo.add(input(100, "food", "2025-01-10")).unwrap();
        repo.add(input(200, "food", "2025-01-15")).unwrap();
        repo.add(input(300, "food", "2025-01-20")).unwrap();

        let range = repo.in_date_range(
            NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 18).unwrap(),
        );
        assert_eq!(range.len(), 1);
        assert_eq!(range[0].amount.cents(), 200);
    }

    #[test]
    fn test_from_records_counter() {
        let mut source = TransactionRepository::new();
        for _ in 0..3 {
            source.add(input(100, "food", "2025-01-01")).unwrap();
        }
        let records = source.list();

        let repo = TransactionRepository::from_records(records.clone(), 0);
        assert_eq!(repo.next_id(), TransactionId::new(4));

        let repo = TransactionRepository::from_records(records, 10);
        assert_eq!(repo.next_id(), TransactionId::new(10));
    }
}
