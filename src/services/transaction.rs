//! Transaction service
//!
//! CRUD over recorded expenses. Every change is validated, saved straight
//! away through `Storage::commit` and logged.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, NewTransaction, Transaction, TransactionId, TransactionUpdate};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a mut Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by category
    pub category: Option<Category>,
    /// Filter by date range start
    pub start_date: Option<NaiveDate>,
    /// Filter by date range end
    pub end_date: Option<NaiveDate>,
    /// Keep only the most recent N matches
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Filter by date range (inclusive)
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Restrict to one calendar month
    pub fn month(self, year: i32, month: u32) -> FinanceResult<Self> {
        let (start, end) = month_bounds(year, month).ok_or_else(|| {
            FinanceError::Validation(format!("Invalid month: {}-{:02}", year, month))
        })?;
        Ok(self.date_range(start, end))
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        self.category.as_ref().map_or(true, |c| &txn.category == c)
            && self.start_date.map_or(true, |start| txn.date >= start)
            && self.end_date.map_or(true, |end| txn.date <= end)
    }
}

/// First and last day of a calendar month
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    Some((start, end))
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Record a new transaction
    pub fn add(&mut self, input: NewTransaction) -> FinanceResult<Transaction> {
        let txn = self.storage.commit(|s| s.transactions.add(input))?;
        info!(id = %txn.id, amount = %txn.amount, category = %txn.category, "transaction added");
        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> FinanceResult<Transaction> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by ID string (`7` or `txn-7`)
    pub fn find(&self, identifier: &str) -> FinanceResult<Transaction> {
        let id = parse_transaction_id(identifier)?;
        self.get(id)
    }

    /// List transactions in insertion order
    ///
    /// With a limit, the last N matches are kept, still oldest first.
    pub fn list(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self
            .storage
            .transactions
            .records()
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();

        if let Some(limit) = filter.limit {
            let skip = transactions.len().saturating_sub(limit);
            transactions.drain(..skip);
        }
        transactions
    }

    pub fn update(&mut self, id: TransactionId, changes: TransactionUpdate) -> FinanceResult<Transaction> {
        let txn = self.storage.commit(|s| s.transactions.update(id, &changes))?;
        info!(id = %txn.id, "transaction updated");
        Ok(txn)
    }

    pub fn delete(&mut self, id: TransactionId) -> FinanceResult<Transaction> {
        let txn = self.storage.commit(|s| s.transactions.delete(id))?;
        info!(id = %txn.id, amount = %txn.amount, "transaction deleted");
        Ok(txn)
    }

    /// Number of recorded transactions
    pub fn count(&self) -> usize {
        self.storage.transactions.len()
    }

    /// Distinct categories in use, sorted
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self
            .storage
            .transactions
            .records()
            .iter()
            .map(|t| t.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }
}

/// Parse a transaction ID, turning bad input into a validation error
pub fn parse_transaction_id(identifier: &str) -> FinanceResult<TransactionId> {
    identifier.trim().parse::<TransactionId>().map_err(|_| {
        FinanceError::Validation(format!(
            "Invalid transaction ID '{}'",
            identifier.trim()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use crate::config::paths::FinancePaths;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn input(cents: i64, category: &str, date: &str) -> NewTransaction {
        NewTransaction::new(Money::from_cents(cents), category, date)
    }

    #[test]
    fn test_add_persists_immediately() {
        let (temp_dir, mut storage) = create_test_storage();
        let mut service = TransactionService::new(&mut storage);

        let txn = service
            .add(input(1250, "Food", "2025-01-15").description("lunch"))
            .unwrap();
        assert_eq!(txn.category.as_str(), "food");
        assert_eq!(service.get(txn.id).unwrap(), txn);

        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let (reloaded, _) = Storage::open(paths).unwrap();
        assert_eq!(reloaded.transactions.get(txn.id).unwrap(), txn);
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let (_temp_dir, mut storage) = create_test_storage();
        let mut service = TransactionService::new(&mut storage);

        assert!(service.add(input(0, "food", "2025-01-15")).unwrap_err().is_validation());
        assert!(service.add(input(-100, "food", "2025-01-15")).unwrap_err().is_validation());
        assert!(service.add(input(100, "food", "15/01/2025")).unwrap_err().is_validation());
        assert!(service.add(input(100, "  ", "2025-01-15")).unwrap_err().is_validation());
        assert!(service
            .add(input(100_000_001, "food", "2025-01-15"))
            .unwrap_err()
            .is_validation());
        assert_eq!(service.count(), 0);
    }

    #[test]
    fn test_list_with_filters() {
        let (_temp_dir, mut storage) = create_test_storage();
        let mut service = TransactionService::new(&mut storage);
        service.add(input(100, "food", "2025-01-10")).unwrap();
        service.add(input(200, "rent", "2025-01-01")).unwrap();
        service.add(input(300, "food", "2025-02-03")).unwrap();
        service.add(input(400, "food", "2025-02-20")).unwrap();

        assert_eq!(service.list(&TransactionFilter::new()).len(), 4);

        let food = Category::new("food").unwrap();
        let food_only = service.list(&TransactionFilter::new().category(food));
        assert_eq!(food_only.len(), 3);

        let feb = service.list(&TransactionFilter::new().month(2025, 2).unwrap());
        let amounts: Vec<i64> = feb.iter().map(|t| t.amount.cents()).collect();
        assert_eq!(amounts, vec![300, 400]);

        let last_two = service.list(&TransactionFilter::new().limit(2));
        let amounts: Vec<i64> = last_two.iter().map(|t| t.amount.cents()).collect();
        assert_eq!(amounts, vec![300, 400]);

        let categories: Vec<String> = service.categories().iter().map(|c| c.to_string()).collect();
        assert_eq!(categories, vec!["food", "rent"]);
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp_dir, mut storage) = create_test_storage();
        let mut service = TransactionService::new(&mut storage);
        let txn = service.add(input(1000, "books", "2025-01-10")).unwrap();

        let updated = service
            .update(
                txn.id,
                TransactionUpdate {
                    category: Some("tuition".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.category.as_str(), "tuition");
        assert_eq!(updated.amount, txn.amount);

        let bad = TransactionUpdate {
            amount: Some(Money::zero()),
            ..Default::default()
        };
        assert!(service.update(txn.id, bad).unwrap_err().is_validation());
        assert_eq!(service.get(txn.id).unwrap().category.as_str(), "tuition");

        service.delete(txn.id).unwrap();
        assert!(service.get(txn.id).unwrap_err().is_not_found());
        assert!(service.delete(txn.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_by_string() {
        let (_temp_dir, mut storage) = create_test_storage();
        let mut service = TransactionService::new(&mut storage);
        let txn = service.add(input(1000, "books", "2025-01-10")).unwrap();

        assert_eq!(service.find("1").unwrap().id, txn.id);
        assert_eq!(service.find("txn-1").unwrap().id, txn.id);
        assert!(service.find("txn-9").unwrap_err().is_not_found());
        assert!(service.find("abc").unwrap_err().is_validation());
    }

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds(2024, 2).unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(start.day(), 1);
        let (_, end) = month_bounds(2025, 12).unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert!(month_bounds(2025, 13).is_none());
        assert!(TransactionFilter::new()
            .month(2025, 13)
            .unwrap_err()
            .is_validation());
    }
}
