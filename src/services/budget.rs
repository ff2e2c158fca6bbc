//! Budget service
//!
//! Budget figures are computed on demand from the transactions and the
//! budget settings; nothing derived is stored. `calculate_budget` and
//! `classify_spending` are pure so they can be tested without storage.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::config::settings::BudgetSettings;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, Money, Transaction};
use crate::storage::Storage;

/// Spending against one category limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBudgetStatus {
    pub category: Category,
    pub spent: Money,
    pub limit: Money,
    /// May be negative when the limit was exceeded
    pub remaining: Money,
    pub over: bool,
}

/// Spending measured against the budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetSummary {
    pub total_spent: Money,
    /// Spending per category, in category order
    pub by_category: BTreeMap<Category, Money>,
    /// Overall limit; zero when none is set
    pub limit: Money,
    /// Limit minus total; may be negative
    pub remaining: Money,
    pub over_budget: bool,
    /// One row per category that has a limit
    pub category_status: Vec<CategoryBudgetStatus>,
}

impl BudgetSummary {
    /// Share of the limit used so far, or `None` when no limit is set
    pub fn usage_percent(&self) -> Option<f64> {
        if self.limit.is_positive() {
            Some(self.total_spent.cents() as f64 * 100.0 / self.limit.cents() as f64)
        } else {
            None
        }
    }
}

/// One category's share of all spending
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingShare {
    pub category: Category,
    pub total: Money,
    pub transaction_count: usize,
    pub percentage: f64,
}

/// Summarize spending against the budget
pub fn calculate_budget(transactions: &[Transaction], settings: &BudgetSettings) -> BudgetSummary {
    let mut by_category: BTreeMap<Category, Money> = BTreeMap::new();
    for txn in transactions {
        *by_category.entry(txn.category.clone()).or_default() += txn.amount;
    }
    let total_spent: Money = by_category.values().sum();

    let category_status = settings
        .category_limits
        .iter()
        .map(|(category, &limit)| {
            let spent = by_category.get(category).copied().unwrap_or_default();
            CategoryBudgetStatus {
                category: category.clone(),
                spent,
                limit,
                remaining: limit - spent,
                over: spent > limit,
            }
        })
        .collect();

    let limit = settings.monthly_limit;
    BudgetSummary {
        total_spent,
        by_category,
        limit,
        remaining: limit - total_spent,
        over_budget: limit.is_positive() && total_spent > limit,
        category_status,
    }
}

/// Transactions dated within the given calendar month
pub fn transactions_in_month(transactions: &[Transaction], year: i32, month: u32) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date.year() == year && t.date.month() == month)
        .cloned()
        .collect()
}

/// Each category's share of total spending, largest first
pub fn classify_spending(transactions: &[Transaction]) -> Vec<SpendingShare> {
    let mut totals: BTreeMap<&Category, (Money, usize)> = BTreeMap::new();
    for txn in transactions {
        let entry = totals.entry(&txn.category).or_insert((Money::zero(), 0));
        entry.0 += txn.amount;
        entry.1 += 1;
    }

    let grand_total: Money = totals.values().map(|(m, _)| *m).sum();

    let mut shares: Vec<SpendingShare> = totals
        .into_iter()
        .map(|(category, (total, count))| SpendingShare {
            category: category.clone(),
            total,
            transaction_count: count,
            percentage: if grand_total.is_positive() {
                total.cents() as f64 * 100.0 / grand_total.cents() as f64
            } else {
                0.0
            },
        })
        .collect();

    // Largest first; category name keeps ties stable
    shares.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    shares
}

/// Service for budget limits and summaries
pub struct BudgetService<'a> {
    storage: &'a mut Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    pub fn settings(&self) -> &BudgetSettings {
        &self.storage.settings.budget
    }

    /// Budget summary for one calendar month
    pub fn month_summary(&self, year: i32, month: u32) -> FinanceResult<BudgetSummary> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(FinanceError::Validation(format!(
                "Invalid month: {}-{:02}",
                year, month
            )));
        }

        let in_month = transactions_in_month(self.storage.transactions.records(), year, month);
        Ok(calculate_budget(&in_month, &self.storage.settings.budget))
    }

    /// Spending classification across all recorded transactions
    pub fn classify(&self) -> Vec<SpendingShare> {
        classify_spending(self.storage.transactions.records())
    }

    /// Set the overall monthly limit, replacing any previous one
    pub fn set_monthly_limit(&mut self, limit: Money) -> FinanceResult<()> {
        self.storage
            .commit(|s| s.settings.budget.set_monthly_limit(limit))?;
        info!(limit = %limit, "monthly limit set");
        Ok(())
    }

    pub fn clear_monthly_limit(&mut self) -> FinanceResult<()> {
        self.set_monthly_limit(Money::zero())
    }

    pub fn set_category_limit(&mut self, category: &str, limit: Money) -> FinanceResult<Category> {
        let category = Category::new(category)?;
        let key = category.clone();
        self.storage
            .commit(|s| s.settings.budget.set_category_limit(key, limit))?;
        info!(category = %category, limit = %limit, "category limit set");
        Ok(category)
    }

    /// Remove a category limit; fails with not-found when none was set
    pub fn clear_category_limit(&mut self, category: &str) -> FinanceResult<Money> {
        let category = Category::new(category)?;
        let removed = self.storage.commit(|s| {
            s.settings
                .budget
                .clear_category_limit(&category)
                .ok_or_else(|| FinanceError::NotFound {
                    entity_type: "Category limit",
                    identifier: category.to_string(),
                })
        })?;
        info!(category = %category, "category limit cleared");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FinancePaths;
    use crate::models::{NewTransaction, TransactionId};
    use tempfile::TempDir;

    fn txn(id: u64, cents: i64, category: &str, date: (i32, u32, u32)) -> Transaction {
        Transaction::new(
            TransactionId::new(id),
            Money::from_cents(cents),
            Category::new(category).unwrap(),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        )
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_empty_budget() {
        let summary = calculate_budget(&[], &BudgetSettings::with_limit(Money::from_cents(50_000)));
        assert_eq!(summary.total_spent, Money::zero());
        assert_eq!(summary.remaining, Money::from_cents(50_000));
        assert!(!summary.over_budget);
        assert_eq!(summary.usage_percent(), Some(0.0));
    }

    #[test]
    fn test_totals_and_categories() {
        let txns = vec![
            txn(1, 30_000, "rent", (2025, 1, 1)),
            txn(2, 1_500, "food", (2025, 1, 2)),
            txn(3, 2_500, "food", (2025, 1, 3)),
        ];
        let summary = calculate_budget(&txns, &BudgetSettings::with_limit(Money::from_cents(40_000)));

        assert_eq!(summary.total_spent, Money::from_cents(34_000));
        assert_eq!(summary.remaining, Money::from_cents(6_000));
        let categories: Vec<&str> = summary.by_category.keys().map(|c| c.as_str()).collect();
        assert_eq!(categories, vec!["food", "rent"]);
        assert_eq!(summary.by_category[&Category::new("food").unwrap()].cents(), 4_000);
        assert_eq!(summary.usage_percent(), Some(85.0));
    }

    #[test]
    fn test_over_budget() {
        let txns = vec![txn(1, 10_001, "food", (2025, 1, 1))];
        let summary = calculate_budget(&txns, &BudgetSettings::with_limit(Money::from_cents(10_000)));
        assert!(summary.over_budget);
        assert_eq!(summary.remaining, Money::from_cents(-1));

        // exactly at the limit is not over
        let txns = vec![txn(1, 10_000, "food", (2025, 1, 1))];
        let summary = calculate_budget(&txns, &BudgetSettings::with_limit(Money::from_cents(10_000)));
        assert!(!summary.over_budget);
    }

    #[test]
    fn test_no_limit_is_never_over() {
        let txns = vec![txn(1, 10_000, "food", (2025, 1, 1))];
        let summary = calculate_budget(&txns, &BudgetSettings::default());
        assert!(!summary.over_budget);
        assert!(summary.usage_percent().is_none());
    }

    #[test]
    fn test_category_status() {
        let mut settings = BudgetSettings::default();
        settings
            .set_category_limit(Category::new("food").unwrap(), Money::from_cents(3_000))
            .unwrap();
        settings
            .set_category_limit(Category::new("books").unwrap(), Money::from_cents(5_000))
            .unwrap();

        let txns = vec![
            txn(1, 2_000, "food", (2025, 1, 2)),
            txn(2, 2_000, "food", (2025, 1, 3)),
        ];
        let summary = calculate_budget(&txns, &settings);

        assert_eq!(summary.category_status.len(), 2);
        let books = &summary.category_status[0];
        assert_eq!(books.category.as_str(), "books");
        assert_eq!(books.spent, Money::zero());
        assert!(!books.over);
        let food = &summary.category_status[1];
        assert!(food.over);
        assert_eq!(food.remaining, Money::from_cents(-1_000));
    }

    #[test]
    fn test_transactions_in_month() {
        let txns = vec![
            txn(1, 100, "food", (2025, 1, 31)),
            txn(2, 200, "food", (2025, 2, 1)),
            txn(3, 300, "food", (2024, 2, 1)),
        ];
        let feb = transactions_in_month(&txns, 2025, 2);
        assert_eq!(feb.len(), 1);
        assert_eq!(feb[0].id, TransactionId::new(2));
    }

    #[test]
    fn test_classify_spending() {
        let txns = vec![
            txn(1, 7_500, "rent", (2025, 1, 1)),
            txn(2, 1_500, "food", (2024, 6, 2)),
            txn(3, 1_000, "food", (2025, 1, 3)),
        ];
        let shares = classify_spending(&txns);

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].category.as_str(), "rent");
        assert_eq!(shares[0].percentage, 75.0);
        assert_eq!(shares[1].total, Money::from_cents(2_500));
        assert_eq!(shares[1].transaction_count, 2);
        assert!(classify_spending(&[]).is_empty());
    }

    #[test]
    fn test_service_limits_persist() {
        let (temp_dir, mut storage) = create_test_storage();
        {
            let mut service = BudgetService::new(&mut storage);
            service.set_monthly_limit(Money::from_cents(50_000)).unwrap();
            service.set_category_limit("Food", Money::from_cents(10_000)).unwrap();
            assert!(service
                .set_category_limit("books", Money::zero())
                .unwrap_err()
                .is_validation());
        }

        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let (mut reloaded, _) = Storage::open(paths).unwrap();
        let mut service = BudgetService::new(&mut reloaded);
        assert_eq!(service.settings().monthly_limit, Money::from_cents(50_000));
        assert_eq!(service.settings().category_limits.len(), 1);

        assert_eq!(
            service.clear_category_limit("food").unwrap(),
            Money::from_cents(10_000)
        );
        assert!(service.clear_category_limit("food").unwrap_err().is_not_found());
        service.clear_monthly_limit().unwrap();
        assert!(!service.settings().has_limit());
    }

    #[test]
    fn test_month_summary() {
        let (_temp_dir, mut storage) = create_test_storage();
        storage
            .transactions
            .add(NewTransaction::new(Money::from_cents(1_000), "food", "2025-03-05"))
            .unwrap();
        storage
            .transactions
            .add(NewTransaction::new(Money::from_cents(2_000), "food", "2025-04-05"))
            .unwrap();

        let service = BudgetService::new(&mut storage);
        let march = service.month_summary(2025, 3).unwrap();
        assert_eq!(march.total_spent, Money::from_cents(1_000));
        assert!(service.month_summary(2025, 13).unwrap_err().is_validation());
    }
}
