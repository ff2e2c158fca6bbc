//! User settings for the finance tracker
//!
//! Settings are stored inside the data file next to the records. They hold
//! the budget limits and a handful of display and prediction preferences.
//! Every field has a serde default so older files keep loading.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, Money};
use crate::services::prediction::{PredictionStrategy, DEFAULT_WINDOW};

/// Monthly spending limits
///
/// Setting a limit overwrites the previous one; no history is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetSettings {
    /// Overall monthly limit; zero means no limit has been set
    #[serde(default)]
    pub monthly_limit: Money,

    /// Optional per-category monthly limits
    #[serde(default)]
    pub category_limits: BTreeMap<Category, Money>,
}

impl BudgetSettings {
    /// Budget with only an overall monthly limit
    pub fn with_limit(monthly_limit: Money) -> Self {
        Self {
            monthly_limit,
            category_limits: BTreeMap::new(),
        }
    }

    pub fn has_limit(&self) -> bool {
        self.monthly_limit.is_positive()
    }

    pub fn set_monthly_limit(&mut self, limit: Money) -> FinanceResult<()> {
        if limit.is_negative() {
            return Err(FinanceError::Validation("Budget cannot be negative".into()));
        }
        self.monthly_limit = limit;
        Ok(())
    }

    pub fn set_category_limit(&mut self, category: Category, limit: Money) -> FinanceResult<()> {
        if !limit.is_positive() {
            return Err(FinanceError::Validation(format!(
                "Limit for '{}' must be positive",
                category
            )));
        }
        self.category_limits.insert(category, limit);
        Ok(())
    }

    /// Remove a category limit, returning the old value if there was one
    pub fn clear_category_limit(&mut self, category: &Category) -> Option<Money> {
        self.category_limits.remove(category)
    }
}

/// Display and prediction preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Strategy used when none is given on the command line
    #[serde(default)]
    pub prediction_strategy: PredictionStrategy,

    /// Number of recent months averaged by the average strategy
    #[serde(default = "default_average_window")]
    pub average_window: usize,

    /// Number of backup copies of the data file to keep
    #[serde(default = "default_backup_count")]
    pub backup_count: usize,
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_average_window() -> usize {
    DEFAULT_WINDOW
}

fn default_backup_count() -> usize {
    5
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency(),
            prediction_strategy: PredictionStrategy::default(),
            average_window: default_average_window(),
            backup_count: default_backup_count(),
        }
    }
}

/// Longest accepted currency symbol, in characters
const MAX_CURRENCY_CHARS: usize = 4;

impl Preferences {
    pub fn set_currency_symbol(&mut self, symbol: &str) -> FinanceResult<()> {
        let symbol = symbol.trim();
        if symbol.is_empty() || symbol.chars().count() > MAX_CURRENCY_CHARS {
            return Err(FinanceError::Validation(format!(
                "Currency symbol must be 1 to {} characters",
                MAX_CURRENCY_CHARS
            )));
        }
        self.currency_symbol = symbol.to_string();
        Ok(())
    }

    pub fn set_average_window(&mut self, window: usize) -> FinanceResult<()> {
        if window == 0 {
            return Err(FinanceError::Validation(
                "Average window must be at least 1 period".into(),
            ));
        }
        self.average_window = window;
        Ok(())
    }

    pub fn set_backup_count(&mut self, count: usize) -> FinanceResult<()> {
        if count == 0 {
            return Err(FinanceError::Validation(
                "At least one backup must be kept".into(),
            ));
        }
        self.backup_count = count;
        Ok(())
    }

    /// Format an amount with the configured currency symbol
    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}

/// Everything persisted under the `settings` key of the data file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub budget: BudgetSettings,

    #[serde(default)]
    pub preferences: Preferences,
}

impl Settings {
    /// Replace values the setters would have rejected with their defaults
    ///
    /// Settings read from disk bypass the setters. Returns the names of the
    /// fields that were reset.
    pub fn sanitize(&mut self) -> Vec<&'static str> {
        let mut reset = Vec::new();
        let defaults = Preferences::default();

        if self.budget.monthly_limit.is_negative() {
            self.budget.monthly_limit = Money::zero();
            reset.push("monthly_limit");
        }

        let before = self.budget.category_limits.len();
        self.budget.category_limits.retain(|_, limit| limit.is_positive());
        if self.budget.category_limits.len() != before {
            reset.push("category_limits");
        }

        let prefs = &mut self.preferences;
        let currency = prefs.currency_symbol.clone();
        if prefs.set_currency_symbol(&currency).is_err() {
            prefs.currency_symbol = defaults.currency_symbol;
            reset.push("currency_symbol");
        }
        if prefs.set_average_window(prefs.average_window).is_err() {
            prefs.average_window = defaults.average_window;
            reset.push("average_window");
        }
        if prefs.set_backup_count(prefs.backup_count).is_err() {
            prefs.backup_count = defaults.backup_count;
            reset.push("backup_count");
        }

        reset
    }
}
