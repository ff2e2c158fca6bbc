//! Spending prediction
//!
//! Transactions are grouped into calendar-month totals and next month's
//! spending is forecast from those totals. Two strategies exist:
//!
//! - `average`: mean of the most recent `window` months
//! - `linear`: least-squares line through every month, extended one step
//!
//! Everything here is a pure function of its inputs. A prediction needs at
//! least five transactions; the linear strategy also needs two months.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DataKind, FinanceError, FinanceResult};
use crate::models::{Category, Money, Transaction};

/// Fewest transactions any prediction is made from
pub const MIN_TRANSACTIONS: usize = 5;

/// Fewer periods than this gives a low-confidence forecast
pub const CONFIDENT_PERIODS: usize = 5;

/// Fewest periods a linear fit is made from
pub const MIN_LINEAR_PERIODS: usize = 2;

/// Months averaged when no window is configured
pub const DEFAULT_WINDOW: usize = 6;

/// How the next period's total is forecast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStrategy {
    #[default]
    Average,
    Linear,
}

impl fmt::Display for PredictionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Average => write!(f, "average"),
            Self::Linear => write!(f, "linear"),
        }
    }
}

impl FromStr for PredictionStrategy {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "average" | "avg" => Ok(Self::Average),
            "linear" | "trend" => Ok(Self::Linear),
            other => Err(FinanceError::Validation(format!(
                "Unknown prediction strategy '{}'. Use 'average' or 'linear'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Normal,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Normal => write!(f, "normal"),
        }
    }
}

/// Spending in one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTotal {
    /// First day of the month
    pub period: NaiveDate,
    pub total: Money,
}

impl PeriodTotal {
    /// `YYYY-MM` label
    pub fn label(&self) -> String {
        self.period.format("%Y-%m").to_string()
    }
}

/// A forecast figure and how it was produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecast {
    pub amount: Money,
    pub strategy: PredictionStrategy,
    pub confidence: Confidence,
    /// Number of period totals that went into the figure
    pub periods_used: usize,
}

/// How a forecast compares to a monthly limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitOutlook {
    NoLimit,
    Under { headroom: Money },
    Over { overrun: Money },
}

impl Forecast {
    /// Compare the forecast to a monthly limit; zero means no limit
    pub fn against_limit(&self, limit: Money) -> LimitOutlook {
        if !limit.is_positive() {
            LimitOutlook::NoLimit
        } else if self.amount > limit {
            LimitOutlook::Over {
                overrun: self.amount - limit,
            }
        } else {
            LimitOutlook::Under {
                headroom: limit - self.amount,
            }
        }
    }
}

/// Inputs to a prediction
#[derive(Debug, Clone)]
pub struct PredictionConfig {
    pub strategy: PredictionStrategy,
    /// Months averaged by the average strategy; must be at least 1
    pub window: usize,
    /// Only consider this category
    pub category: Option<Category>,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self::new(PredictionStrategy::default(), DEFAULT_WINDOW)
    }
}

impl PredictionConfig {
    pub fn new(strategy: PredictionStrategy, window: usize) -> Self {
        Self {
            strategy,
            window,
            category: None,
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}

/// Result of a prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub forecast: Forecast,
    /// First day of the month being forecast
    pub next_period: NaiveDate,
    /// Monthly totals the forecast was computed from, oldest first
    pub history: Vec<PeriodTotal>,
    pub category: Option<Category>,
}

/// Group transactions into monthly totals, oldest month first
///
/// Months with no spending in between are not filled in.
pub fn monthly_totals(transactions: &[Transaction], category: Option<&Category>) -> Vec<PeriodTotal> {
    let mut by_month: BTreeMap<NaiveDate, Money> = BTreeMap::new();

    for txn in transactions {
        if category.map_or(false, |c| &txn.category != c) {
            continue;
        }
        *by_month.entry(first_of_month(txn.date)).or_default() += txn.amount;
    }

    by_month
        .into_iter()
        .map(|(period, total)| PeriodTotal { period, total })
        .collect()
}

/// Forecast the next value of a series of period totals
pub fn forecast_totals(
    totals: &[f64],
    strategy: PredictionStrategy,
    window: usize,
) -> FinanceResult<Forecast> {
    if window == 0 {
        return Err(FinanceError::Validation(
            "Average window must be at least 1 period".into(),
        ));
    }

    let (raw, periods_used) = match strategy {
        PredictionStrategy::Average => {
            if totals.is_empty() {
                return Err(insufficient_periods(1, 0));
            }
            let recent = &totals[totals.len().saturating_sub(window)..];
            let mean = recent.iter().sum::<f64>() / recent.len() as f64;
            (mean, recent.len())
        }
        PredictionStrategy::Linear => {
            if totals.len() < MIN_LINEAR_PERIODS {
                return Err(insufficient_periods(MIN_LINEAR_PERIODS, totals.len()));
            }
            let (slope, intercept) = least_squares(totals);
            (intercept + slope * totals.len() as f64, totals.len())
        }
    };

    let confidence = if periods_used < CONFIDENT_PERIODS {
        Confidence::Low
    } else {
        Confidence::Normal
    };

    Ok(Forecast {
        amount: Money::from_f64_rounded(raw.max(0.0)),
        strategy,
        confidence,
        periods_used,
    })
}

/// Predict next month's spending
pub fn predict(transactions: &[Transaction], config: &PredictionConfig) -> FinanceResult<Prediction> {
    let category = config.category.as_ref();
    let considered = transactions
        .iter()
        .filter(|t| category.map_or(true, |c| &t.category == c))
        .count();

    if considered < MIN_TRANSACTIONS {
        return Err(FinanceError::InsufficientData {
            kind: DataKind::Transactions,
            needed: MIN_TRANSACTIONS,
            found: considered,
        });
    }

    let history = monthly_totals(transactions, category);
    let values: Vec<f64> = history.iter().map(|p| p.total.as_f64()).collect();
    let forecast = forecast_totals(&values, config.strategy, config.window)?;

    // history is non-empty here since at least one transaction was counted
    let last = history.last().map(|p| p.period).unwrap_or_default();
    let next_period = last
        .checked_add_months(Months::new(1))
        .ok_or_else(|| FinanceError::Validation("Date out of range".into()))?;

    Ok(Prediction {
        forecast,
        next_period,
        history,
        category: config.category.clone(),
    })
}

/// Like `predict`, but a linear request without enough periods is retried
/// with the average strategy
pub fn predict_with_fallback(
    transactions: &[Transaction],
    config: &PredictionConfig,
) -> FinanceResult<Prediction> {
    match predict(transactions, config) {
        Err(FinanceError::InsufficientData {
            kind: DataKind::Periods,
            needed,
            found,
        }) if config.strategy == PredictionStrategy::Linear => {
            warn!(
                needed,
                found, "not enough periods for a linear forecast, falling back to average"
            );
            let fallback = PredictionConfig {
                strategy: PredictionStrategy::Average,
                ..config.clone()
            };
            predict(transactions, &fallback)
        }
        other => other,
    }
}

/// Slope and intercept of y over x = 0..n-1
fn least_squares(ys: &[f64]) -> (f64, f64) {
    let n = ys.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = ys.iter().sum::<f64>() / n;

    let (mut num, mut den) = (0.0, 0.0);
    for (x, y) in ys.iter().enumerate() {
        let dx = x as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }

    let slope = if den == 0.0 { 0.0 } else { num / den };
    (slope, y_mean - slope * x_mean)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn insufficient_periods(needed: usize, found: usize) -> FinanceError {
    FinanceError::InsufficientData {
        kind: DataKind::Periods,
        needed,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionId;

    fn txn(id: u64, cents: i64, category: &str, date: (i32, u32, u32)) -> Transaction {
        Transaction::new(
            TransactionId::new(id),
            Money::from_cents(cents),
            Category::new(category).unwrap(),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        )
    }

    /// One transaction per month, Jan..May 2025, with the given unit totals
    fn monthly(units: &[i64]) -> Vec<Transaction> {
        units
            .iter()
            .enumerate()
            .map(|(i, u)| txn(i as u64 + 1, u * 100, "food", (2025, i as u32 + 1, 10)))
            .collect()
    }

    #[test]
    fn test_average_over_five_periods() {
        let txns = monthly(&[100, 120, 110, 130, 115]);
        let prediction = predict(&txns, &PredictionConfig::new(PredictionStrategy::Average, 6)).unwrap();

        assert_eq!(prediction.forecast.amount, Money::from_cents(11_500));
        assert_eq!(prediction.forecast.confidence, Confidence::Normal);
        assert_eq!(prediction.forecast.periods_used, 5);
        assert_eq!(prediction.next_period, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn test_linear_trend() {
        let txns = monthly(&[100, 120, 110, 130, 115]);
        let prediction = predict(&txns, &PredictionConfig::new(PredictionStrategy::Linear, 6)).unwrap();

        // slope 4, intercept 107, x = 5
        assert_eq!(prediction.forecast.amount, Money::from_cents(12_700));
        assert_eq!(prediction.forecast.strategy, PredictionStrategy::Linear);
        assert_eq!(prediction.forecast.confidence, Confidence::Normal);

        let (slope, intercept) = least_squares(&[100.0, 120.0, 110.0, 130.0, 115.0]);
        assert!((slope - 4.0).abs() < 1e-9);
        assert!((intercept - 107.0).abs() < 1e-9);
    }

    #[test]
    fn test_too_few_transactions() {
        let txns = monthly(&[100, 120, 110, 130]);
        let err = predict(&txns, &PredictionConfig::new(PredictionStrategy::Average, 6)).unwrap_err();
        assert!(matches!(
            err,
            FinanceError::InsufficientData {
                kind: DataKind::Transactions,
                needed: 5,
                found: 4
            }
        ));
    }

    #[test]
    fn test_category_filter_counts_toward_minimum() {
        let mut txns = monthly(&[100, 120, 110, 130, 115]);
        txns.push(txn(6, 5000, "books", (2025, 5, 1)));

        let config = PredictionConfig::new(PredictionStrategy::Average, 6)
            .category(Category::new("books").unwrap());
        assert!(predict(&txns, &config).unwrap_err().is_insufficient_data());

        let config = PredictionConfig::new(PredictionStrategy::Average, 6)
            .category(Category::new("food").unwrap());
        let prediction = predict(&txns, &config).unwrap();
        assert_eq!(prediction.forecast.amount, Money::from_cents(11_500));
    }

    #[test]
    fn test_single_period_is_low_confidence() {
        let txns: Vec<_> = (1..=5).map(|d| txn(d, 1000, "food", (2025, 3, d as u32))).collect();

        let prediction = predict(&txns, &PredictionConfig::new(PredictionStrategy::Average, 6)).unwrap();
        assert_eq!(prediction.forecast.amount, Money::from_cents(5000));
        assert_eq!(prediction.forecast.confidence, Confidence::Low);
        assert_eq!(prediction.history.len(), 1);

        let linear = PredictionConfig::new(PredictionStrategy::Linear, 6);
        let err = predict(&txns, &linear).unwrap_err();
        assert!(matches!(
            err,
            FinanceError::InsufficientData {
                kind: DataKind::Periods,
                ..
            }
        ));

        let fallback = predict_with_fallback(&txns, &linear).unwrap();
        assert_eq!(fallback.forecast.strategy, PredictionStrategy::Average);
        assert_eq!(fallback.forecast.amount, Money::from_cents(5000));
    }

    #[test]
    fn test_window_limits_average() {
        let forecast = forecast_totals(&[10.0, 20.0, 30.0, 40.0], PredictionStrategy::Average, 2).unwrap();
        assert_eq!(forecast.amount, Money::from_cents(3500));
        assert_eq!(forecast.periods_used, 2);
        assert_eq!(forecast.confidence, Confidence::Low);

        assert!(forecast_totals(&[10.0], PredictionStrategy::Average, 0)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_negative_trend_clamps_to_zero() {
        let forecast = forecast_totals(&[300.0, 200.0, 100.0, 0.0], PredictionStrategy::Linear, 6).unwrap();
        assert_eq!(forecast.amount, Money::zero());
    }

    #[test]
    fn test_forecast_rounds_to_cents() {
        let forecast = forecast_totals(&[10.0, 10.0, 10.01], PredictionStrategy::Average, 6).unwrap();
        assert_eq!(forecast.amount, Money::from_cents(1000));
    }

    #[test]
    fn test_monthly_totals_grouping() {
        let txns = vec![
            txn(1, 1000, "food", (2025, 2, 3)),
            txn(2, 500, "rent", (2025, 1, 31)),
            txn(3, 250, "food", (2025, 2, 28)),
        ];

        let totals = monthly_totals(&txns, None);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].label(), "2025-01");
        assert_eq!(totals[1].total, Money::from_cents(1250));

        let food = Category::new("food").unwrap();
        assert_eq!(monthly_totals(&txns, Some(&food)).len(), 1);
    }

    #[test]
    fn test_next_period_crosses_year() {
        let txns: Vec<_> = (1..=5).map(|d| txn(d, 1000, "food", (2025, 12, d as u32))).collect();
        let prediction = predict(&txns, &PredictionConfig::new(PredictionStrategy::Average, 6)).unwrap();
        assert_eq!(prediction.next_period, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn test_against_limit() {
        let forecast = Forecast {
            amount: Money::from_cents(12_000),
            strategy: PredictionStrategy::Average,
            confidence: Confidence::Normal,
            periods_used: 5,
        };

        assert_eq!(forecast.against_limit(Money::zero()), LimitOutlook::NoLimit);
        assert_eq!(
            forecast.against_limit(Money::from_cents(10_000)),
            LimitOutlook::Over {
                overrun: Money::from_cents(2000)
            }
        );
        assert_eq!(
            forecast.against_limit(Money::from_cents(15_000)),
            LimitOutlook::Under {
                headroom: Money::from_cents(3000)
            }
        );
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("Linear".parse::<PredictionStrategy>().unwrap(), PredictionStrategy::Linear);
        assert_eq!("avg".parse::<PredictionStrategy>().unwrap(), PredictionStrategy::Average);
        assert!("magic".parse::<PredictionStrategy>().is_err());
    }
}
