//! Report formatting for budget status, spending classification and
//! predictions

use crate::config::settings::Preferences;
use crate::services::budget::{BudgetSummary, SpendingShare};
use crate::services::prediction::{Confidence, LimitOutlook, Prediction};

use super::truncate;

/// Percentage points represented by one bar block
const PERCENT_PER_BLOCK: f64 = 5.0;

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Proportional bar, one block per 5 percentage points
pub fn share_bar(pct: f64) -> String {
    if pct <= 0.0 {
        return String::new();
    }
    let blocks = (pct / PERCENT_PER_BLOCK).floor() as usize;
    "█".repeat(blocks.min(20))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Budget status for one month
pub fn format_budget_summary(summary: &BudgetSummary, month_label: &str, prefs: &Preferences) -> String {
    let mut output = String::new();

    output.push_str(&format!("Budget for {}\n", month_label));
    output.push_str(&separator(44));
    output.push('\n');

    output.push_str(&format!("{:20} {:>14}\n", "Spent:", prefs.money(summary.total_spent)));

    if summary.limit.is_positive() {
        output.push_str(&format!("{:20} {:>14}\n", "Limit:", prefs.money(summary.limit)));
        output.push_str(&format!(
            "{:20} {:>14}\n",
            "Remaining:",
            prefs.money(summary.remaining)
        ));
        if let Some(pct) = summary.usage_percent() {
            output.push_str(&format!("{:20} {:>14}\n", "Used:", format_percentage(pct)));
        }
        if summary.over_budget {
            output.push_str(&format!(
                "OVER BUDGET by {}\n",
                prefs.money(-summary.remaining)
            ));
        }
    } else {
        output.push_str("No monthly limit set. Use `finance budget set <amount>`.\n");
    }

    if !summary.by_category.is_empty() {
        output.push_str("\nBy category:\n");
        for (category, spent) in &summary.by_category {
            output.push_str(&format!(
                "  {:18} {:>14}\n",
                truncate(category.as_str(), 18),
                prefs.money(*spent)
            ));
        }
    }

    if !summary.category_status.is_empty() {
        output.push_str("\nCategory limits:\n");
        for status in &summary.category_status {
            let flag = if status.over { "  OVER" } else { "" };
            output.push_str(&format!(
                "  {:18} {:>12} / {:>12}{}\n",
                truncate(status.category.as_str(), 18),
                prefs.money(status.spent),
                prefs.money(status.limit),
                flag
            ));
        }
    }

    output
}

/// Spending classification across all history
pub fn format_spending_classification(shares: &[SpendingShare], prefs: &Preferences) -> String {
    if shares.is_empty() {
        return "No spending recorded yet.\n".to_string();
    }

    let mut output = String::new();
    output.push_str("Spending by category (all time)\n");
    output.push_str(&separator(64));
    output.push('\n');

    for share in shares {
        output.push_str(&format!(
            "{:16} {:>12} {:>6}  {}\n",
            truncate(share.category.as_str(), 16),
            prefs.money(share.total),
            format_percentage(share.percentage),
            share_bar(share.percentage)
        ));
    }

    let total: crate::models::Money = shares.iter().map(|s| s.total).sum();
    output.push_str(&separator(64));
    output.push('\n');
    output.push_str(&format!("{:16} {:>12}\n", "Total", prefs.money(total)));

    output
}

/// Prediction with its history and comparison to the monthly limit
pub fn format_prediction(prediction: &Prediction, outlook: LimitOutlook, prefs: &Preferences) -> String {
    let forecast = &prediction.forecast;
    let mut output = String::new();

    let scope = match &prediction.category {
        Some(category) => format!(" ({})", category),
        None => String::new(),
    };
    output.push_str(&format!(
        "Predicted spending for {}{}: {}\n",
        prediction.next_period.format("%Y-%m"),
        scope,
        prefs.money(forecast.amount)
    ));
    output.push_str(&format!(
        "Strategy: {}, based on {} month(s), confidence: {}\n",
        forecast.strategy, forecast.periods_used, forecast.confidence
    ));
    if forecast.confidence == Confidence::Low {
        output.push_str("Note: fewer than 5 months of history, treat this as a rough guess.\n");
    }

    match outlook {
        LimitOutlook::NoLimit => {}
        LimitOutlook::Under { headroom } => output.push_str(&format!(
            "Within your monthly limit, {} to spare.\n",
            prefs.money(headroom)
        )),
        LimitOutlook::Over { overrun } => output.push_str(&format!(
            "Expected to exceed your monthly limit by {}.\n",
            prefs.money(overrun)
        )),
    }

    output.push_str("\nHistory:\n");
    for period in &prediction.history {
        output.push_str(&format!("  {}  {:>12}\n", period.label(), prefs.money(period.total)));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::BudgetSettings;
    use crate::models::{Category, Money, Transaction, TransactionId};
    use crate::services::budget::{calculate_budget, classify_spending};
    use chrono::NaiveDate;

    fn txn(id: u64, cents: i64, category: &str) -> Transaction {
        Transaction::new(
            TransactionId::new(id),
            Money::from_cents(cents),
            Category::new(category).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_share_bar() {
        assert_eq!(share_bar(0.0), "");
        assert_eq!(share_bar(50.0).chars().count(), 10);
        assert_eq!(share_bar(100.0).chars().count(), 20);
        assert_eq!(share_bar(2.4).chars().count(), 0);
        assert_eq!(share_bar(9.9).chars().count(), 1);
        assert_eq!(share_bar(14.99).chars().count(), 2);
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.05), "0.05%");
        assert_eq!(format_percentage(5.3), "5.3%");
        assert_eq!(format_percentage(75.0), "75%");
    }

    #[test]
    fn test_budget_summary_over() {
        let summary = calculate_budget(
            &[txn(1, 12_000, "food")],
            &BudgetSettings::with_limit(Money::from_cents(10_000)),
        );
        let output = format_budget_summary(&summary, "2025-01", &Preferences::default());
        assert!(output.contains("Budget for 2025-01"));
        assert!(output.contains("OVER BUDGET by ₹20.00"));
        assert!(output.contains("120%"));
    }

    #[test]
    fn test_budget_summary_without_limit() {
        let summary = calculate_budget(&[], &BudgetSettings::default());
        let output = format_budget_summary(&summary, "2025-01", &Preferences::default());
        assert!(output.contains("No monthly limit set"));
    }

    #[test]
    fn test_classification() {
        let shares = classify_spending(&[txn(1, 7_500, "rent"), txn(2, 2_500, "food")]);
        let output = format_spending_classification(&shares, &Preferences::default());
        assert!(output.contains(&"█".repeat(15)));
        assert!(output.contains("25%"));
        assert!(output.contains("₹100.00"));
    }
}
