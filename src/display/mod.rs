//! Display formatting for terminal output
//!
//! Turns records and reports into plain text. Amounts are printed with the
//! currency symbol from the user's preferences.

pub mod bill;
pub mod report;
pub mod transaction;

pub use bill::{format_bill_details, format_bill_list};
pub use report::{format_budget_summary, format_prediction, format_spending_classification};
pub use transaction::{format_transaction_details, format_transaction_register};

/// Pad or cut a string to exactly `max_len` characters
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("food", 6), "food  ");
        assert_eq!(truncate("entertainment", 8), "enter...");
        assert_eq!(truncate("café au lait", 7), "café...");
        assert_eq!(truncate("abcdef", 2), "..");
    }
}
