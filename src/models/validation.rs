//! Field validation shared by transactions and bills

use chrono::NaiveDate;

use super::money::Money;
use crate::error::{FinanceError, FinanceResult};

/// Date format used for input, storage and display
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Check that an amount is positive and within the per-entry ceiling
pub fn validate_amount(amount: Money) -> FinanceResult<()> {
    if !amount.is_positive() {
        return Err(FinanceError::Validation(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }

    if amount > Money::MAX_ENTRY {
        return Err(FinanceError::Validation(format!(
            "Amount too large (max {})",
            Money::MAX_ENTRY
        )));
    }

    Ok(())
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> FinanceResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| {
        FinanceError::Validation(format!(
            "Invalid date: '{}'. Use YYYY-MM-DD",
            input.trim()
        ))
    })
}

/// Trim a required text field, rejecting blanks
pub fn require_text(field: &str, value: &str) -> FinanceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FinanceError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}
