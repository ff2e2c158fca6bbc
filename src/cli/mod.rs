//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Handlers print
//! to stdout and return errors to `main`.

pub mod backup;
pub mod bill;
pub mod budget;
pub mod config;
pub mod predict;
pub mod transaction;

pub use backup::{handle_backup_command, BackupCommands};
pub use bill::{handle_bill_command, BillCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use config::{handle_config_command, ConfigCommands};
pub use predict::{handle_predict_command, handle_report_command, PredictArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Local, NaiveDate};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Money, DATE_FORMAT};

/// Parse an amount typed by the user
pub(crate) fn parse_amount(input: &str) -> FinanceResult<Money> {
    Money::parse(input).map_err(|e| FinanceError::Validation(format!("{}: '{}'", e, input.trim())))
}

/// Parse a `YYYY-MM` month
pub(crate) fn parse_month(input: &str) -> FinanceResult<(i32, u32)> {
    let invalid = || FinanceError::Validation(format!("Invalid month: '{}'. Use YYYY-MM", input.trim()));

    let (year, month) = input.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        return Err(invalid());
    }
    Ok((year, month))
}

/// Today's date in local time
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn today_string() -> String {
    today().format(DATE_FORMAT).to_string()
}
