//! Student Finance Tracker
//!
//! A terminal finance tracker for students: expense transactions, monthly
//! budgets, bill reminders and a forecast of next month's spending. All
//! state lives in one local JSON file.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and persisted settings
//! - `error`: Custom error types
//! - `models`: Core data models (money, categories, transactions, bills)
//! - `storage`: In-memory repositories and the JSON data file
//! - `backup`: Rolling backups of the data file
//! - `services`: Business logic, budget math and prediction
//! - `display`: Terminal formatting
//! - `cli`: Command handlers used by the `finance` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use student_finance::config::paths::FinancePaths;
//! use student_finance::models::{Money, NewTransaction};
//! use student_finance::services::TransactionService;
//! use student_finance::storage::Storage;
//!
//! let (mut storage, _report) = Storage::open(FinancePaths::new()?)?;
//! let mut service = TransactionService::new(&mut storage);
//! service.add(NewTransaction::new(Money::from_cents(1250), "food", "2025-01-15"))?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{FinanceError, FinanceResult};
