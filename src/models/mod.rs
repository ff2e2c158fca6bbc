//! Core data models for the finance tracker
//!
//! This module contains the records the tracker stores: transactions,
//! bills, and the value types they are built from.

pub mod bill;
pub mod category;
pub mod ids;
pub mod money;
pub mod transaction;
pub mod validation;

pub use bill::{Bill, BillStatus, BillUpdate, NewBill};
pub use category::{Category, SUGGESTED_CATEGORIES};
pub use ids::{BillId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use transaction::{NewTransaction, Transaction, TransactionUpdate};
pub use validation::{parse_date, DATE_FORMAT};
