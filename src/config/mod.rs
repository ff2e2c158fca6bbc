//! Configuration module for the finance tracker
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Budget limits and user preferences

pub mod paths;
pub mod settings;

pub use paths::FinancePaths;
pub use settings::{BudgetSettings, Preferences, Settings};
