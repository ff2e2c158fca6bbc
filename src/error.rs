//! Custom error types for the finance tracker
//!
//! This module defines the error hierarchy for the library using thiserror
//! for ergonomic error definitions.

use std::fmt;

use thiserror::Error;

/// What a prediction ran short of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// Individual transactions
    Transactions,
    /// Distinct monthly periods
    Periods,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transactions => write!(f, "transactions"),
            Self::Periods => write!(f, "periods"),
        }
    }
}

/// The main error type for finance operations
#[derive(Error, Debug)]
pub enum FinanceError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Bad input: non-positive amount, unparsable date, empty field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Not enough history to produce a forecast
    #[error("Insufficient data: need at least {needed} {kind}, have {found}")]
    InsufficientData {
        kind: DataKind,
        needed: usize,
        found: usize,
    },

    /// Data file could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl FinanceError {
    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for bills
    pub fn bill_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Bill",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an insufficient data error
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

impl From<std::io::Error> for FinanceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for finance operations
pub type FinanceResult<T> = Result<T, FinanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FinanceError::Validation("Amount must be positive".into());
        assert_eq!(err.to_string(), "Validation error: Amount must be positive");
    }

    #[test]
    fn test_not_found_error() {
        let err = FinanceError::bill_not_found("bill-3");
        assert_eq!(err.to_string(), "Bill not found: bill-3");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_insufficient_data_error() {
        let err = FinanceError::InsufficientData {
            kind: DataKind::Transactions,
            needed: 5,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: need at least 5 transactions, have 2"
        );
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FinanceError = io_err.into();
        assert!(matches!(err, FinanceError::Io(_)));
    }
}
