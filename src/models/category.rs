//! Spending category tag
//!
//! Categories are an open set of short lower-case tags ("food", "books",
//! "transport", ...). Any tag is accepted as long as it is well formed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FinanceError;

/// Maximum length of a category tag in characters
pub const MAX_CATEGORY_LEN: usize = 32;

/// Tags offered as suggestions in help output
pub const SUGGESTED_CATEGORIES: [&str; 7] = [
    "food",
    "transport",
    "books",
    "rent",
    "tuition",
    "entertainment",
    "misc",
];

/// A normalized spending category
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Build a category from user text, trimming and lower-casing it
    pub fn new(name: &str) -> Result<Self, FinanceError> {
        let normalized = name.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(FinanceError::Validation("Category cannot be empty".into()));
        }

        if normalized.chars().count() > MAX_CATEGORY_LEN {
            return Err(FinanceError::Validation(format!(
                "Category too long (max {} characters)",
                MAX_CATEGORY_LEN
            )));
        }

        if normalized.chars().any(char::is_control) {
            return Err(FinanceError::Validation(
                "Category cannot contain control characters".into(),
            ));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for Category {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Category {
    type Error = FinanceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let cat = Category::new("  Food ").unwrap();
        assert_eq!(cat.as_str(), "food");
        assert_eq!(cat, Category::new("FOOD").unwrap());
    }

    #[test]
    fn test_validation() {
        assert!(Category::new("").unwrap_err().is_validation());
        assert!(Category::new("   ").is_err());
        assert!(Category::new(&"x".repeat(MAX_CATEGORY_LEN + 1)).is_err());
        assert!(Category::new("bad\ttag").is_err());
        assert!(Category::new("late night snacks").is_ok());
    }

    #[test]
    fn test_serde_normalizes_and_rejects() {
        let cat: Category = serde_json::from_str("\"Books\"").unwrap();
        assert_eq!(cat.as_str(), "books");
        assert_eq!(serde_json::to_string(&cat).unwrap(), "\"books\"");
        assert!(serde_json::from_str::<Category>("\"\"").is_err());
    }
}
