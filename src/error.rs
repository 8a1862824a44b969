//! Custom error types for cycle-ledger
//!
//! This module defines the error hierarchy for the library using thiserror.
//! The three domain errors (`UnsupportedCurrency`, `InvalidAnchorDay`,
//! `InvalidDateRange`) abort a whole call; nothing in the core reports
//! partial success.

use thiserror::Error;

/// The main error type for cycle-ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A currency code has no entry in the rate table
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// Anchor day outside 1..=31
    #[error("Invalid anchor day: {0} (expected 1-31)")]
    InvalidAnchorDay(i64),

    /// Unparseable dates, or `to` earlier than `from`
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// Arithmetic on amounts left the representable range
    #[error("Amount overflow: {0}")]
    Overflow(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl LedgerError {
    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for cycle budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    pub fn is_unsupported_currency(&self) -> bool {
        matches!(self, Self::UnsupportedCurrency(_))
    }

    pub fn is_invalid_anchor_day(&self) -> bool {
        matches!(self, Self::InvalidAnchorDay(_))
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow(_))
    }

    pub fn is_invalid_date_range(&self) -> bool {
        matches!(self, Self::InvalidDateRange(_))
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for cycle-ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::UnsupportedCurrency("XYZ".into());
        assert_eq!(err.to_string(), "Unsupported currency: XYZ");

        let err = LedgerError::InvalidAnchorDay(32);
        assert_eq!(err.to_string(), "Invalid anchor day: 32 (expected 1-31)");
    }

    #[test]
    fn test_domain_errors_are_distinguishable() {
        assert!(LedgerError::UnsupportedCurrency("XYZ".into()).is_unsupported_currency());
        assert!(LedgerError::InvalidAnchorDay(0).is_invalid_anchor_day());
        assert!(LedgerError::InvalidDateRange("x".into()).is_invalid_date_range());
        assert!(!LedgerError::InvalidAnchorDay(0).is_invalid_date_range());
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerError::budget_not_found("2025-01-15");
        assert_eq!(err.to_string(), "Budget not found: 2025-01-15");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LedgerError = io_err.into();
        assert!(matches!(err, LedgerError::Io(_)));
    }
}
