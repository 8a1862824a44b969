//! Transaction model
//!
//! A transaction is an income or expense recorded by one user in any
//! supported currency. Amounts are stored as entered (unsigned, in the
//! original currency); the kind says which way the money moved and
//! normalisation to the base currency happens at aggregation time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::currency::CurrencyCode;
use super::ids::{TransactionId, UserId};
use super::money::Money;

/// Bucket label for transactions without a category
pub const UNCATEGORIZED: &str = "uncategorized";

/// Bucket label for transactions without a payment method
pub const UNSPECIFIED: &str = "unspecified";

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = TransactionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(TransactionValidationError::UnknownKind(other.to_string())),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// Owner of the transaction
    pub user_id: UserId,

    /// Amount in the original currency (never negative)
    pub amount: Money,

    pub currency: CurrencyCode,

    pub kind: TransactionKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Local wall-clock time the transaction happened
    pub timestamp: NaiveDateTime,

    /// When this record was created
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Create a new transaction with no category or payment method
    pub fn new(
        user_id: UserId,
        amount: Money,
        currency: CurrencyCode,
        kind: TransactionKind,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            amount,
            currency,
            kind,
            category: None,
            payment_method: None,
            description: None,
            timestamp,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Calendar date of the transaction's local timestamp
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Category bucket label; blank or missing categories map to `UNCATEGORIZED`
    pub fn category_label(&self) -> &str {
        label_or(self.category.as_deref(), UNCATEGORIZED)
    }

    /// Payment-method bucket label; blank or missing maps to `UNSPECIFIED`
    pub fn payment_method_label(&self) -> &str {
        label_or(self.payment_method.as_deref(), UNSPECIFIED)
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount);
        }
        if self.amount > Money::max_amount() {
            return Err(TransactionValidationError::AmountTooLarge);
        }
        Ok(())
    }
}

fn label_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => fallback,
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} ({})",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.kind,
            self.amount,
            self.currency,
            self.category_label()
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount,
    AmountTooLarge,
    UnknownKind(String),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount => {
                write!(f, "Amount must not be negative; use the kind for direction")
            }
            Self::AmountTooLarge => {
                write!(f, "Amount must not exceed {}", Money::max_amount())
            }
            Self::UnknownKind(k) => {
                write!(f, "Unknown transaction kind '{}' (expected income or expense)", k)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    fn expense() -> Transaction {
        Transaction::new(
            UserId::new("u1"),
            Money::from_cents(1000),
            CurrencyCode::parse("GBP").unwrap(),
            TransactionKind::Expense,
            at(2025, 3, 10),
        )
    }

    #[test]
    fn test_labels_fall_back_to_reserved_buckets() {
        let txn = expense();
        assert_eq!(txn.category_label(), UNCATEGORIZED);
        assert_eq!(txn.payment_method_label(), UNSPECIFIED);

        let blank = expense().with_category("   ").with_payment_method("");
        assert_eq!(blank.category_label(), UNCATEGORIZED);
        assert_eq!(blank.payment_method_label(), UNSPECIFIED);

        let named = expense().with_category("Food").with_payment_method("Card");
        assert_eq!(named.category_label(), "Food");
        assert_eq!(named.payment_method_label(), "Card");
    }

    #[test]
    fn test_date_from_timestamp() {
        assert_eq!(expense().date(), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Income".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert_eq!("expense".parse::<TransactionKind>().unwrap(), TransactionKind::Expense);
        assert!("refund".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_validation() {
        let mut txn = expense();
        assert!(txn.validate().is_ok());
        txn.amount = Money::from_cents(-1);
        assert_eq!(txn.validate(), Err(TransactionValidationError::NegativeAmount));

        txn.amount = Money::max_amount();
        assert!(txn.validate().is_ok());
        txn.amount = Money::parse("50000000000000000000000000000").unwrap();
        assert_eq!(txn.validate(), Err(TransactionValidationError::AmountTooLarge));
    }

    #[test]
    fn test_serialization() {
        let txn = expense().with_category("Food");
        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains("\"kind\":\"expense\""));
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, txn.id);
        assert_eq!(back.amount, txn.amount);
        assert_eq!(back.category.as_deref(), Some("Food"));
    }
}
