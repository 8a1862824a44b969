//! Money type for representing currency amounts
//!
//! Wraps a `rust_decimal::Decimal` so that converting and summing many
//! transactions never accumulates binary floating-point error. Amounts keep
//! their full precision while being accumulated; rounding to two decimals
//! happens only when a value is formatted or exported.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;

use crate::error::{LedgerError, LedgerResult};

/// Number of decimal places used when presenting an amount
pub const DISPLAY_SCALE: u32 = 2;

/// Largest amount a single transaction or budget target may carry
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

/// A monetary amount in some currency (the currency travels alongside it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a Money amount from an exact decimal
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money amount from integer minor units (hundredths)
    ///
    /// # Examples
    /// ```
    /// use cycle_ledger::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The underlying decimal, unrounded
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Round half away from zero to two decimals (the display precision).
    /// The result always carries exactly two decimal places.
    pub fn rounded(&self) -> Self {
        let mut value = self
            .0
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(DISPLAY_SCALE);
        Self(value)
    }

    /// Upper bound for stored amounts (`MAX_AMOUNT_UNITS`)
    pub fn max_amount() -> Self {
        Self(Decimal::from(MAX_AMOUNT_UNITS))
    }

    pub fn checked_add(self, other: Self) -> LedgerResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| LedgerError::Overflow(format!("{} + {}", self.0, other.0)))
    }

    pub fn checked_sub(self, other: Self) -> LedgerResult<Self> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or_else(|| LedgerError::Overflow(format!("{} - {}", self.0, other.0)))
    }

    /// Scale by a conversion factor
    pub fn checked_mul(self, factor: Decimal) -> LedgerResult<Self> {
        self.0
            .checked_mul(factor)
            .map(Self)
            .ok_or_else(|| LedgerError::Overflow(format!("{} * {}", self.0, factor)))
    }

    /// Sum without panicking on overflow
    pub fn checked_sum<I>(amounts: I) -> LedgerResult<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::zero(), |acc, m| acc.checked_add(m))
    }

    /// Divide by a count, e.g. for per-day averages. Zero divisors yield zero.
    pub fn divided_by(&self, divisor: usize) -> Self {
        if divisor == 0 {
            return Self::zero();
        }
        Self(self.0 / Decimal::from(divisor))
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "£10.50", "$10", "1,250.00"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        // Remove a leading currency symbol if present
        let s = s.trim_start_matches(['£', '$', '€', '¥']);
        let cleaned: String = s.chars().filter(|c| *c != ',').collect();

        if cleaned.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let value = Decimal::from_str(&cleaned)
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol, rounded to two decimals
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let rounded = self.rounded();
        if rounded.is_negative() {
            format!("-{}{}", symbol, rounded.abs())
        } else {
            format!("{}{}", symbol, rounded)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rounded().0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.amount(), dec!(10.50));
    }

    #[test]
    fn test_display_rounds_to_two_places() {
        assert_eq!(Money::from_cents(1050).to_string(), "10.50");
        assert_eq!(Money::zero().to_string(), "0.00");
        assert_eq!(Money::from_cents(-1050).to_string(), "-10.50");
        assert_eq!(Money::new(dec!(1.005)).to_string(), "1.01");
        assert_eq!(Money::new(dec!(79)).to_string(), "79.00");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_cents(1050).format_with_symbol("£"), "£10.50");
        assert_eq!(Money::from_cents(-5).format_with_symbol("£"), "-£0.05");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a.checked_add(b).unwrap().amount(), dec!(15.00));
        assert_eq!(a.checked_sub(b).unwrap().amount(), dec!(5.00));
        assert_eq!((-a).amount(), dec!(-10.00));
        assert_eq!(a.checked_mul(dec!(0.79)).unwrap().amount(), dec!(7.90));
    }

    #[test]
    fn test_no_drift_over_many_additions() {
        // 0.1 a thousand times is exactly 100 with decimals
        let total = Money::checked_sum((0..1000).map(|_| Money::new(dec!(0.1)))).unwrap();
        assert_eq!(total.amount(), dec!(100));
    }

    #[test]
    fn test_accumulation_keeps_sub_cent_precision() {
        // 3 x 0.004 would be 0.00 if each term were rounded first
        let total = Money::checked_sum((0..3).map(|_| Money::new(dec!(0.004)))).unwrap();
        assert_eq!(total.to_string(), "0.01");
    }

    #[test]
    fn test_overflow_is_an_error() {
        let huge = Money::parse("50000000000000000000000000000").unwrap();

        assert!(huge.checked_add(huge).unwrap_err().is_overflow());
        assert!((-huge).checked_sub(huge).unwrap_err().is_overflow());
        assert!(huge.checked_mul(dec!(2)).unwrap_err().is_overflow());
        assert!(Money::checked_sum([huge, huge]).unwrap_err().is_overflow());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().amount(), dec!(10.50));
        assert_eq!(Money::parse("£10.50").unwrap().amount(), dec!(10.50));
        assert_eq!(Money::parse("-10.50").unwrap().amount(), dec!(-10.50));
        assert_eq!(Money::parse("1,250").unwrap().amount(), dec!(1250));
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("").is_err());
    }

    #[test]
    fn test_divided_by() {
        assert_eq!(Money::from_cents(900).divided_by(3).amount(), dec!(3));
        assert!(Money::from_cents(900).divided_by(0).is_zero());
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
