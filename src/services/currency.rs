//! Currency normalisation
//!
//! Converts amounts into the base currency with a fixed table of direct
//! factors. The table is compiled in; it is not an exchange-rate feed and
//! its values do not change while the process runs.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{CurrencyCode, Money};

/// Base currency every aggregate is reported in
pub const BASE_CURRENCY: &str = "GBP";

/// Direct conversion factors from each supported currency into `base`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    base: String,
    factors: BTreeMap<String, Decimal>,
}

impl RateTable {
    /// The built-in GBP table
    pub fn builtin() -> Self {
        Self::from_factors(
            BASE_CURRENCY,
            [
                ("GBP", dec!(1.0)),
                ("CNY", dec!(0.11)),
                ("USD", dec!(0.79)),
                ("EUR", dec!(0.86)),
            ],
        )
    }

    /// Build a table from `(code, factor to base)` pairs. The base itself is
    /// always present with factor 1.
    pub fn from_factors<'a>(
        base: &str,
        factors: impl IntoIterator<Item = (&'a str, Decimal)>,
    ) -> Self {
        let base = base.trim().to_ascii_uppercase();
        let mut map: BTreeMap<String, Decimal> = factors
            .into_iter()
            .map(|(code, factor)| (code.trim().to_ascii_uppercase(), factor))
            .collect();
        map.insert(base.clone(), Decimal::ONE);
        Self { base, factors: map }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Factor converting one unit of `currency` into the base currency
    pub fn factor(&self, currency: &str) -> Option<Decimal> {
        self.factors
            .get(currency.trim().to_ascii_uppercase().as_str())
            .copied()
    }

    pub fn supports(&self, currency: &str) -> bool {
        self.factor(currency).is_some()
    }

    /// Supported codes with their factors, in code order
    pub fn entries(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.factors.iter().map(|(code, factor)| (code.as_str(), *factor))
    }

    /// Parse a code and make sure this table can convert it
    pub fn supported_code(&self, currency: &str) -> LedgerResult<CurrencyCode> {
        let code = CurrencyCode::parse(currency)
            .map_err(|_| LedgerError::UnsupportedCurrency(currency.trim().to_string()))?;
        if !self.supports(code.as_str()) {
            return Err(LedgerError::UnsupportedCurrency(code.to_string()));
        }
        Ok(code)
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Converts amounts into the table's base currency
#[derive(Debug, Clone, Copy)]
pub struct CurrencyNormalizer<'a> {
    table: &'a RateTable,
}

impl<'a> CurrencyNormalizer<'a> {
    pub fn new(table: &'a RateTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a RateTable {
        self.table
    }

    pub fn base_currency(&self) -> &'a str {
        self.table.base()
    }

    /// Convert `amount` from `from_currency` into the base currency.
    ///
    /// The result is not rounded.
    pub fn normalize(&self, amount: Money, from_currency: &str) -> LedgerResult<Money> {
        let factor = self
            .table
            .factor(from_currency)
            .ok_or_else(|| LedgerError::UnsupportedCurrency(from_currency.trim().to_string()))?;
        amount.checked_mul(factor)
    }
}
