//! Cycle Report
//!
//! One row per billing cycle in a window: actual income, expense and
//! balance next to the cycle's budget targets.

use serde::Serialize;

use crate::error::LedgerResult;
use crate::models::cycle::DATE_FORMAT;
use crate::models::{AnchorDay, CycleQuery, CycleSummary, DateWindow, Money, UserId};
use crate::services::{CurrencyNormalizer, CycleStatsComposer, RateTable};
use crate::storage::Storage;

/// Cycle statistics for one user and window
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub user_id: UserId,
    pub anchor_day: AnchorDay,
    pub base_currency: String,
    pub window: DateWindow,
    pub cycles: Vec<CycleSummary>,
    pub total_income: Money,
    pub total_expense: Money,
    pub total_balance: Money,
}

impl CycleReport {
    pub fn generate(
        storage: &Storage,
        rates: &RateTable,
        user_id: &UserId,
        query: &CycleQuery,
    ) -> LedgerResult<Self> {
        let composer = CycleStatsComposer::new(storage, storage, CurrencyNormalizer::new(rates));
        let cycles = composer.compose(user_id, query)?;
        let total_income = Money::checked_sum(cycles.iter().map(|c| c.income))?;
        let total_expense = Money::checked_sum(cycles.iter().map(|c| c.expense))?;

        Ok(Self {
            user_id: user_id.clone(),
            anchor_day: query.anchor,
            base_currency: rates.base().to_string(),
            window: query.window,
            cycles,
            total_income,
            total_expense,
            total_balance: total_income.checked_sub(total_expense)?,
        })
    }

    /// Same report with every amount rounded to two decimals
    pub fn rounded(&self) -> Self {
        Self {
            cycles: self.cycles.iter().map(CycleSummary::rounded).collect(),
            total_income: self.total_income.rounded(),
            total_expense: self.total_expense.rounded(),
            total_balance: self.total_balance.rounded(),
            ..self.clone()
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str, date_format: &str) -> String {
        let mut output = String::new();
        let day = |d: chrono::NaiveDate| d.format(date_format).to_string();
        let target = |m: Option<Money>| {
            m.map(|m| m.format_with_symbol(symbol))
                .unwrap_or_else(|| "-".to_string())
        };

        output.push_str(&format!(
            "Cycle Report: {} to {} (anchor day {}, {})\n",
            day(self.window.from),
            day(self.window.to),
            self.anchor_day,
            self.base_currency
        ));
        output.push_str(&"=".repeat(96));
        output.push('\n');

        output.push_str(&format!(
            "{:<25} {:>12} {:>12} {:>12} {:>15} {:>15}\n",
            "Cycle", "Income", "Expense", "Balance", "Exp. Income", "Exp. Expense"
        ));
        output.push_str(&"-".repeat(96));
        output.push('\n');

        for cycle in &self.cycles {
            let marker = if cycle.range.is_partial() { "*" } else { "" };
            output.push_str(&format!(
                "{:<25} {:>12} {:>12} {:>12} {:>15} {:>15}\n",
                format!(
                    "{} - {}{}",
                    day(cycle.range.start_date),
                    day(cycle.range.end_date),
                    marker
                ),
                cycle.income.format_with_symbol(symbol),
                cycle.expense.format_with_symbol(symbol),
                cycle.balance.format_with_symbol(symbol),
                target(cycle.expected_income),
                target(cycle.expected_expense),
            ));
        }

        output.push_str(&"-".repeat(96));
        output.push('\n');
        output.push_str(&format!(
            "{:<25} {:>12} {:>12} {:>12}\n",
            "TOTAL",
            self.total_income.format_with_symbol(symbol),
            self.total_expense.format_with_symbol(symbol),
            self.total_balance.format_with_symbol(symbol),
        ));

        if self.cycles.iter().any(|c| c.range.is_partial()) {
            output.push_str("\n* cycle clipped to the requested window\n");
        }

        output
    }
}
