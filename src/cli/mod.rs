//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Every handler
//! prints either a terminal report or, with `--json`, the serialized result.

pub mod budget;
pub mod category;
pub mod currency;
pub mod cycle;
pub mod prefs;
pub mod report;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use currency::{handle_currency_command, CurrencyCommands};
pub use cycle::{handle_cycle_command, CycleCommands};
pub use prefs::{handle_prefs_command, PrefsCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use serde::Serialize;

use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, UserId};
use crate::services::RateTable;
use crate::storage::Storage;

/// Everything a command handler needs
pub struct CliContext<'a> {
    pub storage: &'a Storage,
    pub settings: &'a Settings,
    pub rates: &'a RateTable,
    pub user: UserId,
    pub json: bool,
}

impl CliContext<'_> {
    /// Print `value` as pretty JSON
    pub fn print_json<T: Serialize>(&self, value: &T) -> LedgerResult<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn symbol(&self) -> &str {
        &self.settings.currency_symbol
    }
}

/// Parse a user-typed amount
pub(crate) fn parse_amount(input: &str) -> LedgerResult<Money> {
    Money::parse(input).map_err(|e| LedgerError::Validation(e.to_string()))
}

/// Parse an optional budget target; `-` or `none` clear it
pub(crate) fn parse_target(input: Option<&str>) -> LedgerResult<Option<Money>> {
    match input.map(str::trim) {
        None => Ok(None),
        Some(s) if s == "-" || s.eq_ignore_ascii_case("none") => Ok(None),
        Some(s) => parse_amount(s).map(Some),
    }
}
