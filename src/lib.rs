//! cycle-ledger - billing-cycle aggregation for personal finance
//!
//! Groups a user's income and expense transactions into monthly billing
//! cycles that start on a configurable anchor day, normalises every amount
//! into one base currency, and merges each cycle with its optional budget.
//!
//! # Architecture
//!
//! - `models`: transactions, money, cycle ranges and summaries, budgets
//! - `services`: currency normalisation, aggregation, cycle generation and
//!   composition, plus the write-side services
//! - `storage`: JSON file repositories and the store traits
//! - `audit`: append-only log of writes
//! - `reports`: terminal rendering
//! - `config`, `logging`, `error`: ambient plumbing
//! - `cli`: clap handlers used by the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use cycle_ledger::models::{CycleQuery, UserId};
//! use cycle_ledger::services::{CurrencyNormalizer, CycleStatsComposer, RateTable};
//!
//! let rates = RateTable::builtin();
//! let composer = CycleStatsComposer::new(&storage, &storage, CurrencyNormalizer::new(&rates));
//! let cycles = composer.compose(&UserId::new("alice"), &CycleQuery::parse(15, "2025-01-01", "2025-03-31")?)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
