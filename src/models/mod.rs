//! Core data models for cycle-ledger
//!
//! Transactions, money and currency codes, billing-cycle ranges and
//! summaries, per-cycle budgets, per-user preferences and category labels.

pub mod budget;
pub mod category;
pub mod currency;
pub mod cycle;
pub mod ids;
pub mod money;
pub mod period;
pub mod preferences;
pub mod transaction;

pub use budget::CycleBudget;
pub use category::UserCategory;
pub use currency::CurrencyCode;
pub use cycle::{AnchorDay, CycleQuery, CycleRange, CycleSummary, DateWindow};
pub use ids::{CategoryId, TransactionId, UserId};
pub use money::Money;
pub use period::AnalysisPeriod;
pub use preferences::UserPreferences;
pub use transaction::{Transaction, TransactionKind};
