//! Service layer for cycle-ledger
//!
//! The calculation core (`currency`, `aggregate`, `cycle`, `composer`) is
//! pure apart from the store traits it reads through. The remaining
//! services own writes: they validate, persist, and append to the audit log.

pub mod aggregate;
pub mod analysis;
pub mod budget;
pub mod category;
pub mod composer;
pub mod currency;
pub mod cycle;
pub mod preferences;
pub mod transaction;

pub use aggregate::{BucketTotals, PeriodAggregator, PeriodBreakdown, PeriodTotals};
pub use analysis::{AnalysisService, PeriodAnalysis};
pub use budget::BudgetService;
pub use category::CategoryService;
pub use composer::CycleStatsComposer;
pub use currency::{CurrencyNormalizer, RateTable, BASE_CURRENCY};
pub use cycle::{generate_cycles, CycleRangeGenerator};
pub use preferences::PreferenceService;
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, UpdateTransactionInput,
};
