//! Terminal reports
//!
//! Each report is generated from the services and rendered with
//! `format_terminal`; amounts are rounded to two decimals only here.

pub mod cycle_report;
pub mod period_report;

pub use cycle_report::CycleReport;
pub use period_report::{PeriodReport, StatsReport};
