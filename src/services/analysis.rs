//! Overall stats and look-back analysis over a user's transactions

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{AnalysisPeriod, Money, UserId};
use crate::services::aggregate::{PeriodAggregator, PeriodBreakdown, PeriodTotals};
use crate::services::currency::CurrencyNormalizer;
use crate::storage::TransactionStore;

/// Breakdown of the transactions in one analysis period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAnalysis {
    pub period: AnalysisPeriod,
    /// First instant included; `None` for all time
    pub since: Option<NaiveDateTime>,
    pub until: NaiveDateTime,
    pub breakdown: PeriodBreakdown,
    pub balance: Money,
    /// Expense over distinct transaction dates
    pub average_daily_expense: Money,
}

/// Read-only analysis over the transaction store
pub struct AnalysisService<'a, T> {
    transactions: &'a T,
    aggregator: PeriodAggregator<'a>,
}

impl<'a, T: TransactionStore> AnalysisService<'a, T> {
    pub fn new(transactions: &'a T, normalizer: CurrencyNormalizer<'a>) -> Self {
        Self {
            transactions,
            aggregator: PeriodAggregator::new(normalizer),
        }
    }

    /// Totals and counts over everything the user has recorded
    pub fn overall_stats(&self, user_id: &UserId) -> LedgerResult<PeriodTotals> {
        let transactions = self.transactions.find_since(user_id, None)?;
        self.aggregator.aggregate(&transactions, None)
    }

    /// Totals and breakdowns for `period`, ending at `now`
    pub fn analyze(
        &self,
        user_id: &UserId,
        period: AnalysisPeriod,
        now: NaiveDateTime,
    ) -> LedgerResult<PeriodAnalysis> {
        let since = period.start(now);
        let mut transactions = self.transactions.find_since(user_id, since)?;
        transactions.retain(|t| t.timestamp <= now);
        debug!(user = %user_id, %period, transactions = transactions.len(), "analysing period");

        let breakdown = self.aggregator.breakdown(&transactions, None)?;
        Ok(PeriodAnalysis {
            period,
            since,
            until: now,
            balance: breakdown.totals.balance()?,
            average_daily_expense: breakdown.average_daily_expense(),
            breakdown,
        })
    }
}
