//! Per-cycle statistics
//!
//! Splits a query window into cycles, fetches each cycle's transactions
//! from the store, aggregates them in the base currency and attaches the
//! budget targets stored under the cycle's nominal start date.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{CycleQuery, CycleRange, CycleSummary, UserId};
use crate::services::aggregate::PeriodAggregator;
use crate::services::currency::CurrencyNormalizer;
use crate::services::cycle::CycleRangeGenerator;
use crate::storage::{BudgetStore, TransactionStore};

/// Builds one `CycleSummary` per cycle in a query window
pub struct CycleStatsComposer<'a, T, B> {
    transactions: &'a T,
    budgets: &'a B,
    aggregator: PeriodAggregator<'a>,
}

impl<'a, T, B> CycleStatsComposer<'a, T, B>
where
    T: TransactionStore,
    B: BudgetStore,
{
    pub fn new(transactions: &'a T, budgets: &'a B, normalizer: CurrencyNormalizer<'a>) -> Self {
        Self {
            transactions,
            budgets,
            aggregator: PeriodAggregator::new(normalizer),
        }
    }

    /// Summaries for every cycle overlapping the query window, in order.
    ///
    /// Fails as a whole if any transaction uses an unsupported currency.
    pub fn compose(&self, user_id: &UserId, query: &CycleQuery) -> LedgerResult<Vec<CycleSummary>> {
        let ranges = CycleRangeGenerator::new(query.anchor).generate(&query.window);
        debug!(
            user = %user_id,
            anchor = query.anchor.get(),
            window = %query.window,
            cycles = ranges.len(),
            "composing cycle stats"
        );

        ranges
            .into_iter()
            .map(|range| self.summarize(user_id, range))
            .collect()
    }

    fn summarize(&self, user_id: &UserId, range: CycleRange) -> LedgerResult<CycleSummary> {
        let transactions = self.transactions.find_in_range(
            user_id,
            start_of_day(range.start_date),
            end_of_day(range.end_date),
        )?;
        let totals = self.aggregator.aggregate(&transactions, None)?;

        let budget = self.budgets.get(user_id, &range.cycle_key())?;
        debug!(
            cycle = %range,
            transactions = transactions.len(),
            budget = budget.is_some(),
            "cycle aggregated"
        );

        Ok(CycleSummary {
            range,
            income: totals.income,
            expense: totals.expense,
            balance: totals.balance()?,
            income_count: totals.income_count,
            expense_count: totals.expense_count,
            expected_income: budget.as_ref().and_then(|b| b.expected_income),
            expected_expense: budget.as_ref().and_then(|b| b.expected_expense),
        })
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable instant of `date`
fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date)
        .checked_add_signed(Duration::days(1) - Duration::nanoseconds(1))
        .unwrap_or(NaiveDateTime::MAX)
}
