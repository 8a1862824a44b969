//! Period aggregation
//!
//! Sums a slice of transactions into income/expense totals, optionally
//! restricted to a date window, and breaks them down by day, category and
//! payment method. Every amount is normalised to the base currency first.
//!
//! An unsupported currency anywhere in the input aborts the whole call.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::error::LedgerResult;
use crate::models::{DateWindow, Money, Transaction, TransactionKind};
use crate::services::currency::CurrencyNormalizer;

/// Income and expense totals with counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub income: Money,
    pub expense: Money,
    pub income_count: usize,
    pub expense_count: usize,
}

impl PeriodTotals {
    pub fn record(&mut self, kind: TransactionKind, amount: Money) -> LedgerResult<()> {
        match kind {
            TransactionKind::Income => {
                self.income = self.income.checked_add(amount)?;
                self.income_count += 1;
            }
            TransactionKind::Expense => {
                self.expense = self.expense.checked_add(amount)?;
                self.expense_count += 1;
            }
        }
        Ok(())
    }

    /// Income minus expense
    pub fn balance(&self) -> LedgerResult<Money> {
        self.income.checked_sub(self.expense)
    }

    pub fn transaction_count(&self) -> usize {
        self.income_count + self.expense_count
    }
}

/// Income/expense sums for one bucket of a breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketTotals {
    pub income: Money,
    pub expense: Money,
}

impl BucketTotals {
    pub fn record(&mut self, kind: TransactionKind, amount: Money) -> LedgerResult<()> {
        match kind {
            TransactionKind::Income => self.income = self.income.checked_add(amount)?,
            TransactionKind::Expense => self.expense = self.expense.checked_add(amount)?,
        }
        Ok(())
    }

    pub fn net(&self) -> LedgerResult<Money> {
        self.income.checked_sub(self.expense)
    }
}

/// Everything one pass over the transactions produces
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBreakdown {
    pub totals: PeriodTotals,
    /// Keyed by local calendar date; iteration is ascending
    pub by_day: BTreeMap<NaiveDate, BucketTotals>,
    pub by_category: BTreeMap<String, BucketTotals>,
    pub by_payment_method: BTreeMap<String, BucketTotals>,
}

impl PeriodBreakdown {
    /// Days ordered by date ascending, keyed by ISO date string
    pub fn days(&self) -> Vec<(String, BucketTotals)> {
        self.by_day
            .iter()
            .map(|(date, totals)| (date.format("%Y-%m-%d").to_string(), *totals))
            .collect()
    }

    /// Categories ordered by expense, largest first (ties by name)
    pub fn categories_by_expense(&self) -> Vec<(&str, BucketTotals)> {
        let mut list: Vec<_> = self
            .by_category
            .iter()
            .map(|(name, totals)| (name.as_str(), *totals))
            .collect();
        list.sort_by(|a, b| b.1.expense.cmp(&a.1.expense).then(a.0.cmp(b.0)));
        list
    }

    /// Number of distinct dates with at least one transaction
    pub fn active_days(&self) -> usize {
        self.by_day.len()
    }

    /// Expense divided by the number of active days
    pub fn average_daily_expense(&self) -> Money {
        self.totals.expense.divided_by(self.active_days())
    }
}

/// Single-pass aggregation over in-memory transactions
#[derive(Debug, Clone, Copy)]
pub struct PeriodAggregator<'a> {
    normalizer: CurrencyNormalizer<'a>,
}

impl<'a> PeriodAggregator<'a> {
    pub fn new(normalizer: CurrencyNormalizer<'a>) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> CurrencyNormalizer<'a> {
        self.normalizer
    }

    /// Overall totals for the transactions inside `window` (all of them
    /// when no window is given)
    pub fn aggregate(
        &self,
        transactions: &[Transaction],
        window: Option<&DateWindow>,
    ) -> LedgerResult<PeriodTotals> {
        let mut totals = PeriodTotals::default();
        self.for_each_normalized(transactions, window, |_, kind, amount| {
            totals.record(kind, amount)
        })?;
        Ok(totals)
    }

    /// Per-day sums, ascending by date
    pub fn by_day(
        &self,
        transactions: &[Transaction],
        window: Option<&DateWindow>,
    ) -> LedgerResult<BTreeMap<NaiveDate, BucketTotals>> {
        let mut buckets = BTreeMap::new();
        self.for_each_normalized(transactions, window, |txn, kind, amount| {
            bucket(&mut buckets, txn.date()).record(kind, amount)
        })?;
        Ok(buckets)
    }

    /// Per-category sums; blank categories land in `uncategorized`
    pub fn by_category(
        &self,
        transactions: &[Transaction],
        window: Option<&DateWindow>,
    ) -> LedgerResult<BTreeMap<String, BucketTotals>> {
        let mut buckets: BTreeMap<String, BucketTotals> = BTreeMap::new();
        self.for_each_normalized(transactions, window, |txn, kind, amount| {
            bucket(&mut buckets, txn.category_label().to_string()).record(kind, amount)
        })?;
        Ok(buckets)
    }

    /// Per-payment-method sums; blank methods land in `unspecified`
    pub fn by_payment_method(
        &self,
        transactions: &[Transaction],
        window: Option<&DateWindow>,
    ) -> LedgerResult<BTreeMap<String, BucketTotals>> {
        let mut buckets: BTreeMap<String, BucketTotals> = BTreeMap::new();
        self.for_each_normalized(transactions, window, |txn, kind, amount| {
            bucket(&mut buckets, txn.payment_method_label().to_string()).record(kind, amount)
        })?;
        Ok(buckets)
    }

    /// Totals and every breakdown in one pass
    pub fn breakdown(
        &self,
        transactions: &[Transaction],
        window: Option<&DateWindow>,
    ) -> LedgerResult<PeriodBreakdown> {
        let mut out = PeriodBreakdown::default();
        self.for_each_normalized(transactions, window, |txn, kind, amount| {
            out.totals.record(kind, amount)?;
            bucket(&mut out.by_day, txn.date()).record(kind, amount)?;
            bucket(&mut out.by_category, txn.category_label().to_string()).record(kind, amount)?;
            bucket(
                &mut out.by_payment_method,
                txn.payment_method_label().to_string(),
            )
            .record(kind, amount)
        })?;
        Ok(out)
    }

    /// Distinct dates in the (windowed) input
    pub fn distinct_dates(
        &self,
        transactions: &[Transaction],
        window: Option<&DateWindow>,
    ) -> BTreeSet<NaiveDate> {
        transactions
            .iter()
            .map(Transaction::date)
            .filter(|date| window.map_or(true, |w| w.contains(*date)))
            .collect()
    }

    /// Normalise every in-window transaction and hand it to `apply`.
    ///
    /// All amounts are converted before anything is applied, so a bad
    /// currency leaves no half-built result behind.
    fn for_each_normalized<F>(
        &self,
        transactions: &[Transaction],
        window: Option<&DateWindow>,
        mut apply: F,
    ) -> LedgerResult<()>
    where
        F: FnMut(&Transaction, TransactionKind, Money) -> LedgerResult<()>,
    {
        let mut normalized = Vec::with_capacity(transactions.len());
        for txn in transactions {
            if let Some(w) = window {
                if !w.contains(txn.date()) {
                    continue;
                }
            }
            let amount = self
                .normalizer
                .normalize(txn.amount, txn.currency.as_str())
                .map_err(|e| {
                    warn!(transaction = %txn.id, currency = %txn.currency, "aggregation aborted");
                    e
                })?;
            normalized.push((txn, amount));
        }

        for (txn, amount) in normalized {
            apply(txn, txn.kind, amount)?;
        }
        Ok(())
    }
}

fn bucket<K: Ord>(map: &mut BTreeMap<K, BucketTotals>, key: K) -> &mut BucketTotals {
    map.entry(key).or_default()
}
