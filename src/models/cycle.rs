//! Billing-cycle types
//!
//! A billing cycle starts on the user's anchor day every month. Months
//! shorter than the anchor day start their cycle on their last day instead.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use crate::error::{LedgerError, LedgerResult};

/// ISO calendar date format used on every external boundary
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Day of month (1..=31) on which each billing cycle starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct AnchorDay(u32);

impl AnchorDay {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 31;

    /// Anchor day used until the user picks one
    pub const DEFAULT: AnchorDay = AnchorDay(15);

    /// Strict constructor: values outside 1..=31 are rejected
    pub fn new(day: i64) -> LedgerResult<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&day) {
            Ok(Self(day as u32))
        } else {
            Err(LedgerError::InvalidAnchorDay(day))
        }
    }

    /// Lenient constructor used when storing a user's setting
    pub fn clamped(day: i64) -> Self {
        Self(day.clamp(Self::MIN as i64, Self::MAX as i64) as u32)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// The anchor day as it lands in the given month
    pub fn day_in(&self, year: i32, month: u32) -> u32 {
        self.0.min(days_in_month(year, month))
    }

    /// The (clamped) anchor date of the month that `date` falls in
    pub fn date_in_month_of(&self, date: NaiveDate) -> NaiveDate {
        let day = self.day_in(date.year(), date.month());
        // day is within the month, so this cannot fail
        date.with_day(day).unwrap_or(date)
    }
}

impl Default for AnchorDay {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for AnchorDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for AnchorDay {
    type Error = LedgerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AnchorDay> for u32 {
    fn from(day: AnchorDay) -> Self {
        day.0
    }
}

/// Number of days in a calendar month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = first.and_then(|d| d.checked_add_months(Months::new(1)));
    match (first, next) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 31,
    }
}

/// Parse a `YYYY-MM-DD` date, reporting failures as `InvalidDateRange`
pub fn parse_date(s: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
        LedgerError::InvalidDateRange(format!("'{}' is not a YYYY-MM-DD date", s.trim()))
    })
}

/// An inclusive, validated `[from, to]` calendar window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    /// Build a window, rejecting `to < from`
    pub fn new(from: NaiveDate, to: NaiveDate) -> LedgerResult<Self> {
        if to < from {
            return Err(LedgerError::InvalidDateRange(format!(
                "end {} is before start {}",
                to.format(DATE_FORMAT),
                from.format(DATE_FORMAT)
            )));
        }
        Ok(Self { from, to })
    }

    /// Parse both ends from ISO strings
    pub fn parse(from: &str, to: &str) -> LedgerResult<Self> {
        Self::new(parse_date(from)?, parse_date(to)?)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Number of calendar days covered
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.from.format(DATE_FORMAT),
            self.to.format(DATE_FORMAT)
        )
    }
}

/// A validated request for cycle statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleQuery {
    pub anchor: AnchorDay,
    pub window: DateWindow,
}

impl CycleQuery {
    pub fn new(anchor: AnchorDay, window: DateWindow) -> Self {
        Self { anchor, window }
    }

    /// Validate raw inputs. The anchor day is checked first, then the dates;
    /// nothing is generated for an invalid query.
    pub fn parse(anchor_day: i64, from: &str, to: &str) -> LedgerResult<Self> {
        let anchor = AnchorDay::new(anchor_day)?;
        let window = DateWindow::parse(from, to)?;
        Ok(Self { anchor, window })
    }
}

/// One billing cycle as it intersects a query window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRange {
    /// First reported day (the cycle start, clipped to the window)
    pub start_date: NaiveDate,

    /// Last reported day (the cycle end, clipped to the window)
    pub end_date: NaiveDate,

    /// Anchor date the cycle really starts on; budgets are keyed by it
    pub cycle_start: NaiveDate,

    /// Day before the next cycle starts
    pub cycle_end: NaiveDate,
}

impl CycleRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of reported days
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// True when the window cut off part of the cycle
    pub fn is_partial(&self) -> bool {
        self.start_date != self.cycle_start || self.end_date != self.cycle_end
    }

    /// Budget key for this cycle
    pub fn cycle_key(&self) -> String {
        self.cycle_start.format(DATE_FORMAT).to_string()
    }

    /// The day after the nominal end, i.e. where the following cycle begins
    pub fn next_cycle_start(&self) -> NaiveDate {
        self.cycle_end + Duration::days(1)
    }
}

impl fmt::Display for CycleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start_date.format(DATE_FORMAT),
            self.end_date.format(DATE_FORMAT)
        )
    }
}

/// Totals for one cycle, merged with its budget targets when one exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSummary {
    #[serde(flatten)]
    pub range: CycleRange,
    pub income: Money,
    pub expense: Money,
    pub balance: Money,
    pub income_count: usize,
    pub expense_count: usize,

    /// `None` means no budget was set; a set budget of zero is `Some(0)`
    pub expected_income: Option<Money>,
    pub expected_expense: Option<Money>,
}

impl CycleSummary {
    /// Expected expense minus actual expense, when a target exists
    pub fn expense_headroom(&self) -> LedgerResult<Option<Money>> {
        self.expected_expense
            .map(|target| target.checked_sub(self.expense))
            .transpose()
    }

    /// Expected income minus actual income, when a target exists
    pub fn income_shortfall(&self) -> LedgerResult<Option<Money>> {
        self.expected_income
            .map(|target| target.checked_sub(self.income))
            .transpose()
    }

    pub fn has_budget(&self) -> bool {
        self.expected_income.is_some() || self.expected_expense.is_some()
    }

    /// Copy with every amount rounded to display precision
    pub fn rounded(&self) -> Self {
        Self {
            range: self.range,
            income: self.income.rounded(),
            expense: self.expense.rounded(),
            balance: self.balance.rounded(),
            income_count: self.income_count,
            expense_count: self.expense_count,
            expected_income: self.expected_income.map(|m| m.rounded()),
            expected_expense: self.expected_expense.map(|m| m.rounded()),
        }
    }
}
