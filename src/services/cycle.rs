//! Billing-cycle range generation
//!
//! Splits a date window into the monthly cycles that overlap it. A cycle
//! starts on the anchor day (clamped to the month's length) and ends the
//! day before the next month's anchor date. The first and last ranges are
//! clipped to the window, so the output covers the window exactly.

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::models::cycle::{AnchorDay, CycleRange, DateWindow};

/// Generates cycle ranges for one anchor day
#[derive(Debug, Clone, Copy)]
pub struct CycleRangeGenerator {
    anchor: AnchorDay,
}

impl CycleRangeGenerator {
    pub fn new(anchor: AnchorDay) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> AnchorDay {
        self.anchor
    }

    /// Start of the cycle that contains `date`
    pub fn cycle_start_for(&self, date: NaiveDate) -> NaiveDate {
        let this_month = self.anchor.date_in_month_of(date);
        if date >= this_month {
            this_month
        } else {
            let prev = first_of_month(date) - Duration::days(1);
            self.anchor.date_in_month_of(prev)
        }
    }

    /// Start of the cycle after the one starting on `cycle_start`
    pub fn next_cycle_start(&self, cycle_start: NaiveDate) -> NaiveDate {
        let next_month = first_of_month(cycle_start)
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        self.anchor.date_in_month_of(next_month)
    }

    /// The full (unclipped) cycle containing `date`
    pub fn cycle_containing(&self, date: NaiveDate) -> CycleRange {
        let start = self.cycle_start_for(date);
        let end = self.next_cycle_start(start) - Duration::days(1);
        CycleRange {
            start_date: start,
            end_date: end,
            cycle_start: start,
            cycle_end: end,
        }
    }

    /// Ordered, contiguous ranges covering exactly `window`
    pub fn generate(&self, window: &DateWindow) -> Vec<CycleRange> {
        let mut ranges = Vec::new();
        let mut cycle_start = self.cycle_start_for(window.from);

        while cycle_start <= window.to {
            let next = self.next_cycle_start(cycle_start);
            let cycle_end = next - Duration::days(1);

            let range = CycleRange {
                start_date: cycle_start.max(window.from),
                end_date: cycle_end.min(window.to),
                cycle_start,
                cycle_end,
            };
            debug_assert!(range.start_date <= range.end_date);
            ranges.push(range);

            cycle_start = next;
        }

        ranges
    }
}

/// Cycles overlapping `[from, to]` for `anchor`.
///
/// An inverted pair is treated as the same window with its ends swapped,
/// so at least one range is always returned.
pub fn generate_cycles(anchor: AnchorDay, from: NaiveDate, to: NaiveDate) -> Vec<CycleRange> {
    let (from, to) = if to < from { (to, from) } else { (from, to) };
    CycleRangeGenerator::new(anchor).generate(&DateWindow { from, to })
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
