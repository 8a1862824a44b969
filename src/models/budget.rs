//! Per-cycle budget targets
//!
//! A budget records what a user expects to earn and spend in the cycle that
//! starts on a given date. Each target is independently optional: `None`
//! means "not tracked", which is different from a target of zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;
use super::money::Money;
use crate::error::LedgerResult;

/// Expected income/expense for one (user, cycle start) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleBudget {
    pub user_id: UserId,

    /// Cycle start as written by the caller (normally `YYYY-MM-DD`). It is
    /// not checked against the user's current anchor day.
    pub cycle_start: String,

    #[serde(default)]
    pub expected_income: Option<Money>,

    #[serde(default)]
    pub expected_expense: Option<Money>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl CycleBudget {
    pub fn new(
        user_id: UserId,
        cycle_start: impl Into<String>,
        expected_income: Option<Money>,
        expected_expense: Option<Money>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            cycle_start: cycle_start.into(),
            expected_income,
            expected_expense,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite both targets. Returns whether anything changed; the
    /// modification time only moves when it did.
    pub fn set_targets(
        &mut self,
        expected_income: Option<Money>,
        expected_expense: Option<Money>,
    ) -> bool {
        if self.expected_income == expected_income && self.expected_expense == expected_expense {
            return false;
        }
        self.expected_income = expected_income;
        self.expected_expense = expected_expense;
        self.updated_at = Utc::now();
        true
    }

    /// Planned balance, when both sides are tracked
    pub fn expected_balance(&self) -> LedgerResult<Option<Money>> {
        match (self.expected_income, self.expected_expense) {
            (Some(income), Some(expense)) => income.checked_sub(expense).map(Some),
            _ => Ok(None),
        }
    }
}

impl fmt::Display for CycleBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |m: Option<Money>| m.map(|m| m.to_string()).unwrap_or_else(|| "-".into());
        write!(
            f,
            "{} income: {} expense: {}",
            self.cycle_start,
            show(self.expected_income),
            show(self.expected_expense)
        )
    }
}
