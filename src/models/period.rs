//! Analysis periods
//!
//! Relative look-back windows used by the analysis report: today, the last
//! three days, the last week, the last thirty days, or everything.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A look-back window ending "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisPeriod {
    /// Since local midnight
    Day,
    /// Last 72 hours
    #[serde(rename = "3days")]
    ThreeDays,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// No lower bound
    #[default]
    All,
}

impl AnalysisPeriod {
    /// Earliest timestamp included, relative to `now`. `None` for `All`.
    pub fn start(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Self::Day => now.date().and_hms_opt(0, 0, 0),
            Self::ThreeDays => Some(now - Duration::days(3)),
            Self::Week => Some(now - Duration::days(7)),
            Self::Month => Some(now - Duration::days(30)),
            Self::All => None,
        }
    }

    /// Parse a period name
    ///
    /// Accepts: "day", "today", "3days", "week", "month", "all"
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        match s.trim().to_lowercase().as_str() {
            "day" | "today" => Ok(Self::Day),
            "3days" | "3d" | "three-days" => Ok(Self::ThreeDays),
            "week" | "7d" => Ok(Self::Week),
            "month" | "30d" => Ok(Self::Month),
            "all" | "" => Ok(Self::All),
            _ => Err(PeriodParseError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for AnalysisPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::ThreeDays => write!(f, "3days"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidFormat(s) => write!(
                f,
                "Invalid analysis period: {} (expected day, 3days, week, month or all)",
                s
            ),
        }
    }
}

impl std::error::Error for PeriodParseError {}
