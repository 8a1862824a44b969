//! Per-user preferences: billing-cycle anchor day and display timezone

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::cycle::AnchorDay;

/// Timezone used when a user has not picked one
pub const DEFAULT_TIMEZONE: &str = "Europe/London";

/// Stored settings for one user. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(
        default,
        deserialize_with = "lenient_anchor_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub anchor_day: Option<AnchorDay>,

    /// IANA identifier, used for display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl UserPreferences {
    /// Anchor day, defaulting to 15
    pub fn anchor_day(&self) -> AnchorDay {
        self.anchor_day.unwrap_or_default()
    }

    pub fn timezone(&self) -> &str {
        self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE)
    }
}

/// Stored anchor days are clamped into 1..=31; values that are not a
/// number at all read as unset.
fn lenient_anchor_day<'de, D>(deserializer: D) -> Result<Option<AnchorDay>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| match v {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        })
        .map(AnchorDay::clamped))
}
