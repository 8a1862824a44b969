//! User preference service: anchor day and display timezone

use tracing::info;

use crate::audit::EntityType;
use crate::error::LedgerResult;
use crate::models::{AnchorDay, UserId, UserPreferences};
use crate::storage::{PreferenceStore, Storage};

/// Service for per-user preferences
pub struct PreferenceService<'a> {
    storage: &'a Storage,
}

impl<'a> PreferenceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn get(&self, user_id: &UserId) -> LedgerResult<UserPreferences> {
        self.storage.preferences.get(user_id)
    }

    /// The user's anchor day, 15 when never set
    pub fn anchor_day(&self, user_id: &UserId) -> LedgerResult<AnchorDay> {
        Ok(self.get(user_id)?.anchor_day())
    }

    /// Store an anchor day, clamping it into 1..=31
    pub fn set_anchor_day(&self, user_id: &UserId, day: i64) -> LedgerResult<AnchorDay> {
        let anchor = AnchorDay::clamped(day);
        self.update(user_id, |prefs| prefs.anchor_day = Some(anchor))?;
        info!(user = %user_id, requested = day, anchor = anchor.get(), "anchor day set");
        Ok(anchor)
    }

    pub fn timezone(&self, user_id: &UserId) -> LedgerResult<String> {
        Ok(self.get(user_id)?.timezone().to_string())
    }

    /// Store a timezone identifier; blank input restores the default
    pub fn set_timezone(&self, user_id: &UserId, timezone: &str) -> LedgerResult<String> {
        let timezone = timezone.trim();
        let stored = (!timezone.is_empty()).then(|| timezone.to_string());
        let prefs = self.update(user_id, |prefs| prefs.timezone = stored)?;
        info!(user = %user_id, timezone = prefs.timezone(), "timezone set");
        Ok(prefs.timezone().to_string())
    }

    fn update<F>(&self, user_id: &UserId, change: F) -> LedgerResult<UserPreferences>
    where
        F: FnOnce(&mut UserPreferences),
    {
        let before = self.storage.preferences.get(user_id)?;
        let mut after = before.clone();
        change(&mut after);
        if after == before {
            return Ok(after);
        }

        self.storage.preferences.put(user_id, after.clone())?;
        self.storage.preferences.save()?;
        self.storage.log_update(
            EntityType::Preferences,
            user_id.as_str(),
            user_id,
            &before,
            &after,
            None,
        )?;
        Ok(after)
    }
}
