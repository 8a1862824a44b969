//! Per-user preference repository backed by `preferences.json`

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{UserId, UserPreferences};

use super::file_io::{read_json, write_json_atomic};
use super::PreferenceStore;

/// Repository for user preference persistence
pub struct PreferenceRepository {
    path: PathBuf,
    prefs: RwLock<BTreeMap<UserId, UserPreferences>>,
}

impl PreferenceRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            prefs: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: BTreeMap<UserId, UserPreferences> = read_json(&self.path)?;
        let mut prefs = self
            .prefs
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *prefs = file_data;
        Ok(())
    }

    pub fn save(&self) -> Result<(), LedgerError> {
        let prefs = self
            .prefs
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        write_json_atomic(&self.path, &*prefs)
    }
}

impl PreferenceStore for PreferenceRepository {
    fn get(&self, user_id: &UserId) -> Result<UserPreferences, LedgerError> {
        let prefs = self
            .prefs
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(prefs.get(user_id).cloned().unwrap_or_default())
    }

    fn put(&self, user_id: &UserId, preferences: UserPreferences) -> Result<(), LedgerError> {
        let mut prefs = self
            .prefs
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        if preferences == UserPreferences::default() {
            prefs.remove(user_id);
        } else {
            prefs.insert(user_id.clone(), preferences);
        }
        Ok(())
    }
}
