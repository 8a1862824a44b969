//! Application settings stored in `config.json`

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::cycle::DATE_FORMAT;

/// Settings shared by every user of one data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// User assumed when `--user` is not given
    #[serde(default = "default_user")]
    pub default_user: String,

    /// Symbol printed in front of base-currency amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// strftime format for dates in terminal output
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// tracing filter directive, overridden by `RUST_LOG`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_user() -> String {
    "default".to_string()
}

fn default_currency_symbol() -> String {
    "£".to_string()
}

fn default_date_format() -> String {
    DATE_FORMAT.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_user: default_user(),
            currency_symbol: default_currency_symbol(),
            date_format: default_date_format(),
            log_filter: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, falling back to defaults when absent.
    /// Nothing is written until the caller saves.
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();
        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))
    }

    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
