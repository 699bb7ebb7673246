//! Runtime configuration, read from `~/.teamops/config.json`.
//!
//! Missing or malformed config falls back to defaults rather than failing
//! startup; the reference timezone defaults to UTC.

use std::path::PathBuf;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// IANA timezone name used as the reference for the daily attendance
    /// window, e.g. `"America/New_York"`.
    pub timezone: String,
    /// Override for the database path. Default: `~/.teamops/teamops.db`.
    pub db_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            db_path: None,
        }
    }
}

impl Config {
    /// Load from `~/.teamops/config.json`, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        let Ok(raw) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Malformed config at {}: {e}. Using defaults.", path.display());
                Self::default()
            }
        }
    }

    fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".teamops").join("config.json"))
    }

    /// The parsed reference timezone. Unrecognized names degrade to UTC
    /// with a warning instead of poisoning every attendance operation.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            log::warn!("Unknown timezone '{}', falling back to UTC", self.timezone);
            Tz::UTC
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
