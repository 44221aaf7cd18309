//! # Configuration State
//!
//! Adapter configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`--db`)
//! 2. Environment variables (`TENDERO_*`)
//! 3. Defaults (this file)
//!
//! Document prefixes (`FACT`, `COT`) are fixed and not configurable.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tendero_core::report::ReportGranularity;
use tracing::warn;

pub const ENV_DB_PATH: &str = "TENDERO_DB_PATH";
pub const ENV_MAX_CONNECTIONS: &str = "TENDERO_MAX_CONNECTIONS";
pub const ENV_REPORT_GRANULARITY: &str = "TENDERO_REPORT_GRANULARITY";

/// Adapter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Database file. `None` means the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Pool size.
    /// Default: 5
    pub max_connections: u32,

    /// Grouping used by `report` when none is given.
    /// Default: daily
    pub report_granularity: ReportGranularity,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            db_path: None,
            max_connections: 5,
            report_granularity: ReportGranularity::Daily,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `TENDERO_DB_PATH`: database file
    /// - `TENDERO_MAX_CONNECTIONS`: pool size (positive integer)
    /// - `TENDERO_REPORT_GRANULARITY`: `daily`, `weekly` or `monthly`
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(raw) = lookup(ENV_MAX_CONNECTIONS) {
            match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => config.max_connections = n,
                _ => warn!(value = %raw, "Ignoring invalid {}", ENV_MAX_CONNECTIONS),
            }
        }

        if let Some(raw) = lookup(ENV_REPORT_GRANULARITY) {
            match raw.parse::<ReportGranularity>() {
                Ok(granularity) => config.report_granularity = granularity,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring invalid {}", ENV_REPORT_GRANULARITY),
            }
        }

        config
    }

    /// Overrides the database path (from `--db`).
    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.db_path = path;
        }
        self
    }
}
