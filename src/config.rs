// ⚙️ Application configuration
// JSON file, every field optional; a missing file means defaults

use crate::refresh::DEFAULT_MAX_DELTA;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "TRASHFLOW_CONFIG";

pub const DEFAULT_CONFIG_PATH: &str = "trashflow.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// CSV seed file; the built-in 14 facilities when absent
    pub seed_file: Option<PathBuf>,

    /// Simulated latency before a refresh lands
    pub refresh_delay_ms: u64,

    /// How long a notification stays on screen
    pub notification_ttl_ms: u64,

    pub max_refresh_delta: u8,

    /// Pin the refresh RNG for reproducible demos
    pub rng_seed: Option<u64>,

    pub server_addr: String,

    /// Where the TUI writes its log
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            seed_file: None,
            refresh_delay_ms: 1500,
            notification_ttl_ms: 3000,
            max_refresh_delta: DEFAULT_MAX_DELTA,
            rng_seed: None,
            server_addr: "0.0.0.0:3000".to_string(),
            log_file: PathBuf::from("trashflow.log"),
        }
    }
}

impl AppConfig {
    /// Load config from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// `$TRASHFLOW_CONFIG`, else `trashflow.json`, else defaults
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        Self::load_or_default(path)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.refresh_delay(), Duration::from_millis(1500));
        assert_eq!(config.notification_ttl(), Duration::from_secs(3));
        assert_eq!(config.max_refresh_delta, 5);
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rng_seed": 9, "server_addr": "127.0.0.1:8080"}}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();

        assert_eq!(config.rng_seed, Some(9));
        assert_eq!(config.server_addr, "127.0.0.1:8080");
        assert_eq!(config.refresh_delay_ms, 1500);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = AppConfig::load_or_default("/nonexistent/trashflow.json").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(AppConfig::from_file(file.path()).is_err());
    }
}
