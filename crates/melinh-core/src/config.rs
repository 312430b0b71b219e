//! Application configuration.
//!
//! Sources, lowest priority first: built-in defaults, an optional config file,
//! then `MELINH_*` environment variables (e.g. `MELINH_PAGE_SIZE=20`).

use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use melinh_host::HOST_MARKER;

use crate::booking::DEFAULT_SUBMISSION_LATENCY;
use crate::table::PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rows per admin table page
    pub page_size: usize,
    /// Simulated booking round-trip
    pub submission_latency_ms: u64,
    /// SQLite file; in-memory collections when unset
    pub database_path: Option<String>,
    /// Global the mini-app host injects
    pub host_marker: String,
    /// Default tracing filter when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            submission_latency_ms: DEFAULT_SUBMISSION_LATENCY.as_millis() as u64,
            database_path: None,
            host_marker: HOST_MARKER.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn submission_latency(&self) -> Duration {
        Duration::from_millis(self.submission_latency_ms)
    }
}

/// Load configuration from an optional file plus the environment.
pub fn load_config(path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::with_name(path));
    }

    let config = builder
        .add_source(Environment::with_prefix("MELINH").try_parsing(true))
        .build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.submission_latency(), Duration::from_millis(1500));
        assert_eq!(config.host_marker, "APP_ID");
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_load_from_file_keeps_unset_defaults() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"page_size": 25, "database_path": "/tmp/melinh.db"}}"#).unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.database_path.as_deref(), Some("/tmp/melinh.db"));
        assert_eq!(config.submission_latency_ms, 1500);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_config(Some("/nonexistent/melinh-config.json")).is_err());
    }
}
