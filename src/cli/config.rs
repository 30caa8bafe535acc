//! Configuration file
//!
//! ```json
//! {
//!   "data_dir": "./data",
//!   "empty_names": "accept",
//!   "report_skipped_rows": true,
//!   "log_level": "info"
//! }
//! ```
//!
//! Only `data_dir` is required.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::errors::{CliError, CliResult};
use crate::ingest::{EmptyNamePolicy, IngestOptions};
use crate::observability::Severity;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Whether an empty name is accepted or aborts the import
    #[serde(default)]
    pub empty_names: EmptyNamePolicy,

    /// Log each row skipped for a negative salary (default true)
    #[serde(default = "default_report_skipped_rows")]
    pub report_skipped_rows: bool,

    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_report_skipped_rows() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        self.log_severity()?;

        Ok(())
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn log_severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_level
            ))
        })
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            empty_names: self.empty_names,
        }
    }
}
