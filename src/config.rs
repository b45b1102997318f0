//! Configuration management for db-report.
//!
//! Handles loading the optional TOML config file and applying command-line
//! overrides. The resulting `Config` is passed explicitly to the batch
//! coordinator; nothing is read from global state.

use crate::error::{ReportError, Result};
use crate::render::DEFAULT_CSV_BATCH_SIZE;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "db-report.toml";

/// Main configuration structure for db-report.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// SQLite database file.
    pub database: PathBuf,

    /// Directory holding one `.sql` file per named query.
    pub queries_dir: PathBuf,

    /// Directory CSV exports are written to.
    pub results_dir: PathBuf,

    /// Queries run when none is named on the command line, in order.
    pub default_queries: Vec<String>,

    /// Rows fetched per batch during CSV export.
    pub csv_batch_size: usize,

    /// Exit non-zero when any query in the batch fails.
    pub fail_on_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from("oncology_data.db"),
            queries_dir: PathBuf::from("projects"),
            results_dir: PathBuf::from("results"),
            default_queries: vec![
                "nsclc_therapy_matching.sql".to_string(),
                "crc_folfox_analysis.sql".to_string(),
                "ovarian_ca125_trends.sql".to_string(),
            ],
            csv_batch_size: DEFAULT_CSV_BATCH_SIZE,
            fail_on_error: false,
        }
    }
}

/// Values given on the command line. `None` leaves the config value alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database: Option<PathBuf>,
    pub queries_dir: Option<PathBuf>,
    pub results_dir: Option<PathBuf>,
    pub fail_on_error: bool,
}

impl Config {
    /// Returns the default config file path (relative to the working directory).
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the built-in defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ReportError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            ReportError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would make every run fail.
    pub fn validate(&self) -> Result<()> {
        if self.csv_batch_size == 0 {
            return Err(ReportError::config("csv_batch_size must be at least 1"));
        }
        if self.default_queries.is_empty() {
            return Err(ReportError::config("default_queries must not be empty"));
        }
        Ok(())
    }

    /// Applies command-line overrides, which take precedence over the file.
    pub fn merge(&mut self, overrides: &ConfigOverrides) {
        if let Some(database) = &overrides.database {
            self.database = database.clone();
        }
        if let Some(queries_dir) = &overrides.queries_dir {
            self.queries_dir = queries_dir.clone();
        }
        if let Some(results_dir) = &overrides.results_dir {
            self.results_dir = results_dir.clone();
        }
        if overrides.fail_on_error {
            self.fail_on_error = true;
        }
    }
}
