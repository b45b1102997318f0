//! Command-line argument parsing for db-report.

use clap::Parser;
use db_report::config::{Config, ConfigOverrides};
use db_report::render::OutputMode;
use std::path::PathBuf;

/// Run SQL report queries against a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "db-report")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Run only this query file (looked up by name in the queries directory). Default: run all
    #[arg(value_name = "SQL_FILE")]
    pub sql_file: Option<String>,

    /// Limit console output rows per query. No effect on CSV
    #[arg(short = 'l', long, value_name = "N", allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Save results to CSV files in the results directory instead of the console
    #[arg(short = 'c', long)]
    pub csv: bool,

    /// Config file path
    #[arg(long, value_name = "PATH", env = "DB_REPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Directory containing the query files
    #[arg(long, value_name = "DIR")]
    pub queries_dir: Option<PathBuf>,

    /// Directory CSV files are written to
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Exit with a non-zero status if any query fails
    #[arg(long)]
    pub fail_on_error: bool,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Collects the flags that override config file values.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            database: self.database.clone(),
            queries_dir: self.queries_dir.clone(),
            results_dir: self.results_dir.clone(),
            fail_on_error: self.fail_on_error,
        }
    }

    /// Builds the output mode for this run.
    pub fn output_mode(&self, config: &Config) -> OutputMode {
        if self.csv {
            OutputMode::csv(&config.results_dir, config.csv_batch_size)
        } else {
            OutputMode::console(self.limit)
        }
    }
}
