//! Result rendering for db-report.
//!
//! Turns a `ResultSet` into console text or a CSV file, depending on the
//! batch-wide `OutputMode`.

mod console;
mod csv_export;

pub use console::{render_console, ConsoleReport, NO_RESULTS_MARKER, TRUNCATION_MARKER};
pub use csv_export::{csv_path, export_csv, CsvReport, DEFAULT_CSV_BATCH_SIZE};

use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use crate::db::ResultSet;
use crate::error::Result;
use crate::query::QuerySpec;

/// How every query in a batch is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Print to the console, showing at most `limit` rows when set.
    ConsoleBounded { limit: Option<usize> },
    /// Write every row to `<directory>/<query stem>.csv`, `batch_size` rows at a time.
    CsvComplete {
        directory: PathBuf,
        batch_size: usize,
    },
}

impl OutputMode {
    /// Console mode from a raw user limit. Unset, zero and negative limits all mean
    /// "no limit".
    pub fn console(limit: Option<i64>) -> Self {
        let limit = limit
            .filter(|n| *n > 0)
            .and_then(|n| usize::try_from(n).ok());
        Self::ConsoleBounded { limit }
    }

    /// CSV mode writing into `directory`.
    pub fn csv(directory: impl Into<PathBuf>, batch_size: usize) -> Self {
        Self::CsvComplete {
            directory: directory.into(),
            batch_size,
        }
    }
}

/// What a successful render produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderReport {
    Console(ConsoleReport),
    Csv(CsvReport),
}

impl RenderReport {
    /// Rows printed or written.
    pub fn rows(&self) -> usize {
        match self {
            Self::Console(report) => report.rows_shown,
            Self::Csv(report) => report.rows_written,
        }
    }
}

/// Renders `rs` for `spec` under `mode`, writing human-readable output to `out`.
///
/// The result set is consumed; whatever rows remain unread are released when it
/// is dropped.
pub async fn render<W: Write>(
    rs: ResultSet<'_>,
    spec: &QuerySpec,
    mode: &OutputMode,
    out: &mut W,
) -> Result<RenderReport> {
    match mode {
        OutputMode::ConsoleBounded { limit } => {
            let report = render_console(rs, *limit, out).await?;
            if report.truncated {
                debug!(
                    query = spec.id(),
                    shown = report.rows_shown,
                    "Console output limited"
                );
            }
            Ok(RenderReport::Console(report))
        }
        OutputMode::CsvComplete {
            directory,
            batch_size,
        } => {
            let report = export_csv(rs, spec, directory, *batch_size).await?;
            writeln!(
                out,
                "Saved to {} ({} rows)",
                report.path.display(),
                report.rows_written
            )
            .map_err(console::write_error)?;
            Ok(RenderReport::Csv(report))
        }
    }
}
