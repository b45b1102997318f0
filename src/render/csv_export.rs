//! Complete CSV export.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::db::ResultSet;
use crate::error::{ReportError, Result};
use crate::query::QuerySpec;

/// Rows fetched per batch while exporting.
pub const DEFAULT_CSV_BATCH_SIZE: usize = 1000;

/// Summary of one CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReport {
    /// The file written.
    pub path: PathBuf,
    /// Data rows written, not counting the header.
    pub rows_written: usize,
}

/// Output path for a query: `<directory>/<query stem>.csv`.
pub fn csv_path(directory: &Path, spec: &QuerySpec) -> PathBuf {
    directory.join(format!("{}.csv", spec.stem()))
}

/// Streams every row of `rs` into the query's CSV file under `directory`.
///
/// The directory is created when missing. Rows go to a staging file in the same
/// directory, which replaces the query's CSV only once every row is written. A
/// re-run therefore overwrites the previous export, and a query that fails part
/// way leaves the previous export untouched. The header row is written whenever
/// the query describes columns, even if it returns no rows.
pub async fn export_csv(
    mut rs: ResultSet<'_>,
    spec: &QuerySpec,
    directory: &Path,
    batch_size: usize,
) -> Result<CsvReport> {
    std::fs::create_dir_all(directory).map_err(|e| {
        ReportError::io(format!(
            "Failed to create results directory {}: {e}",
            directory.display()
        ))
    })?;

    let path = csv_path(directory, spec);
    let write_err = |e: &dyn std::fmt::Display| {
        ReportError::io(format!("Error writing CSV {}: {e}", path.display()))
    };

    let staging = tempfile::Builder::new()
        .prefix(&format!(".{}.", spec.stem()))
        .suffix(".partial")
        .tempfile_in(directory)
        .map_err(|e| write_err(&e))?;
    let mut writer = csv::Writer::from_writer(staging);

    if rs.has_columns() {
        writer.write_record(rs.columns()).map_err(|e| write_err(&e))?;
    }

    let batch_size = batch_size.max(1);
    let mut rows_written = 0;
    loop {
        let batch = rs.next_batch(batch_size).await?;
        for row in &batch {
            writer
                .write_record(row.iter().map(|value| value.to_csv_field()))
                .map_err(|e| write_err(&e))?;
        }
        rows_written += batch.len();
        debug!(query = spec.id(), rows_written, "Wrote CSV batch");

        if batch.len() < batch_size {
            break;
        }
    }

    let staging = writer.into_inner().map_err(|e| write_err(e.error()))?;
    staging.persist(&path).map_err(|e| write_err(&e.error))?;

    Ok(CsvReport { path, rows_written })
}
