//! Query result types for db-report.
//!
//! Defines the values, rows and the lazily produced result set returned by a
//! database session.

use crate::error::{ReportError, Result};
use futures::stream::{BoxStream, Fuse};
use futures::StreamExt;
use std::fmt;

/// A row of data from a query result.
pub type Row = Vec<Value>;

/// Represents a single value from a database query.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// NULL value.
    Null,

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text value.
    Text(String),

    /// Binary data.
    Bytes(Vec<u8>),
}

impl Value {
    /// Converts the value to the string shown on the console.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Text(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }

    /// Converts the value to a CSV field.
    ///
    /// NULL becomes an empty field and binary data is hex encoded.
    pub fn to_csv_field(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bytes(b) => b.iter().map(|byte| format!("{byte:02x}")).collect(),
            other => other.to_display_string(),
        }
    }
}

/// Formats a float so whole numbers keep a fractional digit (`3.0`, not `3`).
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

/// The output of executing one query: column names plus a one-pass row stream.
///
/// Rows are produced on demand and cannot be re-read; rendering the same query
/// twice means executing it twice. Dropping the result set releases the
/// underlying statement even if rows remain.
pub struct ResultSet<'a> {
    columns: Vec<String>,
    rows: Fuse<BoxStream<'a, Result<Row>>>,
    fetched: usize,
}

impl<'a> ResultSet<'a> {
    /// Creates a result set over the given column names and row stream.
    pub fn new(columns: Vec<String>, rows: BoxStream<'a, Result<Row>>) -> Self {
        Self {
            columns,
            rows: rows.fuse(),
            fetched: 0,
        }
    }

    /// Creates a result set from rows that are already in memory.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self::new(columns, futures::stream::iter(rows.into_iter().map(Ok)).boxed())
    }

    /// Column names, empty when the statement does not return rows.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns true if the statement described any output columns.
    pub fn has_columns(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Fetches the next row, or `None` once the stream is exhausted.
    ///
    /// Calling this again after `None` keeps returning `None`.
    pub async fn next_row(&mut self) -> Result<Option<Row>> {
        let Some(row) = self.rows.next().await.transpose()? else {
            return Ok(None);
        };

        if self.has_columns() && row.len() != self.columns.len() {
            return Err(ReportError::unexpected(format!(
                "row {} has {} values but the result has {} columns",
                self.fetched + 1,
                row.len(),
                self.columns.len()
            )));
        }

        self.fetched += 1;
        Ok(Some(row))
    }

    /// Fetches up to `max` rows. A batch shorter than `max` means the stream is done.
    pub async fn next_batch(&mut self, max: usize) -> Result<Vec<Row>> {
        let mut batch = Vec::with_capacity(max.min(1024));
        while batch.len() < max {
            match self.next_row().await? {
                Some(row) => batch.push(row),
                None => break,
            }
        }
        Ok(batch)
    }
}

impl fmt::Debug for ResultSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("columns", &self.columns)
            .field("fetched", &self.fetched)
            .finish_non_exhaustive()
    }
}
