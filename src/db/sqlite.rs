//! SQLite session implementation.
//!
//! Provides the `SqliteSession` struct that implements the `DatabaseSession` trait
//! over a single sqlx `SqliteConnection`.

use crate::db::statement::{statement_count, MULTIPLE_STATEMENTS};
use crate::db::{DatabaseSession, ResultSet, Row, Value};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, ConnectOptions, Connection, Executor, Row as SqlxRow, Statement};
use sqlx::{TypeInfo, ValueRef};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// A single SQLite connection used for the whole batch.
#[derive(Debug)]
pub struct SqliteSession {
    conn: Option<SqliteConnection>,
    path: PathBuf,
}

impl SqliteSession {
    /// Opens a session on an existing database file.
    ///
    /// The file is never created; a missing file is a connection error.
    pub async fn open(path: &Path) -> Result<Self> {
        let conn = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false)
            .connect()
            .await
            .map_err(|e| {
                ReportError::connection(format!("Failed to open {}: {e}", path.display()))
            })?;

        debug!("Opened SQLite session on {}", path.display());
        Ok(Self {
            conn: Some(conn),
            path: path.to_path_buf(),
        })
    }

}

#[async_trait]
impl DatabaseSession for SqliteSession {
    async fn run_query<'a>(&'a mut self, sql: &'a str) -> Result<ResultSet<'a>> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| ReportError::unexpected("database session is closed"))?;

        // sqlx would run every statement in the text while only the first is
        // described, so several statements are rejected before anything runs.
        if statement_count(sql).is_some_and(|count| count > 1) {
            return Err(ReportError::execution(MULTIPLE_STATEMENTS));
        }

        let start = Instant::now();

        // Preparing surfaces syntax errors and missing tables before any row is read,
        // and describes the output columns even when the result is empty.
        let statement = (&mut *conn)
            .prepare(sql)
            .await
            .map_err(|e| ReportError::execution(format_query_error(e)))?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        debug!(
            columns = columns.len(),
            elapsed = ?start.elapsed(),
            "Prepared query"
        );

        let rows = sqlx::query(sql)
            .fetch(conn)
            .map(|row| {
                row.map_err(|e| ReportError::execution(format_query_error(e)))
                    .and_then(|row| convert_row(&row))
            })
            .boxed();

        Ok(ResultSet::new(columns, rows))
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().await.map_err(|e| {
                ReportError::connection(format!("Failed to close {}: {e}", self.path.display()))
            })?;
            debug!("Closed SQLite session on {}", self.path.display());
        }
        Ok(())
    }
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Result<Row> {
    (0..row.columns().len())
        .map(|i| convert_value(row, i))
        .collect()
}

/// Converts a single column value by the storage class it actually holds.
///
/// SQLite typing is per value, so the declared column type is not consulted. A
/// value that cannot be decoded (such as TEXT holding invalid UTF-8) fails the
/// row instead of being passed on as NULL.
fn convert_value(row: &SqliteRow, index: usize) -> Result<Value> {
    let storage_class = {
        let raw = row
            .try_get_raw(index)
            .map_err(|e| ReportError::execution(format_query_error(e)))?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        raw.type_info().name().to_uppercase()
    };

    // The storage class was read above, so the declared-type check is skipped.
    let value = match storage_class.as_str() {
        "INTEGER" | "BIGINT" | "INT8" => row.try_get_unchecked::<i64, _>(index).map(Value::Int),
        "REAL" | "DOUBLE" | "FLOAT" => row.try_get_unchecked::<f64, _>(index).map(Value::Float),
        "BLOB" => row.try_get_unchecked::<Vec<u8>, _>(index).map(Value::Bytes),
        // TEXT and anything else
        _ => row.try_get_unchecked::<String, _>(index).map(Value::Text),
    };

    value.map_err(|e| {
        ReportError::execution(format!(
            "Could not decode column '{}': {}",
            row.column(index).name(),
            format_query_error(e)
        ))
    })
}

/// Formats a query error, keeping only the engine's message when there is one.
fn format_query_error(error: sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => db_error.message().to_string(),
        None => error.to_string(),
    }
}
