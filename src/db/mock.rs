//! Mock database session for testing.
//!
//! Provides an in-memory session that returns predefined results keyed by the
//! exact query text.

use super::{DatabaseSession, ResultSet, Row};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use futures::stream;
use futures::StreamExt;
use std::collections::HashMap;

/// Canned response for one query text.
#[derive(Debug, Clone)]
enum MockResponse {
    Rows { columns: Vec<String>, rows: Vec<Row> },
    Error(String),
    /// Yields the rows, then fails mid-stream.
    FailAfter {
        columns: Vec<String>,
        rows: Vec<Row>,
        error: String,
    },
}

/// A mock database session that returns predefined results.
#[derive(Debug, Default)]
pub struct MockSession {
    responses: HashMap<String, MockResponse>,
    executed: Vec<String>,
    closed: bool,
}

impl MockSession {
    /// Creates a new mock session with no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the result returned for `sql`.
    pub fn with_rows(mut self, sql: impl Into<String>, columns: &[&str], rows: Vec<Row>) -> Self {
        self.responses.insert(
            sql.into(),
            MockResponse::Rows {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows,
            },
        );
        self
    }

    /// Registers an execution error for `sql`.
    pub fn with_error(mut self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses
            .insert(sql.into(), MockResponse::Error(message.into()));
        self
    }

    /// Registers a result that fails after yielding `rows`.
    pub fn with_stream_error(
        mut self,
        sql: impl Into<String>,
        columns: &[&str],
        rows: Vec<Row>,
        message: impl Into<String>,
    ) -> Self {
        self.responses.insert(
            sql.into(),
            MockResponse::FailAfter {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows,
                error: message.into(),
            },
        );
        self
    }

    /// Query texts executed so far, in order.
    pub fn executed(&self) -> &[String] {
        &self.executed
    }

    /// Returns true once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl DatabaseSession for MockSession {
    async fn run_query<'a>(&'a mut self, sql: &'a str) -> Result<ResultSet<'a>> {
        if self.closed {
            return Err(ReportError::unexpected("database session is closed"));
        }
        self.executed.push(sql.to_string());

        match self.responses.get(sql).cloned() {
            Some(MockResponse::Rows { columns, rows }) => Ok(ResultSet::from_rows(columns, rows)),
            Some(MockResponse::Error(message)) => Err(ReportError::execution(message)),
            Some(MockResponse::FailAfter {
                columns,
                rows,
                error,
            }) => {
                let stream = stream::iter(rows.into_iter().map(Ok))
                    .chain(stream::once(async move { Err(ReportError::execution(error)) }))
                    .boxed();
                Ok(ResultSet::new(columns, stream))
            }
            None => Err(ReportError::execution(format!(
                "near \"{}\": syntax error",
                sql.split_whitespace().next().unwrap_or_default()
            ))),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
