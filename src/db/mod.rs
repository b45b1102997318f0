//! Database abstraction layer for db-report.
//!
//! Provides a trait-based interface over a single open database session, so the
//! batch can run against SQLite or an in-memory mock interchangeably.

mod mock;
mod sqlite;
mod statement;
mod types;

pub use mock::MockSession;
pub use sqlite::SqliteSession;
pub use types::{ResultSet, Row, Value};

use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface for a database session.
///
/// A session is one already-open connection. It is used by one query at a time:
/// the `ResultSet` returned by `run_query` borrows the session until it is dropped.
#[async_trait]
pub trait DatabaseSession: Send {
    /// Executes a SQL query and returns its column names and a lazy row stream.
    ///
    /// Statements the engine rejects fail with `ReportError::Execution`.
    async fn run_query<'a>(&'a mut self, sql: &'a str) -> Result<ResultSet<'a>>;

    /// Closes the session. Closing an already closed session is a no-op.
    async fn close(&mut self) -> Result<()>;
}
