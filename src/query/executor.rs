//! Query execution.
//!
//! Runs one query on an already-open session. The session is owned by the caller;
//! this never opens, closes or retries.

use std::time::Instant;

use tracing::debug;

use crate::db::{DatabaseSession, ResultSet};
use crate::error::Result;
use crate::query::QuerySpec;

/// Executes `spec` once and returns its column names and lazy row stream.
///
/// Rejections by the engine surface as `ReportError::Execution`. The returned
/// result set borrows the session until it is dropped.
pub async fn run_query<'a, S>(session: &'a mut S, spec: &'a QuerySpec) -> Result<ResultSet<'a>>
where
    S: DatabaseSession + ?Sized,
{
    let start = Instant::now();
    let result = session.run_query(spec.sql()).await;

    match &result {
        Ok(rs) => debug!(
            query = spec.id(),
            columns = rs.columns().len(),
            elapsed = ?start.elapsed(),
            "Query executed"
        ),
        Err(e) => debug!(query = spec.id(), error = %e, "Query rejected"),
    }

    result
}
