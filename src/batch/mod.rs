//! Batch coordination for db-report.
//!
//! Runs the selected queries one after another on a single session, renders each
//! one, and keeps going after failures. Only a missing database, a missing
//! explicitly requested query or a failed connection stop the run.

mod outcome;

pub use outcome::{diagnostic_line, BatchResult, FailureKind, QueryOutcome, QueryReport};

use std::any::Any;
use std::fmt;
use std::io::Write;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::db::{DatabaseSession, SqliteSession};
use crate::error::{ReportError, Result};
use crate::query::{resolve_query_name, run_query, QuerySpec};
use crate::render::{render, OutputMode, RenderReport};

const SUMMARY_RULE_WIDTH: usize = 30;

/// Where a query failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Load,
    Execute,
    Render,
}

impl Stage {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Execute => "execute",
            Self::Render => "render",
        }
    }
}

/// Runs a batch of named queries under one output mode.
#[derive(Debug, Clone)]
pub struct BatchCoordinator {
    config: Config,
    mode: OutputMode,
}

impl BatchCoordinator {
    /// Creates a coordinator for one invocation.
    pub fn new(config: Config, mode: OutputMode) -> Self {
        Self { config, mode }
    }

    /// Checks preconditions and returns the ordered list of queries to run.
    ///
    /// Fails with `ReportError::Precondition` when the database file is missing or
    /// when `selected` names a query file that does not exist. Missing files in the
    /// default list are not checked here; they fail individually during the run.
    pub fn resolve(&self, selected: Option<&str>) -> Result<Vec<String>> {
        if !self.config.database.is_file() {
            return Err(ReportError::precondition(format!(
                "DB file '{}' not found",
                self.config.database.display()
            )));
        }

        match selected {
            Some(arg) => {
                let name = resolve_query_name(arg).ok_or_else(|| {
                    ReportError::precondition(format!("'{arg}' is not a query file name"))
                })?;
                if !self.config.queries_dir.join(&name).is_file() {
                    return Err(ReportError::precondition(format!(
                        "File '{}' not found in '{}/'",
                        name,
                        self.config.queries_dir.display()
                    )));
                }
                Ok(vec![name])
            }
            None => Ok(self.config.default_queries.clone()),
        }
    }

    /// Runs the whole batch against the configured SQLite database.
    ///
    /// Returns `Err` only for fatal errors raised before any query runs. Per-query
    /// failures are reported in the returned `BatchResult`.
    pub async fn run<W: Write>(&self, selected: Option<&str>, out: &mut W) -> Result<BatchResult> {
        let queries = self.resolve(selected)?;

        let mut session = SqliteSession::open(&self.config.database).await?;
        emit(
            out,
            format_args!("Connected to {}\n", self.config.database.display()),
        );

        let result = self.execute(&mut session, &queries, out).await;
        self.finalize(&mut session, &result, out).await;

        Ok(result)
    }

    /// Runs each query in order on `session`, never stopping early.
    pub async fn execute<S, W>(&self, session: &mut S, queries: &[String], out: &mut W) -> BatchResult
    where
        S: DatabaseSession + ?Sized,
        W: Write,
    {
        let mut result = BatchResult::default();
        for name in queries {
            let outcome = self.process_query(session, name, out).await;
            result.record(name.as_str(), outcome);
        }
        result
    }

    /// Prints the summary and closes the session.
    pub async fn finalize<S, W>(&self, session: &mut S, result: &BatchResult, out: &mut W)
    where
        S: DatabaseSession + ?Sized,
        W: Write,
    {
        emit(out, format_args!("{}", "-".repeat(SUMMARY_RULE_WIDTH)));
        if result.all_succeeded {
            emit(out, format_args!("Batch finished."));
        } else {
            emit(out, format_args!("Batch finished, but with errors/warnings."));
        }

        match session.close().await {
            Ok(()) => emit(out, format_args!("\nDB connection closed.")),
            Err(e) => warn!("Failed to close database session: {e}"),
        }

        info!(
            queries = result.reports.len(),
            failures = result.failure_count(),
            "Batch complete"
        );
    }

    /// Processes one query, converting every error (and panic) into an outcome.
    async fn process_query<S, W>(&self, session: &mut S, name: &str, out: &mut W) -> QueryOutcome
    where
        S: DatabaseSession + ?Sized,
        W: Write,
    {
        emit(out, format_args!("--- Running {name} ---"));

        let attempt = AssertUnwindSafe(self.run_one(session, name, out))
            .catch_unwind()
            .await;

        let source = self.config.queries_dir.join(name);
        match attempt {
            Ok(Ok(report)) => {
                emit(out, format_args!("--- Done: {name} ---\n"));
                debug!(query = name, rows = report.rows(), "Query succeeded");
                QueryOutcome::Success {
                    rows: report.rows(),
                }
            }
            Ok(Err((stage, error))) => {
                let outcome = QueryOutcome::failure(&error);
                emit(
                    out,
                    format_args!("{}", diagnostic_line(&source.display().to_string(), &error)),
                );
                warn!(
                    query = name,
                    stage = stage.as_str(),
                    kind = FailureKind::from_error(&error).as_str(),
                    "{}: {}",
                    error.category(),
                    error.message()
                );
                outcome
            }
            Err(panic) => {
                let error = ReportError::unexpected(panic_message(panic.as_ref()));
                emit(
                    out,
                    format_args!("{}", diagnostic_line(&source.display().to_string(), &error)),
                );
                warn!(
                    query = name,
                    stage = "process",
                    "Query processing panicked: {}",
                    error.message()
                );
                QueryOutcome::failure(&error)
            }
        }
    }

    /// Load, execute and render one query.
    async fn run_one<S, W>(
        &self,
        session: &mut S,
        name: &str,
        out: &mut W,
    ) -> std::result::Result<RenderReport, (Stage, ReportError)>
    where
        S: DatabaseSession + ?Sized,
        W: Write,
    {
        let spec = QuerySpec::load(&self.config.queries_dir, name).map_err(|e| (Stage::Load, e))?;
        let rs = run_query(session, &spec)
            .await
            .map_err(|e| (Stage::Execute, e))?;
        render(rs, &spec, &self.mode, out)
            .await
            .map_err(|e| (Stage::Render, e))
    }
}

/// Writes one report line; a broken output stream is logged, not fatal.
fn emit<W: Write>(out: &mut W, line: fmt::Arguments<'_>) {
    if let Err(e) = writeln!(out, "{line}") {
        warn!("Failed to write report output: {e}");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic while processing query".to_string()
    }
}
