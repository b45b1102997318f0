//! Per-query outcomes and the batch summary.

use crate::error::ReportError;

/// Why a query failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The database rejected the query or failed while producing rows.
    Execution,
    /// The query's source file does not exist.
    FileNotFound,
    /// Reading the query or writing its output failed.
    Io,
    /// Anything else, including a panic while processing the query.
    Unexpected,
}

impl FailureKind {
    /// Classifies an error raised while processing a single query.
    pub fn from_error(error: &ReportError) -> Self {
        match error {
            ReportError::Execution(_) => Self::Execution,
            ReportError::FileNotFound(_) => Self::FileNotFound,
            ReportError::Io(_) => Self::Io,
            _ => Self::Unexpected,
        }
    }

    /// Short label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Execution => "execution",
            Self::FileNotFound => "file_not_found",
            Self::Io => "io",
            Self::Unexpected => "unexpected",
        }
    }
}

/// Result of processing one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Rendered successfully; `rows` were printed or written.
    Success { rows: usize },
    /// Failed at some stage; the batch carried on.
    Failure { kind: FailureKind, message: String },
}

impl QueryOutcome {
    /// Builds a failure outcome from an error.
    pub fn failure(error: &ReportError) -> Self {
        Self::Failure {
            kind: FailureKind::from_error(error),
            message: error.message(),
        }
    }

    /// Returns true for `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The failure kind, if any.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// Outcome of one query, tagged with its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReport {
    pub query: String,
    pub outcome: QueryOutcome,
}

/// Aggregate result of one batch invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// False as soon as any query fails.
    pub all_succeeded: bool,
    /// Outcomes in execution order.
    pub reports: Vec<QueryReport>,
}

impl Default for BatchResult {
    fn default() -> Self {
        Self {
            all_succeeded: true,
            reports: Vec::new(),
        }
    }
}

impl BatchResult {
    /// Records the outcome of the next query.
    pub fn record(&mut self, query: impl Into<String>, outcome: QueryOutcome) {
        if !outcome.is_success() {
            self.all_succeeded = false;
        }
        self.reports.push(QueryReport {
            query: query.into(),
            outcome,
        });
    }

    /// Looks up the outcome recorded for `query`.
    pub fn outcome(&self, query: &str) -> Option<&QueryOutcome> {
        self.reports
            .iter()
            .find(|report| report.query == query)
            .map(|report| &report.outcome)
    }

    /// Number of failed queries.
    pub fn failure_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|report| !report.outcome.is_success())
            .count()
    }
}

/// The prefixed line printed for a query that failed.
pub fn diagnostic_line(source: &str, error: &ReportError) -> String {
    match error {
        ReportError::Execution(msg) => format!("!! SQL error in {source}: {msg}"),
        ReportError::FileNotFound(path) => format!("!! File not found: {}", path.display()),
        ReportError::Io(msg) => format!("!! Error writing output for {source}: {msg}"),
        other => format!("!! Unexpected error with {source}: {}", other.message()),
    }
}
