//! Query file loading.
//!
//! A query is identified by the name of its file inside the queries directory.

use crate::error::{ReportError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A named query and its literal SQL text. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    id: String,
    sql: String,
}

impl QuerySpec {
    /// Creates a query from an identifier and its SQL text.
    pub fn new(id: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sql: sql.into(),
        }
    }

    /// Reads `<dir>/<name>` as UTF-8 text.
    ///
    /// A missing file yields `ReportError::FileNotFound`; any other read failure
    /// is an I/O error.
    pub fn load(dir: &Path, name: &str) -> Result<Self> {
        let path = dir.join(name);
        let sql = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ReportError::file_not_found(&path),
            _ => ReportError::io(format!("Failed to read {}: {e}", path.display())),
        })?;
        Ok(Self::new(name, sql))
    }

    /// The query identifier (its file name).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The identifier without its extension, used to name output files.
    pub fn stem(&self) -> &str {
        Path::new(&self.id)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.id)
    }
}

/// Reduces a user-supplied query argument to a bare file name.
///
/// `projects/foo.sql` and `foo.sql` both resolve to `foo.sql`; queries are always
/// looked up in the configured queries directory.
pub fn resolve_query_name(arg: &str) -> Option<String> {
    PathBuf::from(arg)
        .file_name()
        .and_then(|name| name.to_str())
        .map(String::from)
}
