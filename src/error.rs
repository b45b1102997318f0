//! Error types for db-report.
//!
//! Defines the main error enum used throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for db-report operations.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A required input is missing (database file, explicitly requested query file).
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The database session could not be opened.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The database engine rejected a query (syntax errors, missing tables, etc.)
    #[error("SQL error: {0}")]
    Execution(String),

    /// A query source file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Filesystem or output stream failures.
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration errors (invalid config file, bad values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anything else that went wrong while processing a query.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ReportError {
    /// Creates a precondition error with the given message.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an execution error with the given message.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Creates a file-not-found error for the given path.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    /// Creates an I/O error with the given message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an unexpected error with the given message.
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Precondition(_) => "Precondition Error",
            Self::Connection(_) => "Connection Error",
            Self::Execution(_) => "SQL Error",
            Self::FileNotFound(_) => "File Not Found",
            Self::Io(_) => "I/O Error",
            Self::Config(_) => "Configuration Error",
            Self::Unexpected(_) => "Unexpected Error",
        }
    }

    /// Returns true for errors that must stop the whole run rather than a single query.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Precondition(_) | Self::Connection(_) | Self::Config(_)
        )
    }

    /// Returns the bare message without the category prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Precondition(msg)
            | Self::Connection(msg)
            | Self::Execution(msg)
            | Self::Io(msg)
            | Self::Config(msg)
            | Self::Unexpected(msg) => msg.clone(),
            Self::FileNotFound(path) => path.display().to_string(),
        }
    }
}

/// Result type alias using ReportError.
pub type Result<T> = std::result::Result<T, ReportError>;
