//! db-report - Runs named SQL report queries against SQLite.
//!
//! This library exposes the core modules for use by the binary and integration tests.

pub mod batch;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod query;
pub mod render;
