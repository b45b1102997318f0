//! Query loading and execution for db-report.
//!
//! This module isolates reading query files and running them against a session
//! from the batch coordinator.

pub mod executor;
pub mod loader;

pub use executor::run_query;
pub use loader::{resolve_query_name, QuerySpec};
