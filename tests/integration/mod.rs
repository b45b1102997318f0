//! Integration tests for db-report.

pub mod common;
pub mod console_test;
pub mod csv_test;
