//! Bounded console rendering.

use std::io::{self, Write};

use crate::db::{ResultSet, Row};
use crate::error::{ReportError, Result};

/// Printed instead of an empty block when a query returns no rows.
pub const NO_RESULTS_MARKER: &str = "(No results returned)";

/// Printed after the last shown row when rows were withheld by the limit.
pub const TRUNCATION_MARKER: &str = "... (output limited)";

const FIELD_SEPARATOR: &str = ", ";

/// Extra dashes drawn past the header's width.
const RULE_PADDING: usize = 4;

/// Summary of one console render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleReport {
    /// Rows printed.
    pub rows_shown: usize,
    /// Whether at least one more row existed beyond the limit.
    pub truncated: bool,
}

/// Prints `rs` to `out`, showing at most `limit` rows.
///
/// With a limit, rows are fetched up to the limit and then a single extra row is
/// probed to decide whether to print the truncation marker. The probed row is
/// discarded, so the output only ever says "there is more", never how much more.
/// Without a limit every row is printed; rows are streamed one at a time either
/// way.
pub async fn render_console<W: Write>(
    mut rs: ResultSet<'_>,
    limit: Option<usize>,
    out: &mut W,
) -> Result<ConsoleReport> {
    let Some(first) = rs.next_row().await? else {
        writeln!(out, "{NO_RESULTS_MARKER}").map_err(write_error)?;
        return Ok(ConsoleReport {
            rows_shown: 0,
            truncated: false,
        });
    };

    if rs.has_columns() {
        let header = rs.columns().join(FIELD_SEPARATOR);
        writeln!(out, "{header}").map_err(write_error)?;
        writeln!(out, "{}", "-".repeat(header.chars().count() + RULE_PADDING))
            .map_err(write_error)?;
    }

    write_row(out, &first)?;
    let mut shown = 1;
    let mut exhausted = false;

    while limit.map_or(true, |max| shown < max) {
        match rs.next_row().await? {
            Some(row) => {
                write_row(out, &row)?;
                shown += 1;
            }
            None => {
                exhausted = true;
                break;
            }
        }
    }

    let truncated = !exhausted && rs.next_row().await?.is_some();
    if truncated {
        writeln!(out, "{TRUNCATION_MARKER}").map_err(write_error)?;
    }

    Ok(ConsoleReport {
        rows_shown: shown,
        truncated,
    })
}

fn write_row<W: Write>(out: &mut W, row: &Row) -> Result<()> {
    let line = row
        .iter()
        .map(|value| value.to_display_string())
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR);
    writeln!(out, "{line}").map_err(write_error)
}

pub(super) fn write_error(e: io::Error) -> ReportError {
    ReportError::io(format!("Failed to write output: {e}"))
}
