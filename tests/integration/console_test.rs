//! Console rendering against real query results.

use super::common::{data_lines, query_block, Fixture};
use db_report::batch::QueryOutcome;
use db_report::render::OutputMode;
use pretty_assertions::assert_eq;

const TOTAL_PATIENTS: usize = 5;

#[tokio::test]
async fn test_limit_shows_exactly_n_rows_and_marks_truncation() {
    let fixture = Fixture::with_queries().await;

    for limit in 1..=7 {
        let (result, output) = fixture
            .run(OutputMode::console(Some(limit as i64)), Some("all_patients.sql"))
            .await;
        let block = query_block(&output, "all_patients.sql");

        assert_eq!(
            data_lines(block).len(),
            limit.min(TOTAL_PATIENTS),
            "limit={limit}"
        );
        assert_eq!(
            block.contains("... (output limited)"),
            limit < TOTAL_PATIENTS,
            "limit={limit}"
        );
        assert_eq!(
            result.outcome("all_patients.sql"),
            Some(&QueryOutcome::Success {
                rows: limit.min(TOTAL_PATIENTS)
            })
        );
    }
}

#[tokio::test]
async fn test_unset_and_non_positive_limits_show_everything() {
    let fixture = Fixture::with_queries().await;

    for limit in [None, Some(0), Some(-5)] {
        let (_, output) = fixture
            .run(OutputMode::console(limit), Some("all_patients.sql"))
            .await;
        let block = query_block(&output, "all_patients.sql");

        assert_eq!(data_lines(block).len(), TOTAL_PATIENTS, "limit={limit:?}");
        assert!(!block.contains("... (output limited)"));
    }
}

#[tokio::test]
async fn test_console_block_layout() {
    let fixture = Fixture::with_queries().await;

    let (_, output) = fixture
        .run(OutputMode::console(Some(2)), Some("all_patients.sql"))
        .await;

    let header = "patient_id, first_name, last_name, birth_weight";
    let expected = format!(
        "{header}\n{}\n1, Ada, Lovelace, 3.2\n2, Alan, Turing, NULL\n... (output limited)\n",
        "-".repeat(header.len() + 4)
    );
    assert_eq!(query_block(&output, "all_patients.sql"), expected);
}

#[tokio::test]
async fn test_empty_result_prints_marker_not_header() {
    let fixture = Fixture::with_queries().await;

    let (result, output) = fixture
        .run(OutputMode::console(Some(10)), Some("no_labs.sql"))
        .await;

    assert_eq!(query_block(&output, "no_labs.sql"), "(No results returned)\n");
    assert_eq!(result.outcome("no_labs.sql"), Some(&QueryOutcome::Success { rows: 0 }));
}

#[tokio::test]
async fn test_whole_floats_and_blobs_display() {
    let fixture = Fixture::with_queries().await;
    fixture.write_query(
        "values.sql",
        "SELECT birth_weight, photo FROM patients WHERE patient_id IN (2, 4) ORDER BY patient_id;",
    );

    let (_, output) = fixture
        .run(OutputMode::console(None), Some("values.sql"))
        .await;

    let block = query_block(&output, "values.sql");
    let rows: Vec<&str> = block.lines().skip(2).collect();
    assert_eq!(rows, vec!["NULL, <2 bytes>", "3.0, NULL"]);
}
