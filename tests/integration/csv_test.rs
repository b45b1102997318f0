//! CSV export against real query results.

use super::common::Fixture;
use db_report::batch::QueryOutcome;
use db_report::render::OutputMode;
use pretty_assertions::assert_eq;

const ALL_PATIENTS_CSV: &str = "patient_id,first_name,last_name,birth_weight\n\
1,Ada,Lovelace,3.2\n\
2,Alan,Turing,\n\
3,Grace,\"Hopper, Jr.\",2.9\n\
4,Edsger,Dijkstra,3.0\n\
5,Barbara,Liskov,3.5\n";

#[tokio::test]
async fn test_export_writes_complete_file() {
    let fixture = Fixture::with_queries().await;
    let mode = OutputMode::csv(&fixture.config.results_dir, 1000);

    let (result, output) = fixture.run(mode, Some("all_patients.sql")).await;

    let path = fixture.csv_file("all_patients");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), ALL_PATIENTS_CSV);
    assert_eq!(
        result.outcome("all_patients.sql"),
        Some(&QueryOutcome::Success { rows: 5 })
    );
    assert!(output.contains(&format!("Saved to {} (5 rows)", path.display())));
}

#[tokio::test]
async fn test_export_is_independent_of_batch_size() {
    let fixture = Fixture::with_queries().await;

    let mut files = Vec::new();
    for batch_size in [1, 2, 5, 1000] {
        let mode = OutputMode::csv(&fixture.config.results_dir, batch_size);
        fixture.run(mode, Some("all_patients.sql")).await;
        files.push(std::fs::read(fixture.csv_file("all_patients")).unwrap());
    }

    assert!(files.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn test_rerun_overwrites_with_latest_data() {
    let fixture = Fixture::with_queries().await;
    let mode = OutputMode::csv(&fixture.config.results_dir, 1000);

    fixture.run(mode.clone(), Some("all_patients.sql")).await;
    fixture.execute_sql("DELETE FROM patients WHERE patient_id > 1;").await;
    fixture.run(mode, Some("all_patients.sql")).await;

    assert_eq!(
        std::fs::read_to_string(fixture.csv_file("all_patients")).unwrap(),
        "patient_id,first_name,last_name,birth_weight\n1,Ada,Lovelace,3.2\n"
    );
}

#[tokio::test]
async fn test_empty_result_writes_header_only() {
    let fixture = Fixture::with_queries().await;
    let mode = OutputMode::csv(&fixture.config.results_dir, 1000);

    fixture.run(mode, Some("no_labs.sql")).await;

    assert_eq!(
        std::fs::read_to_string(fixture.csv_file("no_labs")).unwrap(),
        "patient_id,ca125_level\n"
    );
}

#[tokio::test]
async fn test_failed_query_leaves_other_exports_intact() {
    let fixture = Fixture::with_queries().await;
    let mode = OutputMode::csv(&fixture.config.results_dir, 1000);

    let (result, _) = fixture.run(mode, None).await;

    assert!(!result.all_succeeded);
    assert!(fixture.csv_file("all_patients").exists());
    assert!(fixture.csv_file("no_labs").exists());
    assert!(!fixture.csv_file("broken").exists());
}
