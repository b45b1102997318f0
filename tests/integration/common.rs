//! Shared fixture: a seeded SQLite database plus a queries directory.

use db_report::batch::{BatchCoordinator, BatchResult};
use db_report::config::Config;
use db_report::render::OutputMode;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

pub const SEED: &str = r#"
CREATE TABLE patients (
    patient_id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    birth_weight REAL,
    photo BLOB
);
INSERT INTO patients VALUES
    (1, 'Ada', 'Lovelace', 3.2, NULL),
    (2, 'Alan', 'Turing', NULL, x'00ff'),
    (3, 'Grace', 'Hopper, Jr.', 2.9, NULL),
    (4, 'Edsger', 'Dijkstra', 3.0, NULL),
    (5, 'Barbara', 'Liskov', 3.5, NULL);

CREATE TABLE lab_results (
    patient_id INTEGER NOT NULL,
    ca125_level REAL NOT NULL
);
"#;

/// Returns all five patients.
pub const ALL_PATIENTS: &str =
    "SELECT patient_id, first_name, last_name, birth_weight FROM patients ORDER BY patient_id;";

/// Returns no rows but describes two columns.
pub const NO_LABS: &str = "SELECT patient_id, ca125_level FROM lab_results;";

/// Rejected by the engine.
pub const BROKEN: &str = "SELECT * FROM missing_table;";

pub struct Fixture {
    pub dir: TempDir,
    pub config: Config,
}

impl Fixture {
    /// Creates the database and an empty queries directory.
    pub async fn new() -> Self {
        let dir = tempdir().unwrap();
        let config = Config {
            database: dir.path().join("oncology_data.db"),
            queries_dir: dir.path().join("projects"),
            results_dir: dir.path().join("results"),
            default_queries: vec![
                "all_patients.sql".to_string(),
                "no_labs.sql".to_string(),
                "broken.sql".to_string(),
            ],
            ..Config::default()
        };
        std::fs::create_dir_all(&config.queries_dir).unwrap();

        let fixture = Self { dir, config };
        fixture.execute_sql(SEED).await;
        fixture
    }

    /// Creates the fixture with the three standard query files written.
    pub async fn with_queries() -> Self {
        let fixture = Self::new().await;
        fixture.write_query("all_patients.sql", ALL_PATIENTS);
        fixture.write_query("no_labs.sql", NO_LABS);
        fixture.write_query("broken.sql", BROKEN);
        fixture
    }

    pub fn write_query(&self, name: &str, sql: &str) {
        std::fs::write(self.config.queries_dir.join(name), sql).unwrap();
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn csv_file(&self, stem: &str) -> PathBuf {
        self.config.results_dir.join(format!("{stem}.csv"))
    }

    /// Runs SQL directly against the database, outside of any batch.
    pub async fn execute_sql(&self, sql: &str) {
        let mut conn = SqliteConnectOptions::new()
            .filename(&self.config.database)
            .create_if_missing(true)
            .connect()
            .await
            .unwrap();
        sqlx::raw_sql(sql).execute(&mut conn).await.unwrap();
        conn.close().await.unwrap();
    }

    /// Runs a batch and returns the result with everything printed to stdout.
    pub async fn run(&self, mode: OutputMode, selected: Option<&str>) -> (BatchResult, String) {
        let coordinator = BatchCoordinator::new(self.config.clone(), mode);
        let mut out = Vec::new();
        let result = coordinator.run(selected, &mut out).await.unwrap();
        (result, String::from_utf8(out).unwrap())
    }
}

/// Lines of a console block that are data rows (they start with a patient id).
pub fn data_lines(block: &str) -> Vec<&str> {
    block
        .lines()
        .filter(|line| line.starts_with(|c: char| c.is_ascii_digit()))
        .collect()
}

/// The console block printed for one query, between its start and end markers.
pub fn query_block<'a>(output: &'a str, name: &str) -> &'a str {
    let start_marker = format!("--- Running {name} ---\n");
    let start = output.find(&start_marker).expect("query was not run") + start_marker.len();
    let rest = &output[start..];
    let end = rest.find("--- ").unwrap_or(rest.len());
    &rest[..end]
}
