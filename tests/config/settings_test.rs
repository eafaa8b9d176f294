use pivotsql::config::{Settings, SettingsError};
use pivotsql::pivot::{generate_pivot, CategoryFilter, CategoryValue, ConfigurationError};
use pivotsql::sql::Dialect;
use pretty_assertions::assert_eq;
use rusqlite::Connection;
use std::path::PathBuf;

const CONFIG: &str = r#"
[database]
path = "./warehouse.db"

[defaults]
aggregate = "SUM"
temporary = true
dialect = "sqlite"

[pivots.scores]
table = "exam_scores"
row_by = "uid"
column_by = "subject"
values = "score"

[pivots.scores.filter]
exclude = ["Other"]

[pivots.archive]
table = "exam_scores"
row_by = "uid"
column_by = "subject"
values = ["score"]
aggregate = "MAX"
temporary = false
prefix = "main"
dialect = "postgres"

[pivots.broken]
table = "exam_scores"
row_by = "uid"
column_by = "subject"
values = ["score"]

[pivots.broken.filter]
pattern = "(unclosed"
"#;

fn settings() -> Settings {
    Settings::from_toml(CONFIG).unwrap()
}

#[test]
fn test_jobs_are_listed_by_name() {
    let settings = settings();
    let names: Vec<&str> = settings.pivots.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["archive", "broken", "scores"]);
}

#[test]
fn test_job_inherits_defaults() {
    let options = settings().options_for("scores").unwrap();
    assert_eq!(options.aggregate, "SUM");
    assert!(options.temporary);
    assert_eq!(options.dialect, Dialect::Sqlite);
    assert_eq!(options.prefix, None);
}

#[test]
fn test_job_overrides_defaults() {
    let options = settings().options_for("archive").unwrap();
    assert_eq!(options.aggregate, "MAX");
    assert!(!options.temporary);
    assert_eq!(options.prefix.as_deref(), Some("main"));
    assert_eq!(options.dialect, Dialect::Postgres);
}

#[test]
fn test_request_carries_filter() {
    let request = settings().request_for("scores").unwrap();
    let filter = request.category_filter().unwrap();

    assert!(filter.keep(&CategoryValue::from("Math")));
    assert!(!filter.keep(&CategoryValue::from("Other")));
}

#[test]
fn test_invalid_filter_pattern() {
    let err = settings().request_for("broken").unwrap_err();
    match err {
        SettingsError::InvalidJob { job, source } => {
            assert_eq!(job, "broken");
            assert!(matches!(source, ConfigurationError::InvalidFilter(_)));
        }
        other => panic!("expected InvalidJob, got {other:?}"),
    }
}

#[test]
fn test_unknown_job() {
    assert!(matches!(
        settings().request_for("missing"),
        Err(SettingsError::JobNotFound(_))
    ));
}

#[test]
fn test_unknown_dialect_is_parse_error() {
    let err = Settings::from_toml("[defaults]\ndialect = \"oracle\"\n").unwrap_err();
    assert!(matches!(err, SettingsError::ParseError(_)));
}

#[test]
fn test_from_file() {
    let path = std::env::temp_dir().join(format!("pivotsql-settings-{}.toml", std::process::id()));
    std::fs::write(&path, CONFIG).unwrap();

    let settings = Settings::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(settings.pivots.len(), 3);
    assert_eq!(
        settings.database.resolved_path().unwrap(),
        Some(PathBuf::from("./warehouse.db"))
    );
}

#[test]
fn test_missing_file() {
    let err = Settings::from_file("/nonexistent/pivotsql.toml").unwrap_err();
    assert!(matches!(err, SettingsError::FileNotFound(_)));
}

#[test]
fn test_configured_job_runs_against_sqlite() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE exam_scores (uid INTEGER, subject TEXT, score INTEGER);
         INSERT INTO exam_scores VALUES
            (1, 'English', 98), (1, 'Math', 100), (2, 'Math', 20), (2, 'Other', 22);",
    )
    .unwrap();

    let request = settings().request_for("scores").unwrap();
    let name = generate_pivot(&mut conn, &request).unwrap();

    let stmt = conn.prepare(&format!("SELECT * FROM {name}")).unwrap();
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    assert_eq!(columns.len(), 3);
    assert!(!columns.contains(&"score__Other".to_string()));
}
