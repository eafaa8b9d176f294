use pivotsql::pivot::{generate_pivot, ConfigurationError, PivotError, PivotRequest, Stage};
use pivotsql::session::{Row, Session};
use pivotsql::sql::SqlValue;
use pretty_assertions::assert_eq;
use std::fmt;

#[derive(Debug)]
struct FakeError(&'static str);

impl fmt::Display for FakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for FakeError {}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Fetch(String),
    Execute(String, Vec<SqlValue>),
}

/// Records every statement and answers discovery with canned rows.
#[derive(Default)]
struct RecordingSession {
    calls: Vec<Call>,
    categories: Vec<SqlValue>,
    fail_fetch: bool,
    fail_execute_at: Option<usize>,
}

impl RecordingSession {
    fn with_categories(categories: &[&str]) -> Self {
        Self {
            categories: categories.iter().map(|c| SqlValue::from(*c)).collect(),
            ..Default::default()
        }
    }

    fn executed(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Execute(sql, _) => Some(sql.as_str()),
                Call::Fetch(_) => None,
            })
            .collect()
    }
}

impl Session for RecordingSession {
    type Error = FakeError;

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<usize, FakeError> {
        let index = self.executed().len();
        self.calls
            .push(Call::Execute(sql.to_string(), params.to_vec()));
        if self.fail_execute_at == Some(index) {
            return Err(FakeError("permission denied"));
        }
        Ok(0)
    }

    fn fetch_all(&mut self, sql: &str, _params: &[SqlValue]) -> Result<Vec<Row>, FakeError> {
        self.calls.push(Call::Fetch(sql.to_string()));
        if self.fail_fetch {
            return Err(FakeError("relation does not exist"));
        }
        Ok(self.categories.iter().map(|c| vec![c.clone()]).collect())
    }
}

fn request() -> PivotRequest {
    PivotRequest::new("sandbox.example_table", "uid", "subject").value("score")
}

#[test]
fn test_statement_order_and_binding() {
    let mut session = RecordingSession::with_categories(&["English", "Math", "Other"]);
    let request = request().permanent("sandbox").filter(|c| c != "Other");

    let name = generate_pivot(&mut session, &request).unwrap();
    assert_eq!(name, "sandbox.sandbox.example_table_pivot_uid__subject");

    assert_eq!(
        session.calls,
        vec![
            Call::Fetch("SELECT DISTINCT subject FROM sandbox.example_table".to_string()),
            Call::Execute(
                "DROP TABLE IF EXISTS sandbox.sandbox.example_table_pivot_uid__subject CASCADE;"
                    .to_string(),
                vec![],
            ),
            Call::Execute(
                "CREATE TABLE sandbox.sandbox.example_table_pivot_uid__subject AS\n\
                 SELECT uid, \
                 SUM(CASE WHEN subject = $1 THEN score ELSE NULL END) AS score__English, \
                 SUM(CASE WHEN subject = $2 THEN score ELSE NULL END) AS score__Math\n\
                 FROM sandbox.example_table\n\
                 GROUP BY uid;"
                    .to_string(),
                vec![SqlValue::from("English"), SqlValue::from("Math")],
            ),
        ]
    );
}

#[test]
fn test_parameter_count_is_values_times_categories() {
    let mut session = RecordingSession::with_categories(&["A", "B", "C"]);
    let request = request().values(["midterm", "final"]);

    generate_pivot(&mut session, &request).unwrap();

    match session.calls.last() {
        Some(Call::Execute(_, params)) => assert_eq!(params.len(), 6),
        other => panic!("expected CREATE, got {other:?}"),
    }
}

#[test]
fn test_configuration_error_issues_no_statements() {
    let mut session = RecordingSession::with_categories(&["Math"]);
    let request = request().target(false, None);

    let err = generate_pivot(&mut session, &request).unwrap_err();

    assert!(matches!(
        err,
        PivotError::Config(ConfigurationError::MissingPrefix)
    ));
    assert!(session.calls.is_empty());
}

#[test]
fn test_empty_value_list_issues_no_statements() {
    let mut session = RecordingSession::with_categories(&["Math"]);
    let request = PivotRequest::new("t", "uid", "subject");

    let err = generate_pivot(&mut session, &request).unwrap_err();

    assert!(err.is_configuration());
    assert!(session.calls.is_empty());
}

#[test]
fn test_injection_in_identifier_rejected() {
    let mut session = RecordingSession::with_categories(&["Math"]);
    let request = PivotRequest::new("t", "uid", "subject; DROP TABLE t").value("score");

    let err = generate_pivot(&mut session, &request).unwrap_err();

    assert!(matches!(
        err,
        PivotError::Config(ConfigurationError::InvalidIdentifier {
            role: "category column",
            ..
        })
    ));
    assert!(session.calls.is_empty());
}

#[test]
fn test_discovery_error_aborts_before_drop() {
    let mut session = RecordingSession {
        fail_fetch: true,
        ..Default::default()
    };

    let err = generate_pivot(&mut session, &request()).unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Discover));
    assert!(session.executed().is_empty());
}

#[test]
fn test_drop_error_skips_create() {
    let mut session = RecordingSession {
        categories: vec![SqlValue::from("Math")],
        fail_execute_at: Some(0),
        ..Default::default()
    };

    let err = generate_pivot(&mut session, &request()).unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Drop));
    assert_eq!(session.executed().len(), 1);
}

#[test]
fn test_create_error_keeps_driver_message() {
    let mut session = RecordingSession {
        categories: vec![SqlValue::from("Math")],
        fail_execute_at: Some(1),
        ..Default::default()
    };

    let err = generate_pivot(&mut session, &request()).unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Create));
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), "permission denied");
}

#[test]
fn test_null_category_binds_null() {
    let mut session = RecordingSession {
        categories: vec![SqlValue::Null, SqlValue::from("Math")],
        ..Default::default()
    };

    generate_pivot(&mut session, &request()).unwrap();

    match session.calls.last() {
        Some(Call::Execute(sql, params)) => {
            assert!(sql.contains(
                "SUM(CASE WHEN subject IS NOT DISTINCT FROM $1 THEN score ELSE NULL END) AS score__Null"
            ));
            assert_eq!(params, &vec![SqlValue::Null, SqlValue::from("Math")]);
        }
        other => panic!("expected CREATE, got {other:?}"),
    }
}

#[test]
fn test_no_categories_creates_row_key_only_table() {
    let mut session = RecordingSession::default();

    generate_pivot(&mut session, &request()).unwrap();

    assert_eq!(
        session.executed(),
        vec![
            "DROP TABLE IF EXISTS sandbox.example_table_pivot_uid__subject CASCADE;",
            "CREATE TEMP TABLE sandbox.example_table_pivot_uid__subject AS\n\
             SELECT uid\n\
             FROM sandbox.example_table\n\
             GROUP BY uid;",
        ]
    );
}
