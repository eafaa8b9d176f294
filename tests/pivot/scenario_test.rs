use pivotsql::pivot::{generate_pivot, plan_pivot, LabelFilter, PivotError, PivotRequest};
use pivotsql::session::Session;
use pivotsql::sql::{Dialect, SqlValue};
use pretty_assertions::assert_eq;
use rusqlite::Connection;

const TARGET: &str = "exam_scores_pivot_uid__subject";

fn scores_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE exam_scores (uid INTEGER, subject TEXT, score INTEGER);
         INSERT INTO exam_scores VALUES
            (1, 'English', 98),
            (1, 'Math', 100),
            (2, 'Math', 20),
            (2, 'Other', 22);",
    )
    .unwrap();
    conn
}

fn scores_request() -> PivotRequest {
    PivotRequest::new("exam_scores", "uid", "subject")
        .value("score")
        .dialect(Dialect::Sqlite)
}

fn fetch(conn: &mut Connection, sql: &str) -> Vec<Vec<SqlValue>> {
    Session::fetch_all(conn, sql, &[]).unwrap()
}

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    let stmt = conn.prepare(&format!("SELECT * FROM {table}")).unwrap();
    let mut names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    names.sort();
    names
}

#[test]
fn test_scores_pivot_with_filter() {
    let mut conn = scores_db();
    let request = scores_request().filter(|c| c != "Other");

    let name = generate_pivot(&mut conn, &request).unwrap();
    assert_eq!(name, TARGET);

    assert_eq!(
        column_names(&conn, TARGET),
        vec!["score__English", "score__Math", "uid"]
    );
    assert_eq!(
        fetch(
            &mut conn,
            "SELECT uid, score__English, score__Math FROM exam_scores_pivot_uid__subject ORDER BY uid"
        ),
        vec![
            vec![SqlValue::Integer(1), SqlValue::Integer(98), SqlValue::Integer(100)],
            vec![SqlValue::Integer(2), SqlValue::Null, SqlValue::Integer(20)],
        ]
    );
}

#[test]
fn test_without_filter_every_category_becomes_a_column() {
    let mut conn = scores_db();
    generate_pivot(&mut conn, &scores_request()).unwrap();

    assert_eq!(
        column_names(&conn, TARGET),
        vec!["score__English", "score__Math", "score__Other", "uid"]
    );
}

#[test]
fn test_rerun_replaces_previous_table() {
    let mut conn = scores_db();
    let request = scores_request().filter(|c| c != "Other");
    let query = "SELECT uid, score__English, score__Math FROM exam_scores_pivot_uid__subject ORDER BY uid";

    generate_pivot(&mut conn, &request).unwrap();
    let first = fetch(&mut conn, query);
    generate_pivot(&mut conn, &request).unwrap();
    let second = fetch(&mut conn, query);

    assert_eq!(first, second);
}

#[test]
fn test_rerun_picks_up_new_categories() {
    let mut conn = scores_db();
    generate_pivot(&mut conn, &scores_request()).unwrap();

    conn.execute("INSERT INTO exam_scores VALUES (3, 'Art', 70)", [])
        .unwrap();
    generate_pivot(&mut conn, &scores_request()).unwrap();

    assert!(column_names(&conn, TARGET).contains(&"score__Art".to_string()));
}

#[test]
fn test_permanent_table_in_prefix_schema() {
    let mut conn = scores_db();
    let name = generate_pivot(&mut conn, &scores_request().permanent("main")).unwrap();
    assert_eq!(name, "main.exam_scores_pivot_uid__subject");

    let found = fetch(
        &mut conn,
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'exam_scores_pivot_uid__subject'",
    );
    assert_eq!(found.len(), 1);
}

#[test]
fn test_null_category_gets_its_own_column() {
    let mut conn = scores_db();
    conn.execute("INSERT INTO exam_scores VALUES (3, NULL, 7)", [])
        .unwrap();

    generate_pivot(&mut conn, &scores_request()).unwrap();

    assert_eq!(
        fetch(
            &mut conn,
            "SELECT uid, score__Null FROM exam_scores_pivot_uid__subject ORDER BY uid"
        ),
        vec![
            vec![SqlValue::Integer(1), SqlValue::Null],
            vec![SqlValue::Integer(2), SqlValue::Null],
            vec![SqlValue::Integer(3), SqlValue::Integer(7)],
        ]
    );
}

#[test]
fn test_label_with_punctuation_is_sanitized() {
    let mut conn = scores_db();
    conn.execute("INSERT INTO exam_scores VALUES (3, 'Math 101!', 55)", [])
        .unwrap();

    generate_pivot(&mut conn, &scores_request()).unwrap();

    assert_eq!(
        fetch(
            &mut conn,
            "SELECT score__Math_101_ FROM exam_scores_pivot_uid__subject WHERE uid = 3"
        ),
        vec![vec![SqlValue::Integer(55)]]
    );
}

#[test]
fn test_blank_category_is_skipped() {
    let mut conn = scores_db();
    conn.execute("INSERT INTO exam_scores VALUES (3, '', 1)", [])
        .unwrap();

    let query = plan_pivot(&mut conn, &scores_request()).unwrap();
    assert!(query.params.iter().all(|p| p != &SqlValue::from("")));
    assert_eq!(query.columns.len(), 3);
}

#[test]
fn test_multiple_values_and_aggregate() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE exams (uid INTEGER, subject TEXT, midterm INTEGER, final INTEGER);
         INSERT INTO exams VALUES
            (1, 'Math', 60, 70),
            (1, 'Math', 80, 65),
            (1, 'Art', 90, 95);",
    )
    .unwrap();
    let request = PivotRequest::new("exams", "uid", "subject")
        .values(["midterm", "final"])
        .aggregate("MAX")
        .dialect(Dialect::Sqlite);

    let name = generate_pivot(&mut conn, &request).unwrap();

    assert_eq!(
        fetch(
            &mut conn,
            &format!("SELECT midterm__Math, final__Math, midterm__Art, final__Art FROM {name}")
        ),
        vec![vec![
            SqlValue::Integer(80),
            SqlValue::Integer(70),
            SqlValue::Integer(90),
            SqlValue::Integer(95),
        ]]
    );
}

#[test]
fn test_filter_rejecting_everything_keeps_row_key() {
    let mut conn = scores_db();
    let request = scores_request().filter_with(LabelFilter::new().include(["Music"]));

    generate_pivot(&mut conn, &request).unwrap();

    assert_eq!(column_names(&conn, TARGET), vec!["uid"]);
    assert_eq!(
        fetch(&mut conn, "SELECT uid FROM exam_scores_pivot_uid__subject ORDER BY uid"),
        vec![vec![SqlValue::Integer(1)], vec![SqlValue::Integer(2)]]
    );
}

#[test]
fn test_collision_aborts_before_drop() {
    let mut conn = scores_db();
    generate_pivot(&mut conn, &scores_request()).unwrap();
    conn.execute_batch(
        "INSERT INTO exam_scores VALUES (3, 'a-b', 1), (3, 'a b', 2);",
    )
    .unwrap();

    let err = generate_pivot(&mut conn, &scores_request()).unwrap_err();
    assert!(matches!(err, PivotError::ColumnCollision { .. }));
    // The table from the first run is still there.
    assert_eq!(column_names(&conn, TARGET).len(), 4);
}
