//! Pivot table generation.
//!
//! Turns the distinct values of one column into output columns of a new
//! table, using conditional aggregation:
//!
//! 1. Name: derive the target table name from the request
//! 2. Discover: `SELECT DISTINCT <column_by> FROM <table>`
//! 3. Filter: keep the categories the request's filter accepts
//! 4. Assemble: one `AGG(CASE WHEN ... END)` column per (value, category)
//! 5. Execute: `DROP TABLE IF EXISTS`, then `CREATE TABLE ... AS SELECT`
//!
//! Category values only ever reach the database as bind parameters.
//! Every name that is interpolated is validated or sanitized first.
//!
//! Concurrent runs against the same target table are not coordinated and
//! race on the DROP/CREATE pair.

pub mod category;
pub mod error;
pub mod naming;
pub mod query;
pub mod request;

pub use category::{apply_filter, discover_categories, CategoryFilter, CategoryValue, LabelFilter};
pub use error::{ConfigurationError, PivotError, PivotResult, Stage};
pub use naming::{derive_target_name, derived_column_name, target_table_name};
pub use query::{build_pivot_query, GeneratedColumn, PivotQuery};
pub use request::{PivotOptions, PivotRequest, ResolvedNames, ValueNames, DEFAULT_AGGREGATE};

use tracing::{debug, info, warn};

use crate::session::Session;

/// Run steps 1 through 4 and return the statements without executing them.
///
/// Only the discovery query touches the session. Configuration errors are
/// raised before it runs.
pub fn plan_pivot<S>(session: &mut S, request: &PivotRequest) -> PivotResult<PivotQuery>
where
    S: Session + ?Sized,
{
    let names = request.resolve()?;

    let discovered =
        discover_categories(session, &names.table, &names.column_by, request.dialect)?;
    let discovered_count = discovered.len();
    let categories = apply_filter(discovered, request.category_filter());

    if categories.iter().all(CategoryValue::is_blank) {
        warn!(
            target_table = %names.target,
            discovered = discovered_count,
            "no categories left after filtering, pivot will only hold the row key"
        );
    }

    build_pivot_query(&names, &categories, request.dialect)
}

/// Drop any previous table and create the new one.
pub fn execute_pivot<S>(session: &mut S, query: &PivotQuery) -> PivotResult<()>
where
    S: Session + ?Sized,
{
    debug!(sql = %query.drop_sql, "dropping previous pivot table");
    session
        .execute(&query.drop_sql, &[])
        .map_err(|e| PivotError::database(Stage::Drop, e))?;

    debug!(
        sql = %query.create_sql,
        params = query.params.len(),
        "creating pivot table"
    );
    session
        .execute(&query.create_sql, &query.params)
        .map_err(|e| PivotError::database(Stage::Create, e))?;

    info!(
        target_table = %query.target,
        columns = query.columns.len(),
        "created pivot table"
    );
    Ok(())
}

/// Generate the pivot table described by `request` and return its name.
///
/// Issues exactly three statements on `session`, in order: discovery,
/// drop, create. A failing discovery leaves the database untouched. A
/// failing drop or create is reported with the driver error as its source
/// and is not retried.
///
/// # Example
///
/// ```ignore
/// let mut conn = rusqlite::Connection::open("warehouse.db")?;
/// let request = PivotRequest::new("exam_scores", "uid", "subject")
///     .value("score")
///     .dialect(Dialect::Sqlite)
///     .filter(|c| c != "Other");
/// let table = generate_pivot(&mut conn, &request)?;
/// assert_eq!(table, "exam_scores_pivot_uid__subject");
/// ```
pub fn generate_pivot<S>(session: &mut S, request: &PivotRequest) -> PivotResult<String>
where
    S: Session + ?Sized,
{
    let query = plan_pivot(session, request)?;
    execute_pivot(session, &query)?;
    Ok(query.target.into_string())
}
