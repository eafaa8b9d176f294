//! Target table and output column naming.

use super::error::{ConfigurationError, PivotResult};
use super::request::PivotRequest;
use crate::sql::Identifier;

/// Infix between the source table and the row key in a target name.
pub const PIVOT_INFIX: &str = "_pivot_";

/// Derive the pivot table name.
///
/// The name is `<table>_pivot_<row_by>__<column_by>`, built by plain string
/// concatenation. Permanent tables get `<prefix>.` in front; a permanent
/// target without a non-empty prefix is a configuration error. The prefix
/// is ignored for temporary targets.
pub fn target_table_name(
    table: &str,
    row_by: &str,
    column_by: &str,
    temporary: bool,
    prefix: Option<&str>,
) -> Result<String, ConfigurationError> {
    let base = format!("{table}{PIVOT_INFIX}{row_by}__{column_by}");
    if temporary {
        return Ok(base);
    }
    match prefix {
        Some(prefix) if !prefix.is_empty() => Ok(format!("{prefix}.{base}")),
        _ => Err(ConfigurationError::MissingPrefix),
    }
}

/// Target table name for `request`.
pub fn derive_target_name(request: &PivotRequest) -> PivotResult<String> {
    Ok(target_table_name(
        &request.table,
        &request.row_by,
        &request.column_by,
        request.temporary,
        request.prefix.as_deref(),
    )?)
}

/// Output column for one (value column, category label) pair.
pub fn derived_column_name(value: &Identifier, label: &str) -> Identifier {
    Identifier::derived(value, label)
}
