//! DuckDB SQL dialect.
//!
//! DuckDB is PostgreSQL-compatible with extensions:
//! - `?` bind placeholders
//! - `IS NOT DISTINCT FROM` for NULL-safe comparison
//! - `CREATE TEMP TABLE ... AS`
//! - `DROP TABLE ... CASCADE`

use super::helpers;
use super::SqlDialect;

/// DuckDB SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    // Uses default `?` placeholders
}
