//! Amazon Redshift SQL dialect.
//!
//! Redshift features:
//! - PostgreSQL-based syntax and drivers (numbered `$n` placeholders)
//! - `CREATE TEMP TABLE ... AS` for session-scoped results
//! - `DROP TABLE ... CASCADE` removes dependent views
//! - No `IS [NOT] DISTINCT FROM`; NULL-safe equality is spelled out with `OR ... IS NULL`

use super::helpers;
use super::SqlDialect;

/// Amazon Redshift SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Redshift;

impl SqlDialect for Redshift {
    fn name(&self) -> &'static str {
        "redshift"
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn format_blob(&self, bytes: &[u8]) -> String {
        helpers::format_blob_bytea(bytes)
    }

    fn placeholder(&self, index: usize) -> String {
        helpers::placeholder_dollar(index)
    }

    fn supports_null_safe_eq(&self) -> bool {
        false
    }
}
