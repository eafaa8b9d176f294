//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features:
//! - Numbered bind placeholders (`$1`, `$2`, ...)
//! - Native boolean type (true/false)
//! - `IS NOT DISTINCT FROM` for NULL-safe comparison
//! - `DROP TABLE ... CASCADE`
//! - `bytea` hex literals

use super::helpers;
use super::SqlDialect;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
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
}
