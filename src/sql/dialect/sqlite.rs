//! SQLite SQL dialect.
//!
//! SQLite differences from ANSI:
//! - `?` bind placeholders
//! - Booleans are stored as integers 1/0
//! - `IS` compares NULL-safely
//! - No `CASCADE` on `DROP TABLE`

use super::helpers;
use super::SqlDialect;

/// SQLite SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn null_safe_eq_operator(&self) -> &'static str {
        "IS"
    }

    fn supports_drop_cascade(&self) -> bool {
        false
    }
}
