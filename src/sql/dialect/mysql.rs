//! MySQL SQL dialect.
//!
//! MySQL differences from ANSI:
//! - Boolean is TINYINT(1), returns 1/0
//! - `CREATE TEMPORARY TABLE` (no `TEMP` shorthand)
//! - `<=>` is the NULL-safe equality operator
//! - `DROP TABLE ... CASCADE` is accepted and ignored

use super::helpers;
use super::SqlDialect;

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn null_safe_eq_operator(&self) -> &'static str {
        "<=>"
    }

    fn temporary_keyword(&self) -> &'static str {
        "TEMPORARY"
    }
}
