//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for the dialect differences
//! that matter when emitting pivot statements. Each dialect implements
//! `SqlDialect` to handle its specific syntax:
//!
//! - Bind placeholders: `$1, $2` (PostgreSQL/Redshift) vs `?` (everything else)
//! - Temporary tables: `TEMP` vs `TEMPORARY` (MySQL)
//! - NULL-safe equality: `IS NOT DISTINCT FROM` vs `<=>` (MySQL) vs `IS` (SQLite),
//!   spelled out with `OR ... IS NULL` on Redshift
//! - `DROP TABLE ... CASCADE` support
//! - Boolean literals: true/false vs 1/0
//!
//! # Usage
//!
//! ```ignore
//! use pivotsql::sql::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Postgres;
//! assert_eq!(dialect.placeholder(2), "$2");
//! ```
//!
//! # Feature Matrix
//!
//! | Feature | PostgreSQL | Redshift | DuckDB | MySQL | SQLite |
//! |---------|-----------|----------|--------|-------|--------|
//! | Placeholder | `$n` | `$n` | `?` | `?` | `?` |
//! | Temp keyword | TEMP | TEMP | TEMP | TEMPORARY | TEMP |
//! | DROP ... CASCADE | ✓ | ✓ | ✓ | ✓ (ignored) | ❌ |
//! | NULL-safe `=` | IS NOT DISTINCT FROM | `= OR IS NULL` | IS NOT DISTINCT FROM | `<=>` | IS |

mod duckdb;
pub mod helpers;
mod mysql;
mod postgres;
mod redshift;
mod sqlite;

pub use duckdb::DuckDb;
pub use mysql::MySql;
pub use postgres::Postgres;
pub use redshift::Redshift;
pub use sqlite::Sqlite;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Literals
    // =========================================================================

    /// Quote a string literal.
    ///
    /// All supported dialects use single quotes with `''` for escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    ///
    /// - PostgreSQL/DuckDB: `true`/`false`
    /// - MySQL/SQLite: `1`/`0`
    fn format_bool(&self, b: bool) -> &'static str;

    /// Format a NULL literal.
    fn format_null(&self) -> &'static str {
        "NULL"
    }

    /// Format a binary literal.
    fn format_blob(&self, bytes: &[u8]) -> String {
        helpers::format_blob_hex(bytes)
    }

    // =========================================================================
    // Bind Parameters
    // =========================================================================

    /// Render the placeholder for the 1-based parameter `index`.
    ///
    /// - PostgreSQL/Redshift: `$1`, `$2`, ...
    /// - DuckDB/MySQL/SQLite: `?`
    fn placeholder(&self, index: usize) -> String {
        let _ = index;
        "?".into()
    }

    // =========================================================================
    // Operators
    // =========================================================================

    /// Comparison operator that matches NULL against NULL.
    fn null_safe_eq_operator(&self) -> &'static str {
        "IS NOT DISTINCT FROM"
    }

    /// Whether `null_safe_eq_operator` is understood at all. Dialects without it
    /// get `(a = b OR (a IS NULL AND b IS NULL))`, which repeats the right operand
    /// and so needs numbered placeholders.
    fn supports_null_safe_eq(&self) -> bool {
        true
    }

    // =========================================================================
    // DDL Support
    // =========================================================================

    /// Keyword marking a session-scoped table in `CREATE ... TABLE`.
    fn temporary_keyword(&self) -> &'static str {
        "TEMP"
    }

    /// Whether this dialect supports IF EXISTS for DROP statements.
    fn supports_if_exists(&self) -> bool {
        true
    }

    /// Whether this dialect supports CASCADE on DROP TABLE.
    fn supports_drop_cascade(&self) -> bool {
        true
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    Redshift,
    DuckDb,
    MySql,
    Sqlite,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Postgres => &Postgres,
            Dialect::Redshift => &Redshift,
            Dialect::DuckDb => &DuckDb,
            Dialect::MySql => &MySql,
            Dialect::Sqlite => &Sqlite,
        }
    }

    /// All dialects, in declaration order.
    pub fn all() -> [Dialect; 5] {
        [
            Dialect::Postgres,
            Dialect::Redshift,
            Dialect::DuckDb,
            Dialect::MySql,
            Dialect::Sqlite,
        ]
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn format_null(&self) -> &'static str {
        self.dialect().format_null()
    }

    fn format_blob(&self, bytes: &[u8]) -> String {
        self.dialect().format_blob(bytes)
    }

    fn placeholder(&self, index: usize) -> String {
        self.dialect().placeholder(index)
    }

    fn null_safe_eq_operator(&self) -> &'static str {
        self.dialect().null_safe_eq_operator()
    }

    fn supports_null_safe_eq(&self) -> bool {
        self.dialect().supports_null_safe_eq()
    }

    fn temporary_keyword(&self) -> &'static str {
        self.dialect().temporary_keyword()
    }

    fn supports_if_exists(&self) -> bool {
        self.dialect().supports_if_exists()
    }

    fn supports_drop_cascade(&self) -> bool {
        self.dialect().supports_drop_cascade()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

/// Error returned when parsing an unknown dialect name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown SQL dialect: {0}")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Dialect::all()
            .into_iter()
            .find(|d| d.name() == wanted)
            .or(match wanted.as_str() {
                "postgresql" | "pg" => Some(Dialect::Postgres),
                "sqlite3" => Some(Dialect::Sqlite),
                _ => None,
            })
            .ok_or_else(|| UnknownDialect(s.to_string()))
    }
}
