//! SQL generation module.
//!
//! This module provides the small, type-safe SQL builder the pivot generator
//! emits through. It includes:
//!
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations
//! - [`ident`] - Validated and derived identifiers
//! - [`value`] - Scalar values used as bind parameters and result cells
//! - [`expr`] - Expression AST and builder DSL
//! - [`query`] - SELECT builder
//! - [`ddl`] - `CREATE TABLE ... AS` and `DROP TABLE`

pub mod ddl;
pub mod dialect;
pub mod expr;
pub mod ident;
pub mod query;
pub mod token;
pub mod value;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use ddl::{CreateTable, DropTable};
pub use dialect::{Dialect, SqlDialect};
pub use expr::{case_when, col, func, param, CompareOp, Expr, ExprExt};
pub use ident::{sanitize_label, Identifier, InvalidIdentifier};
pub use query::{Select, SelectExpr};
pub use token::{Token, TokenStream};
pub use value::{SqlValue, NULL_LABEL};
