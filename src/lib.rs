//! # pivotsql
//!
//! Dynamic pivot tables through conditional aggregation.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    PivotRequest                          │
//! │  (table, row key, category column, values, filter)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [discover + filter]
//! ┌─────────────────────────────────────────────────────────┐
//! │          CategoryValue list (SELECT DISTINCT)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [assemble]
//! ┌─────────────────────────────────────────────────────────┐
//! │   PivotQuery (DROP + CREATE ... AS SELECT, parameters)   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [execute on Session]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 <table>_pivot_<row>__<col>               │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod pivot;
pub mod session;
pub mod sql;

pub use pivot::{generate_pivot, PivotError, PivotRequest};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::pivot::{
        generate_pivot, plan_pivot, CategoryFilter, CategoryValue, ConfigurationError,
        LabelFilter, PivotError, PivotOptions, PivotQuery, PivotRequest, PivotResult,
    };
    pub use crate::session::{Row, Session};
    pub use crate::sql::{Dialect, SqlDialect, SqlValue};
}
