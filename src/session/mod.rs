//! Database session abstraction.
//!
//! The pivot generator never opens, pools or closes connections. It borrows a
//! [`Session`] from the caller for the duration of one call and issues its
//! statements on it strictly in order.
//!
//! # Example
//!
//! ```ignore
//! use pivotsql::session::Session;
//!
//! let mut conn = rusqlite::Connection::open("warehouse.db")?;
//! let rows = conn.fetch_all("SELECT DISTINCT subject FROM scores", &[])?;
//! ```

mod sqlite;

use crate::sql::SqlValue;

/// One result row.
pub type Row = Vec<SqlValue>;

/// A database cursor that can run parameterized statements.
///
/// Placeholders in `sql` are positional and match `params` in order; the
/// placeholder syntax is whatever the session's dialect expects.
pub trait Session {
    /// Error reported by the underlying driver.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute a statement that returns no rows. Returns the affected row count.
    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<usize, Self::Error>;

    /// Run a query and collect every row.
    fn fetch_all(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, Self::Error>;
}

impl<S: Session + ?Sized> Session for &mut S {
    type Error = S::Error;

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<usize, Self::Error> {
        (**self).execute(sql, params)
    }

    fn fetch_all(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, Self::Error> {
        (**self).fetch_all(sql, params)
    }
}
