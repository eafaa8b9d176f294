//! DDL (Data Definition Language) support.
//!
//! Builders for the two statements a pivot run issues: `DROP TABLE` and
//! `CREATE TABLE ... AS SELECT`. Both render with a trailing semicolon.
//!
//! # Examples
//!
//! ```ignore
//! use pivotsql::sql::ddl::{CreateTable, DropTable};
//! use pivotsql::sql::dialect::Dialect;
//!
//! let drop = DropTable::new(name.clone()).if_exists().cascade();
//! let create = CreateTable::new(name).temporary().as_select(select);
//!
//! println!("{}", drop.to_sql(Dialect::Postgres));
//! println!("{}", create.to_sql(Dialect::Postgres));
//! ```

use super::dialect::{Dialect, SqlDialect};
use super::ident::Identifier;
use super::query::Select;
use super::token::{Token, TokenStream};

// ============================================================================
// CREATE TABLE ... AS SELECT
// ============================================================================

/// CREATE [TEMP] TABLE name AS SELECT ...
#[derive(Debug, Clone)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct CreateTable {
    pub temporary: bool,
    pub name: Identifier,
    pub as_query: Option<Box<Select>>,
}

impl CreateTable {
    /// Create a new CREATE TABLE statement.
    pub fn new(name: Identifier) -> Self {
        Self {
            temporary: false,
            name,
            as_query: None,
        }
    }

    /// Make the table session-scoped.
    pub fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    /// Set whether the table is session-scoped.
    pub fn with_temporary(mut self, temporary: bool) -> Self {
        self.temporary = temporary;
        self
    }

    /// Create table from a SELECT query (CREATE TABLE AS SELECT).
    pub fn as_select(mut self, query: Select) -> Self {
        self.as_query = Some(Box::new(query));
        self
    }

    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens(dialect).serialize(dialect)
    }

    /// Convert to token stream.
    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Create).space();
        if self.temporary {
            ts.push(Token::Temporary).space();
        }
        ts.push(Token::Table)
            .space()
            .push(Token::Ident(self.name.clone()));

        ts.space().push(Token::As);
        if let Some(ref query) = self.as_query {
            ts.newline().append(&query.to_tokens_for_dialect(dialect));
        }

        ts.push(Token::Semicolon);
        ts
    }
}

// ============================================================================
// DROP TABLE
// ============================================================================

/// DROP TABLE statement.
#[derive(Debug, Clone)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct DropTable {
    pub if_exists: bool,
    pub name: Identifier,
    pub cascade: bool,
}

impl DropTable {
    /// Create a new DROP TABLE statement.
    pub fn new(name: Identifier) -> Self {
        Self {
            if_exists: false,
            name,
            cascade: false,
        }
    }

    /// Add IF EXISTS clause.
    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    /// Add CASCADE clause.
    pub fn cascade(mut self) -> Self {
        self.cascade = true;
        self
    }

    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens(dialect).serialize(dialect)
    }

    /// Convert to token stream.
    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Drop).space().push(Token::Table);

        if self.if_exists && dialect.supports_if_exists() {
            ts.space().push(Token::If).space().push(Token::Exists);
        }

        ts.space().push(Token::Ident(self.name.clone()));

        if self.cascade && dialect.supports_drop_cascade() {
            ts.space().push(Token::Cascade);
        }

        ts.push(Token::Semicolon);
        ts
    }
}
