//! Query builder - construct SELECT statements with a fluent API.

use super::dialect::Dialect;
use super::expr::Expr;
use super::ident::Identifier;
use super::token::{Token, TokenStream};

// =============================================================================
// Select Expression (column with optional alias)
// =============================================================================

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<Identifier>,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn with_alias(mut self, alias: Identifier) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = self.expr.to_tokens_for_dialect(dialect);
        if let Some(alias) = &self.alias {
            ts.space()
                .push(Token::As)
                .space()
                .push(Token::Ident(alias.clone()));
        }
        ts
    }
}

impl From<Expr> for SelectExpr {
    fn from(expr: Expr) -> Self {
        SelectExpr::new(expr)
    }
}

// =============================================================================
// Select
// =============================================================================

/// A single-table SELECT with optional DISTINCT and GROUP BY.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until converted to SQL"]
pub struct Select {
    pub distinct: bool,
    pub columns: Vec<SelectExpr>,
    pub from: Identifier,
    pub group_by: Vec<Expr>,
    /// Put FROM and GROUP BY on their own lines.
    pub multiline: bool,
}

impl Select {
    pub fn new(table: Identifier) -> Self {
        Self {
            distinct: false,
            columns: Vec::new(),
            from: table,
            group_by: Vec::new(),
            multiline: false,
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn column(mut self, col: impl Into<SelectExpr>) -> Self {
        self.columns.push(col.into());
        self
    }

    pub fn columns(mut self, cols: impl IntoIterator<Item = SelectExpr>) -> Self {
        self.columns.extend(cols);
        self
    }

    pub fn group_by(mut self, expr: Expr) -> Self {
        self.group_by.push(expr);
        self
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        let clause_break = if self.multiline {
            Token::Newline
        } else {
            Token::Space
        };

        ts.push(Token::Select).space();
        if self.distinct {
            ts.push(Token::Distinct).space();
        }

        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.append(&col.to_tokens_for_dialect(dialect));
        }

        ts.push(clause_break.clone())
            .push(Token::From)
            .space()
            .push(Token::Ident(self.from.clone()));

        if !self.group_by.is_empty() {
            ts.push(clause_break).push(Token::GroupBy).space();
            for (i, expr) in self.group_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&expr.to_tokens_for_dialect(dialect));
            }
        }

        ts
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }
}
