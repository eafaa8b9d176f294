//! Expression AST and builder DSL.
//!
//! Only the shapes a conditional-aggregation pivot needs are modelled:
//! column references, bind parameters, NULL, comparisons, function calls
//! and searched CASE.

use super::dialect::{Dialect, SqlDialect};
use super::ident::Identifier;
use super::token::{Token, TokenStream};

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference.
    Column(Identifier),

    /// Positional bind parameter (1-based).
    Param(usize),

    /// NULL literal.
    Null,

    /// Comparison: left op right
    Compare {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },

    /// Function call: name(args...)
    Function { name: String, args: Vec<Expr> },

    /// CASE WHEN... THEN... ELSE... END
    Case {
        when_clauses: Vec<(Expr, Expr)>,
        else_clause: Option<Box<Expr>>,
    },
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    /// Equality where NULL matches NULL.
    NullSafeEq,
}

impl Expr {
    /// Convert to tokens for the default dialect.
    pub fn to_tokens(&self) -> TokenStream {
        self.to_tokens_for_dialect(Dialect::default())
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column(ident) => {
                ts.push(Token::Ident(ident.clone()));
            }

            Expr::Param(index) => {
                ts.push(Token::Placeholder(*index));
            }

            Expr::Null => {
                ts.push(Token::Null);
            }

            Expr::Compare {
                left,
                op: CompareOp::NullSafeEq,
                right,
            } if !dialect.supports_null_safe_eq() => {
                // (l = r OR (l IS NULL AND r IS NULL))
                let l = left.to_tokens_for_dialect(dialect);
                let r = right.to_tokens_for_dialect(dialect);
                ts.lparen().append(&l);
                ts.space().push(Token::Eq).space().append(&r);
                ts.space().push(Token::Or).space().lparen().append(&l);
                ts.space().push(Token::Is).space().push(Token::Null);
                ts.space().push(Token::And).space().append(&r);
                ts.space().push(Token::Is).space().push(Token::Null);
                ts.rparen().rparen();
            }

            Expr::Compare { left, op, right } => {
                ts.append(&left.to_tokens_for_dialect(dialect));
                ts.space();
                ts.push(match op {
                    CompareOp::Eq => Token::Eq,
                    CompareOp::NullSafeEq => Token::NullSafeEq,
                });
                ts.space();
                ts.append(&right.to_tokens_for_dialect(dialect));
            }

            Expr::Function { name, args } => {
                ts.push(Token::FunctionName(name.clone()));
                ts.lparen();
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&arg.to_tokens_for_dialect(dialect));
                }
                ts.rparen();
            }

            Expr::Case {
                when_clauses,
                else_clause,
            } => {
                ts.push(Token::Case);
                for (when, then) in when_clauses {
                    ts.space().push(Token::When).space();
                    ts.append(&when.to_tokens_for_dialect(dialect));
                    ts.space().push(Token::Then).space();
                    ts.append(&then.to_tokens_for_dialect(dialect));
                }
                if let Some(else_expr) = else_clause {
                    ts.space().push(Token::Else).space();
                    ts.append(&else_expr.to_tokens_for_dialect(dialect));
                }
                ts.space().push(Token::End);
            }
        }

        ts
    }

    /// Serialize to SQL text.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }
}

/// Extension methods for building comparisons fluently.
pub trait ExprExt: Sized {
    fn eq(self, other: Expr) -> Expr;
    fn null_safe_eq(self, other: Expr) -> Expr;
}

impl ExprExt for Expr {
    fn eq(self, other: Expr) -> Expr {
        Expr::Compare {
            left: Box::new(self),
            op: CompareOp::Eq,
            right: Box::new(other),
        }
    }

    fn null_safe_eq(self, other: Expr) -> Expr {
        Expr::Compare {
            left: Box::new(self),
            op: CompareOp::NullSafeEq,
            right: Box::new(other),
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// Column reference.
pub fn col(ident: &Identifier) -> Expr {
    Expr::Column(ident.clone())
}

/// Bind parameter with 1-based `index`.
pub fn param(index: usize) -> Expr {
    Expr::Param(index)
}

/// Function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

/// Start a searched CASE expression.
pub fn case_when(condition: Expr, result: Expr) -> CaseBuilder {
    CaseBuilder {
        when_clauses: vec![(condition, result)],
    }
}

/// Builder for searched CASE expressions.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until finished with otherwise() or end()"]
pub struct CaseBuilder {
    when_clauses: Vec<(Expr, Expr)>,
}

impl CaseBuilder {
    pub fn when(mut self, condition: Expr, result: Expr) -> Self {
        self.when_clauses.push((condition, result));
        self
    }

    /// Finish with an ELSE branch.
    pub fn otherwise(self, result: Expr) -> Expr {
        Expr::Case {
            when_clauses: self.when_clauses,
            else_clause: Some(Box::new(result)),
        }
    }

    /// Finish without an ELSE branch.
    pub fn end(self) -> Expr {
        Expr::Case {
            when_clauses: self.when_clauses,
            else_clause: None,
        }
    }
}
