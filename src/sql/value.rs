//! Scalar values exchanged with a database session.
//!
//! A [`SqlValue`] is both a cell read back from a query and a bind parameter
//! sent with a statement. It never gets interpolated into SQL text except when
//! a plan is rendered for humans (see [`SqlValue::to_sql_literal`]).

use serde::{Deserialize, Serialize};

use super::dialect::Dialect;
use super::token::Token;

/// Label used for NULL wherever a value has to become part of a name.
pub const NULL_LABEL: &str = "Null";

/// A single SQL scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Textual form used to name things after this value.
    ///
    /// NULL becomes [`NULL_LABEL`]; numbers use their shortest decimal form.
    pub fn label(&self) -> String {
        match self {
            SqlValue::Null => NULL_LABEL.to_string(),
            SqlValue::Bool(b) => b.to_string(),
            SqlValue::Integer(n) => n.to_string(),
            SqlValue::Real(f) => {
                if f.is_finite() {
                    let mut buffer = ryu::Buffer::new();
                    buffer.format(*f).to_string()
                } else {
                    f.to_string()
                }
            }
            SqlValue::Text(s) => s.clone(),
            SqlValue::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    /// Literal token for this value.
    pub fn to_token(&self) -> Token {
        match self {
            SqlValue::Null => Token::LitNull,
            SqlValue::Bool(b) => Token::LitBool(*b),
            SqlValue::Integer(n) => Token::LitInt(*n),
            SqlValue::Real(f) => Token::LitFloat(*f),
            SqlValue::Text(s) => Token::LitString(s.clone()),
            SqlValue::Blob(bytes) => Token::LitBlob(bytes.clone()),
        }
    }

    /// Render as an inline SQL literal, for display only.
    pub fn to_sql_literal(&self, dialect: Dialect) -> String {
        self.to_token().serialize(dialect)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        SqlValue::Integer(n)
    }
}

impl From<i32> for SqlValue {
    fn from(n: i32) -> Self {
        SqlValue::Integer(n.into())
    }
}

impl From<f64> for SqlValue {
    fn from(f: f64) -> Self {
        SqlValue::Real(f)
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        SqlValue::Bool(b)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(bytes: Vec<u8>) -> Self {
        SqlValue::Blob(bytes)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}
