//! SQL identifiers.
//!
//! Table, column and schema names cannot travel as bind parameters, so every
//! name that reaches SQL text goes through [`Identifier`]. Caller-supplied
//! names are checked against a letters/digits/underscore whitelist; names
//! derived from data are sanitized into that alphabet instead of escaped.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

static PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap()
});

static NON_WORD_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

/// Separator between a value column and a category label in derived names.
pub const DERIVED_SEPARATOR: &str = "__";

/// A name rejected by the identifier whitelist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid SQL identifier: {0:?}")]
pub struct InvalidIdentifier(pub String);

/// An identifier or dotted identifier path that is safe to interpolate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Parse a single unqualified name (`uid`, `score`).
    pub fn parse_name(s: &str) -> Result<Self, InvalidIdentifier> {
        if NAME_PATTERN.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidIdentifier(s.to_string()))
        }
    }

    /// Parse a possibly qualified name (`table`, `schema.table`, `db.schema.table`).
    pub fn parse_path(s: &str) -> Result<Self, InvalidIdentifier> {
        if PATH_PATTERN.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidIdentifier(s.to_string()))
        }
    }

    /// Derive an output column name from a value column and a category label.
    ///
    /// The result is `<base>__<sanitized label>`; see [`sanitize_label`].
    pub fn derived(base: &Identifier, label: &str) -> Self {
        Self(format!(
            "{}{}{}",
            base.0,
            DERIVED_SEPARATOR,
            sanitize_label(label)
        ))
    }

    /// Qualify `name` with a schema prefix: `<schema>.<name>`.
    pub fn qualified(schema: &Identifier, name: &Identifier) -> Self {
        Self(format!("{}.{}", schema.0, name.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Case-folded form, used to detect names the database would treat as equal.
    /// Unquoted identifiers fold ASCII letters only.
    pub fn folded(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Reduce an arbitrary label to letters, digits and underscores.
///
/// Every run of non-word characters collapses to a single `_`, then any
/// remaining space is replaced by `_`. The passes run in that order.
pub fn sanitize_label(label: &str) -> String {
    let replaced = NON_WORD_RUN.replace_all(label, "_");
    replaced.replace(' ', "_")
}
