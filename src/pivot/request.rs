//! Pivot request and option types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::category::{CategoryFilter, CategoryValue};
use super::error::ConfigurationError;
use super::naming;
use crate::sql::{Dialect, Identifier};

/// Aggregate applied when the caller does not name one.
pub const DEFAULT_AGGREGATE: &str = "SUM";

// ============================================================================
// Value names
// ============================================================================

/// Ordered value column names.
///
/// A single name converts into a one-element list, so `"score"` and
/// `["score"]` describe the same request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct ValueNames(Vec<String>);

impl ValueNames {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }
}

impl From<&str> for ValueNames {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for ValueNames {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<Vec<String>> for ValueNames {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for ValueNames {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ValueNames {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ValueNames {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|s| s.to_string()).collect())
    }
}

/// Accepts `values = "score"` as well as `values = ["score", "final"]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for ValueNames {
    fn from(v: OneOrMany) -> Self {
        match v {
            OneOrMany::One(name) => Self(vec![name]),
            OneOrMany::Many(names) => Self(names),
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// Defaults applied to every request built from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotOptions {
    /// Aggregate function wrapped around each CASE expression.
    pub aggregate: String,

    /// Create a session-scoped table instead of a permanent one.
    pub temporary: bool,

    /// Schema for permanent tables.
    pub prefix: Option<String>,

    /// Dialect statements are rendered for.
    pub dialect: Dialect,
}

impl Default for PivotOptions {
    fn default() -> Self {
        Self {
            aggregate: DEFAULT_AGGREGATE.to_string(),
            temporary: true,
            prefix: None,
            dialect: Dialect::default(),
        }
    }
}

impl PivotOptions {
    /// Set the SQL dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the aggregate function.
    pub fn with_aggregate(mut self, aggregate: impl Into<String>) -> Self {
        self.aggregate = aggregate.into();
        self
    }

    /// Target a permanent table in `prefix`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temporary = false;
        self.prefix = Some(prefix.into());
        self
    }
}

// ============================================================================
// Request
// ============================================================================

/// Everything needed to generate one pivot table.
///
/// ```ignore
/// let request = PivotRequest::new("sandbox.example_table", "uid", "subject")
///     .values(["midterm", "final"])
///     .permanent("sandbox")
///     .filter(|c| c != "Other");
/// ```
#[must_use = "requests do nothing until passed to generate_pivot()"]
pub struct PivotRequest {
    pub table: String,
    pub row_by: String,
    pub column_by: String,
    pub values: ValueNames,
    pub aggregate: String,
    pub temporary: bool,
    pub prefix: Option<String>,
    pub dialect: Dialect,
    filter: Option<Box<dyn CategoryFilter>>,
}

impl PivotRequest {
    /// Create a request with default options.
    pub fn new(
        table: impl Into<String>,
        row_by: impl Into<String>,
        column_by: impl Into<String>,
    ) -> Self {
        Self::with_options(table, row_by, column_by, &PivotOptions::default())
    }

    /// Create a request seeded from `options`.
    pub fn with_options(
        table: impl Into<String>,
        row_by: impl Into<String>,
        column_by: impl Into<String>,
        options: &PivotOptions,
    ) -> Self {
        Self {
            table: table.into(),
            row_by: row_by.into(),
            column_by: column_by.into(),
            values: ValueNames::default(),
            aggregate: options.aggregate.clone(),
            temporary: options.temporary,
            prefix: options.prefix.clone(),
            dialect: options.dialect,
            filter: None,
        }
    }

    /// Add one value column.
    pub fn value(mut self, name: impl Into<String>) -> Self {
        self.values.push(name);
        self
    }

    /// Replace the value columns.
    pub fn values(mut self, names: impl Into<ValueNames>) -> Self {
        self.values = names.into();
        self
    }

    /// Set the aggregate function.
    pub fn aggregate(mut self, name: impl Into<String>) -> Self {
        self.aggregate = name.into();
        self
    }

    /// Target a session-scoped table.
    pub fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    /// Target a permanent table in schema `prefix`.
    pub fn permanent(mut self, prefix: impl Into<String>) -> Self {
        self.temporary = false;
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the target mode and prefix directly.
    pub fn target(mut self, temporary: bool, prefix: Option<String>) -> Self {
        self.temporary = temporary;
        self.prefix = prefix;
        self
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Keep only categories for which `predicate` returns true.
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&CategoryValue) -> bool + 'static,
    {
        self.filter_with(predicate)
    }

    /// Install any [`CategoryFilter`].
    pub fn filter_with(mut self, filter: impl CategoryFilter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Install an already boxed filter, or clear it with `None`.
    pub fn filter_boxed(mut self, filter: Option<Box<dyn CategoryFilter>>) -> Self {
        self.filter = filter;
        self
    }

    pub fn category_filter(&self) -> Option<&dyn CategoryFilter> {
        self.filter.as_deref()
    }

    /// Check every name and derive the target table.
    ///
    /// Nothing here touches the database.
    pub fn resolve(&self) -> Result<ResolvedNames, ConfigurationError> {
        if self.values.is_empty() {
            return Err(ConfigurationError::EmptyValueNames);
        }

        let target = naming::target_table_name(
            &self.table,
            &self.row_by,
            &self.column_by,
            self.temporary,
            self.prefix.as_deref(),
        )?;

        let table = Identifier::parse_path(&self.table)
            .map_err(|e| ConfigurationError::identifier("table", e))?;
        let row_by = Identifier::parse_name(&self.row_by)
            .map_err(|e| ConfigurationError::identifier("row key", e))?;
        let column_by = Identifier::parse_name(&self.column_by)
            .map_err(|e| ConfigurationError::identifier("category column", e))?;
        let values = self
            .values
            .iter()
            .map(|v| {
                Identifier::parse_name(v)
                    .map_err(|e| ConfigurationError::identifier("value column", e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(prefix) = self.prefix.as_deref().filter(|_| !self.temporary) {
            Identifier::parse_path(prefix)
                .map_err(|e| ConfigurationError::identifier("prefix", e))?;
        }
        Identifier::parse_name(&self.aggregate)
            .map_err(|_| ConfigurationError::InvalidAggregate(self.aggregate.clone()))?;
        let target = Identifier::parse_path(&target)
            .map_err(|e| ConfigurationError::identifier("target table", e))?;

        Ok(ResolvedNames {
            table,
            row_by,
            column_by,
            values,
            aggregate: self.aggregate.clone(),
            temporary: self.temporary,
            target,
        })
    }
}

impl fmt::Debug for PivotRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PivotRequest")
            .field("table", &self.table)
            .field("row_by", &self.row_by)
            .field("column_by", &self.column_by)
            .field("values", &self.values)
            .field("aggregate", &self.aggregate)
            .field("temporary", &self.temporary)
            .field("prefix", &self.prefix)
            .field("dialect", &self.dialect)
            .field("filter", &self.filter.as_ref().map(|_| "<filter>"))
            .finish()
    }
}

/// Validated names of a request, ready to be interpolated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNames {
    pub table: Identifier,
    pub row_by: Identifier,
    pub column_by: Identifier,
    pub values: Vec<Identifier>,
    pub aggregate: String,
    pub temporary: bool,
    pub target: Identifier,
}
