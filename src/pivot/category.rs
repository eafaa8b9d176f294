//! Category discovery and filtering.

use std::collections::HashSet;
use std::fmt;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::error::{ConfigurationError, PivotError, PivotResult, Stage};
use crate::session::Session;
use crate::sql::{col, Dialect, Identifier, Select, SqlValue};

/// One distinct value of the category column.
///
/// The label is the value's textual form and is what filters and column
/// names see. NULL is labelled `"Null"`; the value itself stays NULL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    value: SqlValue,
    label: String,
}

impl CategoryValue {
    pub fn new(value: SqlValue) -> Self {
        let label = value.label();
        Self { value, label }
    }

    pub fn value(&self) -> &SqlValue {
        &self.value
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// True when the label is the empty string. Blank categories never
    /// produce a column.
    pub fn is_blank(&self) -> bool {
        self.label.is_empty()
    }

    pub fn into_value(self) -> SqlValue {
        self.value
    }
}

impl From<SqlValue> for CategoryValue {
    fn from(value: SqlValue) -> Self {
        Self::new(value)
    }
}

impl From<&str> for CategoryValue {
    fn from(s: &str) -> Self {
        Self::new(SqlValue::from(s))
    }
}

impl PartialEq<str> for CategoryValue {
    fn eq(&self, other: &str) -> bool {
        self.label == other
    }
}

impl PartialEq<&str> for CategoryValue {
    fn eq(&self, other: &&str) -> bool {
        self.label == *other
    }
}

impl fmt::Display for CategoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Decides which discovered categories become columns.
pub trait CategoryFilter {
    fn keep(&self, category: &CategoryValue) -> bool;
}

impl<F> CategoryFilter for F
where
    F: Fn(&CategoryValue) -> bool,
{
    fn keep(&self, category: &CategoryValue) -> bool {
        self(category)
    }
}

/// Declarative filter over category labels.
///
/// A category is kept when it is in `include` (if any were given), is not
/// in `exclude`, and matches `pattern` (if set).
#[derive(Debug, Clone, Default)]
pub struct LabelFilter {
    include: Option<HashSet<String>>,
    exclude: HashSet<String>,
    pattern: Option<Regex>,
}

impl LabelFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only these labels.
    pub fn include<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include
            .get_or_insert_with(HashSet::new)
            .extend(labels.into_iter().map(Into::into));
        self
    }

    /// Drop these labels.
    pub fn exclude<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Keep only labels matching `pattern` (unanchored).
    pub fn pattern(mut self, pattern: &str) -> Result<Self, ConfigurationError> {
        let regex = Regex::new(pattern)
            .map_err(|e| ConfigurationError::InvalidFilter(e.to_string()))?;
        self.pattern = Some(regex);
        Ok(self)
    }

    /// True when the filter keeps everything.
    pub fn is_empty(&self) -> bool {
        self.include.is_none() && self.exclude.is_empty() && self.pattern.is_none()
    }
}

impl CategoryFilter for LabelFilter {
    fn keep(&self, category: &CategoryValue) -> bool {
        let label = category.label();
        if let Some(include) = &self.include {
            if !include.contains(label) {
                return false;
            }
        }
        if self.exclude.contains(label) {
            return false;
        }
        self.pattern.as_ref().map_or(true, |re| re.is_match(label))
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// `SELECT DISTINCT <column_by> FROM <table>`.
pub fn discovery_query(table: &Identifier, column_by: &Identifier) -> Select {
    Select::new(table.clone()).distinct().column(col(column_by))
}

/// Fetch the distinct values of `column_by`, in the order the database
/// returns them.
pub fn discover_categories<S>(
    session: &mut S,
    table: &Identifier,
    column_by: &Identifier,
    dialect: Dialect,
) -> PivotResult<Vec<CategoryValue>>
where
    S: Session + ?Sized,
{
    let sql = discovery_query(table, column_by).to_sql(dialect);
    debug!(sql = %sql, "discovering categories");

    let rows = session
        .fetch_all(&sql, &[])
        .map_err(|e| PivotError::database(Stage::Discover, e))?;

    let categories = rows
        .into_iter()
        .map(|row| {
            let value = row.into_iter().next().unwrap_or(SqlValue::Null);
            CategoryValue::new(value)
        })
        .collect::<Vec<_>>();

    debug!(count = categories.len(), "discovered categories");
    Ok(categories)
}

/// Keep the categories `filter` accepts, preserving order. Without a
/// filter every category is kept.
pub fn apply_filter(
    categories: Vec<CategoryValue>,
    filter: Option<&dyn CategoryFilter>,
) -> Vec<CategoryValue> {
    match filter {
        Some(filter) => categories.into_iter().filter(|c| filter.keep(c)).collect(),
        None => categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(labels: &[&str]) -> Vec<CategoryValue> {
        labels.iter().map(|l| CategoryValue::from(*l)).collect()
    }

    fn labels(categories: &[CategoryValue]) -> Vec<&str> {
        categories.iter().map(CategoryValue::label).collect()
    }

    #[test]
    fn test_null_category_label() {
        let c = CategoryValue::new(SqlValue::Null);
        assert_eq!(c.label(), "Null");
        assert!(c.is_null());
        assert!(!c.is_blank());
    }

    #[test]
    fn test_blank_only_for_empty_label() {
        assert!(CategoryValue::from("").is_blank());
        assert!(!CategoryValue::new(SqlValue::Integer(0)).is_blank());
        assert!(!CategoryValue::from(" ").is_blank());
    }

    #[test]
    fn test_discovery_query() {
        let table = Identifier::parse_path("sandbox.example_table").unwrap();
        let column = Identifier::parse_name("subject").unwrap();
        assert_eq!(
            discovery_query(&table, &column).to_sql(Dialect::Postgres),
            "SELECT DISTINCT subject FROM sandbox.example_table"
        );
    }

    #[test]
    fn test_apply_closure_filter() {
        let predicate = |c: &CategoryValue| c != "Physics";
        let kept = apply_filter(categories(&["Math", "Physics", "Art"]), Some(&predicate));
        assert_eq!(labels(&kept), vec!["Math", "Art"]);
    }

    #[test]
    fn test_apply_no_filter_keeps_all() {
        let kept = apply_filter(categories(&["Math", "Physics"]), None);
        assert_eq!(labels(&kept), vec!["Math", "Physics"]);
    }

    #[test]
    fn test_label_filter() {
        let filter = LabelFilter::new()
            .include(["Math", "Physics", "Art"])
            .exclude(["Art"]);
        let kept = apply_filter(categories(&["Math", "Physics", "Art", "Music"]), Some(&filter));
        assert_eq!(labels(&kept), vec!["Math", "Physics"]);

        let filter = LabelFilter::new().pattern("^M").unwrap();
        let kept = apply_filter(categories(&["Math", "Physics", "Music"]), Some(&filter));
        assert_eq!(labels(&kept), vec!["Math", "Music"]);
    }

    #[test]
    fn test_label_filter_sees_null_label() {
        let filter = LabelFilter::new().exclude(["Null"]);
        let input = vec![CategoryValue::new(SqlValue::Null), CategoryValue::from("Math")];
        let kept = apply_filter(input, Some(&filter));
        assert_eq!(labels(&kept), vec!["Math"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = LabelFilter::new().pattern("(").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidFilter(_)));
    }

    #[test]
    fn test_empty_filter() {
        assert!(LabelFilter::new().is_empty());
        assert!(!LabelFilter::new().exclude(["x"]).is_empty());
    }
}
