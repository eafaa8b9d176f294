//! Assembly of the DROP and CREATE statements.

use std::collections::HashMap;

use serde::Serialize;

use super::category::CategoryValue;
use super::error::{PivotError, PivotResult};
use super::naming::derived_column_name;
use super::request::ResolvedNames;
use crate::sql::{
    case_when, col, func, param, CreateTable, Dialect, DropTable, Expr, ExprExt, Identifier,
    Select, SelectExpr, SqlValue,
};

/// One output column of the pivot table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedColumn {
    pub name: Identifier,
    pub value_column: Identifier,
    pub category: CategoryValue,
}

/// A fully rendered pivot, ready to run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotQuery {
    pub target: Identifier,
    pub dialect: Dialect,
    pub columns: Vec<GeneratedColumn>,
    pub drop_sql: String,
    pub create_sql: String,
    /// Bound in placeholder order.
    pub params: Vec<SqlValue>,
}

impl PivotQuery {
    pub fn target_name(&self) -> &str {
        self.target.as_str()
    }

    /// True when no category survived and the table only holds the row key.
    pub fn is_row_key_only(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Build the pivot statements for `categories`.
///
/// Columns are generated value-major: for each value column in order, one
/// column per category in discovery order. Blank categories are skipped.
/// NULL categories compare with the dialect's NULL-safe equality so they
/// still match their rows.
pub fn build_pivot_query(
    names: &ResolvedNames,
    categories: &[CategoryValue],
    dialect: Dialect,
) -> PivotResult<PivotQuery> {
    let mut select = Select::new(names.table.clone())
        .multiline()
        .column(col(&names.row_by));
    let mut columns = Vec::new();
    let mut params = Vec::new();
    // Folded output name -> label that claimed it.
    let mut seen: HashMap<String, String> = HashMap::new();
    seen.insert(names.row_by.folded(), names.row_by.to_string());

    for value in &names.values {
        for category in categories.iter().filter(|c| !c.is_blank()) {
            let name = derived_column_name(value, category.label());

            if let Some(first) = seen.get(&name.folded()) {
                return Err(PivotError::ColumnCollision {
                    name: name.into_string(),
                    first: first.clone(),
                    second: category.label().to_string(),
                });
            }
            seen.insert(name.folded(), category.label().to_string());

            params.push(category.value().clone());
            let placeholder = param(params.len());
            let condition = if category.is_null() {
                col(&names.column_by).null_safe_eq(placeholder)
            } else {
                col(&names.column_by).eq(placeholder)
            };
            let aggregate = func(
                &names.aggregate,
                vec![case_when(condition, col(value)).otherwise(Expr::Null)],
            );
            select = select.column(SelectExpr::new(aggregate).with_alias(name.clone()));

            columns.push(GeneratedColumn {
                name,
                value_column: value.clone(),
                category: category.clone(),
            });
        }
    }

    let select = select.group_by(col(&names.row_by));
    let drop_sql = DropTable::new(names.target.clone())
        .if_exists()
        .cascade()
        .to_sql(dialect);
    let create_sql = CreateTable::new(names.target.clone())
        .with_temporary(names.temporary)
        .as_select(select)
        .to_sql(dialect);

    Ok(PivotQuery {
        target: names.target.clone(),
        dialect,
        columns,
        drop_sql,
        create_sql,
        params,
    })
}
