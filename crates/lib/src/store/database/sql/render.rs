//! SQL text for scope queries.
//!
//! Identifiers come from a validated `TableSpec` and are written unquoted.
//! Every value goes through a bound parameter; the only inlined number is the
//! shift of an `UPDATE`, which is an `i64` produced by the index itself.
//!
//! Parameters are numbered in the order they appear in the text, so the same
//! statement works with positional (`?`) and numbered (`$n`) placeholders.

use super::DbKind;
use crate::store::{GroupFilter, ScopeQuery, SortBound, TableSpec};
use crate::value::Value;

/// A rendered statement and its parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Statement {
    pub(crate) sql: String,
    pub(crate) binds: Vec<Value>,
}

struct Renderer<'a> {
    kind: DbKind,
    table: &'a TableSpec,
    binds: Vec<Value>,
}

impl<'a> Renderer<'a> {
    fn new(kind: DbKind, table: &'a TableSpec) -> Self {
        Self {
            kind,
            table,
            binds: Vec::new(),
        }
    }

    fn bind(&mut self, value: &Value) -> String {
        self.binds.push(value.clone());
        self.kind.placeholder(self.binds.len())
    }

    fn group_condition(&mut self, group: &GroupFilter) -> Option<String> {
        let table = self.table;
        let column = table.group_column.as_deref()?;
        match group {
            GroupFilter::All => None,
            GroupFilter::Value(value) => Some(format!("{column} = {}", self.bind(value))),
            GroupFilter::OfRow(pk) => Some(format!(
                "{column} = (SELECT {column} FROM {} WHERE {} = {})",
                table.table,
                table.pk_column,
                self.bind(pk)
            )),
        }
    }

    fn visibility_conditions(&mut self) -> Vec<String> {
        let table = self.table;
        let mut conditions = Vec::new();
        for exclusion in table.exclusions.iter().filter(|e| !e.values.is_empty()) {
            let placeholders: Vec<String> = exclusion.values.iter().map(|v| self.bind(v)).collect();
            conditions.push(format!(
                "({column} IS NULL OR {column} NOT IN ({list}))",
                column = exclusion.column,
                list = placeholders.join(", ")
            ));
        }
        conditions
    }

    /// Sub-select for the sort key of the row `pk`, under the same group and
    /// visibility as the outer query.
    fn sort_of_row(&mut self, pk: &Value, query: &ScopeQuery) -> String {
        let table = self.table;
        let mut conditions = vec![format!("{} = {}", table.pk_column, self.bind(pk))];
        conditions.extend(self.group_condition(&query.group));
        if query.visible_only {
            conditions.extend(self.visibility_conditions());
        }
        format!(
            "(SELECT {} FROM {} WHERE {})",
            table.sort_column,
            table.table,
            conditions.join(" AND ")
        )
    }

    fn where_clause(&mut self, query: &ScopeQuery) -> String {
        let table = self.table;
        let mut conditions = Vec::new();
        conditions.extend(self.group_condition(&query.group));
        if let Some(pk) = &query.pk {
            conditions.push(format!("{} = {}", table.pk_column, self.bind(pk)));
        }
        if query.visible_only {
            conditions.extend(self.visibility_conditions());
        }
        if let Some(filter) = &query.sort {
            let rhs = match &filter.bound {
                SortBound::Literal(value) => self.bind(&Value::Int(*value)),
                SortBound::OfRow(pk) => self.sort_of_row(pk, query),
            };
            conditions.push(format!("{} {} {rhs}", table.sort_column, filter.op.as_sql()));
        }

        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }

    fn finish(self, sql: String) -> Statement {
        Statement {
            sql,
            binds: self.binds,
        }
    }
}

fn select(kind: DbKind, table: &TableSpec, query: &ScopeQuery, columns: &str) -> Statement {
    let mut renderer = Renderer::new(kind, table);
    let mut sql = format!("SELECT {columns} FROM {}", table.table);
    sql.push_str(&renderer.where_clause(query));
    if let Some(order) = query.order {
        sql.push_str(&format!(" ORDER BY {} {}", table.sort_column, order.as_sql()));
    }
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    renderer.finish(sql)
}

/// `SELECT pk, sort` for the rows matching `query`.
pub(crate) fn select_rows(kind: DbKind, table: &TableSpec, query: &ScopeQuery) -> Statement {
    let columns = format!("{}, {}", table.pk_column, table.sort_column);
    select(kind, table, query, &columns)
}

/// `SELECT column` for the rows matching `query`.
pub(crate) fn select_column(
    kind: DbKind,
    table: &TableSpec,
    query: &ScopeQuery,
    column: &str,
) -> Statement {
    select(kind, table, query, column)
}

/// `UPDATE ... SET sort = sort + shift` for the rows matching `query`.
///
/// Order and limit are not rendered.
pub(crate) fn update_shift(
    kind: DbKind,
    table: &TableSpec,
    shift: i64,
    query: &ScopeQuery,
) -> Statement {
    let mut renderer = Renderer::new(kind, table);
    let mut sql = format!(
        "UPDATE {table} SET {sort} = {sort} + {shift}",
        table = table.table,
        sort = table.sort_column
    );
    sql.push_str(&renderer.where_clause(query));
    renderer.finish(sql)
}
