//! Statement execution for the SQL store.

use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, Row};

use super::render::{self, Statement};
use super::{SqlxResultExt, SqlxStore};
use crate::Result;
use crate::store::errors::StoreError;
use crate::store::{Column, GroupFilter, ScopeQuery, SortBound, SortFilter, SortedRow, TableSpec};
use crate::value::Value;

fn bind_all(statement: &Statement) -> Query<'_, Any, AnyArguments<'_>> {
    let mut query = sqlx::query(&statement.sql);
    for value in &statement.binds {
        query = match value {
            Value::Int(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.clone()),
            Value::Bool(v) => query.bind(*v),
        };
    }
    query
}

/// Decodes a column of unknown type into a [`Value`].
///
/// Integers are tried first, then text, then booleans. SQLite has no boolean
/// storage class, so booleans read back from it come out as integers.
fn decode_value(row: &AnyRow, idx: usize) -> Result<Option<Value>> {
    if let Ok(value) = row.try_get::<Option<i64>, _>(idx) {
        return Ok(value.map(Value::Int));
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(idx) {
        return Ok(value.map(Value::Text));
    }
    row.try_get::<Option<bool>, _>(idx)
        .map(|value| value.map(Value::Bool))
        .sql_context("Failed to decode column value")
}

fn decode_row(table: &TableSpec, row: &AnyRow) -> Result<SortedRow> {
    let pk = decode_value(row, 0)?.ok_or_else(|| StoreError::ColumnMissing {
        table: table.table.clone(),
        column: table.pk_column.clone(),
        pk: "<null>".to_string(),
    })?;
    let sort = row
        .try_get::<Option<i64>, _>(1)
        .sql_context("Failed to decode sort column")?
        .ok_or_else(|| StoreError::ColumnMissing {
            table: table.table.clone(),
            column: table.sort_column.clone(),
            pk: pk.to_string(),
        })?;
    Ok(SortedRow { pk, sort })
}

pub(crate) async fn find_many(
    store: &SqlxStore,
    table: &TableSpec,
    query: &ScopeQuery,
) -> Result<Vec<SortedRow>> {
    let statement = render::select_rows(store.kind(), table, query);
    tracing::trace!(sql = %statement.sql, binds = ?statement.binds, "find_many");

    let rows = bind_all(&statement)
        .fetch_all(store.pool())
        .await
        .sql_context("Failed to fetch rows")?;
    rows.iter().map(|row| decode_row(table, row)).collect()
}

pub(crate) async fn scalar(
    store: &SqlxStore,
    table: &TableSpec,
    query: &ScopeQuery,
    column: Column,
) -> Result<Option<Value>> {
    let name = match column {
        Column::Pk => table.pk_column.as_str(),
        Column::Sort => table.sort_column.as_str(),
        Column::Group => match &table.group_column {
            Some(group) => group.as_str(),
            None => return Ok(None),
        },
    };
    let query = query.clone().with_limit(1);
    let statement = render::select_column(store.kind(), table, &query, name);
    tracing::trace!(sql = %statement.sql, binds = ?statement.binds, "scalar");

    let row = bind_all(&statement)
        .fetch_optional(store.pool())
        .await
        .sql_context("Failed to fetch column value")?;
    match row {
        Some(row) => decode_value(&row, 0),
        None => Ok(None),
    }
}

pub(crate) async fn update_where(
    store: &SqlxStore,
    table: &TableSpec,
    shift: i64,
    query: &ScopeQuery,
) -> Result<u64> {
    let resolved;
    let query = if store.kind().supports_self_subquery_in_update() {
        query
    } else {
        match resolve_references(store, table, query).await? {
            Some(query) => {
                resolved = query;
                &resolved
            }
            None => {
                tracing::trace!(table = %table.table, "update_where: unresolved row reference");
                return Ok(0);
            }
        }
    };

    let statement = render::update_shift(store.kind(), table, shift, query);
    tracing::trace!(sql = %statement.sql, binds = ?statement.binds, "update_where");

    let result = bind_all(&statement)
        .execute(store.pool())
        .await
        .sql_context("Failed to shift sort keys")?;
    Ok(result.rows_affected())
}

/// Replaces row references in `query` with the values they point at.
///
/// Returns `None` when a referenced row does not exist, in which case the
/// query matches nothing.
async fn resolve_references(
    store: &SqlxStore,
    table: &TableSpec,
    query: &ScopeQuery,
) -> Result<Option<ScopeQuery>> {
    let mut resolved = query.clone();

    if table.is_grouped()
        && let GroupFilter::OfRow(pk) = &query.group
    {
        let lookup = ScopeQuery::scope(GroupFilter::All).with_pk(pk.clone());
        match scalar(store, table, &lookup, Column::Group).await? {
            Some(group) => resolved.group = GroupFilter::Value(group),
            None => return Ok(None),
        }
    }

    if let Some(filter) = &query.sort
        && let SortBound::OfRow(pk) = &filter.bound
    {
        let mut lookup = ScopeQuery::scope(resolved.group.clone()).with_pk(pk.clone());
        lookup.visible_only = query.visible_only;
        match scalar(store, table, &lookup, Column::Sort).await? {
            Some(Value::Int(sort)) => {
                resolved.sort = Some(SortFilter {
                    op: filter.op,
                    bound: SortBound::Literal(sort),
                });
            }
            Some(other) => {
                return Err(StoreError::InvalidColumnType {
                    table: table.table.clone(),
                    column: table.sort_column.clone(),
                    expected: "int",
                    found: other.kind(),
                }
                .into());
            }
            None => return Ok(None),
        }
    }

    Ok(Some(resolved))
}
