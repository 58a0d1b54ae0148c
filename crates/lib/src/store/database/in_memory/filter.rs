//! Scope query evaluation over in-memory records.
//!
//! Mirrors the SQL semantics the SQL store relies on: a NULL group never
//! matches, an unresolvable correlated reference matches nothing, and NULL
//! marker columns do not hide a row.

use super::Record;
use crate::Result;
use crate::store::errors::StoreError;
use crate::store::{GroupFilter, ScopeQuery, SortBound, SortOrder, TableSpec};
use crate::value::Value;

/// Primary key of a record rendered for error messages.
pub(crate) fn pk_label(table: &TableSpec, record: &Record) -> String {
    record
        .get(&table.pk_column)
        .map(Value::to_string)
        .unwrap_or_else(|| "<null>".to_string())
}

/// Reads the sort key of a record.
pub(crate) fn sort_of(table: &TableSpec, record: &Record) -> Result<i64> {
    match record.get(&table.sort_column) {
        Some(Value::Int(sort)) => Ok(*sort),
        Some(other) => Err(StoreError::InvalidColumnType {
            table: table.table.clone(),
            column: table.sort_column.clone(),
            expected: "int",
            found: other.kind(),
        }
        .into()),
        None => Err(StoreError::ColumnMissing {
            table: table.table.clone(),
            column: table.sort_column.clone(),
            pk: pk_label(table, record),
        }
        .into()),
    }
}

pub(crate) fn is_visible(table: &TableSpec, record: &Record) -> bool {
    table.exclusions.iter().all(|exclusion| {
        match record.get(&exclusion.column) {
            Some(value) => !exclusion.values.contains(value),
            None => true,
        }
    })
}

fn group_of<'a>(table: &TableSpec, record: &'a Record) -> Option<&'a Value> {
    table
        .group_column
        .as_ref()
        .and_then(|column| record.get(column))
}

fn find_by_pk<'a>(table: &TableSpec, records: &'a [Record], pk: &Value) -> Option<&'a Record> {
    records
        .iter()
        .find(|record| record.get(&table.pk_column) == Some(pk))
}

/// Group restriction after resolving correlated references.
enum ResolvedGroup {
    Any,
    Equals(Value),
    Nothing,
}

fn resolve_group(table: &TableSpec, records: &[Record], filter: &GroupFilter) -> ResolvedGroup {
    if !table.is_grouped() {
        return ResolvedGroup::Any;
    }
    match filter {
        GroupFilter::All => ResolvedGroup::Any,
        GroupFilter::Value(group) => ResolvedGroup::Equals(group.clone()),
        GroupFilter::OfRow(pk) => match find_by_pk(table, records, pk).and_then(|r| group_of(table, r)) {
            Some(group) => ResolvedGroup::Equals(group.clone()),
            None => ResolvedGroup::Nothing,
        },
    }
}

fn in_group(table: &TableSpec, record: &Record, group: &ResolvedGroup) -> bool {
    match group {
        ResolvedGroup::Any => true,
        ResolvedGroup::Equals(expected) => group_of(table, record) == Some(expected),
        ResolvedGroup::Nothing => false,
    }
}

/// Indices of the records matching `query`, ordered and limited as requested.
pub(crate) fn matching_indices(
    table: &TableSpec,
    records: &[Record],
    query: &ScopeQuery,
) -> Result<Vec<usize>> {
    let group = resolve_group(table, records, &query.group);
    if matches!(group, ResolvedGroup::Nothing) {
        return Ok(Vec::new());
    }

    let bound = match &query.sort {
        None => None,
        Some(filter) => {
            let value = match &filter.bound {
                SortBound::Literal(value) => Some(*value),
                SortBound::OfRow(pk) => {
                    let referenced = records.iter().find(|record| {
                        record.get(&table.pk_column) == Some(pk)
                            && in_group(table, record, &group)
                            && (!query.visible_only || is_visible(table, record))
                    });
                    match referenced {
                        Some(record) => Some(sort_of(table, record)?),
                        None => None,
                    }
                }
            };
            match value {
                Some(value) => Some((filter.op, value)),
                None => return Ok(Vec::new()),
            }
        }
    };

    let mut matched = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        if !in_group(table, record, &group) {
            continue;
        }
        if let Some(pk) = &query.pk
            && record.get(&table.pk_column) != Some(pk)
        {
            continue;
        }
        if query.visible_only && !is_visible(table, record) {
            continue;
        }
        if let Some((op, value)) = bound
            && !op.eval(sort_of(table, record)?, value)
        {
            continue;
        }
        matched.push(idx);
    }

    if let Some(order) = query.order {
        let mut keyed = matched
            .into_iter()
            .map(|idx| Ok((sort_of(table, &records[idx])?, idx)))
            .collect::<Result<Vec<(i64, usize)>>>()?;
        // Stable, so ties keep insertion order.
        keyed.sort_by(|a, b| match order {
            SortOrder::Asc => a.0.cmp(&b.0),
            SortOrder::Desc => b.0.cmp(&a.0),
        });
        matched = keyed.into_iter().map(|(_, idx)| idx).collect();
    }

    if let Some(limit) = query.limit {
        matched.truncate(limit);
    }
    Ok(matched)
}
