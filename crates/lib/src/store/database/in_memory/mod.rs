//! In-memory row store implementation
//!
//! This module provides an in-memory implementation of the `RowStore` trait,
//! suitable for testing, development, or embedding where the ordered list
//! lives in process memory and persistence is handled by saving/loading the
//! whole state to/from a JSON file.

mod filter;
mod persistence;

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Result;
use crate::store::errors::StoreError;
use crate::store::{Column, RowStore, ScopeQuery, SortedRow, TableSpec};
use crate::value::Value;

/// One row: column name to value. A missing column is NULL.
pub type Record = BTreeMap<String, Value>;

/// A simple in-memory store holding named tables of records.
///
/// Tables are plain vectors in insertion order. Queries are evaluated by a
/// full scan, which is fine for the scope sizes this is meant for.
#[derive(Debug, Default)]
pub struct InMemory {
    /// Tables with read-write lock for concurrent access
    pub(crate) tables: RwLock<HashMap<String, Vec<Record>>>,
}

impl InMemory {
    /// Creates a new, empty `InMemory` store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `table` if it does not exist yet.
    pub async fn create_table(&self, table: &str) {
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default();
    }

    /// Appends a row to `table`, creating the table when needed.
    ///
    /// The store does not enforce primary key uniqueness; that is up to the
    /// caller, exactly as with a table the application owns.
    pub async fn insert<K, V>(&self, table: &str, columns: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let record: Record = columns
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .push(record);
    }

    /// Sets `column` to `value` on every row of `table` whose `pk_column` equals `pk`.
    ///
    /// Returns the number of rows changed.
    pub async fn set_column(
        &self,
        table: &str,
        pk_column: &str,
        pk: &Value,
        column: &str,
        value: impl Into<Value>,
    ) -> Result<u64> {
        let value = value.into();
        let mut tables = self.tables.write().await;
        let records = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::UnknownTable {
                table: table.to_string(),
            })?;
        let mut changed = 0;
        for record in records
            .iter_mut()
            .filter(|record| record.get(pk_column) == Some(pk))
        {
            record.insert(column.to_string(), value.clone());
            changed += 1;
        }
        Ok(changed)
    }

    /// Returns a snapshot of every row in `table`.
    pub async fn rows(&self, table: &str) -> Result<Vec<Record>> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .ok_or_else(|| {
                StoreError::UnknownTable {
                    table: table.to_string(),
                }
                .into()
            })
    }

    /// Returns the names of all tables.
    pub async fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Saves the entire store state to a specified file as JSON.
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path).await
    }

    /// Loads the store state from a specified JSON file.
    ///
    /// If the file does not exist, a new, empty `InMemory` store is returned.
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load_from_file(path).await
    }
}

fn table_rows<'a>(
    tables: &'a HashMap<String, Vec<Record>>,
    table: &TableSpec,
) -> Result<&'a [Record]> {
    tables
        .get(&table.table)
        .map(Vec::as_slice)
        .ok_or_else(|| {
            StoreError::UnknownTable {
                table: table.table.clone(),
            }
            .into()
        })
}

#[async_trait]
impl RowStore for InMemory {
    async fn find_many(&self, table: &TableSpec, query: &ScopeQuery) -> Result<Vec<SortedRow>> {
        let tables = self.tables.read().await;
        let records = table_rows(&tables, table)?;
        filter::matching_indices(table, records, query)?
            .into_iter()
            .map(|idx| -> Result<SortedRow> {
                let record = &records[idx];
                let pk = record
                    .get(&table.pk_column)
                    .cloned()
                    .ok_or_else(|| StoreError::ColumnMissing {
                        table: table.table.clone(),
                        column: table.pk_column.clone(),
                        pk: filter::pk_label(table, record),
                    })?;
                Ok(SortedRow {
                    pk,
                    sort: filter::sort_of(table, record)?,
                })
            })
            .collect()
    }

    async fn scalar(
        &self,
        table: &TableSpec,
        query: &ScopeQuery,
        column: Column,
    ) -> Result<Option<Value>> {
        let tables = self.tables.read().await;
        let records = table_rows(&tables, table)?;
        let Some(&idx) = filter::matching_indices(table, records, query)?.first() else {
            return Ok(None);
        };
        let record = &records[idx];
        Ok(match column {
            Column::Pk => record.get(&table.pk_column).cloned(),
            Column::Sort => record.get(&table.sort_column).cloned(),
            Column::Group => table
                .group_column
                .as_ref()
                .and_then(|group| record.get(group))
                .cloned(),
        })
    }

    async fn update_where(&self, table: &TableSpec, shift: i64, query: &ScopeQuery) -> Result<u64> {
        // Hold the write lock across evaluation and update so the shift is atomic.
        let mut tables = self.tables.write().await;
        let records = tables
            .get_mut(&table.table)
            .ok_or_else(|| StoreError::UnknownTable {
                table: table.table.clone(),
            })?;

        let mut query = query.clone();
        query.order = None;
        query.limit = None;
        let matched = filter::matching_indices(table, records, &query)?;

        // Compute every new value before writing any, so an overflow leaves
        // the table untouched.
        let mut shifted = Vec::with_capacity(matched.len());
        for &idx in &matched {
            let record = &records[idx];
            let sort = filter::sort_of(table, record)?;
            let next = sort
                .checked_add(shift)
                .ok_or_else(|| StoreError::SortOverflow {
                    table: table.table.clone(),
                    pk: filter::pk_label(table, record),
                })?;
            shifted.push((idx, next));
        }
        for (idx, next) in &shifted {
            records[*idx].insert(table.sort_column.clone(), Value::Int(*next));
        }
        Ok(shifted.len() as u64)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
