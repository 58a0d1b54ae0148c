//! Row store abstraction for the sort index.
//!
//! This module provides the `RowStore` trait and the store implementations
//! organized by category (currently only `database`).
//!
//! The `RowStore` trait is the only way the sort index touches data. It
//! exposes four primitives: fetch rows of a scope ordered by sort key, fetch a
//! single column value, and shift the sort key of every row matching a
//! predicate. The index never inserts or deletes rows; that belongs to the
//! application that owns the table.

use std::any::Any;

use async_trait::async_trait;

use crate::Result;
use crate::value::Value;

pub mod database;
mod errors;
pub mod query;

pub use errors::StoreError;
pub use query::{CmpOp, GroupFilter, ScopeQuery, SortBound, SortFilter, SortOrder};

/// Hides rows whose `column` equals one of `values`.
///
/// A row with no value (NULL) in the column stays visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub column: String,
    pub values: Vec<Value>,
}

/// Table layout a store needs to evaluate a [`ScopeQuery`].
///
/// Built from a validated [`SortIndexConfig`](crate::config::SortIndexConfig);
/// identifiers are safe to place into SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub table: String,
    pub pk_column: String,
    pub sort_column: String,
    /// When `None`, every [`GroupFilter`] is treated as [`GroupFilter::All`].
    pub group_column: Option<String>,
    pub exclusions: Vec<Exclusion>,
}

impl TableSpec {
    /// Whether rows are partitioned into scopes.
    pub fn is_grouped(&self) -> bool {
        self.group_column.is_some()
    }
}

/// A row as the sort index sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedRow {
    pub pk: Value,
    pub sort: i64,
}

/// Column selector for [`RowStore::scalar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Pk,
    Sort,
    Group,
}

/// Storage capability the sort index is built on.
///
/// Implementations must be `Send` and `Sync` so an index can be shared across
/// tasks, and implement `Any` to allow downcasting to the concrete store.
///
/// Every method evaluates one [`ScopeQuery`]. Correlated references
/// ([`GroupFilter::OfRow`], [`SortBound::OfRow`]) are resolved by the store,
/// either as sub-selects or by looking the value up first; the caller does
/// not need to know which.
#[async_trait]
pub trait RowStore: Send + Sync + Any {
    /// Returns the rows matching `query`, honouring its order and limit.
    async fn find_many(&self, table: &TableSpec, query: &ScopeQuery) -> Result<Vec<SortedRow>>;

    /// Returns the first row matching `query`.
    async fn find_one(&self, table: &TableSpec, query: &ScopeQuery) -> Result<Option<SortedRow>> {
        let query = query.clone().with_limit(1);
        Ok(self.find_many(table, &query).await?.into_iter().next())
    }

    /// Returns `column` of the first row matching `query`.
    ///
    /// `None` when no row matches or the value is NULL.
    async fn scalar(
        &self,
        table: &TableSpec,
        query: &ScopeQuery,
        column: Column,
    ) -> Result<Option<Value>>;

    /// Adds `shift` to the sort column of every row matching `query`.
    ///
    /// The increment is applied relative to the current value in one
    /// statement. Order and limit of `query` are ignored.
    ///
    /// # Returns
    /// The number of rows updated.
    async fn update_where(&self, table: &TableSpec, shift: i64, query: &ScopeQuery) -> Result<u64>;

    /// Returns a reference to the store as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}
