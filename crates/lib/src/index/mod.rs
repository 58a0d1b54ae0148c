//! Gapped integer sort keys over a table the application owns.
//!
//! A [`SortIndex`] hands out sort values for rows the caller is about to
//! insert: before or after an existing row, or at either end of a scope.
//! Values are spaced by a configured gap so most inserts only read. When two
//! neighbours leave no room, the tail of the scope is shifted by one gap in a
//! single `UPDATE` and the value is derived again.
//!
//! The index never inserts or deletes rows and keeps no state between calls.
//! All reads and writes go through the injected [`RowStore`].
//!
//! The operations are split by concern:
//! - `derive`: candidate values next to a row, read-only
//! - `renumber`: opening room by shifting a scope's tail
//! - `boundary`: values before or after every row of a scope
//! - `neighbor`: the adjacent row of a target

mod boundary;
mod derive;
mod errors;
mod neighbor;
mod renumber;

use std::sync::Arc;

use tracing::{debug, warn};

pub use errors::IndexError;

use crate::Result;
use crate::config::SortIndexConfig;
use crate::position::Position;
use crate::store::{GroupFilter, RowStore, TableSpec};
use crate::value::Value;

/// Sort key maintenance for one table.
///
/// Cheap to clone; clones share the store and the configuration.
///
/// # Concurrency
///
/// The index does no locking of its own. Two callers asking for a value after
/// the same row before either inserts will receive the same value. Callers
/// that insert concurrently into one scope must serialise per scope, for
/// example with a transaction holding a row lock on the scope or an advisory
/// lock keyed by the group id.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sortindex::{Position, SortIndex, SortIndexConfig, Value};
/// use sortindex::store::database::InMemory;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> sortindex::Result<()> {
/// let store = Arc::new(InMemory::new());
/// store.insert("tasks", [("id", Value::Int(1)), ("sort", Value::Int(1000))]).await;
/// store.insert("tasks", [("id", Value::Int(2)), ("sort", Value::Int(2000))]).await;
///
/// let index = SortIndex::new(store, SortIndexConfig::new("tasks"))?;
/// assert_eq!(index.sort_value(1, Position::After, None).await?, 1500);
/// assert_eq!(index.sort_value_after_all(None).await?, 3000);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SortIndex {
    store: Arc<dyn RowStore>,
    config: Arc<SortIndexConfig>,
    table: Arc<TableSpec>,
}

impl std::fmt::Debug for SortIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortIndex")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SortIndex {
    /// Creates an index over `store` after validating `config`.
    pub fn new(store: Arc<dyn RowStore>, config: SortIndexConfig) -> Result<Self> {
        config.validate()?;
        let table = config.table_spec();
        Ok(Self {
            store,
            config: Arc::new(config),
            table: Arc::new(table),
        })
    }

    /// The configuration this index was built from.
    pub fn config(&self) -> &SortIndexConfig {
        &self.config
    }

    /// The store this index reads and updates.
    pub fn store(&self) -> &Arc<dyn RowStore> {
        &self.store
    }

    /// Sort value for the first row of an empty scope.
    ///
    /// Always equal to the configured gap.
    pub fn ini_sort_value(&self) -> i64 {
        self.config.sort_gap
    }

    /// Sort value for a row placed directly before or after `target_id`.
    ///
    /// `group_id` restricts the lookup to one scope; without it the scope of
    /// the target is used. It is ignored when the index has no group column.
    ///
    /// When the neighbours of the target leave no room, the tail of the scope
    /// is shifted by one gap and the value is derived once more. If that still
    /// yields nothing, the scope holds duplicate keys and
    /// [`IndexError::SortIndexCorrupt`] is returned.
    ///
    /// # Errors
    /// [`IndexError::TargetNotFound`] if the target is not a visible row of
    /// the scope.
    pub async fn sort_value(
        &self,
        target_id: impl Into<Value>,
        position: Position,
        group_id: Option<Value>,
    ) -> Result<i64> {
        let target = target_id.into();
        if let Some(value) = self
            .derive_sort_value(target.clone(), position, group_id.clone())
            .await?
        {
            return Ok(value);
        }

        debug!(
            table = %self.table.table,
            target = %target,
            position = %position,
            "No room next to target, renumbering"
        );
        let scope = self.scope_of(&target, group_id.as_ref());
        self.shift_tail(&target, position == Position::Before, scope)
            .await?;

        match self
            .derive_sort_value(target.clone(), position, group_id.clone())
            .await?
        {
            Some(value) => Ok(value),
            None => {
                warn!(
                    table = %self.table.table,
                    target = %target,
                    position = %position,
                    "No room next to target after renumbering; duplicate sort keys in scope"
                );
                Err(IndexError::SortIndexCorrupt {
                    id: target,
                    group: group_id,
                }
                .into())
            }
        }
    }

    /// Scope of an operation anchored at `target`.
    fn scope_of(&self, target: &Value, group_id: Option<&Value>) -> GroupFilter {
        if !self.table.is_grouped() {
            return GroupFilter::All;
        }
        match group_id {
            Some(group) => GroupFilter::Value(group.clone()),
            None => GroupFilter::OfRow(target.clone()),
        }
    }

    /// Scope of an operation with no anchor row, where the group is mandatory.
    fn required_scope(&self, group_id: Option<Value>) -> Result<GroupFilter> {
        if !self.table.is_grouped() {
            return Ok(GroupFilter::All);
        }
        match group_id {
            Some(group) => Ok(GroupFilter::Value(group)),
            None => Err(IndexError::MissingGroupId {
                table: self.table.table.clone(),
            }
            .into()),
        }
    }

    fn gap(&self) -> i64 {
        self.config.sort_gap
    }
}
