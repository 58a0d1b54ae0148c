//! Sort values at either end of a scope.

use tracing::debug;

use super::derive::half_up;
use super::{IndexError, SortIndex};
use crate::Result;
use crate::constants::MIN_SORT_VALUE;
use crate::store::{ScopeQuery, SortOrder};
use crate::value::Value;

impl SortIndex {
    /// Sort value for a row placed after every visible row of the scope.
    ///
    /// An empty scope gets [`SortIndex::ini_sort_value`].
    ///
    /// # Errors
    /// [`IndexError::MissingGroupId`] if the index is grouped and `group_id`
    /// is `None`.
    pub async fn sort_value_after_all(&self, group_id: Option<Value>) -> Result<i64> {
        let scope = self.required_scope(group_id)?;
        let query = ScopeQuery::scope(scope)
            .visible()
            .order_by(SortOrder::Desc);
        let value = match self.store.find_one(&self.table, &query).await? {
            None => self.ini_sort_value(),
            Some(last) => last
                .sort
                .checked_add(self.gap())
                .ok_or(IndexError::SortKeyOverflow {
                    key: last.sort,
                    gap: self.gap(),
                })?,
        };
        debug!(table = %self.table.table, value, "Derived sort value after all");
        Ok(value)
    }

    /// Sort value for a row placed before every visible row of the scope.
    ///
    /// An empty scope gets [`SortIndex::ini_sort_value`]. Otherwise the
    /// smallest key is halved; when it is already the smallest legal key, the
    /// whole scope is shifted by one gap first and the initial value is
    /// returned.
    ///
    /// # Errors
    /// [`IndexError::MissingGroupId`] if the index is grouped and `group_id`
    /// is `None`.
    pub async fn sort_value_before_all(&self, group_id: Option<Value>) -> Result<i64> {
        let scope = self.required_scope(group_id)?;
        let query = ScopeQuery::scope(scope.clone())
            .visible()
            .order_by(SortOrder::Asc);
        let value = match self.store.find_one(&self.table, &query).await? {
            None => self.ini_sort_value(),
            Some(first) if first.sort > MIN_SORT_VALUE => half_up(first.sort),
            Some(first) => {
                self.shift_tail(&first.pk, true, scope).await?;
                self.ini_sort_value()
            }
        };
        debug!(table = %self.table.table, value, "Derived sort value before all");
        Ok(value)
    }
}
