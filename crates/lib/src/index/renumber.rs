//! Opening room in a scope by shifting its tail.

use tracing::info;

use super::{IndexError, SortIndex};
use crate::Result;
use crate::store::{CmpOp, GroupFilter, ScopeQuery, SortBound};
use crate::value::Value;

impl SortIndex {
    /// Adds one gap to the sort key of every row after `anchor_id` in its
    /// scope, and to the anchor itself when `include_anchor` is set.
    ///
    /// The shift is one relative `UPDATE` and covers excluded rows too, so
    /// they keep their place among the visible ones. Other scopes are never
    /// touched.
    ///
    /// Returns the number of rows shifted.
    ///
    /// # Errors
    /// [`IndexError::TargetNotFound`] if the anchor is not in the scope. No
    /// update is issued in that case.
    pub async fn rebuild_tail_from(
        &self,
        anchor_id: impl Into<Value>,
        include_anchor: bool,
        group_id: Option<Value>,
    ) -> Result<u64> {
        let anchor = anchor_id.into();
        let scope = self.scope_of(&anchor, group_id.as_ref());

        let lookup = ScopeQuery::scope(scope.clone()).with_pk(anchor.clone());
        if self.store.find_one(&self.table, &lookup).await?.is_none() {
            return Err(IndexError::TargetNotFound {
                id: anchor,
                group: group_id,
            }
            .into());
        }

        self.shift_tail(&anchor, include_anchor, scope).await
    }

    pub(super) async fn shift_tail(
        &self,
        anchor: &Value,
        include_anchor: bool,
        scope: GroupFilter,
    ) -> Result<u64> {
        let op = if include_anchor { CmpOp::Ge } else { CmpOp::Gt };
        let query = ScopeQuery::scope(scope).with_sort(op, SortBound::OfRow(anchor.clone()));
        let rows = self
            .store
            .update_where(&self.table, self.gap(), &query)
            .await?;

        info!(
            table = %self.table.table,
            anchor = %anchor,
            include_anchor,
            rows,
            gap = self.gap(),
            "Renumbered sort scope tail"
        );
        Ok(rows)
    }
}
