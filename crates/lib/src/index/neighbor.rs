//! Adjacent rows.

use super::SortIndex;
use crate::Result;
use crate::position::Position;
use crate::store::{CmpOp, Column, ScopeQuery, SortBound, SortOrder};
use crate::value::Value;

impl SortIndex {
    /// Primary key of the visible row directly before or after `target_id`.
    ///
    /// `None` when the target is first (or last) in its scope, or is not a
    /// visible row of the scope at all.
    pub async fn neighbor_id(
        &self,
        target_id: impl Into<Value>,
        position: Position,
        group_id: Option<Value>,
    ) -> Result<Option<Value>> {
        let target = target_id.into();
        let (op, order) = match position {
            Position::After => (CmpOp::Gt, SortOrder::Asc),
            Position::Before => (CmpOp::Lt, SortOrder::Desc),
        };
        let query = ScopeQuery::scope(self.scope_of(&target, group_id.as_ref()))
            .with_sort(op, SortBound::OfRow(target))
            .visible()
            .order_by(order)
            .with_limit(1);
        self.store.scalar(&self.table, &query, Column::Pk).await
    }
}
