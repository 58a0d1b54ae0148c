//! Candidate sort values next to an existing row.

use tracing::debug;

use super::{IndexError, SortIndex};
use crate::Result;
use crate::position::Position;
use crate::store::{CmpOp, ScopeQuery, SortBound, SortOrder};
use crate::value::Value;

/// `ceil(n / 2)` for any sign.
pub(crate) fn half_up(n: i64) -> i64 {
    n.div_euclid(2) + n.rem_euclid(2)
}

/// Rounded-up midpoint of two keys, or `None` when it lands on either key.
pub(crate) fn midpoint(a: i64, b: i64) -> Option<i64> {
    let sum = i128::from(a) + i128::from(b);
    // Lies between a and b, so always fits.
    let mid = (sum + 1).div_euclid(2) as i64;
    (mid != a && mid != b).then_some(mid)
}

/// Value next to the only row on that side of the target.
///
/// After the last row the gap is appended; before the first row the key is
/// halved.
pub(crate) fn beyond(key: i64, position: Position, gap: i64) -> Result<Option<i64>> {
    let candidate = match position {
        Position::After => key
            .checked_add(gap)
            .ok_or(IndexError::SortKeyOverflow { key, gap })?,
        Position::Before => half_up(key),
    };
    let usable = match position {
        Position::After => candidate > key,
        Position::Before => candidate < key,
    };
    Ok(usable.then_some(candidate))
}

impl SortIndex {
    /// Derives a sort value directly before or after `target_id` without
    /// changing anything.
    ///
    /// Returns `Ok(None)` when the neighbours leave no room; a renumbering
    /// pass (see [`SortIndex::rebuild_tail_from`]) creates it.
    ///
    /// # Errors
    /// [`IndexError::TargetNotFound`] if the target is not a visible row of
    /// the scope.
    pub async fn derive_sort_value(
        &self,
        target_id: impl Into<Value>,
        position: Position,
        group_id: Option<Value>,
    ) -> Result<Option<i64>> {
        let target = target_id.into();
        let (op, order) = match position {
            Position::After => (CmpOp::Ge, SortOrder::Asc),
            Position::Before => (CmpOp::Le, SortOrder::Desc),
        };
        let query = ScopeQuery::scope(self.scope_of(&target, group_id.as_ref()))
            .with_sort(op, SortBound::OfRow(target.clone()))
            .visible()
            .order_by(order)
            .with_limit(2);
        let rows = self.store.find_many(&self.table, &query).await?;

        let derived = match rows.as_slice() {
            [] => {
                return Err(IndexError::TargetNotFound {
                    id: target,
                    group: group_id,
                }
                .into());
            }
            [only] => beyond(only.sort, position, self.gap())?,
            [first, second, ..] => midpoint(first.sort, second.sort),
        };

        debug!(
            table = %self.table.table,
            target = %target,
            position = %position,
            rows = rows.len(),
            derived = ?derived,
            "Derived sort value"
        );
        Ok(derived)
    }
}
