//! Sort index error types.
//!
//! Errors raised by the ordering operations themselves, as opposed to the
//! store they run against.

use thiserror::Error;

use crate::value::Value;

fn in_group(group: &Option<Value>) -> String {
    match group {
        Some(group) => format!(" in group {group}"),
        None => String::new(),
    }
}

/// Errors that can occur while deriving or maintaining sort keys.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Field additions/changes require a major version bump
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum IndexError {
    /// A position literal other than `before` or `after`.
    #[error("Invalid position '{value}', expected 'before' or 'after'")]
    InvalidPosition {
        /// The rejected literal
        value: String,
    },

    /// The target row does not exist in the resolved scope, or is excluded.
    #[error("Row {id} not found{}", in_group(.group))]
    TargetNotFound {
        /// Primary key of the target row
        id: Value,
        /// Group the lookup was restricted to, if one was given
        group: Option<Value>,
    },

    /// A boundary operation on a grouped index was called without a group.
    #[error("Table {table} is grouped; a group id is required")]
    MissingGroupId {
        /// The table name
        table: String,
    },

    /// No sort value could be derived even after renumbering.
    ///
    /// This happens when visible rows share a sort key.
    #[error("Sort index corrupt around row {id}{}: duplicate sort keys", in_group(.group))]
    SortIndexCorrupt {
        /// Primary key of the target row
        id: Value,
        /// Group the lookup was restricted to, if one was given
        group: Option<Value>,
    },

    /// A derived sort key does not fit in an `i64`.
    #[error("Sort key {key} plus gap {gap} overflows")]
    SortKeyOverflow {
        /// The key being extended
        key: i64,
        /// The configured gap
        gap: i64,
    },
}

impl IndexError {
    /// Check if this error was caused by invalid caller input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            IndexError::InvalidPosition { .. } | IndexError::MissingGroupId { .. }
        )
    }

    /// Check if this error indicates the target row was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexError::TargetNotFound { .. })
    }

    /// Check if this error indicates the stored sort keys are unusable.
    pub fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            IndexError::SortIndexCorrupt { .. } | IndexError::SortKeyOverflow { .. }
        )
    }

    /// Get the target row id if this error is about a specific row.
    pub fn target_id(&self) -> Option<&Value> {
        match self {
            IndexError::TargetNotFound { id, .. } | IndexError::SortIndexCorrupt { id, .. } => {
                Some(id)
            }
            _ => None,
        }
    }
}

impl From<IndexError> for crate::Error {
    fn from(err: IndexError) -> Self {
        crate::Error::Index(err)
    }
}
