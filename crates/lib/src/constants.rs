//! Constants used throughout the sortindex library.
//!
//! Central definitions for configuration defaults and the sort key domain.

/// Default primary key column name.
pub const DEFAULT_PK_COLUMN: &str = "id";

/// Default sort column name.
pub const DEFAULT_SORT_COLUMN: &str = "sort";

/// Default interval between neighbouring sort values.
///
/// Also the initial value of an empty scope and the amount every shifted row
/// moves during a renumbering pass.
pub const DEFAULT_SORT_GAP: i64 = 1000;

/// Smallest legal sort value.
pub const MIN_SORT_VALUE: i64 = 1;
