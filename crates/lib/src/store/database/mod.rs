//! Database-style store implementations
//!
//! These stores hold the ordered table itself: either in process memory or in
//! a relational database reached through sqlx.

mod in_memory;
#[cfg(any(feature = "sqlite", feature = "postgres", feature = "mysql"))]
pub mod sql;

pub use in_memory::{InMemory, Record};
#[cfg(feature = "mysql")]
pub use sql::MySql;
#[cfg(feature = "postgres")]
pub use sql::Postgres;
#[cfg(feature = "sqlite")]
pub use sql::Sqlite;
#[cfg(any(feature = "sqlite", feature = "postgres", feature = "mysql"))]
pub use sql::{DbKind, SqlxStore};
