//!
//! Sortindex: gapped integer sort keys for rows of a relational table.
//! This library hands out sort values for rows an application is about to insert,
//! keeping a user-defined order without rewriting the whole table on every insert.
//!
//! ## Core Concepts
//!
//! * **Sort key**: An integer column; a lower key means an earlier position. Keys are spaced by a configured gap.
//! * **Scope (`store::GroupFilter`)**: Rows sharing one value of the optional group column, ordered independently of every other scope.
//! * **Exclusions (`config::SortIndexConfig::exclude`)**: Marker columns that hide rows (archived, deleted, ...) from all ordering reads.
//! * **Row stores (`store::RowStore`)**: The pluggable storage layer the index reads and updates:
//!     * **InMemory (`store::database::InMemory`)**: A lock-protected in-process table map with JSON persistence.
//!     * **SqlxStore (`store::database::SqlxStore`)**: SQLite, PostgreSQL or MySQL through sqlx (requires the matching feature).
//! * **SortIndex (`index::SortIndex`)**: Derives values before/after a row or at either end of a scope, and renumbers a scope's tail when neighbouring keys leave no room.

pub mod config;
pub mod constants;
pub mod index;
pub mod position;
pub mod store;
pub mod value;

pub use config::SortIndexConfig;
pub use index::SortIndex;
pub use position::Position;
pub use value::Value;

/// Result type used throughout the Sortindex library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Sortindex library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured errors from the sort index operations
    #[error(transparent)]
    Index(index::IndexError),

    /// Structured errors from the row stores
    #[error(transparent)]
    Store(store::StoreError),

    /// Structured configuration errors
    #[error(transparent)]
    Config(config::ConfigError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Index(_) => "index",
            Error::Store(_) => "store",
            Error::Config(_) => "config",
        }
    }

    /// Check if this error indicates a row or table was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Index(index_err) => index_err.is_not_found(),
            Error::Store(store_err) => store_err.is_not_found(),
            Error::Config(_) => false,
        }
    }

    /// Check if this error indicates the stored sort keys are unusable.
    pub fn is_integrity_error(&self) -> bool {
        match self {
            Error::Index(index_err) => index_err.is_integrity_error(),
            Error::Store(store_err) => store_err.is_schema_error(),
            Error::Config(_) => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_io_error(),
            _ => false,
        }
    }

    /// Check if this error is store-related.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Store(_))
    }

    /// Check if this error comes from the SQL driver.
    pub fn is_sql_error(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_sql_error(),
            _ => false,
        }
    }

    /// Check if this error is caused by invalid input or configuration.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Index(index_err) => index_err.is_invalid_input(),
            Error::Config(_) => true,
            Error::Store(_) => false,
        }
    }
}
