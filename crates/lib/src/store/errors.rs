//! Row store error types.
//!
//! Structured errors for store operations, shared by the in-memory and SQL
//! implementations.

use thiserror::Error;

/// Errors that can occur during row store operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Field additions/changes require a major version bump
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// The table does not exist in the store.
    #[error("Unknown table: {table}")]
    UnknownTable {
        /// The table name
        table: String,
    },

    /// A row has no value for a column the query needs.
    #[error("Row {pk} in table {table} has no value for column {column}")]
    ColumnMissing {
        /// The table name
        table: String,
        /// The column name
        column: String,
        /// Primary key of the offending row
        pk: String,
    },

    /// A column holds a value of the wrong kind.
    #[error("Column {column} in table {table} holds {found}, expected {expected}")]
    InvalidColumnType {
        /// The table name
        table: String,
        /// The column name
        column: String,
        /// The kind the query needs
        expected: &'static str,
        /// The kind that was found
        found: &'static str,
    },

    /// Shifting a sort key would leave the `i64` range.
    #[error("Shifting sort key of row {pk} in table {table} overflows")]
    SortOverflow {
        /// The table name
        table: String,
        /// Primary key of the offending row
        pk: String,
    },

    /// SQL driver error.
    #[cfg(any(feature = "sqlite", feature = "postgres", feature = "mysql"))]
    #[error("SQL error: {reason}")]
    SqlxError {
        /// Description including the failed operation
        reason: String,
        /// The underlying driver error, when there is one
        #[source]
        source: Option<sqlx::Error>,
    },

    /// Serialization failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Check if this error indicates a table or column was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::UnknownTable { .. } | StoreError::ColumnMissing { .. }
        )
    }

    /// Check if this error indicates stored data does not match the table layout.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            StoreError::ColumnMissing { .. }
                | StoreError::InvalidColumnType { .. }
                | StoreError::SortOverflow { .. }
        )
    }

    /// Check if this error is related to I/O operations.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            StoreError::FileIo { .. }
                | StoreError::SerializationFailed { .. }
                | StoreError::DeserializationFailed { .. }
        )
    }

    /// Check if this error came from the SQL driver.
    pub fn is_sql_error(&self) -> bool {
        match self {
            #[cfg(any(feature = "sqlite", feature = "postgres", feature = "mysql"))]
            StoreError::SqlxError { .. } => true,
            _ => false,
        }
    }
}

impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
