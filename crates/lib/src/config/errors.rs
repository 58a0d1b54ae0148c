//! Configuration error types.

use thiserror::Error;

/// Errors raised while validating a [`SortIndexConfig`](super::SortIndexConfig).
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required identifier was empty.
    #[error("Configuration field '{field}' must not be empty")]
    EmptyIdentifier {
        /// The configuration field
        field: &'static str,
    },

    /// An identifier contains characters that cannot be safely placed in SQL.
    #[error("Configuration field '{field}' has invalid identifier '{name}'")]
    InvalidIdentifier {
        /// The configuration field
        field: &'static str,
        /// The rejected identifier
        name: String,
    },

    /// The sort gap must be a positive integer.
    #[error("Sort gap must be positive, got {gap}")]
    InvalidSortGap {
        /// The rejected gap
        gap: i64,
    },

    /// An exclusion entry lists no values.
    #[error("Exclusion for column '{column}' lists no values")]
    EmptyExclusion {
        /// The column with no excluded values
        column: String,
    },

    /// The configuration document could not be parsed.
    #[error("Failed to parse configuration")]
    Parse {
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Check if this error comes from parsing rather than validation.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, ConfigError::Parse { .. })
    }

    /// Name of the offending configuration field, when known.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::EmptyIdentifier { field } | ConfigError::InvalidIdentifier { field, .. } => {
                Some(*field)
            }
            ConfigError::InvalidSortGap { .. } => Some("sort_gap"),
            ConfigError::EmptyExclusion { .. } => Some("exclude"),
            ConfigError::Parse { .. } => None,
        }
    }
}

impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Config(err)
    }
}
