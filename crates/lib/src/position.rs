//! Insert position relative to a target row.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::index::IndexError;

/// Where a new row goes relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Directly in front of the target (smaller sort key).
    Before,
    /// Directly behind the target (larger sort key).
    After,
}

impl Position {
    /// The literal used in configuration and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Before => "before",
            Position::After => "after",
        }
    }

    /// Returns the opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            Position::Before => Position::After,
            Position::After => Position::Before,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(Position::Before),
            "after" => Ok(Position::After),
            other => Err(IndexError::InvalidPosition {
                value: other.to_string(),
            }),
        }
    }
}
