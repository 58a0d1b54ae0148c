//! Configuration for a [`SortIndex`](crate::SortIndex).
//!
//! A configuration is supplied once per index and names the table and columns
//! the index works on. Everything here is interpolated into SQL by the SQL
//! store, so identifiers are validated before an index can be built.
//!
//! ```
//! use sortindex::config::SortIndexConfig;
//!
//! let config = SortIndexConfig::new("cartoons")
//!     .with_group_column("category_id")
//!     .with_sort_column("sort_local")
//!     .with_exclusion("archived", true)
//!     .with_exclusion("color", false);
//! assert!(config.validate().is_ok());
//! ```

mod errors;

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

pub use errors::ConfigError;

use crate::Result;
use crate::constants::{DEFAULT_PK_COLUMN, DEFAULT_SORT_COLUMN, DEFAULT_SORT_GAP};
use crate::store::{Exclusion, TableSpec};
use crate::value::Value;

fn default_pk_column() -> String {
    DEFAULT_PK_COLUMN.to_string()
}

fn default_sort_column() -> String {
    DEFAULT_SORT_COLUMN.to_string()
}

fn default_sort_gap() -> i64 {
    DEFAULT_SORT_GAP
}

/// One or several excluded values for a marker column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExcludedValues {
    /// A single excluded value, e.g. `"archived": true`.
    One(Value),
    /// Several excluded values, e.g. `"status": ["deleted", "hidden"]`.
    Many(Vec<Value>),
}

impl ExcludedValues {
    fn into_vec(self) -> Vec<Value> {
        match self {
            ExcludedValues::One(v) => vec![v],
            ExcludedValues::Many(vs) => vs,
        }
    }

    fn push(&mut self, value: Value) {
        match self {
            ExcludedValues::One(existing) => {
                *self = ExcludedValues::Many(vec![existing.clone(), value]);
            }
            ExcludedValues::Many(vs) => vs.push(value),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, ExcludedValues::Many(vs) if vs.is_empty())
    }
}

/// Table and column layout of one sort index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortIndexConfig {
    /// Table that holds the ordered rows.
    pub table: String,
    /// Column whose value partitions rows into independent scopes.
    ///
    /// When unset the whole table is one scope.
    #[serde(default)]
    pub group_column: Option<String>,
    /// Primary key column.
    #[serde(default = "default_pk_column")]
    pub pk_column: String,
    /// Integer column holding the sort key.
    #[serde(default = "default_sort_column")]
    pub sort_column: String,
    /// Interval between neighbouring sort values; must be positive.
    ///
    /// Larger gaps make renumbering rarer at the cost of a smaller usable
    /// key range.
    #[serde(default = "default_sort_gap")]
    pub sort_gap: i64,
    /// Marker columns and the values that hide a row from ordering.
    #[serde(default)]
    pub exclude: BTreeMap<String, ExcludedValues>,
}

impl SortIndexConfig {
    /// Creates a configuration for `table` with default column names and gap.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            group_column: None,
            pk_column: default_pk_column(),
            sort_column: default_sort_column(),
            sort_gap: default_sort_gap(),
            exclude: BTreeMap::new(),
        }
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse { source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_group_column(mut self, column: impl Into<String>) -> Self {
        self.group_column = Some(column.into());
        self
    }

    pub fn with_pk_column(mut self, column: impl Into<String>) -> Self {
        self.pk_column = column.into();
        self
    }

    pub fn with_sort_column(mut self, column: impl Into<String>) -> Self {
        self.sort_column = column.into();
        self
    }

    pub fn with_sort_gap(mut self, gap: i64) -> Self {
        self.sort_gap = gap;
        self
    }

    /// Hides rows whose `column` equals `value`.
    ///
    /// Calling this repeatedly for the same column accumulates values.
    pub fn with_exclusion(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.exclude.entry(column.into()) {
            Entry::Occupied(mut existing) => existing.get_mut().push(value),
            Entry::Vacant(slot) => {
                slot.insert(ExcludedValues::One(value));
            }
        }
        self
    }

    /// Checks identifiers and the gap.
    pub fn validate(&self) -> Result<()> {
        validate_identifier("table", &self.table)?;
        validate_identifier("pk_column", &self.pk_column)?;
        validate_identifier("sort_column", &self.sort_column)?;
        if let Some(group) = &self.group_column {
            validate_identifier("group_column", group)?;
        }
        if self.sort_gap <= 0 {
            return Err(ConfigError::InvalidSortGap { gap: self.sort_gap }.into());
        }
        for (column, values) in &self.exclude {
            validate_identifier("exclude", column)?;
            if values.is_empty() {
                return Err(ConfigError::EmptyExclusion {
                    column: column.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Resolves this configuration into the table description row stores use.
    pub fn table_spec(&self) -> TableSpec {
        TableSpec {
            table: self.table.clone(),
            pk_column: self.pk_column.clone(),
            sort_column: self.sort_column.clone(),
            group_column: self.group_column.clone(),
            exclusions: self
                .exclude
                .iter()
                .map(|(column, values)| Exclusion {
                    column: column.clone(),
                    values: values.clone().into_vec(),
                })
                .collect(),
        }
    }
}

/// Accepts `name` or `schema.name` where each part is `[A-Za-z_][A-Za-z0-9_]*`.
fn validate_identifier(field: &'static str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ConfigError::EmptyIdentifier { field }.into());
    }
    let valid_part = |part: &str| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 2 || !parts.iter().all(|p| valid_part(p)) {
        return Err(ConfigError::InvalidIdentifier {
            field,
            name: name.to_string(),
        }
        .into());
    }
    Ok(())
}
