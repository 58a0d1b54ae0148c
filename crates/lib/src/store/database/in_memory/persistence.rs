//! Persistence operations for the InMemory store
//!
//! This module handles serialization and file I/O for saving/loading
//! the in-memory store state to/from JSON files.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::RwLock;

use super::{InMemory, Record};
use crate::store::errors::StoreError;
use crate::{Error, Result};

/// The current persistence file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const PERSISTENCE_VERSION: u8 = 0;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the persistence version during deserialization.
fn validate_persistence_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != PERSISTENCE_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported persistence version {version}; only version {PERSISTENCE_VERSION} is supported"
        )));
    }
    Ok(version)
}

/// Serializable version of the InMemory store for persistence
#[derive(Serialize, Deserialize)]
struct SerializableStore {
    /// File format version for compatibility checking
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_persistence_version"
    )]
    version: u8,
    #[serde(default)]
    tables: HashMap<String, Vec<Record>>,
}

/// Saves the entire store state (all tables) to a specified file as JSON.
pub(crate) async fn save_to_file<P: AsRef<Path>>(store: &InMemory, path: P) -> Result<()> {
    let tables = store.tables.read().await.clone();
    let serializable = SerializableStore {
        version: PERSISTENCE_VERSION,
        tables,
    };

    let json = serde_json::to_string_pretty(&serializable)
        .map_err(|e| -> Error { StoreError::SerializationFailed { source: e }.into() })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| -> Error { StoreError::FileIo { source: e }.into() })
}

/// Loads the store state from a specified JSON file.
///
/// If the file does not exist, a new, empty `InMemory` store is returned.
pub(crate) async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<InMemory> {
    match tokio::fs::read_to_string(path).await {
        Ok(json) => {
            let serializable: SerializableStore =
                serde_json::from_str(&json).map_err(|e| -> Error {
                    StoreError::DeserializationFailed { source: e }.into()
                })?;
            Ok(InMemory {
                tables: RwLock::new(serializable.tables),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(InMemory::new()),
        Err(e) => Err(StoreError::FileIo { source: e }.into()),
    }
}
