//! JSON (de)serialization over opaque stored strings.
//!
//! Reads treat every failure mode the same way: a missing key, a storage
//! error, and a value that no longer parses all come back as `None`. A
//! cold or corrupted store is indistinguishable from first use, so the
//! caller falls back to defaults instead of surfacing an error.

use serde::de::DeserializeOwned;
use serde::Serialize;

use skydeck_core::StorageError;

use crate::store::KeyValueStore;

/// Read and deserialize the value at `key`. Absent, unreadable, or
/// unparseable values all yield `None` (logged, never propagated).
pub async fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Storage read failed for '{}': {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Stored value at '{}' is not valid JSON: {}", key, e);
            None
        }
    }
}

/// Serialize `value` and write it under `key`.
pub async fn put_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)
        .map_err(|e| StorageError::Backend(format!("serialize '{}': {}", key, e)))?;
    store.set(key, &raw).await
}
