//! Storage seam for the configured pack-size catalogue.
//!
//! The optimizer never touches a store. The request layer receives a store handle
//! and reads the catalogue from it before each solve.

use std::collections::HashMap;
use std::sync::RwLock;

use log::debug;
use thiserror::Error;

/// Key under which the catalogue is kept, as a JSON array of sizes.
pub const PACK_SIZES_KEY: &str = "pack:sizes";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no pack sizes have been configured")]
    NotConfigured,
    #[error("stored pack sizes are not a valid JSON array: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("pack size store is unavailable: {0}")]
    Unavailable(String),
}

/// Read/write access to the pack-size catalogue.
pub trait PackSizeStore: Send + Sync {
    /// Returns the stored catalogue.
    fn get_sizes(&self) -> Result<Vec<u64>, StoreError>;

    /// Replaces the stored catalogue. Callers pass validated sizes.
    fn set_sizes(&self, sizes: &[u64]) -> Result<(), StoreError>;
}

/// Process-local key-value store.
///
/// Values are kept as JSON strings so the layout matches an external key-value
/// backend that stores the catalogue under `PACK_SIZES_KEY`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `sizes`.
    pub fn with_sizes(sizes: &[u64]) -> Result<Self, StoreError> {
        let store = Self::new();
        store.set_sizes(sizes)?;
        Ok(store)
    }

    /// Stores a raw value, bypassing serialization.
    pub fn put_raw(&self, key: &str, value: impl Into<String>) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        entries.insert(key.to_string(), value.into());
        Ok(())
    }

    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Ok(entries.get(key).cloned())
    }
}

impl PackSizeStore for InMemoryStore {
    fn get_sizes(&self) -> Result<Vec<u64>, StoreError> {
        let raw = self
            .get_raw(PACK_SIZES_KEY)?
            .ok_or(StoreError::NotConfigured)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn set_sizes(&self, sizes: &[u64]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(sizes)?;
        debug!("Storing pack sizes under '{}': {}", PACK_SIZES_KEY, raw);
        self.put_raw(PACK_SIZES_KEY, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get_returns_same_sizes() {
        let store = InMemoryStore::new();
        store.set_sizes(&[250, 500, 1000]).unwrap();
        assert_eq!(store.get_sizes().unwrap(), vec![250, 500, 1000]);
    }

    #[test]
    fn test_sizes_are_stored_as_json_array() {
        let store = InMemoryStore::with_sizes(&[23, 31, 53]).unwrap();
        assert_eq!(
            store.get_raw(PACK_SIZES_KEY).unwrap().as_deref(),
            Some("[23,31,53]")
        );
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let store = InMemoryStore::new();
        assert!(matches!(store.get_sizes(), Err(StoreError::NotConfigured)));
    }

    #[test]
    fn test_corrupt_value_is_reported() {
        let store = InMemoryStore::new();
        store.put_raw(PACK_SIZES_KEY, "not json").unwrap();
        assert!(matches!(store.get_sizes(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_overwrite_replaces_catalogue() {
        let store = InMemoryStore::with_sizes(&[1, 2]).unwrap();
        store.set_sizes(&[5]).unwrap();
        assert_eq!(store.get_sizes().unwrap(), vec![5]);
    }
}
