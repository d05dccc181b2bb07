//! # In-Memory Store
//!
//! `HashMap`-backed [`KeyValueStore`] for tests and ephemeral terminals.
//! Same contract as the SQLite store, no durability.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::{KeyValueStore, StoreError, StoreResult};

/// Non-durable key/value store.
///
/// Cloning shares the underlying map, so a ledger and a test assertion
/// helper can observe the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of keys currently present (test helper).
    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Checks whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_raw(&self, key: &str) -> StoreResult<Option<Value>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::backend("store mutex poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: Value) -> StoreResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::backend("store mutex poisoned"))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::backend("store mutex poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get_raw("k").await.unwrap().is_none());

        store.set_raw("k", json!({"a": 1})).await.unwrap();
        assert_eq!(store.get_raw("k").await.unwrap(), Some(json!({"a": 1})));

        store.remove("k").await.unwrap();
        assert!(store.get_raw("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let view = store.clone();

        store.set_raw("k", json!(1)).await.unwrap();
        assert_eq!(view.get_raw("k").await.unwrap(), Some(json!(1)));
    }
}
