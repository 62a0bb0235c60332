//! In-process backend.
//!
//! [`MemoryStore`] keeps every key in a single ordered map behind a
//! read-write lock. It provides read-your-writes and nothing more, which is
//! exactly the contract the core is written against.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::error::StoreError;
use crate::kv::KeyValueStore;

/// A [`KeyValueStore`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of keys currently stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] if a writer panicked.
    pub fn len(&self) -> Result<usize, StoreError> {
        let data = self
            .data
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(data.len())
    }

    /// Whether the store holds no keys.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] if a writer panicked.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// All stored keys, in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] if a writer panicked.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let data = self
            .data
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(data.keys().cloned().collect())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let data = self
            .data
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        data.insert(key.to_owned(), value);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn read_your_writes() {
        let store = MemoryStore::new();
        store.set("global:a", Value::from(1)).unwrap();
        assert_eq!(store.get("global:a").unwrap(), Some(Value::from(1)));
        store.set("global:a", Value::from(2)).unwrap();
        assert_eq!(store.get("global:a").unwrap(), Some(Value::from(2)));
    }

    #[test]
    fn absent_key_reads_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("global:missing").unwrap(), None);
    }

    #[test]
    fn len_counts_distinct_keys() {
        let store = MemoryStore::new();
        assert!(store.is_empty().unwrap());
        store.set("global:a", Value::from(1)).unwrap();
        store.set("user:b", Value::from(2)).unwrap();
        store.set("global:a", Value::from(3)).unwrap();
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn keys_are_sorted() {
        let store = MemoryStore::new();
        store.set("user:b", Value::Null).unwrap();
        store.set("global:a", Value::Null).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["global:a", "user:b"]);
    }
}
