//! The key-value storage port.
//!
//! The core never references a storage singleton. A [`KeyValueStore`] is
//! constructed once per process or session and injected into the
//! repository and the authoritative store, which is what lets tests swap in
//! an in-memory double.
//!
//! The contract is deliberately small: `get` and `set` of JSON values, no
//! transactions, no TTL, no schema. The only guarantee callers may rely on
//! is read-your-writes.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;

/// A namespaced get/set backend.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored at `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend itself fails.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `value` at `key`, replacing any previous value wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend itself fails.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Typed JSON helpers available on every [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Read `key` and decode it into `T`.
    ///
    /// A stored value that does not decode into `T` is logged and reported
    /// as absent, so callers fall back to their documented defaults instead
    /// of failing on legacy or foreign data.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend read fails.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(value) = self.get(key)? else {
            return Ok(None);
        };
        if value.is_null() {
            return Ok(None);
        }
        match serde_json::from_value(value) {
            Ok(decoded) => Ok(Some(decoded)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored value has unexpected shape, treating as missing");
                Ok(None)
            }
        }
    }

    /// Encode `value` as JSON and store it at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if encoding fails, or the
    /// backend's error if the write fails.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_value(value)?;
        self.set(key, json)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}
