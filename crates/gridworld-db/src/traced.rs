//! Call-logging decorator for any backend.

use serde_json::Value;

use crate::error::StoreError;
use crate::kv::KeyValueStore;

/// Wraps a [`KeyValueStore`] and emits a `trace` event for every call.
///
/// Useful when replaying a session to see exactly which keys each
/// operation touched.
#[derive(Debug, Default)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S: KeyValueStore> TracedStore<S> {
    /// Wrap `inner`.
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped backend.
    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: KeyValueStore> KeyValueStore for TracedStore<S> {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let value = self.inner.get(key)?;
        tracing::trace!(key, hit = value.is_some(), "kv get");
        Ok(value)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        tracing::trace!(key, value = %value, "kv set");
        self.inner.set(key, value)
    }
}
