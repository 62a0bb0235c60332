//! Error types for the storage layer.
//!
//! All backend failures are propagated via [`StoreError`]. A value that is
//! present but has the wrong shape is not an error at this layer; see
//! [`KeyValueStoreExt::get_json`](crate::kv::KeyValueStoreExt::get_json).

/// Errors that can occur while talking to a key-value backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend's internal lock was poisoned by a panicking writer.
    #[error("backend lock poisoned: {0}")]
    LockPoisoned(String),

    /// An outgoing value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
