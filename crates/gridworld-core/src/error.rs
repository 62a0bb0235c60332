//! Error types for the gridworld-core crate.
//!
//! Domain-level refusals (unknown direction, unknown stat, no skill points,
//! stale snapshot) are not errors: they are no-ops with a debug log. The
//! only failures that surface here come from the storage backend.

use gridworld_db::StoreError;

/// Errors that can occur in repository, store, or system operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The key-value backend failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying backend error.
        #[from]
        source: StoreError,
    },
}
