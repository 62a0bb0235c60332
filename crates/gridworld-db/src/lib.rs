//! Storage layer for the Gridworld simulation.
//!
//! The shared world is persisted in an opaque key-value backend with two
//! scopes: *user* (owned by one session) and *global* (readable by all).
//! This crate defines the injected port the core talks to and the key
//! layout every participant field is stored under.
//!
//! ```text
//! Repository / AuthoritativeStore
//!     |
//!     +-- KeyValueStore (port)
//!         |-- MemoryStore     (in-process map)
//!         +-- TracedStore<S>  (logs every call, forwards to S)
//! ```
//!
//! # Modules
//!
//! - [`kv`] -- The [`KeyValueStore`] trait and typed JSON helpers
//! - [`keys`] -- Key composition (`{scope}:{userId}##{field}`)
//! - [`memory`] -- In-memory backend
//! - [`traced`] -- Tracing decorator
//! - [`error`] -- Shared error types

pub mod error;
pub mod keys;
pub mod kv;
pub mod memory;
pub mod traced;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use keys::{PARTICIPANTS_KEY, Scope, UserField};
pub use kv::{KeyValueStore, KeyValueStoreExt};
pub use memory::MemoryStore;
pub use traced::TracedStore;
