//! Error types for the session driver binary.

/// Top-level error for the session driver.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: gridworld_core::ConfigError,
    },

    /// A store, movement, or progression call failed.
    #[error("core error: {source}")]
    Core {
        /// The underlying core error.
        #[from]
        source: gridworld_core::CoreError,
    },

    /// A snapshot could not be encoded for transport.
    #[error("snapshot encoding failed: {source}")]
    Encode {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// Backend inspection failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: gridworld_db::StoreError,
    },
}
