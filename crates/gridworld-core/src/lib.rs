//! Authoritative store, movement, and progression for the Gridworld
//! simulation.
//!
//! Control flow for a client action:
//!
//! ```text
//! move / allocate
//!     |
//!     +-- MovementSystem / ProgressionSystem
//!     |       +-- UserRepository --> KeyValueStore
//!     |
//!     +-- AuthoritativeStore::get_snapshot --> Snapshot (to the client)
//! ```
//!
//! # Modules
//!
//! - [`clock`] -- [`Clock`] port with system and manual implementations
//! - [`config`] -- Configuration loading from `gridworld-config.yaml`
//! - [`error`] -- [`CoreError`]
//! - [`movement`] -- Grid-quantized [`MovementSystem`]
//! - [`progression`] -- Skill point allocation ([`ProgressionSystem`])
//! - [`repository`] -- Per-participant record accessors ([`UserRepository`])
//! - [`store`] -- Registration and snapshot assembly ([`AuthoritativeStore`])
//!
//! [`Clock`]: clock::Clock
//! [`CoreError`]: error::CoreError
//! [`MovementSystem`]: movement::MovementSystem
//! [`ProgressionSystem`]: progression::ProgressionSystem
//! [`UserRepository`]: repository::UserRepository
//! [`AuthoritativeStore`]: store::AuthoritativeStore

pub mod clock;
pub mod config;
pub mod error;
pub mod movement;
pub mod progression;
pub mod repository;
pub mod store;

// Re-export primary types at crate root for convenience.
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, GridWorldConfig};
pub use error::CoreError;
pub use movement::MovementSystem;
pub use progression::ProgressionSystem;
pub use repository::{Identity, UserRepository};
pub use store::{AuthoritativeStore, MISSING_NAME_SENTINEL, OwnerSeed, SeedUser};
