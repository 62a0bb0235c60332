//! Shared type definitions for the Gridworld shared-world simulation.
//!
//! This crate is the single source of truth for the data model exchanged
//! between the authoritative store and its clients. Wire types flow
//! downstream to `TypeScript` via `ts-rs` for browser clients.
//!
//! # Modules
//!
//! - [`ids`] -- The opaque [`UserId`] participant identifier
//! - [`enums`] -- Command enumerations ([`Direction`], [`StatName`])
//! - [`structs`] -- Per-participant records (position, stats, inventory)
//! - [`snapshot`] -- The [`Snapshot`] wire format and its projections

pub mod enums;
pub mod ids;
pub mod snapshot;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Direction, StatName};
pub use ids::UserId;
pub use snapshot::{CurrentUserView, SceneEntry, Snapshot};
pub use structs::{InventoryItem, Position, PositionMarker, Stats};
