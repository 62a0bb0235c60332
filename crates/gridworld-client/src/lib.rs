//! Client-side reconciliation of world snapshots.
//!
//! A client polls the authoritative store for [`Snapshot`]s and merges each
//! one into a local, render-stable entity list with
//! [`ReconciliationEngine::apply`] (or [`ReconciliationEngine::apply_json`]
//! straight off the wire). The rendering layer attaches its own visual
//! objects through the [`RenderHandle`] trait; the engine keeps them stable
//! across updates and disposes them when a participant leaves.
//!
//! # Modules
//!
//! - [`entity`] -- [`LocalEntity`], [`Character`], [`RenderHandle`]
//! - [`reconcile`] -- [`ReconciliationEngine`] and [`ApplyOutcome`]
//!
//! [`Snapshot`]: gridworld_types::Snapshot
//! [`ReconciliationEngine::apply`]: reconcile::ReconciliationEngine::apply
//! [`ReconciliationEngine::apply_json`]: reconcile::ReconciliationEngine::apply_json
//! [`RenderHandle`]: entity::RenderHandle
//! [`LocalEntity`]: entity::LocalEntity
//! [`Character`]: entity::Character
//! [`ReconciliationEngine`]: reconcile::ReconciliationEngine
//! [`ApplyOutcome`]: reconcile::ApplyOutcome

pub mod entity;
pub mod reconcile;

pub use entity::{Character, LocalEntity, RenderHandle};
pub use reconcile::{ApplyOutcome, ReconciliationEngine};
