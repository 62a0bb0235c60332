//! Merging snapshots into the local entity list.
//!
//! The engine keeps an arena of [`LocalEntity`] values in scene order plus
//! an id-to-slot index. Each accepted snapshot is merged in three passes:
//!
//! ```text
//! snapshot (timestamp > last applied?) --no--> Stale, nothing touched
//!     |
//!     +-- upsert every scene entry     (new id -> create, known id -> update in place)
//!     +-- drop ids missing from sceneById (dispose render handle once)
//!     +-- rebuild index, record timestamp, refresh player slot
//! ```
//!
//! Render handles survive updates, so the rendering layer can keep the same
//! visual object for a participant for as long as it stays in the world.

use std::collections::{BTreeMap, BTreeSet};

use gridworld_types::{Position, SceneEntry, Snapshot, UserId};
use serde::Deserialize;
use serde_json::Value;

use crate::entity::{LocalEntity, RenderHandle};

/// The part of a transported scene entry that reconciliation reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEntry {
    user_id: UserId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    position: Position,
}

impl From<WireEntry> for SceneEntry {
    fn from(wire: WireEntry) -> Self {
        Self {
            user_id: wire.user_id,
            name: wire.name.unwrap_or_default(),
            position: wire.position,
            updated_at: None,
        }
    }
}

/// What [`ReconciliationEngine::apply`] did with a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The snapshot was merged.
    Applied {
        /// Entities created for first-seen participants.
        created: usize,
        /// Existing entities updated in place.
        updated: usize,
        /// Entities removed because their participant left.
        removed: usize,
    },
    /// The snapshot was not newer than the last applied one and was dropped.
    Stale {
        /// Timestamp of the dropped snapshot.
        timestamp: i64,
        /// Timestamp of the snapshot currently applied.
        last_applied: i64,
    },
    /// The payload was absent or its scene was not a list.
    Malformed,
}

impl ApplyOutcome {
    /// Whether the local entity list was changed.
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Client-side view of the world, rebuilt incrementally from snapshots.
#[derive(Debug)]
pub struct ReconciliationEngine<H> {
    last_applied: Option<i64>,
    entities: Vec<LocalEntity<H>>,
    index: BTreeMap<UserId, usize>,
    owner: Option<UserId>,
    player: Option<usize>,
}

impl<H> Default for ReconciliationEngine<H> {
    fn default() -> Self {
        Self {
            last_applied: None,
            entities: Vec::new(),
            index: BTreeMap::new(),
            owner: None,
            player: None,
        }
    }
}

impl<H: RenderHandle> ReconciliationEngine<H> {
    /// An engine that has not applied any snapshot yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `snapshot` into the local entity list on behalf of `owner`.
    ///
    /// Snapshots must arrive with strictly increasing timestamps; anything
    /// else is dropped untouched, so retried or overlapping polls are
    /// harmless and applying the same snapshot twice changes nothing.
    pub fn apply(&mut self, snapshot: &Snapshot, owner: &UserId) -> ApplyOutcome {
        self.merge(
            snapshot.timestamp(),
            snapshot.scene(),
            |id| snapshot.scene_by_id().contains_key(id),
            owner,
        )
    }

    /// Parse a transported snapshot and merge it.
    ///
    /// Only an absent payload (`null` or not JSON) or a `scene` that is not
    /// a list is rejected, with a warning. Only the fields reconciliation
    /// reads are decoded:
    ///
    /// - `currentUser` and `users` are ignored
    /// - a missing `timestamp` counts as 0
    /// - a missing `sceneById` counts as empty
    /// - a scene entry without a usable `userId` is skipped
    pub fn apply_json(&mut self, payload: &str, owner: &UserId) -> ApplyOutcome {
        let value: Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Rejecting unparseable snapshot payload");
                return ApplyOutcome::Malformed;
            }
        };
        if value.is_null() {
            tracing::warn!("Rejecting absent snapshot");
            return ApplyOutcome::Malformed;
        }
        let Some(raw_scene) = value.get("scene").and_then(Value::as_array) else {
            tracing::warn!("Rejecting snapshot whose scene is not a list");
            return ApplyOutcome::Malformed;
        };

        let timestamp = value.get("timestamp").and_then(Value::as_i64).unwrap_or(0);
        let scene: Vec<SceneEntry> = raw_scene
            .iter()
            .filter_map(|raw| match WireEntry::deserialize(raw) {
                Ok(entry) => Some(entry.into()),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable scene entry");
                    None
                }
            })
            .collect();
        let listed: BTreeSet<UserId> = value
            .get("sceneById")
            .and_then(Value::as_object)
            .map(|by_id| by_id.keys().map(|k| UserId::from(k.as_str())).collect())
            .unwrap_or_default();

        self.merge(timestamp, &scene, |id| listed.contains(id), owner)
    }

    /// Staleness guard, upsert, removal, and bookkeeping for one snapshot.
    ///
    /// `listed` answers whether an id is present in the snapshot's index;
    /// entities it rejects are removed.
    fn merge(
        &mut self,
        timestamp: i64,
        scene: &[SceneEntry],
        listed: impl Fn(&UserId) -> bool,
        owner: &UserId,
    ) -> ApplyOutcome {
        if let Some(last_applied) = self.last_applied.filter(|&last| timestamp <= last) {
            tracing::debug!(timestamp, last_applied, "Dropping stale snapshot");
            return ApplyOutcome::Stale {
                timestamp,
                last_applied,
            };
        }

        let mut created: usize = 0;
        let mut updated: usize = 0;
        for entry in scene {
            let existing = self
                .index
                .get(&entry.user_id)
                .and_then(|&slot| self.entities.get_mut(slot));
            if let Some(entity) = existing {
                entity.refresh(entry);
                updated = updated.saturating_add(1);
            } else {
                self.index.insert(entry.user_id.clone(), self.entities.len());
                self.entities.push(LocalEntity::from_entry(entry));
                created = created.saturating_add(1);
                tracing::debug!(user_id = %entry.user_id, name = entry.name, "Entity created");
            }
        }

        let (kept, gone): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entities)
            .into_iter()
            .partition(|entity| listed(entity.id()));
        self.entities = kept;
        let removed = gone.len();
        for mut entity in gone {
            tracing::debug!(user_id = %entity.id(), "Entity removed");
            if let Some(handle) = entity.take_render() {
                handle.dispose();
            }
        }

        self.index = self
            .entities
            .iter()
            .enumerate()
            .map(|(slot, entity)| (entity.id().clone(), slot))
            .collect();
        self.last_applied = Some(timestamp);
        self.player = self.index.get(owner).copied();
        self.owner = Some(owner.clone());

        ApplyOutcome::Applied {
            created,
            updated,
            removed,
        }
    }

    /// Attach a render handle to a participant's entity.
    ///
    /// A previously attached handle is disposed. If no entity exists for
    /// `user_id` the handle is handed back untouched.
    ///
    /// # Errors
    ///
    /// Returns `Err(handle)` when `user_id` has no local entity.
    pub fn attach_render(&mut self, user_id: &UserId, handle: H) -> Result<(), H> {
        let Some(entity) = self.index.get(user_id).and_then(|&slot| self.entities.get_mut(slot))
        else {
            return Err(handle);
        };
        if let Some(previous) = entity.replace_render(handle) {
            previous.dispose();
        }
        Ok(())
    }
}

impl<H> ReconciliationEngine<H> {
    /// Timestamp of the last applied snapshot, `None` before the first.
    pub const fn last_applied(&self) -> Option<i64> {
        self.last_applied
    }

    /// Entities in scene order.
    pub fn entities(&self) -> &[LocalEntity<H>] {
        &self.entities
    }

    /// Mutable entities in scene order, for the render loop.
    pub fn entities_mut(&mut self) -> &mut [LocalEntity<H>] {
        &mut self.entities
    }

    /// The entity for `user_id`, if present.
    pub fn get(&self, user_id: &UserId) -> Option<&LocalEntity<H>> {
        self.index.get(user_id).and_then(|&slot| self.entities.get(slot))
    }

    /// The entity belonging to the owner of the last applied snapshot.
    pub fn player(&self) -> Option<&LocalEntity<H>> {
        self.player.and_then(|slot| self.entities.get(slot))
    }

    /// Owner id passed with the last applied snapshot.
    pub const fn owner(&self) -> Option<&UserId> {
        self.owner.as_ref()
    }

    /// Number of local entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entities are held.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
