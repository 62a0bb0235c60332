//! The authoritative world store.
//!
//! [`AuthoritativeStore`] owns participant registration and assembles the
//! [`Snapshot`] every client polls. Snapshot assembly only reads from the
//! repository, so any number of observers may call it back to back.
//!
//! # Snapshot Assembly
//!
//! ```text
//! participants (global:ul)
//!     |
//!     +-- for each id: position marker + display name --> SceneEntry
//!     |       (missing marker -> spawn point, updatedAt = null)
//!     |       (missing name   -> "ERROR")
//!     |
//!     +-- observer only: stats, position, skill points, inventory
//!     |
//!     +-- stamp: max(now, previous stamp + 1)
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use gridworld_db::KeyValueStore;
use gridworld_types::{CurrentUserView, InventoryItem, Position, SceneEntry, Snapshot, Stats, UserId};

use crate::clock::Clock;
use crate::config::GridWorldConfig;
use crate::error::CoreError;
use crate::repository::{Identity, UserRepository};

/// Name shown for a participant whose display name was never recorded.
///
/// Its appearance means registration went wrong; it is never replaced by a
/// plausible-looking name.
pub const MISSING_NAME_SENTINEL: &str = "ERROR";

/// A fully specified participant for bootstrap and test scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUser {
    /// Id and display name.
    pub identity: Identity,
    /// Starting position (written as-is, not snapped).
    pub position: Position,
    /// Starting stats. Build with `..Stats::default()` to override a subset.
    pub stats: Stats,
    /// Owner-only state, written only when present.
    pub owner: Option<OwnerSeed>,
}

/// Owner-only fields of a [`SeedUser`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OwnerSeed {
    /// Unspent skill points.
    pub skill_points: u32,
    /// Carried items.
    pub inventory: Vec<InventoryItem>,
}

/// Registers participants and assembles world snapshots.
pub struct AuthoritativeStore {
    repo: UserRepository,
    clock: Arc<dyn Clock>,
    last_stamp: AtomicI64,
}

impl core::fmt::Debug for AuthoritativeStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthoritativeStore")
            .field("repo", &self.repo)
            .field("last_stamp", &self.last_stamp.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl AuthoritativeStore {
    /// Create a store over the injected backend and clock.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: &GridWorldConfig,
    ) -> Self {
        let repo = UserRepository::new(store, Arc::clone(&clock), config);
        Self {
            repo,
            clock,
            last_stamp: AtomicI64::new(i64::MIN),
        }
    }

    /// The repository this store reads from.
    pub const fn repository(&self) -> &UserRepository {
        &self.repo
    }

    /// Register `identity` as a participant, seeding its record on first
    /// sight.
    ///
    /// Safe to call any number of times: the participant list never holds
    /// the same id twice. Returns `true` if the participant was new.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend fails.
    pub fn register_participant(&self, identity: &Identity) -> Result<bool, CoreError> {
        self.repo.create_user(identity)
    }

    /// Clear the participant list.
    ///
    /// Bootstrap and test use only; per-user fields remain in the backend
    /// and a participant registering again is re-seeded from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend write fails.
    pub fn reset(&self) -> Result<(), CoreError> {
        self.repo.clear_participants()?;
        tracing::info!("Participant list reset");
        Ok(())
    }

    /// Write a fully specified participant and register it.
    ///
    /// Unlike [`register_participant`](Self::register_participant) this
    /// overwrites any existing fields, but still never duplicates the
    /// participant list entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend fails.
    pub fn seed_user(&self, seed: &SeedUser) -> Result<(), CoreError> {
        let user_id = &seed.identity.user_id;
        self.repo.set_display_name(user_id, &seed.identity.display_name)?;
        self.repo.set_position(user_id, seed.position)?;
        self.repo.set_stats(user_id, &seed.stats)?;
        if let Some(owner) = &seed.owner {
            self.repo.set_skill_points(user_id, owner.skill_points)?;
            self.repo.set_inventory(user_id, &owner.inventory)?;
        }
        let added = self.repo.add_participant(user_id)?;
        tracing::info!(
            %user_id,
            display_name = seed.identity.display_name,
            newly_listed = added,
            "Seeded participant"
        );
        Ok(())
    }

    /// Assemble a fresh snapshot of the world as seen by `current_user`.
    ///
    /// Read-only with respect to the repository. The returned snapshot is a
    /// value; later writes only show up in the next one.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if a backend read fails.
    pub fn get_snapshot(&self, current_user: &UserId) -> Result<Snapshot, CoreError> {
        let participants = self.repo.participants()?;
        let mut scene = Vec::with_capacity(participants.len());

        for user_id in participants {
            let marker = self.repo.get_position_marker(&user_id)?;
            let name = self.name_or_sentinel(&user_id)?;
            scene.push(SceneEntry {
                position: marker.map_or(self.repo.spawn(), |m| m.position),
                updated_at: marker.map(|m| m.timestamp),
                user_id,
                name,
            });
        }

        // Owner-only fields are fetched directly, not via the public scene.
        let marker = self.repo.get_position_marker(current_user)?;
        let view = CurrentUserView {
            user_id: current_user.clone(),
            name: self.name_or_sentinel(current_user)?,
            position: marker.map_or(self.repo.spawn(), |m| m.position),
            updated_at: marker.map(|m| m.timestamp),
            stats: self.repo.get_stats(current_user)?.unwrap_or_default(),
            skillpoints: self.repo.get_skill_points(current_user)?.unwrap_or(0),
            inventory: self.repo.get_inventory(current_user)?.unwrap_or_default(),
        };

        let timestamp = self.next_stamp();
        tracing::debug!(
            %current_user,
            timestamp,
            participants = scene.len(),
            "Assembled snapshot"
        );
        Ok(Snapshot::new(timestamp, scene, view))
    }

    fn name_or_sentinel(&self, user_id: &UserId) -> Result<String, CoreError> {
        if let Some(name) = self.repo.get_display_name(user_id)? {
            return Ok(name);
        }
        tracing::warn!(%user_id, "Participant has no display name, using sentinel");
        Ok(MISSING_NAME_SENTINEL.to_owned())
    }

    /// Current time, bumped past the previous stamp if the clock has not
    /// moved.
    fn next_stamp(&self) -> i64 {
        let now = self.clock.now_millis();
        let previous = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or(i64::MIN);
        now.max(previous.saturating_add(1))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use gridworld_db::{KeyValueStoreExt, MemoryStore, UserField};

    use super::*;
    use crate::clock::ManualClock;

    struct Fixture {
        store: AuthoritativeStore,
        backend: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
    }

    fn fixture() -> Fixture {
        let backend = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(1_000));
        let store = AuthoritativeStore::new(
            Arc::clone(&backend) as Arc<dyn KeyValueStore>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            &GridWorldConfig::default(),
        );
        Fixture { store, backend, clock }
    }

    fn alice() -> Identity {
        Identity::new("u_123", "Alice")
    }

    fn bob() -> Identity {
        Identity::new("u_456", "Bob")
    }

    #[test]
    fn register_never_duplicates() {
        let f = fixture();
        assert!(f.store.register_participant(&alice()).unwrap());
        assert!(!f.store.register_participant(&alice()).unwrap());
        assert!(f.store.register_participant(&bob()).unwrap());
        assert!(!f.store.register_participant(&alice()).unwrap());
        let users = f.store.repository().participants().unwrap();
        assert_eq!(users, vec![alice().user_id, bob().user_id]);
    }

    #[test]
    fn snapshot_lists_participants_in_registration_order() {
        let f = fixture();
        f.store.register_participant(&bob()).unwrap();
        f.store.register_participant(&alice()).unwrap();
        let snap = f.store.get_snapshot(&alice().user_id).unwrap();
        assert_eq!(snap.users(), &[bob().user_id, alice().user_id]);
        assert_eq!(snap.scene()[0].name, "Bob");
        assert_eq!(snap.scene()[1].name, "Alice");
        for entry in snap.scene() {
            assert_eq!(snap.entry(&entry.user_id), Some(entry));
        }
    }

    #[test]
    fn current_user_view_carries_private_fields() {
        let f = fixture();
        f.store.register_participant(&alice()).unwrap();
        let snap = f.store.get_snapshot(&alice().user_id).unwrap();
        let me = snap.current_user();
        assert_eq!(me.user_id, alice().user_id);
        assert_eq!(me.name, "Alice");
        assert_eq!(me.position, Position::new(200, 150));
        assert_eq!(me.updated_at, Some(1_000));
        assert_eq!(me.stats, Stats::default());
        assert_eq!(me.skillpoints, 3);
        assert!(me.inventory.is_empty());
    }

    #[test]
    fn unwritten_user_gets_defaults() {
        let f = fixture();
        let ghost = UserId::from("u_ghost");
        let snap = f.store.get_snapshot(&ghost).unwrap();
        let me = snap.current_user();
        assert_eq!(me.user_id, ghost);
        assert_eq!(me.position, Position::new(200, 150));
        assert_eq!(me.updated_at, None);
        assert_eq!(me.stats, Stats::default());
        assert_eq!(me.skillpoints, 0);
        assert!(me.inventory.is_empty());
        assert!(snap.scene().is_empty());
    }

    #[test]
    fn missing_marker_and_name_use_spawn_and_sentinel() {
        let f = fixture();
        let orphan = UserId::from("u_orphan");
        f.store.repository().add_participant(&orphan).unwrap();
        let snap = f.store.get_snapshot(&orphan).unwrap();
        let entry = snap.entry(&orphan).unwrap();
        assert_eq!(entry.name, MISSING_NAME_SENTINEL);
        assert_eq!(entry.position, Position::new(200, 150));
        assert_eq!(entry.updated_at, None);
    }

    #[test]
    fn snapshot_does_not_write() {
        let f = fixture();
        f.store.register_participant(&alice()).unwrap();
        let keys_before = f.backend.keys().unwrap();
        let list_before = f.backend.get("global:ul").unwrap();
        let _ = f.store.get_snapshot(&alice().user_id).unwrap();
        let _ = f.store.get_snapshot(&UserId::from("u_ghost")).unwrap();
        assert_eq!(f.backend.keys().unwrap(), keys_before);
        assert_eq!(f.backend.get("global:ul").unwrap(), list_before);
    }

    #[test]
    fn snapshot_is_frozen_after_assembly() {
        let f = fixture();
        f.store.register_participant(&alice()).unwrap();
        let snap = f.store.get_snapshot(&alice().user_id).unwrap();
        f.store
            .repository()
            .set_position(&alice().user_id, Position::new(0, 0))
            .unwrap();
        assert_eq!(snap.current_user().position, Position::new(200, 150));
        let next = f.store.get_snapshot(&alice().user_id).unwrap();
        assert_eq!(next.current_user().position, Position::new(0, 0));
    }

    #[test]
    fn stamps_strictly_increase_on_a_frozen_clock() {
        let f = fixture();
        let a = f.store.get_snapshot(&alice().user_id).unwrap();
        let b = f.store.get_snapshot(&alice().user_id).unwrap();
        assert_eq!(a.timestamp(), 1_000);
        assert_eq!(b.timestamp(), 1_001);
        f.clock.set(5_000);
        let c = f.store.get_snapshot(&alice().user_id).unwrap();
        assert_eq!(c.timestamp(), 5_000);
    }

    #[test]
    fn reset_clears_the_participant_list() {
        let f = fixture();
        f.store.register_participant(&alice()).unwrap();
        f.store.reset().unwrap();
        let snap = f.store.get_snapshot(&alice().user_id).unwrap();
        assert!(snap.scene().is_empty());
        assert!(f.store.register_participant(&alice()).unwrap());
    }

    #[test]
    fn seed_user_writes_everything_once() {
        let f = fixture();
        let seed = SeedUser {
            identity: alice(),
            position: Position::new(200, 150),
            stats: Stats {
                intelligence: 2,
                might: 1,
                ..Stats::default()
            },
            owner: Some(OwnerSeed {
                skill_points: 1,
                inventory: vec![InventoryItem::from("sword"), InventoryItem::from("potion")],
            }),
        };
        f.store.seed_user(&seed).unwrap();
        f.store.seed_user(&seed).unwrap();

        let snap = f.store.get_snapshot(&alice().user_id).unwrap();
        assert_eq!(snap.users().len(), 1);
        let me = snap.current_user();
        assert_eq!(me.stats.intelligence, 2);
        assert_eq!(me.stats.might, 1);
        assert_eq!(me.stats.max_hp, 100);
        assert_eq!(me.skillpoints, 1);
        assert_eq!(me.inventory.len(), 2);
    }

    #[test]
    fn seed_without_owner_state_leaves_counters_unset() {
        let f = fixture();
        f.store
            .seed_user(&SeedUser {
                identity: bob(),
                position: Position::new(240, 150),
                stats: Stats::default(),
                owner: None,
            })
            .unwrap();
        let sp: Option<u32> = f
            .backend
            .get_json(&UserField::SkillPoints.key(&bob().user_id))
            .unwrap();
        assert!(sp.is_none());
        let snap = f.store.get_snapshot(&alice().user_id).unwrap();
        assert_eq!(snap.entry(&bob().user_id).unwrap().position, Position::new(240, 150));
    }

    #[test]
    fn wire_snapshot_roundtrips() {
        let f = fixture();
        f.store.register_participant(&alice()).unwrap();
        f.store.register_participant(&bob()).unwrap();
        let snap = f.store.get_snapshot(&alice().user_id).unwrap();
        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
