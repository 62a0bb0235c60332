//! Per-participant record accessors.
//!
//! A participant's record is logically one entity but physically a handful
//! of independently keyed fields (see [`gridworld_db::keys`]). There is no
//! multi-field transaction: every setter replaces exactly one field
//! wholesale and readers may observe the fields at different points in
//! time.
//!
//! Getters return `None` when a field was never written (or holds data of
//! the wrong shape); callers decide which documented default applies.

use std::sync::Arc;

use gridworld_db::{KeyValueStore, KeyValueStoreExt, PARTICIPANTS_KEY, UserField};
use gridworld_types::{InventoryItem, Position, PositionMarker, Stats, UserId};

use crate::clock::Clock;
use crate::config::GridWorldConfig;
use crate::error::CoreError;

/// The identity a session registers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The session's participant id.
    pub user_id: UserId,
    /// The name other participants see.
    pub display_name: String,
}

impl Identity {
    /// Bundle an id with its display name.
    pub fn new(user_id: impl Into<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Typed access to participant records over an injected backend.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    spawn: Position,
    starting_skill_points: u32,
}

impl core::fmt::Debug for UserRepository {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserRepository")
            .field("spawn", &self.spawn)
            .field("starting_skill_points", &self.starting_skill_points)
            .finish_non_exhaustive()
    }
}

impl UserRepository {
    /// Create a repository over `store`, stamping writes from `clock`.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: &GridWorldConfig,
    ) -> Self {
        Self {
            store,
            clock,
            spawn: config.spawn.position(),
            starting_skill_points: config.registration.starting_skill_points,
        }
    }

    /// The position used when none has been recorded.
    pub const fn spawn(&self) -> Position {
        self.spawn
    }

    // =========================================================================
    // Participant list -- global:ul
    // =========================================================================

    /// All registered participants, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend read fails.
    pub fn participants(&self) -> Result<Vec<UserId>, CoreError> {
        Ok(self
            .store
            .get_json::<Vec<UserId>>(PARTICIPANTS_KEY)?
            .unwrap_or_default())
    }

    /// Whether `user_id` is already a registered participant.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend read fails.
    pub fn is_participant(&self, user_id: &UserId) -> Result<bool, CoreError> {
        Ok(self.participants()?.contains(user_id))
    }

    /// Append `user_id` to the participant list unless already present.
    ///
    /// Returns `true` if the id was newly added. The read-modify-write is not
    /// atomic; it relies on a single writer per store.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend read or write fails.
    pub fn add_participant(&self, user_id: &UserId) -> Result<bool, CoreError> {
        let mut users = self.participants()?;
        if users.contains(user_id) {
            return Ok(false);
        }
        users.push(user_id.clone());
        self.store.set_json(PARTICIPANTS_KEY, &users)?;
        Ok(true)
    }

    /// Empty the participant list. Per-user fields are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend write fails.
    pub fn clear_participants(&self) -> Result<(), CoreError> {
        self.store.set_json(PARTICIPANTS_KEY, &Vec::<UserId>::new())?;
        Ok(())
    }

    // =========================================================================
    // Record lifecycle
    // =========================================================================

    /// Register `identity` and seed its record on first sight.
    ///
    /// Idempotent: a known participant is left untouched. A new one gets the
    /// starting skill points, an empty inventory, baseline stats, its display
    /// name, and the spawn position. Returns `true` if a record was created.
    ///
    /// The id is listed only after every field is written, so a failed call
    /// leaves the participant unlisted and a retry seeds it again in full.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if any backend call fails.
    pub fn create_user(&self, identity: &Identity) -> Result<bool, CoreError> {
        let user_id = &identity.user_id;
        if self.is_participant(user_id)? {
            tracing::debug!(%user_id, "Participant already registered");
            return Ok(false);
        }

        self.set_skill_points(user_id, self.starting_skill_points)?;
        self.set_inventory(user_id, &[])?;
        self.set_stats(user_id, &Stats::default())?;
        self.set_display_name(user_id, &identity.display_name)?;
        self.set_position(user_id, self.spawn)?;
        if !self.add_participant(user_id)? {
            tracing::debug!(%user_id, "Participant listed concurrently");
            return Ok(false);
        }

        tracing::info!(
            %user_id,
            display_name = identity.display_name,
            skill_points = self.starting_skill_points,
            "Participant registered"
        );
        Ok(true)
    }

    // =========================================================================
    // Position -- global:{id}##pos
    // =========================================================================

    /// The last recorded position marker.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend read fails.
    pub fn get_position_marker(&self, user_id: &UserId) -> Result<Option<PositionMarker>, CoreError> {
        Ok(self.store.get_json(&UserField::Position.key(user_id))?)
    }

    /// The last recorded position, or `None` if none was ever written.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend read fails.
    pub fn get_position(&self, user_id: &UserId) -> Result<Option<Position>, CoreError> {
        Ok(self.get_position_marker(user_id)?.map(|m| m.position))
    }

    /// Record a new position stamped with the current time.
    ///
    /// Always overwrites; last write wins.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend write fails.
    pub fn set_position(&self, user_id: &UserId, position: Position) -> Result<PositionMarker, CoreError> {
        let marker = PositionMarker {
            position,
            timestamp: self.clock.now_millis(),
        };
        self.store.set_json(&UserField::Position.key(user_id), &marker)?;
        Ok(marker)
    }

    // =========================================================================
    // Stats -- global:{id}##stats
    // =========================================================================

    /// The recorded stats, normalised over the baseline.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend read fails.
    pub fn get_stats(&self, user_id: &UserId) -> Result<Option<Stats>, CoreError> {
        Ok(self.store.get_json(&UserField::Stats.key(user_id))?)
    }

    /// Replace the stats wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend write fails.
    pub fn set_stats(&self, user_id: &UserId, stats: &Stats) -> Result<(), CoreError> {
        self.store.set_json(&UserField::Stats.key(user_id), stats)?;
        Ok(())
    }

    // =========================================================================
    // Skill points -- user:{id}##sp
    // =========================================================================

    /// The unspent skill point counter.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend read fails.
    pub fn get_skill_points(&self, user_id: &UserId) -> Result<Option<u32>, CoreError> {
        Ok(self.store.get_json(&UserField::SkillPoints.key(user_id))?)
    }

    /// Overwrite the skill point counter.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend write fails.
    pub fn set_skill_points(&self, user_id: &UserId, points: u32) -> Result<(), CoreError> {
        self.store.set_json(&UserField::SkillPoints.key(user_id), &points)?;
        Ok(())
    }

    // =========================================================================
    // Display name -- global:{id}##displayName
    // =========================================================================

    /// The recorded display name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend read fails.
    pub fn get_display_name(&self, user_id: &UserId) -> Result<Option<String>, CoreError> {
        Ok(self.store.get_json(&UserField::DisplayName.key(user_id))?)
    }

    /// Overwrite the display name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend write fails.
    pub fn set_display_name(&self, user_id: &UserId, name: &str) -> Result<(), CoreError> {
        self.store.set_json(&UserField::DisplayName.key(user_id), name)?;
        Ok(())
    }

    // =========================================================================
    // Inventory -- user:{id}##inv
    // =========================================================================

    /// The carried items, in order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend read fails.
    pub fn get_inventory(&self, user_id: &UserId) -> Result<Option<Vec<InventoryItem>>, CoreError> {
        Ok(self.store.get_json(&UserField::Inventory.key(user_id))?)
    }

    /// Replace the inventory wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend write fails.
    pub fn set_inventory(&self, user_id: &UserId, items: &[InventoryItem]) -> Result<(), CoreError> {
        self.store.set_json(&UserField::Inventory.key(user_id), items)?;
        Ok(())
    }
}
