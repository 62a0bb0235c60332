//! Skill point allocation.
//!
//! One skill point converts into a permanent +1 on intelligence, might, or
//! agility. An allocation persists two fields, stats first and then the
//! counter. The backend has no transactions, so between the two writes a
//! reader can see the raised stat alongside the old counter; the reverse
//! (counter spent, stat not raised) is never observable.

use gridworld_types::{StatName, UserId};

use crate::error::CoreError;
use crate::repository::UserRepository;

/// Spends skill points on attributes.
#[derive(Debug, Clone)]
pub struct ProgressionSystem {
    repo: UserRepository,
}

impl ProgressionSystem {
    /// Create a progression system writing through `repo`.
    pub const fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    /// Spend one of `user_id`'s skill points on `stat`.
    ///
    /// A no-op when no points remain. Returns `true` if a point was spent.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend fails.
    pub fn allocate_skill_point(&self, user_id: &UserId, stat: StatName) -> Result<bool, CoreError> {
        let points = self.repo.get_skill_points(user_id)?.unwrap_or(0);
        let Some(remaining) = points.checked_sub(1) else {
            tracing::debug!(%user_id, stat = stat.as_str(), "No skill points left");
            return Ok(false);
        };

        let stats = self.repo.get_stats(user_id)?.unwrap_or_default();
        let Some(raised) = stats.incremented(stat) else {
            tracing::warn!(%user_id, stat = stat.as_str(), "Stat at maximum, not spending point");
            return Ok(false);
        };

        self.repo.set_stats(user_id, &raised)?;
        self.repo.set_skill_points(user_id, remaining)?;

        tracing::debug!(
            %user_id,
            stat = stat.as_str(),
            value = raised.get(stat),
            remaining,
            "Skill point allocated"
        );
        Ok(true)
    }

    /// Parse and apply an allocation command string.
    ///
    /// Unknown stat names are ignored: no state change, no error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend fails.
    pub fn allocate_command(&self, user_id: &UserId, command: &str) -> Result<bool, CoreError> {
        let Some(stat) = StatName::from_command(command) else {
            tracing::debug!(%user_id, command, "Unknown stat, ignoring");
            return Ok(false);
        };
        self.allocate_skill_point(user_id, stat)
    }
}
