//! Grid-quantized movement.
//!
//! A move shifts one axis by exactly one grid cell and then snaps both axes
//! to the nearest grid line:
//!
//! ```text
//! new = round((old + delta) / grid_size) * grid_size      (per axis)
//! ```
//!
//! Rounding is half-up. On-grid positions therefore land exactly one cell
//! away, while an off-grid starting point is pulled onto the grid by the
//! same write, so positions self-heal from any drift.

use gridworld_types::{Direction, Position, UserId};

use crate::config::GridWorldConfig;
use crate::error::CoreError;
use crate::repository::UserRepository;

/// Applies movement commands to participant positions.
#[derive(Debug, Clone)]
pub struct MovementSystem {
    repo: UserRepository,
    grid_size: i32,
}

impl MovementSystem {
    /// Create a movement system writing through `repo`.
    pub fn new(repo: UserRepository, config: &GridWorldConfig) -> Self {
        Self {
            repo,
            grid_size: config.world.grid_size,
        }
    }

    /// The grid quantum.
    pub const fn grid_size(&self) -> i32 {
        self.grid_size
    }

    /// Move `user_id` one cell in `direction`.
    ///
    /// A participant with no recorded position moves from the spawn point.
    /// Returns the written position, or `None` if the result would leave the
    /// coordinate range (nothing is written in that case).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend fails.
    pub fn move_user(&self, user_id: &UserId, direction: Direction) -> Result<Option<Position>, CoreError> {
        let old = self.repo.get_position(user_id)?.unwrap_or_else(|| self.repo.spawn());
        let Some(new) = step(old, direction, self.grid_size) else {
            tracing::warn!(%user_id, ?old, ?direction, "Move would overflow coordinates, ignoring");
            return Ok(None);
        };
        self.repo.set_position(user_id, new)?;
        tracing::debug!(%user_id, direction = direction.as_str(), ?old, ?new, "Moved");
        Ok(Some(new))
    }

    /// Parse and apply a movement command string.
    ///
    /// Unknown commands are ignored: no state change, no error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the backend fails.
    pub fn move_command(&self, user_id: &UserId, command: &str) -> Result<Option<Position>, CoreError> {
        let Some(direction) = Direction::from_command(command) else {
            tracing::debug!(%user_id, command, "Unknown direction, ignoring");
            return Ok(None);
        };
        self.move_user(user_id, direction)
    }
}

/// One grid step from `from` in `direction`, snapped to the grid.
///
/// Returns `None` on arithmetic overflow or a non-positive grid size.
pub fn step(from: Position, direction: Direction, grid_size: i32) -> Option<Position> {
    let (ux, uy) = direction.unit();
    let x = snap(from.x.checked_add(ux.checked_mul(grid_size)?)?, grid_size)?;
    let y = snap(from.y.checked_add(uy.checked_mul(grid_size)?)?, grid_size)?;
    Some(Position::new(x, y))
}

/// Round `value` to the nearest multiple of `grid_size`, halves rounding up.
///
/// Returns `None` on overflow or a non-positive grid size.
pub fn snap(value: i32, grid_size: i32) -> Option<i32> {
    if grid_size <= 0 {
        return None;
    }
    let v = i64::from(value);
    let g = i64::from(grid_size);
    // floor(v / g + 1/2) == floor((2v + g) / 2g)
    let cells = v.checked_mul(2)?.checked_add(g)?.checked_div_euclid(g.checked_mul(2)?)?;
    i32::try_from(cells.checked_mul(g)?).ok()
}
