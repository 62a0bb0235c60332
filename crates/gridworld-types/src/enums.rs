//! Command enumerations accepted from clients.
//!
//! Both command surfaces are permissive: an unrecognised string does not
//! parse into a variant, and the caller treats the `None` as a no-op rather
//! than an error.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// One grid step in a cardinal direction.
///
/// Screen coordinates: `Up` decreases `y`, `Down` increases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Direction {
    /// Towards negative `y`.
    Up,
    /// Towards positive `y`.
    Down,
    /// Towards negative `x`.
    Left,
    /// Towards positive `x`.
    Right,
}

impl Direction {
    /// All directions, in command-surface order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Parse a movement command (`"up"`, `"down"`, `"left"`, `"right"`).
    ///
    /// Returns `None` for anything else.
    pub fn from_command(command: &str) -> Option<Self> {
        match command {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// The command string for this direction.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Unit step `(dx, dy)` for this direction, in grid cells.
    pub const fn unit(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// An attribute that skill points can be spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum StatName {
    /// Mental attribute.
    Intelligence,
    /// Physical strength.
    Might,
    /// Speed and dexterity.
    Agility,
}

impl StatName {
    /// All allocatable attributes.
    pub const ALL: [Self; 3] = [Self::Intelligence, Self::Might, Self::Agility];

    /// Parse an allocation command (`"intelligence"`, `"might"`, `"agility"`).
    ///
    /// Returns `None` for anything else, including other [`Stats`] fields
    /// such as `"hp"` or `"gold"`.
    ///
    /// [`Stats`]: crate::structs::Stats
    pub fn from_command(command: &str) -> Option<Self> {
        match command {
            "intelligence" => Some(Self::Intelligence),
            "might" => Some(Self::Might),
            "agility" => Some(Self::Agility),
            _ => None,
        }
    }

    /// The command string for this attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intelligence => "intelligence",
            Self::Might => "might",
            Self::Agility => "agility",
        }
    }
}
