//! Core record types stored per participant.
//!
//! Every type here normalises at construction: stored JSON that is missing
//! fields is completed from defaults by `serde` while it is decoded, so the
//! rest of the workspace never sees a partially-shaped record.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::StatName;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Integer world coordinates.
///
/// After any mutation through the movement system both coordinates are
/// multiples of the grid size. Decoding is lenient: fractional numbers are
/// truncated toward zero and a missing axis reads as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Horizontal coordinate.
    #[serde(default, deserialize_with = "coerce_coordinate")]
    pub x: i32,
    /// Vertical coordinate.
    #[serde(default, deserialize_with = "coerce_coordinate")]
    pub y: i32,
}

impl Position {
    /// Create a position from raw coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are multiples of `grid_size`.
    ///
    /// A non-positive grid size never aligns.
    pub fn is_on_grid(self, grid_size: i32) -> bool {
        if grid_size <= 0 {
            return false;
        }
        self.x.checked_rem(grid_size) == Some(0) && self.y.checked_rem(grid_size) == Some(0)
    }
}

/// Decode one coordinate from any JSON number.
fn coerce_coordinate<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    struct CoordinateVisitor;

    impl Visitor<'_> for CoordinateVisitor {
        type Value = i32;

        fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.write_str("a numeric coordinate")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i32, E> {
            Ok(i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX }))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i32, E> {
            Ok(i32::try_from(v).unwrap_or(i32::MAX))
        }

        #[allow(clippy::cast_possible_truncation)]
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i32, E> {
            // `as` saturates at the i32 bounds.
            Ok(if v.is_finite() { v.trunc() as i32 } else { 0 })
        }
    }

    deserializer.deserialize_any(CoordinateVisitor)
}

/// A recorded position together with the instant it was written.
///
/// The timestamp orders writes by recency; it is never used to merge
/// conflicting writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PositionMarker {
    /// Where the participant stands.
    pub position: Position,
    /// Wall-clock milliseconds of the producing write.
    pub timestamp: i64,
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Character statistics.
///
/// `hp` is not bounded by `max_hp` in this model. Missing fields decode to
/// the level-1 baseline from [`Stats::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Stats {
    /// Character level.
    pub level: u32,
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Intelligence attribute.
    pub intelligence: u32,
    /// Might attribute.
    pub might: u32,
    /// Agility attribute.
    pub agility: u32,
    /// Accumulated experience.
    pub exp: u32,
    /// Gold carried.
    pub gold: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            level: 1,
            hp: 100,
            max_hp: 100,
            intelligence: 0,
            might: 0,
            agility: 0,
            exp: 0,
            gold: 0,
        }
    }
}

impl Stats {
    /// Read one allocatable attribute.
    pub const fn get(&self, stat: StatName) -> u32 {
        match stat {
            StatName::Intelligence => self.intelligence,
            StatName::Might => self.might,
            StatName::Agility => self.agility,
        }
    }

    /// A copy with `stat` raised by one point.
    ///
    /// Returns `None` if the attribute is already at `u32::MAX`.
    pub fn incremented(&self, stat: StatName) -> Option<Self> {
        let mut next = *self;
        let slot = match stat {
            StatName::Intelligence => &mut next.intelligence,
            StatName::Might => &mut next.might,
            StatName::Agility => &mut next.agility,
        };
        *slot = slot.checked_add(1)?;
        Some(next)
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// An opaque inventory token (item identifier or descriptor).
///
/// Inventories are ordered sequences and may hold duplicates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InventoryItem(pub String);

impl From<&str> for InventoryItem {
    fn from(item: &str) -> Self {
        Self(item.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn stats_default_baseline() {
        let stats = Stats::default();
        assert_eq!(stats.level, 1);
        assert_eq!(stats.hp, 100);
        assert_eq!(stats.max_hp, 100);
        assert_eq!(stats.intelligence + stats.might + stats.agility, 0);
        assert_eq!(stats.exp + stats.gold, 0);
    }

    #[test]
    fn partial_stats_fill_from_defaults() {
        let stats: Stats = serde_json::from_str(r#"{"might": 4}"#).unwrap();
        assert_eq!(stats.might, 4);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.max_hp, 100);
    }

    #[test]
    fn stats_use_camel_case_on_the_wire() {
        let json = serde_json::to_value(Stats::default()).unwrap();
        assert!(json.get("maxHp").is_some());
        assert!(json.get("max_hp").is_none());
    }

    #[test]
    fn incremented_touches_only_named_stat() {
        let base = Stats::default();
        let next = base.incremented(StatName::Agility).unwrap();
        assert_eq!(next.agility, 1);
        assert_eq!(next.intelligence, 0);
        assert_eq!(next.might, 0);
        assert_eq!(base.agility, 0);
    }

    #[test]
    fn incremented_refuses_overflow() {
        let maxed = Stats {
            might: u32::MAX,
            ..Stats::default()
        };
        assert!(maxed.incremented(StatName::Might).is_none());
    }

    #[test]
    fn fractional_coordinates_truncate() {
        let pos: Position = serde_json::from_str(r#"{"x": 200.9, "y": -39.5}"#).unwrap();
        assert_eq!(pos, Position::new(200, -39));
    }

    #[test]
    fn missing_axis_reads_as_zero() {
        let pos: Position = serde_json::from_str(r#"{"x": 80}"#).unwrap();
        assert_eq!(pos, Position::new(80, 0));
    }

    #[test]
    fn non_numeric_coordinate_is_rejected() {
        let pos: Result<Position, _> = serde_json::from_str(r#"{"x": "left", "y": 0}"#);
        assert!(pos.is_err());
    }

    #[test]
    fn grid_alignment() {
        assert!(Position::new(200, 160).is_on_grid(40));
        assert!(!Position::new(200, 150).is_on_grid(40));
        assert!(!Position::new(0, 0).is_on_grid(0));
    }
}
