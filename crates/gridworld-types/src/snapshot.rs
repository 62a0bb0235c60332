//! World snapshot wire types.
//!
//! A [`Snapshot`] is the immutable, timestamped read of world state that the
//! authoritative store produces for one observer. Its JSON shape is meant to
//! be sent verbatim over whatever transport connects the store to a client:
//!
//! ```text
//! {
//!   "timestamp": 1731803999000,
//!   "users": ["u_123", "u_456"],
//!   "scene": [{ "userId": "u_123", "name": "Alice", "position": {..}, "updatedAt": .. }, ..],
//!   "sceneById": { "u_123": { .. }, "u_456": { .. } },
//!   "currentUser": { "userId": "u_123", .., "stats": {..}, "skillpoints": 1, "inventory": [..] }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::UserId;
use crate::structs::{InventoryItem, Position, Stats};

/// The public projection of one participant, visible to everyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SceneEntry {
    /// The participant.
    pub user_id: UserId,
    /// Display name, or the `"ERROR"` sentinel when none was recorded.
    pub name: String,
    /// Last recorded position, or the spawn point when none was recorded.
    /// Absent on the wire reads as the origin.
    #[serde(default)]
    pub position: Position,
    /// Timestamp of the last position write, `None` if never written.
    pub updated_at: Option<i64>,
}

/// The observer's own record: the public fields plus owner-only state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CurrentUserView {
    /// The observer; always the id the snapshot was assembled for.
    pub user_id: UserId,
    /// Display name, or the `"ERROR"` sentinel when none was recorded.
    pub name: String,
    /// Last recorded position, or the spawn point.
    pub position: Position,
    /// Timestamp of the last position write.
    pub updated_at: Option<i64>,
    /// Full statistics.
    pub stats: Stats,
    /// Unspent skill points.
    pub skillpoints: u32,
    /// Carried items, in order.
    pub inventory: Vec<InventoryItem>,
}

/// An immutable read of the shared world for one observer.
///
/// `scene_by_id` is a derived index over `scene`; [`Snapshot::new`] builds
/// both from the same entries so they cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Snapshot {
    timestamp: i64,
    users: Vec<UserId>,
    scene: Vec<SceneEntry>,
    scene_by_id: BTreeMap<UserId, SceneEntry>,
    current_user: CurrentUserView,
}

impl Snapshot {
    /// Assemble a snapshot from the ordered public scene and the observer's
    /// private view.
    ///
    /// `users` follows `scene` order. If the scene lists an id twice, the
    /// index keeps the first entry.
    pub fn new(timestamp: i64, scene: Vec<SceneEntry>, current_user: CurrentUserView) -> Self {
        let users = scene.iter().map(|e| e.user_id.clone()).collect();
        let mut scene_by_id = BTreeMap::new();
        for entry in &scene {
            scene_by_id
                .entry(entry.user_id.clone())
                .or_insert_with(|| entry.clone());
        }
        Self {
            timestamp,
            users,
            scene,
            scene_by_id,
            current_user,
        }
    }

    /// Milliseconds at which the snapshot was assembled.
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Participant ids in registration order.
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    /// Public entries in registration order.
    pub fn scene(&self) -> &[SceneEntry] {
        &self.scene
    }

    /// Public entries indexed by participant.
    pub const fn scene_by_id(&self) -> &BTreeMap<UserId, SceneEntry> {
        &self.scene_by_id
    }

    /// Look up one participant's public entry.
    pub fn entry(&self, user_id: &UserId) -> Option<&SceneEntry> {
        self.scene_by_id.get(user_id)
    }

    /// The observer's private view.
    pub const fn current_user(&self) -> &CurrentUserView {
        &self.current_user
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, x: i32) -> SceneEntry {
        SceneEntry {
            user_id: UserId::from(id),
            name: name.to_owned(),
            position: Position::new(x, 150),
            updated_at: Some(1),
        }
    }

    fn viewer(id: &str) -> CurrentUserView {
        CurrentUserView {
            user_id: UserId::from(id),
            name: "Alice".to_owned(),
            position: Position::new(200, 150),
            updated_at: None,
            stats: Stats::default(),
            skillpoints: 3,
            inventory: vec![InventoryItem::from("sword")],
        }
    }

    #[test]
    fn index_matches_scene() {
        let snap = Snapshot::new(
            10,
            vec![entry("u_1", "Alice", 200), entry("u_2", "Bob", 240)],
            viewer("u_1"),
        );
        assert_eq!(snap.users(), &[UserId::from("u_1"), UserId::from("u_2")]);
        for e in snap.scene() {
            assert_eq!(snap.entry(&e.user_id), Some(e));
        }
        assert_eq!(snap.scene_by_id().len(), 2);
    }

    #[test]
    fn wire_shape_uses_camel_case_keys() {
        let snap = Snapshot::new(10, vec![entry("u_1", "Alice", 200)], viewer("u_1"));
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["timestamp"], 10);
        assert_eq!(json["users"][0], "u_1");
        assert_eq!(json["scene"][0]["userId"], "u_1");
        assert_eq!(json["scene"][0]["updatedAt"], 1);
        assert_eq!(json["sceneById"]["u_1"]["name"], "Alice");
        assert_eq!(json["currentUser"]["skillpoints"], 3);
        assert_eq!(json["currentUser"]["inventory"][0], "sword");
        assert_eq!(json["currentUser"]["stats"]["maxHp"], 100);
    }

    #[test]
    fn scene_must_be_a_sequence() {
        let raw = r#"{
            "timestamp": 5,
            "users": [],
            "scene": {"u_1": {}},
            "sceneById": {},
            "currentUser": {"userId": "u_1", "name": "A", "position": {"x": 0, "y": 0},
                            "updatedAt": null, "stats": {}, "skillpoints": 0, "inventory": []}
        }"#;
        let parsed: Result<Snapshot, _> = serde_json::from_str(raw);
        assert!(parsed.is_err());
    }

    #[test]
    fn entry_without_position_sits_at_origin() {
        let e: SceneEntry =
            serde_json::from_str(r#"{"userId": "u_1", "name": "A", "updatedAt": null}"#).unwrap();
        assert_eq!(e.position, Position::new(0, 0));
    }
}
