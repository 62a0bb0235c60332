//! Integration tests for `gridworld-core`: registration, commands, and
//! snapshot assembly working against one shared backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use gridworld_core::{
    AuthoritativeStore, Clock, GridWorldConfig, Identity, ManualClock, MovementSystem,
    ProgressionSystem,
};
use gridworld_db::{KeyValueStore, MemoryStore, UserField};
use gridworld_types::{Direction, Position, StatName, Stats, UserId};

struct Harness {
    backend: Arc<MemoryStore>,
    clock: Arc<ManualClock>,
    store: AuthoritativeStore,
    movement: MovementSystem,
    progression: ProgressionSystem,
}

fn harness(config: &GridWorldConfig) -> Harness {
    let backend = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(10_000));
    let store = AuthoritativeStore::new(
        Arc::clone(&backend) as Arc<dyn KeyValueStore>,
        Arc::clone(&clock) as Arc<dyn Clock>,
        config,
    );
    let movement = MovementSystem::new(store.repository().clone(), config);
    let progression = ProgressionSystem::new(store.repository().clone());
    Harness {
        backend,
        clock,
        store,
        movement,
        progression,
    }
}

#[test]
fn registered_user_snapshot_has_seeded_points() {
    let h = harness(&GridWorldConfig::default());
    let id = UserId::from("u_123");
    h.store.register_participant(&Identity::new("u_123", "Alice")).unwrap();

    let view = h.store.get_snapshot(&id).unwrap().current_user().clone();
    assert_eq!(view.position, Position::new(200, 150));
    assert_eq!(view.stats, Stats::default());
    assert_eq!(view.skillpoints, 3);
    assert!(view.inventory.is_empty());
    assert_eq!(view.name, "Alice");
}

#[test]
fn commands_show_up_in_the_next_snapshot_only() {
    let h = harness(&GridWorldConfig::default());
    let id = UserId::from("u_123");
    h.store.register_participant(&Identity::new("u_123", "Alice")).unwrap();

    let before = h.store.get_snapshot(&id).unwrap();
    h.clock.advance(50);
    h.movement.move_command(&id, "left").unwrap();
    h.progression.allocate_command(&id, "agility").unwrap();
    let after = h.store.get_snapshot(&id).unwrap();

    assert_eq!(before.current_user().position, Position::new(200, 150));
    assert_eq!(before.current_user().skillpoints, 3);

    let view = after.current_user();
    assert_eq!(view.position, Position::new(160, 160));
    assert_eq!(view.updated_at, Some(10_050));
    assert_eq!(view.stats.agility, 1);
    assert_eq!(view.skillpoints, 2);
    assert_eq!(after.entry(&id).unwrap().position, view.position);
}

#[test]
fn invalid_commands_leave_snapshot_unchanged() {
    let h = harness(&GridWorldConfig::default());
    let id = UserId::from("u_123");
    h.store.register_participant(&Identity::new("u_123", "Alice")).unwrap();
    let before = h.store.get_snapshot(&id).unwrap().current_user().clone();

    h.movement.move_command(&id, "diagonal").unwrap();
    h.progression.allocate_command(&id, "luck").unwrap();

    let after = h.store.get_snapshot(&id).unwrap().current_user().clone();
    assert_eq!(before, after);
}

#[test]
fn last_write_wins_between_participants() {
    let h = harness(&GridWorldConfig::default());
    let a = UserId::from("u_a");
    h.store.register_participant(&Identity::new("u_a", "A")).unwrap();

    // Two writers touching the same record; the later write is kept.
    h.store.repository().set_position(&a, Position::new(0, 0)).unwrap();
    h.clock.advance(1);
    h.store.repository().set_position(&a, Position::new(400, 400)).unwrap();

    let entry = h.store.get_snapshot(&a).unwrap().entry(&a).cloned().unwrap();
    assert_eq!(entry.position, Position::new(400, 400));
    assert_eq!(entry.updated_at, Some(10_001));
}

#[test]
fn corrupted_fields_degrade_to_defaults() {
    let h = harness(&GridWorldConfig::default());
    let id = UserId::from("u_123");
    h.store.register_participant(&Identity::new("u_123", "Alice")).unwrap();

    h.backend
        .set(&UserField::Stats.key(&id), serde_json::json!("not a stats object"))
        .unwrap();
    h.backend
        .set(&UserField::Position.key(&id), serde_json::json!([1, 2]))
        .unwrap();
    h.backend
        .set(&UserField::DisplayName.key(&id), serde_json::Value::Null)
        .unwrap();

    let snap = h.store.get_snapshot(&id).unwrap();
    let view = snap.current_user();
    assert_eq!(view.stats, Stats::default());
    assert_eq!(view.position, Position::new(200, 150));
    assert_eq!(view.updated_at, None);
    assert_eq!(view.name, "ERROR");
    assert_eq!(snap.scene()[0].name, "ERROR");
}

#[test]
fn partial_stats_are_filled_on_read() {
    let h = harness(&GridWorldConfig::default());
    let id = UserId::from("u_123");
    h.store.register_participant(&Identity::new("u_123", "Alice")).unwrap();
    h.backend
        .set(&UserField::Stats.key(&id), serde_json::json!({ "might": 7, "gold": 12 }))
        .unwrap();

    h.progression.allocate_skill_point(&id, StatName::Might).unwrap();

    let stats = h.store.get_snapshot(&id).unwrap().current_user().stats;
    assert_eq!(stats.might, 8);
    assert_eq!(stats.gold, 12);
    assert_eq!(stats.level, 1);
    assert_eq!(stats.max_hp, 100);
}

#[test]
fn custom_grid_and_spawn_from_config() {
    let config = GridWorldConfig::parse(
        "world:\n  grid_size: 10\nspawn:\n  x: 15\n  y: 25\nregistration:\n  starting_skill_points: 5\n",
    )
    .unwrap();
    let h = harness(&config);
    let id = UserId::from("u_1");
    h.store.register_participant(&Identity::new("u_1", "One")).unwrap();

    let view = h.store.get_snapshot(&id).unwrap().current_user().clone();
    assert_eq!(view.position, Position::new(15, 25));
    assert_eq!(view.skillpoints, 5);

    // 15 + 10 = 25 -> 30 (half up); 25 -> 30.
    let moved = h.movement.move_user(&id, Direction::Right).unwrap();
    assert_eq!(moved, Some(Position::new(30, 30)));
}
