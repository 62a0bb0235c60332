//! The headless session: one owner moving around a seeded world while a
//! client polls and reconciles.

use std::sync::Arc;

use gridworld_client::{ApplyOutcome, ReconciliationEngine, RenderHandle};
use gridworld_core::{
    AuthoritativeStore, Clock, GridWorldConfig, Identity, MovementSystem, OwnerSeed,
    ProgressionSystem, SeedUser, SystemClock,
};
use gridworld_db::{KeyValueStore, MemoryStore, TracedStore};
use gridworld_types::{Direction, InventoryItem, Position, StatName, Stats, UserId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::SimError;
use crate::render::LogSprite;

/// What a finished session did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Move commands issued.
    pub moves: u32,
    /// Snapshots merged into the client.
    pub polls_applied: u32,
    /// Snapshots the client dropped as stale or malformed.
    pub polls_dropped: u32,
    /// Skill points spent at the end of the session.
    pub points_spent: u32,
    /// The owner's position as last seen by the client.
    pub final_position: Option<Position>,
    /// The owner's stats after spending.
    pub final_stats: Stats,
    /// Entities held by the client.
    pub entities: usize,
    /// Keys written to the backend.
    pub keys: usize,
}

/// Wires the store, the command systems, and a reconciling client together.
#[derive(Debug)]
pub struct Session {
    config: GridWorldConfig,
    backend: Arc<TracedStore<MemoryStore>>,
    store: AuthoritativeStore,
    movement: MovementSystem,
    progression: ProgressionSystem,
    client: ReconciliationEngine<LogSprite>,
    owner: Identity,
    rng: StdRng,
}

impl Session {
    /// Build a session over a fresh in-memory backend.
    pub fn new(config: GridWorldConfig) -> Self {
        let backend = Arc::new(TracedStore::new(MemoryStore::new()));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = AuthoritativeStore::new(
            Arc::clone(&backend) as Arc<dyn KeyValueStore>,
            clock,
            &config,
        );
        let movement = MovementSystem::new(store.repository().clone(), &config);
        let progression = ProgressionSystem::new(store.repository().clone());
        let rng = StdRng::seed_from_u64(config.session.seed);
        Self {
            config,
            backend,
            store,
            movement,
            progression,
            client: ReconciliationEngine::new(),
            owner: Identity::new("u_123", "Alice"),
            rng,
        }
    }

    /// Seed the demo participants and register the session owner.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Core`] if a store write fails.
    pub fn seed(&self) -> Result<(), SimError> {
        self.store.seed_user(&SeedUser {
            identity: self.owner.clone(),
            position: self.config.spawn.position(),
            stats: Stats {
                intelligence: 2,
                might: 1,
                ..Stats::default()
            },
            owner: Some(OwnerSeed {
                skill_points: 1,
                inventory: vec![InventoryItem::from("sword"), InventoryItem::from("potion")],
            }),
        })?;
        self.store.seed_user(&SeedUser {
            identity: Identity::new(UserId::generate(), "Bob"),
            position: Position::new(240, 150),
            stats: Stats::default(),
            owner: None,
        })?;

        // Already listed by seeding; must not add a second entry.
        let added = self.store.register_participant(&self.owner)?;
        info!(
            participants = self.store.repository().participants()?.len(),
            owner_added = added,
            "World seeded"
        );
        Ok(())
    }

    /// Run the move/poll loop, spend leftover skill points, and report.
    ///
    /// # Errors
    ///
    /// Returns [`SimError`] if a store call or snapshot encoding fails.
    pub fn run(&mut self) -> Result<SessionSummary, SimError> {
        let owner_id = self.owner.user_id.clone();
        let poll_every = self.config.session.poll_every;
        let mut moves: u32 = 0;
        let mut polls_applied: u32 = 0;
        let mut polls_dropped: u32 = 0;

        for tick in 1..=self.config.session.ticks {
            let direction = self.random_direction();
            if self.movement.move_user(&owner_id, direction)?.is_some() {
                moves = moves.saturating_add(1);
            }

            if tick.checked_rem(poll_every) == Some(0) {
                if self.poll()?.is_applied() {
                    polls_applied = polls_applied.saturating_add(1);
                } else {
                    polls_dropped = polls_dropped.saturating_add(1);
                }
            }
        }

        let points_spent = self.spend_skill_points()?;
        if self.poll()?.is_applied() {
            polls_applied = polls_applied.saturating_add(1);
        } else {
            polls_dropped = polls_dropped.saturating_add(1);
        }

        let final_stats = self
            .store
            .repository()
            .get_stats(&owner_id)?
            .unwrap_or_default();
        Ok(SessionSummary {
            moves,
            polls_applied,
            polls_dropped,
            points_spent,
            final_position: self.client.player().map(|p| p.character().position),
            final_stats,
            entities: self.client.len(),
            keys: self.backend.inner().len()?,
        })
    }

    /// Assemble a snapshot, send it through JSON, and reconcile it.
    fn poll(&mut self) -> Result<ApplyOutcome, SimError> {
        let owner_id = &self.owner.user_id;
        let snapshot = self.store.get_snapshot(owner_id)?;
        let payload = serde_json::to_string(&snapshot)?;
        let outcome = self.client.apply_json(&payload, owner_id);

        let unrendered: Vec<UserId> = self
            .client
            .entities()
            .iter()
            .filter(|e| e.render().is_none())
            .map(|e| e.id().clone())
            .collect();
        for id in unrendered {
            if let Err(sprite) = self.client.attach_render(&id, LogSprite::new(&id)) {
                sprite.dispose();
            }
        }
        for entity in self.client.entities_mut() {
            let character = entity.character().clone();
            if let Some(sprite) = entity.render_mut() {
                sprite.draw(&character);
            }
        }

        if let Some(player) = self.client.player() {
            let position = player.character().position;
            let frames = player.render().map_or(0, LogSprite::frames);
            info!(
                timestamp = snapshot.timestamp(),
                x = position.x,
                y = position.y,
                frames,
                ?outcome,
                "Player position"
            );
            if !self.in_bounds(position) {
                tracing::debug!(x = position.x, y = position.y, "Player outside world bounds");
            }
        }
        Ok(outcome)
    }

    /// Spend every remaining skill point on a random stat.
    fn spend_skill_points(&mut self) -> Result<u32, SimError> {
        let owner_id = self.owner.user_id.clone();
        let mut spent: u32 = 0;
        loop {
            let stat = self.random_stat();
            if !self.progression.allocate_skill_point(&owner_id, stat)? {
                break;
            }
            spent = spent.saturating_add(1);
            info!(stat = stat.as_str(), "Skill point spent");
        }
        Ok(spent)
    }

    fn random_direction(&mut self) -> Direction {
        let i = self.rng.random_range(0..Direction::ALL.len());
        Direction::ALL.get(i).copied().unwrap_or(Direction::Right)
    }

    fn random_stat(&mut self) -> StatName {
        let i = self.rng.random_range(0..StatName::ALL.len());
        StatName::ALL.get(i).copied().unwrap_or(StatName::Might)
    }

    fn in_bounds(&self, position: Position) -> bool {
        let width = i64::from(self.config.world.width);
        let height = i64::from(self.config.world.height);
        (0..=width).contains(&i64::from(position.x)) && (0..=height).contains(&i64::from(position.y))
    }
}
