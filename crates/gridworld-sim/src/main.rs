//! Headless session driver for the Gridworld simulation.
//!
//! Wires the authoritative store, movement, progression, and a reconciling
//! client together over an in-memory backend, then plays a short seeded
//! session and logs what the client saw.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `gridworld-config.yaml` (or `$GRIDWORLD_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the in-memory backend, store, and command systems
//! 4. Seed the demo participants and register the session owner
//! 5. Run the move/poll/reconcile loop and spend leftover skill points
//! 6. Log the summary

mod error;
mod render;
mod session;

use std::path::PathBuf;

use anyhow::Context;
use gridworld_core::GridWorldConfig;
use gridworld_core::config::LoggingConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::SimError;
use crate::session::Session;

/// Config file read when `GRIDWORLD_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "gridworld-config.yaml";

/// Application entry point for the session driver.
///
/// # Errors
///
/// Returns an error if configuration is invalid or a store call fails.
fn main() -> anyhow::Result<()> {
    // 1. Load configuration. Logging is configured from it, so nothing is
    //    logged before this point.
    let (config, source) = load_config().context("loading configuration")?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("gridworld-sim starting");
    match &source {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        width = config.world.width,
        height = config.world.height,
        grid_size = config.world.grid_size,
        ticks = config.session.ticks,
        seed = config.session.seed,
        poll_every = config.session.poll_every,
        "World parameters"
    );

    // 3-4. Build and seed.
    let mut session = Session::new(config);
    session.seed().context("seeding demo participants")?;

    // 5. Play.
    let summary = session.run().context("running session")?;

    // 6. Report.
    info!(
        moves = summary.moves,
        polls_applied = summary.polls_applied,
        polls_dropped = summary.polls_dropped,
        points_spent = summary.points_spent,
        final_position = ?summary.final_position,
        intelligence = summary.final_stats.intelligence,
        might = summary.final_stats.might,
        agility = summary.final_stats.agility,
        entities = summary.entities,
        keys = summary.keys,
        "Session complete"
    );
    Ok(())
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load configuration.
///
/// An explicit `GRIDWORLD_CONFIG` path must exist. Without it, the default
/// path is read if present and built-in defaults are used otherwise.
/// Returns the path actually read, if any.
fn load_config() -> Result<(GridWorldConfig, Option<PathBuf>), SimError> {
    if let Some(path) = std::env::var_os("GRIDWORLD_CONFIG").map(PathBuf::from) {
        let config = GridWorldConfig::from_file(&path)?;
        return Ok((config, Some(path)));
    }
    let path = PathBuf::from(DEFAULT_CONFIG_PATH);
    if path.exists() {
        let config = GridWorldConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        Ok((GridWorldConfig::default(), None))
    }
}
