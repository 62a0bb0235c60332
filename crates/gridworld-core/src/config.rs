//! Configuration loading and typed config structures for the Gridworld
//! simulation.
//!
//! The canonical configuration lives in `gridworld-config.yaml` at the
//! project root. Every section and every field is optional; anything left
//! out takes the default documented on its field.

use std::path::Path;

use gridworld_types::Position;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GridWorldConfig {
    /// World dimensions and grid quantum.
    #[serde(default)]
    pub world: WorldConfig,

    /// Where participants appear before their first move.
    #[serde(default)]
    pub spawn: SpawnConfig,

    /// Values seeded on first registration.
    #[serde(default)]
    pub registration: RegistrationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Parameters for the headless session driver.
    #[serde(default)]
    pub session: SessionConfig,
}

impl GridWorldConfig {
    /// Load and validate configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.grid_size <= 0 {
            return Err(ConfigError::Invalid {
                field: "world.grid_size",
                reason: format!("must be positive, got {}", self.world.grid_size),
            });
        }
        if self.session.poll_every == 0 {
            return Err(ConfigError::Invalid {
                field: "session.poll_every",
                reason: String::from("must be at least 1"),
            });
        }
        Ok(())
    }
}

/// World dimensions and grid quantum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// World width in world units (default: 1600).
    #[serde(default = "default_world_width")]
    pub width: u32,

    /// World height in world units (default: 900).
    #[serde(default = "default_world_height")]
    pub height: u32,

    /// Grid quantum every position snaps to (default: 40).
    #[serde(default = "default_grid_size")]
    pub grid_size: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_world_width(),
            height: default_world_height(),
            grid_size: default_grid_size(),
        }
    }
}

/// Spawn point for participants with no recorded position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SpawnConfig {
    /// Horizontal spawn coordinate (default: 200).
    #[serde(default = "default_spawn_x")]
    pub x: i32,

    /// Vertical spawn coordinate (default: 150).
    #[serde(default = "default_spawn_y")]
    pub y: i32,
}

impl SpawnConfig {
    /// The spawn point as a [`Position`].
    pub const fn position(self) -> Position {
        Position::new(self.x, self.y)
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            x: default_spawn_x(),
            y: default_spawn_y(),
        }
    }
}

/// Values seeded on first registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RegistrationConfig {
    /// Skill points a new participant starts with (default: 3).
    #[serde(default = "default_starting_skill_points")]
    pub starting_skill_points: u32,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            starting_skill_points: default_starting_skill_points(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Parameters for the headless session driver binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Number of move commands to issue (default: 10).
    #[serde(default = "default_session_ticks")]
    pub ticks: u32,

    /// Random seed for direction choices (default: 42).
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Pull and reconcile a snapshot every N moves (default: 1).
    #[serde(default = "default_poll_every")]
    pub poll_every: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ticks: default_session_ticks(),
            seed: default_seed(),
            poll_every: default_poll_every(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_world_width() -> u32 {
    1600
}

const fn default_world_height() -> u32 {
    900
}

const fn default_grid_size() -> i32 {
    40
}

const fn default_spawn_x() -> i32 {
    200
}

const fn default_spawn_y() -> i32 {
    150
}

const fn default_starting_skill_points() -> u32 {
    3
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_session_ticks() -> u32 {
    10
}

const fn default_seed() -> u64 {
    42
}

const fn default_poll_every() -> u32 {
    1
}
