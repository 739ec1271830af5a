//! Simulation configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `ARENA_DIFFICULTY=hard`, `ARENA_SEED=42`
//! 2. Config file: `$ARENA_CONFIG`, else `arena.toml` in the working directory
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! seed = 7
//! difficulty = "hard"
//! max_active_enemies = 30
//!
//! [run]
//! tick_rate = 60.0
//! max_seconds = 900.0
//!
//! [player]
//! max_health = 100.0
//! spawn = [0.0, 2.0, 30.0]
//!
//! [player.autopilot]
//! orbit_radius = 24.0
//! speed = 7.0
//! fire_dps = 90.0
//! fire_range = 30.0
//!
//! [physics]
//! gravity = [0.0, -30.0, 0.0]
//!
//! [locomotion]
//! arena_clamp = 42.0
//! ```

use arena_ai::LocomotionTuning;
use arena_physics::PhysicsConfig;
use arena_waves::{Difficulty, DifficultyTuning};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, RuntimeError};

/// Env var naming the config file
pub const CONFIG_ENV: &str = "ARENA_CONFIG";
/// Env var overriding the difficulty
pub const DIFFICULTY_ENV: &str = "ARENA_DIFFICULTY";
/// Env var overriding the RNG seed
pub const SEED_ENV: &str = "ARENA_SEED";
/// Config file looked up when `ARENA_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "arena.toml";

/// Headless run limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Simulated ticks per second
    pub tick_rate: f32,
    /// Stop after this much simulated time
    pub max_seconds: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_seconds: 600.0,
        }
    }
}

/// Scripted stand-in for player input in headless runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    /// Radius of the circle the player runs around the arena center
    pub orbit_radius: f32,
    pub speed: f32,
    /// Damage per second dealt to the nearest enemy in range
    pub fire_dps: f32,
    pub fire_range: f32,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            orbit_radius: 24.0,
            speed: 7.0,
            fire_dps: 90.0,
            fire_range: 30.0,
        }
    }
}

/// Player setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: f32,
    /// Spawn and respawn position
    pub spawn: [f32; 3],
    /// Absent: the player stands still and never fires
    pub autopilot: Option<AutopilotConfig>,
}

impl PlayerConfig {
    pub fn spawn_position(&self) -> Vec3 {
        Vec3::from_array(self.spawn)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            spawn: [0.0, 2.0, 30.0],
            autopilot: None,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
    pub difficulty: Difficulty,
    /// Overrides the preset's live enemy cap
    pub max_active_enemies: Option<usize>,
    pub run: RunConfig,
    pub player: PlayerConfig,
    pub physics: PhysicsConfig,
    pub locomotion: LocomotionTuning,
    /// Where this config was loaded from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            difficulty: Difficulty::default(),
            max_active_enemies: None,
            run: RunConfig::default(),
            player: PlayerConfig::default(),
            physics: PhysicsConfig::default(),
            locomotion: LocomotionTuning::default(),
            config_path: None,
        }
    }
}

impl SimConfig {
    /// Load from the config file and environment
    ///
    /// A missing default file is not an error; a missing `$ARENA_CONFIG` is.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// [`SimConfig::load`] with an injectable environment
    pub fn load_with<F>(env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match env(CONFIG_ENV) {
            Some(path) => Self::load_from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `ARENA_DIFFICULTY` and `ARENA_SEED`
    pub fn apply_env_overrides<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(difficulty) = env(DIFFICULTY_ENV) {
            self.difficulty = difficulty.parse()?;
            log::info!("Difficulty from env: {}", self.difficulty);
        }

        if let Some(seed) = env(SEED_ENV) {
            let seed = seed
                .trim()
                .parse()
                .map_err(|_| RuntimeError::InvalidConfig(format!("{} is not a u64: {}", SEED_ENV, seed)))?;
            self.seed = Some(seed);
            log::info!("Seed from env: {}", seed);
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.physics.validate()?;

        if !(self.run.tick_rate > 0.0) {
            return Err(RuntimeError::InvalidConfig(format!(
                "run.tick_rate must be positive, got {}",
                self.run.tick_rate
            )));
        }
        if !(self.player.max_health > 0.0) {
            return Err(RuntimeError::InvalidConfig(format!(
                "player.max_health must be positive, got {}",
                self.player.max_health
            )));
        }
        if self.max_active_enemies == Some(0) {
            return Err(RuntimeError::InvalidConfig(
                "max_active_enemies must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Difficulty preset with config overrides applied
    pub fn tuning(&self) -> DifficultyTuning {
        let tuning = self.difficulty.tuning();
        match self.max_active_enemies {
            Some(max) => tuning.with_max_active_enemies(max),
            None => tuning,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_autopilot(mut self, autopilot: AutopilotConfig) -> Self {
        self.player.autopilot = Some(autopilot);
        self
    }

    /// Print configuration summary
    pub fn log_summary(&self) {
        log::info!("=== Arena Configuration ===");
        log::info!("  Difficulty: {}", self.difficulty);
        match self.seed {
            Some(seed) => log::info!("  Seed: {}", seed),
            None => log::info!("  Seed: entropy"),
        }
        log::info!("  Max active enemies: {}", self.tuning().max_active_enemies);
        log::info!("  Tick rate: {} Hz, limit {} s", self.run.tick_rate, self.run.max_seconds);
        log::info!("  Autopilot: {}", self.player.autopilot.is_some());
        if let Some(path) = &self.config_path {
            log::info!("  Config file: {}", path.display());
        }
        log::info!("===========================");
    }
}
