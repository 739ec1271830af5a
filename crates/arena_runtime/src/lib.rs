//! Arena runtime
//!
//! Ties the simulation crates together: builds the temple arena, owns the
//! enemy roster and the wave director, and runs the per-tick order against a
//! player and a set of presentation collaborators.
//!
//! # Features
//!
//! - TOML configuration with environment overrides
//! - Headless player with an optional autopilot
//! - Power-up pickups with timed speed and damage buffs
//! - Null, logging and recording collaborators
//! - Restart with debounce
//!
//! # Example
//!
//! ```ignore
//! use arena_runtime::prelude::*;
//!
//! let config = SimConfig::load()?.with_seed(7);
//! let mut sim = ArenaSimulation::new(config, Collaborators::headless())?;
//! sim.start();
//! while sim.state() == SessionState::Playing {
//!     sim.tick(1.0 / 60.0);
//! }
//! ```

pub mod collaborators;
pub mod config;
pub mod enemy;
pub mod error;
pub mod level;
pub mod player;
pub mod powerup;
pub mod simulation;

pub mod prelude {
    pub use crate::collaborators::{
        AudioCues, Collaborators, EndScreen, Hud, LogHud, NullAudio, NullHud, NullVisuals,
        SoundCue, VisualHandle, VisualLayer,
    };
    pub use crate::config::{AutopilotConfig, PlayerConfig, RunConfig, SimConfig};
    pub use crate::enemy::{BossEncounter, Enemy, EnemyKind, EnemyRoster};
    pub use crate::error::{Result, RuntimeError};
    pub use crate::level::{build_arena, is_over_floor, trap_sites, ArenaLayout};
    pub use crate::player::{HeadlessPlayer, PlayerAgent, PLAYER_ARENA_CLAMP};
    pub use crate::powerup::{PlayerBuffs, PowerUp, PowerUpKind, PowerUpTimer};
    pub use crate::simulation::{ArenaSimulation, SessionState, SessionStats};
}

pub use prelude::*;
