//! Error types for the runtime

use arena_combat::CombatError;
use arena_core::CoreError;
use arena_physics::PhysicsError;
use arena_waves::WaveError;
use std::path::PathBuf;
use thiserror::Error;

/// Runtime errors
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::config::SimConfig`]
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config parsed but holds an unusable value
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Wave(#[from] WaveError),

    #[error(transparent)]
    Combat(#[from] CombatError),
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
