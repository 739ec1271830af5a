//! Error types for wave configuration

use thiserror::Error;

/// Wave configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WaveError {
    /// Difficulty name not one of the presets
    #[error("Unknown difficulty: {0} (expected easy, medium or hard)")]
    UnknownDifficulty(String),
}

/// Result type for wave operations
pub type Result<T> = std::result::Result<T, WaveError>;
