//! Error types for combat configuration

use thiserror::Error;

/// Combat configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum CombatError {
    /// A laser timing or size field that must be positive is not
    #[error("Invalid laser {field}: {value} (must be > 0)")]
    InvalidLaser { field: &'static str, value: f32 },

    /// Difficulty or damage scale out of range
    #[error("Invalid damage scale: {0}")]
    InvalidScale(f32),
}

/// Result type for combat operations
pub type Result<T> = std::result::Result<T, CombatError>;
