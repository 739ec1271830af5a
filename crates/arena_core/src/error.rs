//! Error types for core arena data

use thiserror::Error;

/// Errors raised while interpreting core arena data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Archetype name not in the roster
    #[error("Unknown archetype: {0}")]
    UnknownArchetype(String),

    /// Handle allocator ran out of indices
    #[error("Handle allocator exhausted")]
    HandlesExhausted,
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
