//! Physics configuration

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};

/// Physics world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -30 in Y, arena gravity is deliberately heavy)
    pub gravity: [f32; 3],

    /// Fixed timestep for physics simulation
    pub timestep: f32,

    /// Maximum number of substeps per frame
    pub max_substeps: u32,

    /// Solver iterations
    pub solver_iterations: usize,

    /// Enable continuous collision detection on dynamic bodies
    pub ccd_enabled: bool,

    /// Default friction coefficient for the arena geometry
    pub default_friction: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -30.0, 0.0],
            timestep: 1.0 / 60.0,
            max_substeps: 3,
            solver_iterations: 7,
            ccd_enabled: false,
            default_friction: 0.5,
        }
    }
}

impl PhysicsConfig {
    /// Configuration for unit tests: fewer iterations, same timestep
    pub fn fast() -> Self {
        Self {
            solver_iterations: 2,
            ..Default::default()
        }
    }

    /// Set gravity
    pub fn with_gravity(mut self, x: f32, y: f32, z: f32) -> Self {
        self.gravity = [x, y, z];
        self
    }

    /// Set timestep
    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    /// Set maximum substeps per frame
    pub fn with_max_substeps(mut self, substeps: u32) -> Self {
        self.max_substeps = substeps;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.timestep > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "timestep must be positive, got {}",
                self.timestep
            )));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig("max_substeps must be at least 1".into()));
        }
        if self.solver_iterations == 0 {
            return Err(PhysicsError::InvalidConfig(
                "solver_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
