//! Arena AI - enemy locomotion and spawn placement
//!
//! This crate moves enemies through the arena without a navmesh. Each tick an
//! enemy composes a chase heading, samples a fan of candidate directions
//! against the obstacle pressure field, and blends its velocity toward the
//! best one. When it stops making progress a recovery ladder kicks in.
//!
//! # Features
//!
//! - Per-tick safeguards (fall reset, arena clamp, static overlap push-out)
//! - Stuck detection with side-step, nudge and relocation recovery
//! - Candidate-fan steering, separation, center avoidance and boss detours
//! - Archetype movement patterns (zig-zag, swoop, scuttle)
//! - Constraint-based spawn position solver with deterministic fallbacks
//!
//! # Example
//!
//! ```ignore
//! use arena_ai::prelude::*;
//!
//! let tuning = LocomotionTuning::default();
//! let mut rng = seeded_rng(7);
//! let mut agent = Agent::new(Archetype::Brute, false, 0.95, Vec3::new(0.0, 1.0, 30.0), &mut rng);
//!
//! let ctx = LocomotionContext {
//!     dt: 1.0 / 60.0,
//!     player: Some(Vec3::new(0.0, 1.0, 0.0)),
//!     neighbors: &[],
//!     obstacles: &[],
//!     tuning: &tuning,
//! };
//! let outcome = tick(&mut agent, &ctx, &mut rng);
//! ```

pub mod agent;
pub mod locomotion;
pub mod patterns;
pub mod safeguards;
pub mod spawn;
pub mod steering;
pub mod tuning;

pub mod prelude {
    //! Common imports for enemy AI
    pub use crate::agent::{
        Agent, Kinematics, LocomotionContext, LocomotionState, Recovery, SPEED_MULTIPLIER_RANGE,
    };
    pub use crate::locomotion::{tick, TickOutcome};
    pub use crate::safeguards::{apply_safeguards, close_recovery_position, safe_recovery_position};
    pub use crate::spawn::{
        find_spawn_position, solve as solve_spawn, SpawnPlacement, SpawnQuery, SpawnRules,
        SpawnStage, SPAWN_HEIGHT,
    };
    pub use crate::steering::{is_heading_into_obstacle, pick_steering_direction};
    pub use crate::tuning::{ByRole, LocomotionTuning};
    pub use arena_core::prelude::*;
}

pub use prelude::*;
