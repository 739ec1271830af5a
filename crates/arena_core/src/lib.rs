//! Arena Core - shared vocabulary of the arena simulation
//!
//! Everything the simulation crates agree on lives here so that the physics
//! wrapper, the enemy AI, combat and the wave director never depend on each
//! other for plain data.
//!
//! # Features
//!
//! - Closed [`Archetype`] enum with a tunables table and movement patterns
//! - Generational handles for the flat enemy roster
//! - Planar (XZ) vector helpers on top of `glam`
//! - Seedable simulation RNG
//!
//! # Example
//!
//! ```ignore
//! use arena_core::prelude::*;
//!
//! let stats = Archetype::Titan.stats();
//! assert!(Archetype::Titan.is_heavy());
//!
//! let mut rng = seeded_rng(7);
//! let dir = random_unit_xz(&mut rng);
//! ```

pub mod archetype;
pub mod error;
pub mod handle;
pub mod math;
pub mod rng;

pub mod prelude {
    //! Common imports for the arena crates
    pub use crate::archetype::{Archetype, ArchetypeStats, MovementPattern};
    pub use crate::error::{CoreError, Result};
    pub use crate::handle::{EnemyId, Handle, HandleAllocator};
    pub use crate::math::{
        flat, flat_normalized, lerp, normalize_angle, planar_distance, planar_length,
        point_segment_distance, rotate_y,
    };
    pub use crate::rng::{random_sign, random_unit_xz, seeded_rng, ArenaRng};
    pub use glam::{Vec2, Vec3};
}

pub use prelude::*;
