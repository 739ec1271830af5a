//! Arena Physics - Rapier 3D world and obstacle index
//!
//! This crate wraps Rapier 3D for the arena simulation and maintains the
//! cached list of static obstacles that enemy steering and spawn placement
//! consult every tick.
//!
//! # Features
//!
//! - Rigid bodies (static, dynamic, kinematic) with builder descriptions
//! - Collision groups for world, player, enemies and the enemy-only floor cover
//! - Static box registry with a revision counter bumped on every add/remove
//! - Revision-keyed [`ObstacleIndexState`] with obstacle pressure sampling
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               PhysicsWorld               │
//! │  ┌─────────────┐  ┌─────────────┐        │
//! │  │ RigidBodySet│  │ ColliderSet │        │
//! │  └─────────────┘  └─────────────┘        │
//! │  ┌──────────────────────────────┐        │
//! │  │ static boxes + revision      │────┐   │
//! │  └──────────────────────────────┘    │   │
//! └──────────────────────────────────────┼───┘
//!                                        ▼
//!                          ┌──────────────────────┐
//!                          │ ObstacleIndexState   │
//!                          │ (rebuild on revision)│
//!                          └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use arena_physics::prelude::*;
//!
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default())?;
//! physics.add_static_box(StaticBoxDesc::new(Vec3::new(0.0, 1.5, 12.0), Vec3::new(5.0, 1.5, 1.0)));
//!
//! let mut index = ObstacleIndexState::new();
//! let obstacles = index.obstacles(&physics);
//! assert_eq!(obstacles.len(), 1);
//! ```

pub mod body;
pub mod collider;
pub mod config;
pub mod error;
pub mod layers;
pub mod material;
pub mod obstacles;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{RigidBodyDesc, RigidBodyHandle, RigidBodyType};
    pub use crate::collider::{ColliderDesc, ColliderHandle, ColliderShape};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::layers::{CollisionGroups, CollisionLayer};
    pub use crate::material::PhysicsMaterial;
    pub use crate::obstacles::{pressure_at, ObstacleIndexState, ObstacleRecord, StaticColliderSource};
    pub use crate::world::{PhysicsWorld, StaticBox, StaticBoxDesc};
    pub use glam::Vec3;
}

pub use prelude::*;
