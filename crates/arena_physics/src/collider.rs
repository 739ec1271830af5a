//! Collider types and descriptions

use crate::layers::CollisionGroups;
use crate::material::PhysicsMaterial;
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub(crate) rapier::ColliderHandle);

impl ColliderHandle {
    /// Get the raw Rapier handle
    pub fn raw(&self) -> rapier::ColliderHandle {
        self.0
    }
}

/// Collision shape type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Sphere with radius
    Sphere { radius: f32 },
    /// Box with half-extents
    Box { half_extents: [f32; 3] },
    /// Capsule aligned along Y axis
    CapsuleY { half_height: f32, radius: f32 },
}

impl Default for ColliderShape {
    fn default() -> Self {
        Self::Box {
            half_extents: [0.5, 0.5, 0.5],
        }
    }
}

impl ColliderShape {
    /// Create a sphere shape
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Create a box shape from half-extents
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Box {
            half_extents: [hx, hy, hz],
        }
    }

    /// Create a capsule shape (Y-aligned)
    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self::CapsuleY { half_height, radius }
    }

    /// Build a Rapier shared shape
    pub(crate) fn to_rapier(&self) -> rapier::SharedShape {
        match self {
            Self::Sphere { radius } => rapier::SharedShape::ball(*radius),
            Self::Box { half_extents } => {
                rapier::SharedShape::cuboid(half_extents[0], half_extents[1], half_extents[2])
            }
            Self::CapsuleY { half_height, radius } => {
                rapier::SharedShape::capsule_y(*half_height, *radius)
            }
        }
    }
}

/// Description for creating a collider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColliderDesc {
    /// Collision shape
    pub shape: ColliderShape,
    /// Physics material
    pub material: PhysicsMaterial,
    /// Collision groups
    pub collision_groups: CollisionGroups,
    /// User data (enemy id bits, etc.)
    pub user_data: u128,
}

impl Default for ColliderDesc {
    fn default() -> Self {
        Self {
            shape: ColliderShape::default(),
            material: PhysicsMaterial::default(),
            collision_groups: CollisionGroups::world(),
            user_data: 0,
        }
    }
}

impl ColliderDesc {
    /// Create a new collider description with a shape
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            ..Default::default()
        }
    }

    /// Set material
    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    /// Set collision groups
    pub fn with_collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Set user data
    pub fn with_user_data(mut self, data: u128) -> Self {
        self.user_data = data;
        self
    }

    /// Build a Rapier collider builder
    pub(crate) fn to_rapier_builder(&self) -> rapier::ColliderBuilder {
        rapier::ColliderBuilder::new(self.shape.to_rapier())
            .friction(self.material.friction)
            .friction_combine_rule(self.material.friction_combine.into())
            .restitution(self.material.restitution)
            .density(self.material.density)
            .collision_groups(rapier::InteractionGroups::new(
                rapier::Group::from_bits_truncate(self.collision_groups.memberships),
                rapier::Group::from_bits_truncate(self.collision_groups.filter),
            ))
            .user_data(self.user_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collider_builder_applies_groups() {
        let desc = ColliderDesc::new(ColliderShape::sphere(0.62))
            .with_material(PhysicsMaterial::frictionless())
            .with_collision_groups(CollisionGroups::enemy())
            .with_user_data(42);

        let collider = desc.to_rapier_builder().build();
        assert_eq!(collider.friction(), 0.0);
        assert_eq!(collider.user_data, 42);
        assert_eq!(collider.collision_groups().memberships.bits(), 4);
        assert_eq!(collider.collision_groups().filter.bits(), 1 | 2 | 8);
    }
}
