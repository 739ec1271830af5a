//! Rigid body types and descriptions

use glam::Vec3;
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub(crate) rapier::RigidBodyHandle);

impl RigidBodyHandle {
    /// Get the raw Rapier handle
    pub fn raw(&self) -> rapier::RigidBodyHandle {
        self.0
    }
}

/// Type of rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RigidBodyType {
    /// Static body - never moves, infinite mass
    Static,
    /// Dynamic body - fully simulated
    #[default]
    Dynamic,
    /// Kinematic position-based - moved by user, pushes dynamic bodies
    KinematicPositionBased,
}

impl From<RigidBodyType> for rapier::RigidBodyType {
    fn from(t: RigidBodyType) -> Self {
        match t {
            RigidBodyType::Static => rapier::RigidBodyType::Fixed,
            RigidBodyType::Dynamic => rapier::RigidBodyType::Dynamic,
            RigidBodyType::KinematicPositionBased => rapier::RigidBodyType::KinematicPositionBased,
        }
    }
}

/// Description for creating a rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBodyDesc {
    /// Type of rigid body
    pub body_type: RigidBodyType,
    /// Initial position
    pub position: Vec3,
    /// Initial rotation as a scaled axis (axis * angle)
    pub rotation: Vec3,
    /// Initial linear velocity
    pub linear_velocity: Vec3,
    /// Gravity scale (0 = no gravity, 1 = normal)
    pub gravity_scale: f32,
    /// Linear damping (air resistance)
    pub linear_damping: f32,
    /// Extra mass on top of collider-derived mass
    pub mass: f32,
    /// Lock all rotations (upright characters)
    pub lock_rotations: bool,
    /// Enable continuous collision detection
    pub ccd_enabled: bool,
    /// Can this body sleep when inactive
    pub can_sleep: bool,
}

impl Default for RigidBodyDesc {
    fn default() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            linear_velocity: Vec3::ZERO,
            gravity_scale: 1.0,
            linear_damping: 0.0,
            mass: 0.0,
            lock_rotations: false,
            ccd_enabled: false,
            can_sleep: true,
        }
    }
}

impl RigidBodyDesc {
    /// Create a static body description
    pub fn fixed() -> Self {
        Self {
            body_type: RigidBodyType::Static,
            ..Default::default()
        }
    }

    /// Create a dynamic body description
    pub fn dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            ..Default::default()
        }
    }

    /// Create a kinematic body description
    pub fn kinematic() -> Self {
        Self {
            body_type: RigidBodyType::KinematicPositionBased,
            ..Default::default()
        }
    }

    /// Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set rotation as a scaled axis
    pub fn with_rotation(mut self, scaled_axis: Vec3) -> Self {
        self.rotation = scaled_axis;
        self
    }

    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Set mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_locked_rotations(mut self) -> Self {
        self.lock_rotations = true;
        self
    }

    pub fn with_can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Enable CCD
    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd_enabled = enabled;
        self
    }

    /// Build a Rapier rigid body builder
    pub(crate) fn to_rapier_builder(&self) -> rapier::RigidBodyBuilder {
        let mut builder = rapier::RigidBodyBuilder::new(self.body_type.into())
            .translation(rapier::Vector::new(self.position.x, self.position.y, self.position.z))
            .rotation(rapier::Vector::new(self.rotation.x, self.rotation.y, self.rotation.z))
            .linvel(rapier::Vector::new(
                self.linear_velocity.x,
                self.linear_velocity.y,
                self.linear_velocity.z,
            ))
            .gravity_scale(self.gravity_scale)
            .linear_damping(self.linear_damping)
            .ccd_enabled(self.ccd_enabled)
            .can_sleep(self.can_sleep);

        if self.lock_rotations {
            builder = builder.lock_rotations();
        }
        if self.mass > 0.0 {
            builder = builder.additional_mass(self.mass);
        }

        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_type_conversion() {
        assert_eq!(
            rapier::RigidBodyType::from(RigidBodyType::Static),
            rapier::RigidBodyType::Fixed
        );
        assert_eq!(
            rapier::RigidBodyType::from(RigidBodyType::KinematicPositionBased),
            rapier::RigidBodyType::KinematicPositionBased
        );
    }

    #[test]
    fn test_enemy_style_desc() {
        let desc = RigidBodyDesc::dynamic()
            .with_position(Vec3::new(1.0, 5.0, -2.0))
            .with_mass(85.0)
            .with_linear_damping(0.3)
            .with_locked_rotations()
            .with_can_sleep(false);

        assert_eq!(desc.body_type, RigidBodyType::Dynamic);
        assert_eq!(desc.position, Vec3::new(1.0, 5.0, -2.0));
        assert!(desc.lock_rotations);
        assert!(!desc.can_sleep);

        let body = desc.to_rapier_builder().build();
        assert_eq!(body.linear_damping(), 0.3);
        assert!(body.is_dynamic());
    }
}
