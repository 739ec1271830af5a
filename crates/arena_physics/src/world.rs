//! Physics world - main simulation container

use crate::body::{RigidBodyDesc, RigidBodyHandle};
use crate::collider::{ColliderDesc, ColliderHandle, ColliderShape};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::layers::CollisionGroups;
use crate::material::PhysicsMaterial;
use crate::obstacles::StaticColliderSource;
use glam::Vec3;
use rapier3d::prelude as rapier;
use std::num::NonZeroUsize;

/// Description of a static box obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticBoxDesc {
    pub center: Vec3,
    pub half_extents: Vec3,
    /// Rotation as a scaled axis (axis * angle)
    pub rotation: Vec3,
    pub groups: CollisionGroups,
    pub material: PhysicsMaterial,
}

impl StaticBoxDesc {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
            rotation: Vec3::ZERO,
            groups: CollisionGroups::world(),
            material: PhysicsMaterial::stone(),
        }
    }

    /// Box from its full size instead of half extents
    pub fn from_size(center: Vec3, size: Vec3) -> Self {
        Self::new(center, size * 0.5)
    }

    pub fn with_rotation(mut self, scaled_axis: Vec3) -> Self {
        self.rotation = scaled_axis;
        self
    }

    pub fn with_groups(mut self, groups: CollisionGroups) -> Self {
        self.groups = groups;
        self
    }
}

/// A registered static box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticBox {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub center: Vec3,
    pub half_extents: Vec3,
    pub groups: CollisionGroups,
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    config: PhysicsConfig,

    /// Rapier physics pipeline
    pipeline: rapier::PhysicsPipeline,

    /// Gravity
    gravity: rapier::Vector<f32>,

    /// Integration parameters
    integration_params: rapier::IntegrationParameters,

    islands: rapier::IslandManager,
    broad_phase: rapier::DefaultBroadPhase,
    narrow_phase: rapier::NarrowPhase,
    impulse_joints: rapier::ImpulseJointSet,
    multibody_joints: rapier::MultibodyJointSet,
    ccd_solver: rapier::CCDSolver,

    /// Rigid body set
    bodies: rapier::RigidBodySet,

    /// Collider set
    colliders: rapier::ColliderSet,

    /// Static boxes, in insertion order
    static_boxes: Vec<StaticBox>,

    /// Bumped on every static add/remove
    static_revision: u64,

    /// Accumulated time for fixed timestep
    accumulated_time: f32,
}

impl PhysicsWorld {
    /// Create a new physics world
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;

        let gravity = rapier::Vector::new(config.gravity[0], config.gravity[1], config.gravity[2]);

        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = config.timestep;
        integration_params.num_solver_iterations = NonZeroUsize::new(config.solver_iterations)
            .ok_or_else(|| PhysicsError::InvalidConfig("solver_iterations must be at least 1".into()))?;

        Ok(Self {
            config,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity,
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            static_boxes: Vec::new(),
            static_revision: 0,
            accumulated_time: 0.0,
        })
    }

    /// Get the physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    // ==================== Rigid Bodies ====================

    /// Create a rigid body
    pub fn create_rigid_body(&mut self, desc: RigidBodyDesc) -> RigidBodyHandle {
        let builder = desc.to_rapier_builder();
        RigidBodyHandle(self.bodies.insert(builder))
    }

    /// Remove a rigid body together with its colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) -> Result<()> {
        self.bodies
            .remove(
                handle.0,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .map(|_| ())
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Get rigid body position
    pub fn body_position(&self, handle: RigidBodyHandle) -> Result<Vec3> {
        self.bodies
            .get(handle.0)
            .map(|b| {
                let pos = b.translation();
                Vec3::new(pos.x, pos.y, pos.z)
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Set rigid body position
    pub fn set_body_position(&mut self, handle: RigidBodyHandle, position: Vec3) -> Result<()> {
        self.bodies
            .get_mut(handle.0)
            .map(|b| {
                let translation = rapier::Vector::new(position.x, position.y, position.z);
                if b.body_type() == rapier::RigidBodyType::KinematicPositionBased {
                    // Kinematic bodies move on the next step, keeping rotation
                    let next = rapier::Isometry::from_parts(translation.into(), *b.rotation());
                    b.set_next_kinematic_position(next);
                } else {
                    b.set_translation(translation, true);
                }
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Get rigid body linear velocity
    pub fn body_linear_velocity(&self, handle: RigidBodyHandle) -> Result<Vec3> {
        self.bodies
            .get(handle.0)
            .map(|b| {
                let vel = b.linvel();
                Vec3::new(vel.x, vel.y, vel.z)
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Set rigid body linear velocity
    pub fn set_body_linear_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) -> Result<()> {
        self.bodies
            .get_mut(handle.0)
            .map(|b| b.set_linvel(rapier::Vector::new(velocity.x, velocity.y, velocity.z), true))
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    // ==================== Colliders ====================

    /// Create a collider, optionally attached to a rigid body
    pub fn create_collider(&mut self, desc: ColliderDesc, parent: Option<RigidBodyHandle>) -> ColliderHandle {
        let builder = desc.to_rapier_builder();
        let handle = match parent {
            Some(body) => self.colliders.insert_with_parent(builder, body.0, &mut self.bodies),
            None => self.colliders.insert(builder),
        };
        ColliderHandle(handle)
    }

    // ==================== Static Geometry ====================

    /// Add a fixed box to the world and bump the static revision
    pub fn add_static_box(&mut self, desc: StaticBoxDesc) -> ColliderHandle {
        let body = self.create_rigid_body(
            RigidBodyDesc::fixed()
                .with_position(desc.center)
                .with_rotation(desc.rotation),
        );
        let collider = self.create_collider(
            ColliderDesc::new(ColliderShape::cuboid(
                desc.half_extents.x,
                desc.half_extents.y,
                desc.half_extents.z,
            ))
            .with_material(desc.material)
            .with_collision_groups(desc.groups),
            Some(body),
        );

        self.static_boxes.push(StaticBox {
            body,
            collider,
            center: desc.center,
            half_extents: desc.half_extents,
            groups: desc.groups,
        });
        self.static_revision += 1;
        collider
    }

    /// Remove a static box and bump the static revision
    pub fn remove_static_box(&mut self, collider: ColliderHandle) -> Result<()> {
        let index = self
            .static_boxes
            .iter()
            .position(|b| b.collider == collider)
            .ok_or(PhysicsError::ColliderNotFound(collider))?;
        let removed = self.static_boxes.remove(index);
        self.static_revision += 1;
        self.remove_rigid_body(removed.body)
    }

    /// Remove every static box
    pub fn clear_static_geometry(&mut self) {
        for removed in std::mem::take(&mut self.static_boxes) {
            if self.remove_rigid_body(removed.body).is_err() {
                log::warn!("static body {:?} already gone", removed.body);
            }
        }
        self.static_revision += 1;
    }

    // ==================== Simulation ====================

    /// Step the physics simulation with fixed timestep
    pub fn step(&mut self, delta_time: f32) -> u32 {
        self.accumulated_time += delta_time;

        let mut steps = 0;
        while self.accumulated_time >= self.config.timestep && steps < self.config.max_substeps {
            self.step_internal();
            self.accumulated_time -= self.config.timestep;
            steps += 1;
        }

        // Drop backlog we could not simulate rather than spiral
        if steps == self.config.max_substeps && self.accumulated_time >= self.config.timestep {
            self.accumulated_time = 0.0;
        }
        steps
    }

    /// Internal fixed timestep
    fn step_internal(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    // ==================== Debug ====================

    /// Get number of rigid bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Get number of colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl StaticColliderSource for PhysicsWorld {
    fn static_revision(&self) -> u64 {
        self.static_revision
    }

    fn static_boxes(&self) -> &[StaticBox] {
        &self.static_boxes
    }
}
