//! Player collaborator
//!
//! The simulation only needs a handful of things from the player: where it
//! is, a way to hurt or heal it, a speed multiplier and a way to put it back
//! at the spawn. [`HeadlessPlayer`] is a kinematic capsule with a manually tracked
//! position, driven by an optional autopilot instead of input.

use arena_combat::Health;
use arena_physics::{
    ColliderDesc, ColliderShape, CollisionGroups, PhysicsMaterial, PhysicsWorld, RigidBodyDesc,
    RigidBodyHandle,
};
use glam::Vec3;

use crate::config::{AutopilotConfig, PlayerConfig};
use crate::error::Result;
use crate::level::{is_over_floor, FLOOR_TOP};

/// Capsule half height, excluding the caps
pub const CAPSULE_HALF_HEIGHT: f32 = 0.7;
pub const CAPSULE_RADIUS: f32 = 0.4;
/// Center to capsule bottom
const CAPSULE_HALF_EXTENT: f32 = CAPSULE_HALF_HEIGHT + CAPSULE_RADIUS;
const GROUND_SNAP: f32 = 0.5;
const GRAVITY: f32 = 30.0;
/// Half-width of the square the player is held inside
pub const PLAYER_ARENA_CLAMP: f32 = 42.0;

/// What the simulation needs from the player
pub trait PlayerAgent {
    fn position(&self) -> Vec3;

    /// Advance movement by `dt`
    fn update(&mut self, dt: f32, physics: &mut PhysicsWorld);

    /// Apply already gated and scaled damage
    fn take_damage(&mut self, amount: f32);

    fn heal(&mut self, amount: f32);

    /// Difficulty scale times any running speed buff
    fn set_speed_multiplier(&mut self, multiplier: f32);

    fn health(&self) -> &Health;

    fn is_alive(&self) -> bool {
        self.health().is_alive()
    }

    /// Full health at `position`, motion cleared
    fn reset(&mut self, position: Vec3, physics: &mut PhysicsWorld) -> Result<()>;

    /// Damage the player deals to the nearest enemy this tick
    ///
    /// Weapons live outside the simulation; headless players may fire here.
    fn fire(&mut self, _dt: f32) -> Option<f32> {
        None
    }

    /// Range of [`PlayerAgent::fire`]
    fn fire_range(&self) -> f32 {
        0.0
    }

    /// Loaded fraction across finite weapons, 1.0 without any
    fn ammo_ratio(&self) -> f32 {
        1.0
    }

    fn refill_ammo(&mut self) {}
}

/// Kinematic capsule player for headless runs and tests
#[derive(Debug)]
pub struct HeadlessPlayer {
    body: RigidBodyHandle,
    position: Vec3,
    velocity: Vec3,
    grounded: bool,
    health: Health,
    autopilot: Option<AutopilotConfig>,
    /// Angle around the arena center while on autopilot
    orbit_angle: f32,
    speed_multiplier: f32,
}

impl HeadlessPlayer {
    /// Create the capsule body at the configured spawn
    pub fn spawn(config: &PlayerConfig, physics: &mut PhysicsWorld) -> Self {
        let position = config.spawn_position();
        let body = physics.create_rigid_body(RigidBodyDesc::kinematic().with_position(position));
        physics.create_collider(
            ColliderDesc::new(ColliderShape::capsule(CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS))
                .with_material(PhysicsMaterial::frictionless())
                .with_collision_groups(CollisionGroups::player()),
            Some(body),
        );

        Self {
            body,
            position,
            velocity: Vec3::ZERO,
            grounded: false,
            health: Health::new(config.max_health),
            autopilot: config.autopilot.clone(),
            orbit_angle: position.z.atan2(position.x),
            speed_multiplier: 1.0,
        }
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Teleport without touching health
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
    }

    fn autopilot_velocity(&mut self, dt: f32) -> Vec3 {
        let Some(pilot) = &self.autopilot else {
            return Vec3::ZERO;
        };
        let speed = pilot.speed * self.speed_multiplier;
        if pilot.orbit_radius <= 0.0 || speed <= 0.0 {
            return Vec3::ZERO;
        }

        self.orbit_angle += speed / pilot.orbit_radius * dt;
        let target = Vec3::new(
            self.orbit_angle.cos() * pilot.orbit_radius,
            0.0,
            self.orbit_angle.sin() * pilot.orbit_radius,
        );
        let to_target = Vec3::new(target.x - self.position.x, 0.0, target.z - self.position.z);
        to_target.clamp_length_max(speed)
    }
}

impl PlayerAgent for HeadlessPlayer {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn update(&mut self, dt: f32, physics: &mut PhysicsWorld) {
        let planar = self.autopilot_velocity(dt);
        let mut velocity = Vec3::new(planar.x, self.velocity.y, planar.z);
        let mut y = self.position.y;

        let gap = self.position.y - CAPSULE_HALF_EXTENT - FLOOR_TOP;
        if is_over_floor(self.position) && gap < GROUND_SNAP && gap > -0.3 {
            self.grounded = true;
            velocity.y = 0.0;
            y = FLOOR_TOP + CAPSULE_HALF_EXTENT;
        } else {
            self.grounded = false;
            velocity.y -= GRAVITY * dt;
            y += velocity.y * dt;
        }

        let x = self.position.x + velocity.x * dt;
        let z = self.position.z + velocity.z * dt;
        if x.abs() > PLAYER_ARENA_CLAMP {
            velocity.x = 0.0;
        }
        if z.abs() > PLAYER_ARENA_CLAMP {
            velocity.z = 0.0;
        }
        self.velocity = velocity;
        self.position = Vec3::new(
            x.clamp(-PLAYER_ARENA_CLAMP, PLAYER_ARENA_CLAMP),
            y,
            z.clamp(-PLAYER_ARENA_CLAMP, PLAYER_ARENA_CLAMP),
        );

        if let Err(e) = physics.set_body_position(self.body, self.position) {
            log::warn!("Player body missing: {}", e);
        }
    }

    fn take_damage(&mut self, amount: f32) {
        let (dealt, died) = self.health.apply_damage(amount);
        if died {
            log::info!("Player died");
        } else if dealt > 0.0 {
            log::trace!("Player took {:.1} damage", dealt);
        }
    }

    fn heal(&mut self, amount: f32) {
        let healed = self.health.heal(amount);
        log::trace!("Player healed {:.1}", healed);
    }

    fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier.max(0.0);
    }

    fn health(&self) -> &Health {
        &self.health
    }

    fn reset(&mut self, position: Vec3, physics: &mut PhysicsWorld) -> Result<()> {
        self.health.reset();
        self.set_position(position);
        self.grounded = false;
        self.orbit_angle = position.z.atan2(position.x);
        physics.set_body_position(self.body, position)?;
        Ok(())
    }

    fn fire(&mut self, dt: f32) -> Option<f32> {
        let pilot = self.autopilot.as_ref()?;
        (pilot.fire_dps > 0.0 && self.is_alive()).then(|| pilot.fire_dps * dt)
    }

    fn fire_range(&self) -> f32 {
        self.autopilot.as_ref().map_or(0.0, |p| p.fire_range)
    }
}
