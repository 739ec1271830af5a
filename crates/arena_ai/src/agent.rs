//! Per-enemy locomotion state

use arena_core::prelude::*;
use arena_physics::ObstacleRecord;
use rand::Rng;

use crate::tuning::LocomotionTuning;

/// Lowest and highest speed multiplier an enemy may carry
pub const SPEED_MULTIPLIER_RANGE: (f32, f32) = (0.6, 2.6);

/// Position and velocity of the enemy's rigid body
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kinematics {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Kinematics {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
        }
    }
}

/// Scratch state carried between locomotion ticks
#[derive(Debug, Clone, PartialEq)]
pub struct LocomotionState {
    /// Seconds spent trying to move without moving
    pub stuck_timer: f32,
    /// Seconds spent far from the player
    pub far_timer: f32,
    /// Seconds since the last static overlap resolution
    pub overlap_timer: f32,
    /// Blocks forced relocations while positive
    pub unstick_cooldown: f32,
    /// +1 or -1, picks which way this enemy circles and turns
    pub orbit_sign: f32,
    /// Low-pass filtered heading for heavy and boss units
    pub smoothed_dir: Vec3,
    pub last_position: Vec3,
    pub yaw: f32,
    pub target_yaw: f32,
    /// Animation clock, randomly offset per enemy
    pub time: f32,
    pub wander_dir: Option<Vec3>,
    /// Where the model is drawn; trails the body for heavy and boss units
    pub visual_position: Vec3,
}

impl LocomotionState {
    fn new<R: Rng + ?Sized>(position: Vec3, rng: &mut R) -> Self {
        Self {
            stuck_timer: 0.0,
            far_timer: 0.0,
            overlap_timer: rng.gen::<f32>() * 0.15,
            unstick_cooldown: 0.0,
            orbit_sign: random_sign(rng),
            smoothed_dir: Vec3::Z,
            last_position: position,
            yaw: 0.0,
            target_yaw: 0.0,
            time: rng.gen::<f32>() * 100.0,
            wander_dir: None,
            visual_position: position,
        }
    }
}

/// A steerable enemy body
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub archetype: Archetype,
    pub is_boss: bool,
    /// Collision sphere radius
    pub radius: f32,
    speed_multiplier: f32,
    pub body: Kinematics,
    pub state: LocomotionState,
}

impl Agent {
    pub fn new<R: Rng + ?Sized>(
        archetype: Archetype,
        is_boss: bool,
        radius: f32,
        position: Vec3,
        rng: &mut R,
    ) -> Self {
        Self {
            archetype,
            is_boss,
            radius,
            speed_multiplier: 1.0,
            body: Kinematics::at(position),
            state: LocomotionState::new(position, rng),
        }
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Set the speed multiplier, clamped into [`SPEED_MULTIPLIER_RANGE`]
    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        let (lo, hi) = SPEED_MULTIPLIER_RANGE;
        self.speed_multiplier = multiplier.clamp(lo, hi);
    }

    pub fn with_speed_multiplier(mut self, multiplier: f32) -> Self {
        self.set_speed_multiplier(multiplier);
        self
    }

    /// Archetype speed scaled by the multiplier
    pub fn cruise_speed(&self) -> f32 {
        self.archetype.stats().speed * self.speed_multiplier
    }

    pub fn size(&self) -> f32 {
        self.archetype.stats().size
    }

    pub fn is_flying(&self) -> bool {
        self.archetype.is_flying()
    }

    /// Heavy and boss units low-pass their heading and visuals
    pub fn smooths_heading(&self) -> bool {
        self.is_boss || self.archetype.is_heavy()
    }

    /// Move instantly, dropping velocity and visual lag
    pub fn teleport(&mut self, position: Vec3) {
        self.body.position = position;
        self.body.velocity = Vec3::ZERO;
        self.state.last_position = position;
        self.state.visual_position = position;
    }
}

/// Inputs shared by every agent during one tick
#[derive(Debug, Clone, Copy)]
pub struct LocomotionContext<'a> {
    pub dt: f32,
    pub player: Option<Vec3>,
    /// Positions of live enemies; entries equal to the agent's own position are ignored
    pub neighbors: &'a [Vec3],
    pub obstacles: &'a [ObstacleRecord],
    pub tuning: &'a LocomotionTuning,
}

/// Corrective action taken during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Fell below the arena and was put back
    FallReset,
    /// Strayed too far for too long and was moved near the player
    FarRelocate,
    /// Boss wedged for too long and was moved to open ground
    BossRelocate,
    /// Shoved out of a wedge
    Nudge,
    /// Sideways impulse to slide off an obstacle
    SideStep,
}
