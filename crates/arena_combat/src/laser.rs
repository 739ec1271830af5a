//! Boss twin-beam laser attack
//!
//! Every boss cycles Cooldown -> Charge -> Fire -> Cooldown. During Charge
//! the aim point drifts toward the player and short preview beams grow out
//! of the eyes. During Fire the beams reach full range and any player point
//! within `width` of either beam takes `damage_per_second * dt`.
//!
//! ```text
//!   Cooldown ──(timer ≤ 0, player in range+4)──► Charge
//!      ▲                                            │
//!      │                                      (timer ≤ 0)
//!      │                                            ▼
//!      └──────────────(timer ≤ 0)───────────────── Fire
//! ```

use arena_core::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CombatError, Result};

/// Timer applied when the attack is reset on boss death or game reset
pub const RESET_TIMER: f32 = 1.2;

const COOLDOWN_GLOW: f32 = 0.08;
const CHARGE_TRACKING: f32 = 0.8;
const FIRE_TRACKING: f32 = 1.2;
/// Extra reach beyond the beam range at which a charge may start
const ENGAGE_MARGIN: f32 = 4.0;

/// Resolved laser parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserConfig {
    /// Seconds of wind-up before firing
    pub charge: f32,
    /// Seconds the beams stay live
    pub duration: f32,
    /// Base seconds between attacks
    pub cooldown: f32,
    pub range: f32,
    pub damage_per_second: f32,
    /// Hit radius around each beam
    pub width: f32,
    /// Beam color, 0xRRGGBB
    pub color: u32,
}

impl Default for LaserConfig {
    fn default() -> Self {
        Self {
            charge: 0.85,
            duration: 1.05,
            cooldown: 4.2,
            range: 34.0,
            damage_per_second: 20.0,
            width: 1.5,
            color: 0xff2a00,
        }
    }
}

impl LaserConfig {
    /// Copy with every field present in `overrides` replaced
    pub fn with_overrides(mut self, overrides: &LaserOverrides) -> Self {
        if let Some(v) = overrides.charge {
            self.charge = v;
        }
        if let Some(v) = overrides.duration {
            self.duration = v;
        }
        if let Some(v) = overrides.cooldown {
            self.cooldown = v;
        }
        if let Some(v) = overrides.range {
            self.range = v;
        }
        if let Some(v) = overrides.damage_per_second {
            self.damage_per_second = v;
        }
        if let Some(v) = overrides.width {
            self.width = v;
        }
        if let Some(v) = overrides.color {
            self.color = v;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("charge", self.charge),
            ("duration", self.duration),
            ("cooldown", self.cooldown),
            ("range", self.range),
            ("width", self.width),
        ];
        for (field, value) in fields {
            if !(value > 0.0) {
                return Err(CombatError::InvalidLaser { field, value });
            }
        }
        if self.damage_per_second < 0.0 {
            return Err(CombatError::InvalidLaser {
                field: "damage_per_second",
                value: self.damage_per_second,
            });
        }
        Ok(())
    }
}

/// Partial laser parameters, applied field by field over the default
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserOverrides {
    pub charge: Option<f32>,
    pub duration: Option<f32>,
    pub cooldown: Option<f32>,
    pub range: Option<f32>,
    pub damage_per_second: Option<f32>,
    pub width: Option<f32>,
    pub color: Option<u32>,
}

/// Attack phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackPhase {
    Cooldown,
    Charge,
    Fire,
}

/// Where the boss is and which way it faces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossPose {
    /// Center of the boss model
    pub center: Vec3,
    /// Heading about +Y, 0 facing +Z
    pub yaw: f32,
    /// Collision radius, used to size the model footprint
    pub radius: f32,
}

impl BossPose {
    /// World positions of the left and right eye
    pub fn eye_points(&self) -> [Vec3; 2] {
        let width = self.radius * 2.0;
        let depth = self.radius * 2.0;
        let height = self.radius * 2.8;

        let forward = rotate_y(Vec3::Z, self.yaw);
        let right = rotate_y(Vec3::X, self.yaw);

        let lift = Vec3::Y * (height * 0.2).max(0.35);
        let ahead = forward * (depth * 0.22).max(0.22);
        let spread = right * (width * 0.15).max(0.1);

        let base = self.center + lift + ahead;
        [base - spread, base + spread]
    }
}

/// One beam from an eye toward the aim point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamSegment {
    pub start: Vec3,
    pub end: Vec3,
}

impl BeamSegment {
    fn toward(eye: Vec3, aim: Vec3, length: f32) -> Self {
        let dir = (aim - eye).try_normalize().unwrap_or(Vec3::Z);
        Self {
            start: eye,
            end: eye + dir * length,
        }
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        point_segment_distance(point, self.start, self.end)
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Result of one attack tick, for presentation and damage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackFrame {
    /// Phase after the tick
    pub phase: AttackPhase,
    /// Charge progress in [0, 1]; 1 while firing
    pub power: f32,
    /// Beams to draw; `None` hides them
    pub beams: Option<[BeamSegment; 2]>,
    /// Damage to deal to the player this tick, before gating
    pub damage: f32,
    /// Eye glow intensity in [0, 1]
    pub glow: f32,
}

impl AttackFrame {
    fn idle(phase: AttackPhase, glow: f32) -> Self {
        Self {
            phase,
            power: 0.0,
            beams: None,
            damage: 0.0,
            glow,
        }
    }

    pub fn hit_player(&self) -> bool {
        self.damage > 0.0
    }
}

/// Per-boss attack state machine
#[derive(Debug, Clone, PartialEq)]
pub struct BossAttackState {
    phase: AttackPhase,
    timer: f32,
    aim: Vec3,
    config: LaserConfig,
}

impl BossAttackState {
    /// Fresh state in Cooldown with a randomized first delay
    pub fn new<R: Rng + ?Sized>(config: LaserConfig, rng: &mut R) -> Self {
        Self {
            phase: AttackPhase::Cooldown,
            timer: 1.0 + rng.gen::<f32>() * 0.8,
            aim: Vec3::ZERO,
            config,
        }
    }

    /// State for a boss profile's laser overrides
    pub fn from_overrides<R: Rng + ?Sized>(overrides: &LaserOverrides, rng: &mut R) -> Result<Self> {
        let config = LaserConfig::default().with_overrides(overrides);
        config.validate()?;
        Ok(Self::new(config, rng))
    }

    pub fn phase(&self) -> AttackPhase {
        self.phase
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn aim(&self) -> Vec3 {
        self.aim
    }

    pub fn config(&self) -> &LaserConfig {
        &self.config
    }

    /// Back to Cooldown with the reset delay and hidden beams
    pub fn reset(&mut self) {
        self.phase = AttackPhase::Cooldown;
        self.timer = RESET_TIMER;
    }

    /// Advance the attack by `dt`
    ///
    /// `target` is the point the boss aims at and hit-tests against.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        pose: &BossPose,
        target: Vec3,
        rng: &mut R,
    ) -> AttackFrame {
        let cfg = self.config;
        self.timer -= dt;

        match self.phase {
            AttackPhase::Cooldown => {
                if self.timer <= 0.0 && pose.center.distance(target) <= cfg.range + ENGAGE_MARGIN {
                    self.phase = AttackPhase::Charge;
                    self.timer = cfg.charge;
                    self.aim = target;
                    log::debug!("boss laser charging at {:?}", target);
                }
                // Charge visuals start on the next tick
                AttackFrame::idle(self.phase, COOLDOWN_GLOW)
            }
            AttackPhase::Charge => {
                self.aim = self.aim.lerp(target, (dt * CHARGE_TRACKING).min(1.0));
                let power = (1.0 - self.timer.max(0.0) / cfg.charge.max(0.001)).clamp(0.0, 1.0);
                let length = cfg.range * (0.2 + power * 0.65);
                let beams = self.beams(pose, length);

                if self.timer <= 0.0 {
                    self.phase = AttackPhase::Fire;
                    self.timer = cfg.duration;
                }
                AttackFrame {
                    phase: self.phase,
                    power,
                    beams: Some(beams),
                    damage: 0.0,
                    glow: power,
                }
            }
            AttackPhase::Fire => {
                self.aim = self.aim.lerp(target, (dt * FIRE_TRACKING).min(1.0));
                let beams = self.beams(pose, cfg.range);
                let hit = beams.iter().any(|beam| beam.distance_to(target) <= cfg.width);
                let damage = if hit { cfg.damage_per_second * dt } else { 0.0 };

                if self.timer <= 0.0 {
                    self.phase = AttackPhase::Cooldown;
                    self.timer = cfg.cooldown * lerp(0.92, 1.08, rng.gen::<f32>());
                    return AttackFrame {
                        damage,
                        ..AttackFrame::idle(AttackPhase::Cooldown, 0.1)
                    };
                }
                AttackFrame {
                    phase: AttackPhase::Fire,
                    power: 1.0,
                    beams: Some(beams),
                    damage,
                    glow: 1.0,
                }
            }
        }
    }

    fn beams(&self, pose: &BossPose, length: f32) -> [BeamSegment; 2] {
        let [left, right] = pose.eye_points();
        [
            BeamSegment::toward(left, self.aim, length),
            BeamSegment::toward(right, self.aim, length),
        ]
    }
}
