//! Health pools and the player damage gate

use serde::{Deserialize, Serialize};

use crate::error::{CombatError, Result};

/// Damage at or above this bypasses the player hit cooldown
pub const LETHAL_THRESHOLD: f32 = 9000.0;

/// Damage dealt by out-of-bounds kills
pub const LETHAL_DAMAGE: f32 = 9999.0;

/// Seconds the player is shielded from further non-lethal hits
pub const PLAYER_HIT_COOLDOWN: f32 = 0.12;

/// Health pool for the player or an enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    /// Current health
    pub current: f32,
    /// Maximum health
    pub max: f32,
    #[serde(skip)]
    pub is_dead: bool,
}

impl Health {
    pub fn new(max_health: f32) -> Self {
        Self {
            current: max_health,
            max: max_health,
            is_dead: false,
        }
    }

    /// Multiply both current and maximum health
    pub fn scale(&mut self, factor: f32) {
        self.max *= factor;
        self.current *= factor;
    }

    /// Apply damage
    /// Returns the damage dealt and whether this hit killed
    pub fn apply_damage(&mut self, amount: f32) -> (f32, bool) {
        if self.is_dead {
            return (0.0, false);
        }

        let dealt = amount.max(0.0).min(self.current);
        self.current -= dealt;
        let died = self.current <= 0.0;
        if died {
            self.current = 0.0;
            self.is_dead = true;
        }
        (dealt, died)
    }

    /// Heal up to max. Returns the amount healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.is_dead {
            return 0.0;
        }
        let old = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - old
    }

    /// Set health directly (clamped to 0..max)
    pub fn set_health(&mut self, health: f32) {
        self.current = health.clamp(0.0, self.max);
        self.is_dead = self.current <= 0.0;
    }

    /// Restore to full health
    pub fn reset(&mut self) {
        self.current = self.max;
        self.is_dead = false;
    }

    /// Health as a fraction (0.0 - 1.0)
    pub fn health_percent(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Rate limits and scales damage on its way to the player
///
/// Non-lethal hits arm a short cooldown during which further non-lethal
/// hits are dropped. Lethal hits always pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDamageGate {
    cooldown: f32,
    damage_taken_scale: f32,
}

impl PlayerDamageGate {
    pub fn new(damage_taken_scale: f32) -> Result<Self> {
        if !damage_taken_scale.is_finite() || damage_taken_scale < 0.0 {
            return Err(CombatError::InvalidScale(damage_taken_scale));
        }
        Ok(Self {
            cooldown: 0.0,
            damage_taken_scale,
        })
    }

    pub fn damage_taken_scale(&self) -> f32 {
        self.damage_taken_scale
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Count the cooldown down
    pub fn tick(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }

    /// Pass `amount` through the gate
    ///
    /// Returns the scaled damage to apply, or `None` when the hit is absorbed
    /// by the cooldown.
    pub fn filter(&mut self, amount: f32) -> Option<f32> {
        let lethal = amount >= LETHAL_THRESHOLD;
        if !lethal {
            if self.cooldown > 0.0 {
                return None;
            }
            self.cooldown = PLAYER_HIT_COOLDOWN;
        }
        Some(amount * self.damage_taken_scale)
    }

    pub fn reset(&mut self) {
        self.cooldown = 0.0;
    }
}

impl Default for PlayerDamageGate {
    fn default() -> Self {
        Self {
            cooldown: 0.0,
            damage_taken_scale: 1.0,
        }
    }
}
