//! Locomotion tuning
//!
//! Thresholds that decide when an enemy counts as stuck or lost, and how
//! hard each recovery kicks in. Defaults reproduce the shipped game feel;
//! every field can be overridden from configuration.

use serde::{Deserialize, Serialize};

/// A value with a boss variant and a regular variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ByRole {
    pub boss: f32,
    pub regular: f32,
}

impl ByRole {
    pub const fn new(boss: f32, regular: f32) -> Self {
        Self { boss, regular }
    }

    #[inline]
    pub fn pick(&self, is_boss: bool) -> f32 {
        if is_boss {
            self.boss
        } else {
            self.regular
        }
    }
}

/// Tunable thresholds for enemy safeguards and stuck recovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionTuning {
    /// Below this height an enemy is considered fallen out of the arena
    pub fall_height: f32,
    /// Half-width of the square enemies are clamped into
    pub arena_clamp: f32,
    /// Seconds between static overlap resolutions
    pub overlap_interval: f32,
    /// Maximum push applied by one overlap resolution
    pub overlap_max_push: ByRole,
    /// Minimum escape speed along the push axis
    pub overlap_min_escape: ByRole,

    /// Planar distance from the player beyond which the far timer grows
    pub far_distance: ByRole,
    /// Far time after which the enemy is relocated near the player
    pub far_timeout: ByRole,
    /// Far timer decay rate while close enough
    pub far_decay: f32,

    /// Minimum planar displacement per tick that counts as moving
    pub min_movement: ByRole,
    /// Stuck timer growth rate
    pub stuck_rate: ByRole,
    /// Stuck time that triggers a boss relocation
    pub boss_relocate_after: f32,
    /// Stuck time that triggers a positional nudge
    pub nudge_after: f32,
    /// Stuck time that triggers a side-step impulse
    pub sidestep_after: ByRole,

    /// Cooldown after a boss relocation
    pub relocate_cooldown: f32,
    /// Cooldown after a far relocation
    pub far_cooldown: ByRole,
    /// Cooldown after a nudge
    pub nudge_cooldown: ByRole,

    /// Clamp for recovery positions
    pub recovery_clamp: f32,
    /// Minimum planar distance from the player for a recovery placement
    pub recovery_player_clearance: ByRole,
}

impl Default for LocomotionTuning {
    fn default() -> Self {
        Self {
            fall_height: -10.0,
            arena_clamp: 42.0,
            overlap_interval: 0.22,
            overlap_max_push: ByRole::new(1.4, 0.9),
            overlap_min_escape: ByRole::new(3.1, 2.0),

            far_distance: ByRole::new(58.0, 50.0),
            far_timeout: ByRole::new(8.5, 7.0),
            far_decay: 2.2,

            min_movement: ByRole::new(0.035, 0.02),
            stuck_rate: ByRole::new(0.7, 1.0),
            boss_relocate_after: 1.2,
            nudge_after: 1.5,
            sidestep_after: ByRole::new(0.6, 0.45),

            relocate_cooldown: 1.3,
            far_cooldown: ByRole::new(1.4, 0.9),
            nudge_cooldown: ByRole::new(0.8, 0.2),

            recovery_clamp: 34.0,
            recovery_player_clearance: ByRole::new(20.0, 10.0),
        }
    }
}

impl LocomotionTuning {
    pub fn with_arena_clamp(mut self, clamp: f32) -> Self {
        self.arena_clamp = clamp;
        self
    }

    pub fn with_far_timeout(mut self, boss: f32, regular: f32) -> Self {
        self.far_timeout = ByRole::new(boss, regular);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_role_pick() {
        let value = ByRole::new(2.0, 1.0);
        assert_eq!(value.pick(true), 2.0);
        assert_eq!(value.pick(false), 1.0);
    }

    #[test]
    fn test_builders() {
        let tuning = LocomotionTuning::default()
            .with_arena_clamp(30.0)
            .with_far_timeout(4.0, 3.0);
        assert_eq!(tuning.arena_clamp, 30.0);
        assert_eq!(tuning.far_timeout.pick(false), 3.0);
        assert_eq!(tuning.nudge_after, 1.5);
        assert_eq!(tuning.recovery_player_clearance.pick(true), 20.0);
    }
}
