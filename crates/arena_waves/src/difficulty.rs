//! Difficulty presets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WaveError;

/// Selectable difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn tuning(self) -> DifficultyTuning {
        DifficultyTuning::preset(self)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = WaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(WaveError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Multipliers a difficulty applies across the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    pub player_speed_scale: f32,
    /// Multiplier on every hit the player takes
    pub player_damage_taken_scale: f32,
    pub enemy_speed_scale: f32,
    pub enemy_health_scale: f32,
    /// Multiplier on the seconds between spawns
    pub spawn_rate_scale: f32,
    pub power_up_interval_scale: f32,
    /// Live enemy cap; no spawns while at or above it
    pub max_active_enemies: usize,
}

impl DifficultyTuning {
    pub fn preset(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                player_speed_scale: 0.95,
                player_damage_taken_scale: 0.78,
                enemy_speed_scale: 0.82,
                enemy_health_scale: 0.85,
                spawn_rate_scale: 1.25,
                power_up_interval_scale: 0.8,
                max_active_enemies: 26,
            },
            Difficulty::Medium => Self {
                player_speed_scale: 1.0,
                player_damage_taken_scale: 1.0,
                enemy_speed_scale: 0.95,
                enemy_health_scale: 1.0,
                spawn_rate_scale: 1.0,
                power_up_interval_scale: 1.0,
                max_active_enemies: 34,
            },
            Difficulty::Hard => Self {
                player_speed_scale: 1.05,
                player_damage_taken_scale: 1.2,
                enemy_speed_scale: 1.08,
                enemy_health_scale: 1.15,
                spawn_rate_scale: 0.85,
                power_up_interval_scale: 1.15,
                max_active_enemies: 42,
            },
        }
    }

    pub fn with_max_active_enemies(mut self, max: usize) -> Self {
        self.max_active_enemies = max;
        self
    }

    pub fn with_spawn_rate_scale(mut self, scale: f32) -> Self {
        self.spawn_rate_scale = scale;
        self
    }
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self::preset(Difficulty::Medium)
    }
}
