//! Per-wave boss profiles

use arena_core::prelude::*;
use serde::Serialize;

use crate::laser::LaserOverrides;

/// Static description of the boss met on one wave
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BossProfile {
    pub name: &'static str,
    pub archetype: Archetype,
    /// Body tint, 0xRRGGBB
    pub tint: u32,
    pub model_scale: f32,
    pub health_multiplier: f32,
    pub speed_multiplier: f32,
    pub damage_multiplier: f32,
    /// Marks the last boss of the run
    pub is_final: bool,
    pub laser: LaserOverrides,
}

impl BossProfile {
    /// Collision radius multiplier derived from the model scale
    pub fn radius_scale(&self) -> f32 {
        self.model_scale.clamp(0.72, 1.22)
    }
}

const fn laser(
    charge: f32,
    duration: f32,
    cooldown: f32,
    range: f32,
    damage_per_second: f32,
    width: f32,
    color: u32,
) -> LaserOverrides {
    LaserOverrides {
        charge: Some(charge),
        duration: Some(duration),
        cooldown: Some(cooldown),
        range: Some(range),
        damage_per_second: Some(damage_per_second),
        width: Some(width),
        color: Some(color),
    }
}

/// Boss roster, one entry per wave
pub static BOSS_PROFILES: [BossProfile; 6] = [
    BossProfile {
        name: "Obsidian Titan",
        archetype: Archetype::Titan,
        tint: 0x4fc9ff,
        model_scale: 0.78,
        health_multiplier: 1.0,
        speed_multiplier: 0.92,
        damage_multiplier: 1.0,
        is_final: false,
        laser: laser(0.9, 0.95, 4.8, 31.0, 16.0, 1.35, 0x66e8ff),
    },
    BossProfile {
        name: "Void Reaper",
        archetype: Archetype::VoidReaper,
        tint: 0x9ef4ff,
        model_scale: 0.84,
        health_multiplier: 1.12,
        speed_multiplier: 1.03,
        damage_multiplier: 1.12,
        is_final: false,
        laser: laser(0.78, 1.05, 4.2, 35.0, 19.0, 1.42, 0x79e9ff),
    },
    BossProfile {
        name: "Nightfang Executioner",
        archetype: Archetype::Nightfang,
        tint: 0x86dcff,
        model_scale: 0.84,
        health_multiplier: 1.2,
        speed_multiplier: 1.08,
        damage_multiplier: 1.18,
        is_final: false,
        laser: laser(0.74, 1.1, 4.0, 34.0, 21.0, 1.45, 0x74d8ff),
    },
    BossProfile {
        name: "Rift Judicator",
        archetype: Archetype::RiftJudicator,
        tint: 0x7ce0ff,
        model_scale: 0.84,
        health_multiplier: 1.28,
        speed_multiplier: 1.14,
        damage_multiplier: 1.22,
        is_final: false,
        laser: laser(0.68, 1.2, 3.8, 36.0, 23.0, 1.34, 0x6edbff),
    },
    BossProfile {
        name: "Eclipse Warden",
        archetype: Archetype::EclipseWarden,
        tint: 0x89e7ff,
        model_scale: 0.85,
        health_multiplier: 1.36,
        speed_multiplier: 1.17,
        damage_multiplier: 1.28,
        is_final: false,
        laser: laser(0.64, 1.16, 3.6, 37.0, 26.0, 1.4, 0x7ee2ff),
    },
    BossProfile {
        name: "Abyss Sovereign",
        archetype: Archetype::BossWarlord,
        tint: 0x32d8ff,
        model_scale: 0.92,
        health_multiplier: 1.9,
        speed_multiplier: 1.08,
        damage_multiplier: 1.68,
        is_final: true,
        laser: laser(0.58, 1.35, 2.9, 39.0, 34.0, 1.9, 0x27cfff),
    },
];

/// Profile for a wave number; out-of-range waves clamp to the nearest entry
pub fn profile_for_wave(wave: u32) -> &'static BossProfile {
    let index = (wave.max(1) as usize - 1).min(BOSS_PROFILES.len() - 1);
    &BOSS_PROFILES[index]
}
