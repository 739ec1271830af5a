//! Wave lifecycle and per-wave rules

use arena_core::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of waves in a run
pub const TOTAL_WAVES: u32 = 6;
/// First wave of a run
pub const START_WAVE: u32 = 1;
/// Seconds spent in STARTING and COMPLETE before moving on
pub const TRANSITION_DURATION: f32 = 1.2;

/// Wave lifecycle phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WavePhase {
    /// Overlay shown, no spawns yet
    #[default]
    Starting,
    /// Spawning and fighting
    Active,
    /// Wave cleared, waiting for the next one
    Complete,
    /// Run won; terminal
    Victory,
}

impl WavePhase {
    pub fn is_terminal(self) -> bool {
        self == Self::Victory
    }
}

/// Archetypes mixed into a wave's regular spawns
pub fn wave_composition(wave: u32) -> &'static [Archetype] {
    use Archetype::*;
    match wave {
        1 => &[Arachnid, Specter, Stalker],
        2 => &[Stalker, Harpy, Kamikaze, Specter],
        3 => &[Brute, Sentinel, Stalker, Kamikaze],
        4 => &[Brute, Titan, Sentinel, Harpy, Stalker],
        5 => &[Sentinel, Brute, Specter, Stalker, Kamikaze, Harpy],
        6 => &[Titan, Sentinel, Brute, Kamikaze, Stalker, Harpy, Specter],
        _ => &[Brute, Stalker, Sentinel, Kamikaze, Harpy, Specter],
    }
}

/// Shuffled copy of the composition; `[Arachnid]` when empty
pub fn build_spawn_cycle<R: Rng + ?Sized>(composition: &[Archetype], rng: &mut R) -> Vec<Archetype> {
    let mut cycle = if composition.is_empty() {
        vec![Archetype::Arachnid]
    } else {
        composition.to_vec()
    };
    cycle.shuffle(rng);
    cycle
}

/// Bosses opening a wave: one, two from wave 4, one again on the final wave
pub fn boss_count_for_wave(wave: u32) -> u32 {
    if wave >= TOTAL_WAVES {
        1
    } else if wave >= 4 {
        2
    } else {
        1
    }
}

/// Enemies to spawn over a wave, bosses included
pub fn enemies_per_wave(wave: u32) -> u32 {
    let base = 14 + (wave.saturating_sub(START_WAVE)) * 4;
    if wave == TOTAL_WAVES {
        base + 8
    } else if wave >= 4 {
        base + 2
    } else {
        base
    }
}

/// Seconds between spawns before difficulty scaling
pub fn base_spawn_rate(wave: u32) -> f32 {
    (1.04 - wave as f32 * 0.055).max(0.46)
}

/// Speed multiplier handed to regular spawns of a wave
pub fn wave_speed_multiplier(wave: u32) -> f32 {
    (0.95 + wave as f32 * 0.05).min(2.0)
}

/// Decorative arena phase shown for a wave
pub fn arena_phase_for_wave(wave: u32) -> u8 {
    if wave >= 5 {
        2
    } else if wave >= 3 {
        1
    } else {
        0
    }
}
