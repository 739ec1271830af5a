//! Enemy archetypes and their tunables

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base stats of an archetype before wave and difficulty scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeStats {
    pub health: f32,
    /// Horizontal cruise speed in units per second
    pub speed: f32,
    /// Contact damage per hit
    pub damage: f32,
    /// Nominal body size; used for contact range and vertical obstacle slack
    pub size: f32,
}

impl ArchetypeStats {
    const fn new(health: f32, speed: f32, damage: f32, size: f32) -> Self {
        Self {
            health,
            speed,
            damage,
            size,
        }
    }
}

/// How an archetype perturbs its chase direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementPattern {
    /// Straight pursuit
    Direct,
    /// Lateral sine weave
    ZigZag,
    /// Airborne bob while far, dive when close
    Swoop,
    /// Occasional random wander blended into pursuit
    Scuttle,
}

/// Closed set of enemy kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Arachnid,
    Specter,
    Titan,
    Brute,
    Harpy,
    Sentinel,
    Stalker,
    Kamikaze,
    BossWarlord,
    VoidReaper,
    Nightfang,
    RiftJudicator,
    EclipseWarden,
}

impl Archetype {
    pub const ALL: [Archetype; 13] = [
        Archetype::Arachnid,
        Archetype::Specter,
        Archetype::Titan,
        Archetype::Brute,
        Archetype::Harpy,
        Archetype::Sentinel,
        Archetype::Stalker,
        Archetype::Kamikaze,
        Archetype::BossWarlord,
        Archetype::VoidReaper,
        Archetype::Nightfang,
        Archetype::RiftJudicator,
        Archetype::EclipseWarden,
    ];

    /// Base tunables row
    pub const fn stats(self) -> ArchetypeStats {
        match self {
            Self::Arachnid => ArchetypeStats::new(160.0, 10.0, 20.0, 0.58),
            Self::Specter => ArchetypeStats::new(130.0, 11.0, 30.0, 0.42),
            Self::Titan => ArchetypeStats::new(900.0, 6.8, 65.0, 1.3),
            Self::Brute => ArchetypeStats::new(280.0, 8.6, 36.0, 0.95),
            Self::Harpy => ArchetypeStats::new(145.0, 12.0, 24.0, 0.5),
            Self::Sentinel => ArchetypeStats::new(175.0, 10.8, 30.0, 0.62),
            Self::Stalker => ArchetypeStats::new(120.0, 15.0, 24.0, 0.5),
            Self::Kamikaze => ArchetypeStats::new(55.0, 14.0, 110.0, 0.3),
            Self::BossWarlord => ArchetypeStats::new(3200.0, 8.0, 42.0, 1.45),
            Self::VoidReaper => ArchetypeStats::new(2900.0, 8.4, 40.0, 1.25),
            Self::Nightfang => ArchetypeStats::new(3040.0, 8.8, 44.0, 1.2),
            Self::RiftJudicator => ArchetypeStats::new(3180.0, 9.2, 46.0, 1.22),
            Self::EclipseWarden => ArchetypeStats::new(3340.0, 9.5, 49.0, 1.24),
        }
    }

    pub const fn movement_pattern(self) -> MovementPattern {
        match self {
            Self::Kamikaze => MovementPattern::ZigZag,
            Self::Harpy | Self::Sentinel => MovementPattern::Swoop,
            Self::Arachnid | Self::Stalker => MovementPattern::Scuttle,
            _ => MovementPattern::Direct,
        }
    }

    /// Flyers hover above the player and skip ground snapping
    pub const fn is_flying(self) -> bool {
        matches!(self, Self::Harpy | Self::Specter | Self::Sentinel)
    }

    /// Heavy units smooth their heading like bosses
    pub const fn is_heavy(self) -> bool {
        matches!(self, Self::Titan | Self::Brute)
    }

    /// Kamikazes charge straight in and never orbit
    pub const fn orbits_player(self) -> bool {
        !matches!(self, Self::Kamikaze)
    }

    /// Collision sphere radius before boss model scaling
    pub const fn collision_radius(self, is_boss: bool) -> f32 {
        match (self, is_boss) {
            (Self::BossWarlord, true) => 1.42,
            (Self::BossWarlord, false) => 1.32,
            (Self::Titan, true) => 1.2,
            (Self::Titan, false) => 1.08,
            (Self::VoidReaper, true) => 1.22,
            (Self::VoidReaper, false) => 0.56,
            (Self::Nightfang, true) => 1.18,
            (Self::Nightfang, false) => 0.58,
            (Self::RiftJudicator, true) => 1.2,
            (Self::RiftJudicator, false) => 0.56,
            (Self::EclipseWarden, true) => 1.22,
            (Self::EclipseWarden, false) => 0.58,
            (Self::Brute, _) => 0.95,
            (Self::Arachnid, _) => 0.62,
            (Self::Stalker, _) => 0.5,
            (Self::Specter, _) => 0.48,
            (Self::Harpy, _) => 0.52,
            (Self::Sentinel, _) => 0.62,
            (Self::Kamikaze, _) => 0.34,
        }
    }

    /// Rigid body mass
    pub const fn body_mass(self, is_boss: bool) -> f32 {
        if is_boss || matches!(self, Self::Titan) {
            85.0
        } else {
            5.0
        }
    }

    /// Height above the player a flyer tries to hold
    pub const fn hover_offset(self) -> f32 {
        match self {
            Self::Harpy => 3.2,
            _ => 2.2,
        }
    }

    /// Base horizontal velocity response rate
    pub const fn steering_response(self) -> f32 {
        match self {
            Self::BossWarlord => 8.0,
            Self::Titan | Self::Brute => 7.0,
            _ => 9.0,
        }
    }

    /// Snake-case name used in configuration files
    pub const fn name(self) -> &'static str {
        match self {
            Self::Arachnid => "arachnid",
            Self::Specter => "specter",
            Self::Titan => "titan",
            Self::Brute => "brute",
            Self::Harpy => "harpy",
            Self::Sentinel => "sentinel",
            Self::Stalker => "stalker",
            Self::Kamikaze => "kamikaze",
            Self::BossWarlord => "boss_warlord",
            Self::VoidReaper => "void_reaper",
            Self::Nightfang => "nightfang",
            Self::RiftJudicator => "rift_judicator",
            Self::EclipseWarden => "eclipse_warden",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Archetype {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == needle)
            .ok_or_else(|| CoreError::UnknownArchetype(s.to_string()))
    }
}
