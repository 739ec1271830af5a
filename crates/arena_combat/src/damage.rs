//! Damage sources and the fixed combat rules that produce them

use arena_core::prelude::*;
use serde::{Deserialize, Serialize};

/// Enemies below this height are killed outright
pub const ENEMY_KILL_HEIGHT: f32 = -20.0;

/// The player takes lethal damage below this height
pub const PLAYER_FALL_HEIGHT: f32 = -10.0;

/// Where a hit on the player came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    /// Touching an enemy
    Contact,
    /// Boss laser beam
    Laser,
    /// Kamikaze death blast
    Blast,
    /// Falling out of the arena
    Fall,
}

/// A single damage instance aimed at the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageInfo {
    pub amount: f32,
    pub source: DamageSource,
    /// Enemy responsible, if any
    #[serde(skip)]
    pub enemy: Option<EnemyId>,
}

impl DamageInfo {
    pub fn new(amount: f32, source: DamageSource) -> Self {
        Self {
            amount,
            source,
            enemy: None,
        }
    }

    pub fn with_enemy(mut self, enemy: EnemyId) -> Self {
        self.enemy = Some(enemy);
        self
    }
}

/// Distance under which an enemy body hurts the player
pub fn contact_range(size: f32) -> f32 {
    (size * 1.1).max(1.5)
}

/// Contact damage per tick while in range
pub fn contact_damage(archetype_damage: f32) -> f32 {
    archetype_damage * 0.08
}

/// Contact hit from an enemy `dist` away, if in range
pub fn contact_hit(archetype_damage: f32, size: f32, dist: f32) -> Option<DamageInfo> {
    (dist < contact_range(size))
        .then(|| DamageInfo::new(contact_damage(archetype_damage), DamageSource::Contact))
}

/// Area damage released when a kamikaze dies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KamikazeBlast {
    pub radius: f32,
    pub damage: f32,
}

impl Default for KamikazeBlast {
    fn default() -> Self {
        Self {
            radius: 8.0,
            damage: 40.0,
        }
    }
}

impl KamikazeBlast {
    /// Flat blast damage when the player is inside the radius
    pub fn hit(&self, center: Vec3, player: Vec3) -> Option<DamageInfo> {
        (center.distance(player) < self.radius)
            .then(|| DamageInfo::new(self.damage, DamageSource::Blast))
    }
}
