//! Spawn position solver
//!
//! Bounded randomized search for a point that keeps its distance from the
//! player, the arena center and other enemies while staying clear of static
//! geometry. Bosses try a fixed ring of anchors first. When every sample is
//! rejected the solver falls back to a deterministic point, so it always
//! produces a position.

use arena_core::prelude::*;
use arena_physics::ObstacleRecord;
use rand::Rng;
use std::f32::consts::TAU;

/// Height enemies are dropped from
pub const SPAWN_HEIGHT: f32 = 5.0;

/// Extra clearance around obstacles on top of the enemy radius
const OBSTACLE_CLEARANCE: f32 = 0.2;

const POLAR_ATTEMPTS: usize = 42;
const BOSS_RING_ATTEMPTS: usize = 20;
const BOSS_RING_RADIUS: f32 = 30.0;
const FALLBACK_CLAMP: f32 = 34.0;

/// Boss anchor points on the outer ring, as (x, z)
pub const BOSS_ANCHORS: [(f32, f32); 12] = [
    (0.0, 34.0),
    (34.0, 0.0),
    (0.0, -34.0),
    (-34.0, 0.0),
    (24.0, 32.0),
    (-24.0, 32.0),
    (24.0, -32.0),
    (-24.0, -32.0),
    (32.0, 24.0),
    (-32.0, 24.0),
    (32.0, -24.0),
    (-32.0, -24.0),
];

/// Placement constraints for one role
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRules {
    /// Inner radius of the sampling band around the player
    pub radius_min: f32,
    /// Outer radius of the sampling band around the player
    pub radius_max: f32,
    pub min_player_distance: f32,
    pub min_center_distance: f32,
    pub min_enemy_gap: f32,
    /// Candidates are clamped into this square
    pub edge_clamp: f32,
}

impl SpawnRules {
    pub const BOSS: SpawnRules = SpawnRules {
        radius_min: 30.0,
        radius_max: 42.0,
        min_player_distance: 20.0,
        min_center_distance: 26.0,
        min_enemy_gap: 11.0,
        edge_clamp: 36.0,
    };

    pub const REGULAR: SpawnRules = SpawnRules {
        radius_min: 25.0,
        radius_max: 45.0,
        min_player_distance: 10.0,
        min_center_distance: 9.0,
        min_enemy_gap: 3.5,
        edge_clamp: 38.0,
    };

    pub const fn for_role(is_boss: bool) -> SpawnRules {
        if is_boss {
            Self::BOSS
        } else {
            Self::REGULAR
        }
    }
}

/// Which search stage produced a spawn position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnStage {
    Anchor,
    Polar,
    BossRing,
    /// Every sample was rejected; constraints may not hold
    Fallback,
}

/// A solved spawn position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlacement {
    pub position: Vec3,
    pub stage: SpawnStage,
}

impl SpawnPlacement {
    pub fn is_fallback(&self) -> bool {
        self.stage == SpawnStage::Fallback
    }
}

/// Inputs to one solve
#[derive(Debug, Clone, Copy)]
pub struct SpawnQuery<'a> {
    pub archetype: Archetype,
    pub is_boss: bool,
    pub player: Vec3,
    /// Positions of live enemies
    pub live_enemies: &'a [Vec3],
    pub obstacles: &'a [ObstacleRecord],
}

impl SpawnQuery<'_> {
    fn rules(&self) -> SpawnRules {
        SpawnRules::for_role(self.is_boss)
    }

    fn radius(&self) -> f32 {
        self.archetype.collision_radius(self.is_boss)
    }

    /// True when `candidate` satisfies every placement constraint
    pub fn is_valid(&self, candidate: Vec3) -> bool {
        let rules = self.rules();
        if planar_distance(candidate, self.player) < rules.min_player_distance {
            return false;
        }
        if planar_length(candidate) < rules.min_center_distance {
            return false;
        }
        if self
            .live_enemies
            .iter()
            .any(|enemy| planar_distance(candidate, *enemy) < rules.min_enemy_gap)
        {
            return false;
        }
        !is_spawn_blocked(self.obstacles, candidate, self.radius())
    }
}

/// True when `position` sits inside any obstacle grown by `radius` plus clearance
pub fn is_spawn_blocked(obstacles: &[ObstacleRecord], position: Vec3, radius: f32) -> bool {
    let pad = radius + OBSTACLE_CLEARANCE;
    obstacles.iter().any(|obs| obs.contains_padded(position, pad))
}

/// Solve a spawn position, reporting the stage that produced it
pub fn solve<R: Rng + ?Sized>(query: &SpawnQuery<'_>, rng: &mut R) -> SpawnPlacement {
    let rules = query.rules();

    if query.is_boss {
        let start = rng.gen_range(0..BOSS_ANCHORS.len());
        for i in 0..BOSS_ANCHORS.len() {
            let (ax, az) = BOSS_ANCHORS[(start + i) % BOSS_ANCHORS.len()];
            let candidate = Vec3::new(
                (ax + (rng.gen::<f32>() - 0.5) * 3.0).clamp(-rules.edge_clamp, rules.edge_clamp),
                SPAWN_HEIGHT,
                (az + (rng.gen::<f32>() - 0.5) * 3.0).clamp(-rules.edge_clamp, rules.edge_clamp),
            );
            if query.is_valid(candidate) {
                return SpawnPlacement {
                    position: candidate,
                    stage: SpawnStage::Anchor,
                };
            }
        }
    }

    for _ in 0..POLAR_ATTEMPTS {
        let angle = rng.gen::<f32>() * TAU;
        let distance = rules.radius_min + rng.gen::<f32>() * (rules.radius_max - rules.radius_min);
        let candidate = Vec3::new(
            (query.player.x + angle.cos() * distance).clamp(-rules.edge_clamp, rules.edge_clamp),
            SPAWN_HEIGHT,
            (query.player.z + angle.sin() * distance).clamp(-rules.edge_clamp, rules.edge_clamp),
        );
        if query.is_valid(candidate) {
            return SpawnPlacement {
                position: candidate,
                stage: SpawnStage::Polar,
            };
        }
    }

    if query.is_boss {
        for _ in 0..BOSS_RING_ATTEMPTS {
            let angle = rng.gen::<f32>() * TAU;
            let candidate = Vec3::new(
                angle.cos() * BOSS_RING_RADIUS,
                SPAWN_HEIGHT,
                angle.sin() * BOSS_RING_RADIUS,
            );
            if query.is_valid(candidate) {
                return SpawnPlacement {
                    position: candidate,
                    stage: SpawnStage::BossRing,
                };
            }
        }
    }

    let position = fallback_position(query.is_boss, query.player);
    log::warn!(
        "spawn search exhausted for {}{}, falling back to {:?}",
        query.archetype,
        if query.is_boss { " (boss)" } else { "" },
        position
    );
    SpawnPlacement {
        position,
        stage: SpawnStage::Fallback,
    }
}

/// Solve a spawn position
pub fn find_spawn_position<R: Rng + ?Sized>(
    archetype: Archetype,
    is_boss: bool,
    player: Vec3,
    live_enemies: &[Vec3],
    obstacles: &[ObstacleRecord],
    rng: &mut R,
) -> Vec3 {
    let query = SpawnQuery {
        archetype,
        is_boss,
        player,
        live_enemies,
        obstacles,
    };
    solve(&query, rng).position
}

/// Deterministic position used once every sample is rejected
pub fn fallback_position(is_boss: bool, player: Vec3) -> Vec3 {
    if is_boss {
        let z = if player.z > 0.0 { -BOSS_RING_RADIUS } else { BOSS_RING_RADIUS };
        Vec3::new(0.0, SPAWN_HEIGHT, z)
    } else {
        Vec3::new(
            player.x.clamp(-FALLBACK_CLAMP, FALLBACK_CLAMP),
            SPAWN_HEIGHT,
            (player.z - 28.0).clamp(-FALLBACK_CLAMP, FALLBACK_CLAMP),
        )
    }
}
