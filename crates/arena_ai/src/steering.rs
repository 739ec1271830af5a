//! Obstacle-aware steering
//!
//! Direction selection samples a fan of headings around the desired one and
//! scores each by how directly it approaches the player, how much it keeps
//! the current heading, and how much obstacle pressure sits at a probe point
//! ahead. The remaining helpers shape the desired heading before selection:
//! neighbor separation, center avoidance and the boss detour around the
//! central sanctum.

use arena_core::math::segment_origin_distance_xz;
use arena_core::prelude::*;
use arena_physics::{pressure_at, ObstacleRecord};
use std::f32::consts::FRAC_PI_2;

use crate::agent::Agent;

/// Fan always evaluated, in radians (scaled by orbit sign)
pub const BASE_STEER_ANGLES: [f32; 7] = [0.0, 0.34, -0.34, 0.7, -0.7, 1.04, -1.04];

/// Wider fan added while the enemy is getting stuck
pub const HARD_STEER_ANGLES: [f32; 4] = [FRAC_PI_2, -FRAC_PI_2, 1.32, -1.32];

/// Pressure above which the current heading counts as blocked
const HEADING_BLOCKED_PRESSURE: f32 = 0.62;

/// Pick the best heading from the candidate fan
///
/// `desired` is the composed move direction, `flat_dir` the planar direction
/// to the player and `dist` the 3D distance to the player.
pub fn pick_steering_direction(
    agent: &Agent,
    desired: Vec3,
    flat_dir: Vec3,
    dist: f32,
    player: Vec3,
    obstacles: &[ObstacleRecord],
) -> Vec3 {
    let is_boss = agent.is_boss;
    let pos = agent.body.position;
    let base = flat_normalized(desired, flat_normalized(flat_dir, Vec3::Z));

    let probe_dist = if is_boss {
        (dist * 0.32).clamp(2.8, 5.8)
    } else {
        (dist * 0.26).clamp(1.35, 3.3)
    };
    let probe_radius = agent.radius * if is_boss { 1.08 } else { 1.0 };
    let prefer_outward = planar_length(player) > 12.0 && planar_length(pos) < 20.0;
    let outward = flat_normalized(pos, Vec3::ZERO);
    let pressure_weight = if is_boss { 2.8 } else { 2.2 };
    let outward_weight = if is_boss { 0.72 } else { 0.42 };
    let stuck = agent.state.stuck_timer;

    let hard_after = if is_boss { 0.4 } else { 0.28 };
    let hard: &[f32] = if stuck > hard_after { &HARD_STEER_ANGLES } else { &[] };

    let mut best_score = f32::NEG_INFINITY;
    let mut best_dir = base;

    for &raw in BASE_STEER_ANGLES.iter().chain(hard) {
        let candidate = rotate_y(base, raw * agent.state.orbit_sign);
        if candidate.length_squared() < 0.0001 {
            continue;
        }
        let candidate = candidate.normalize();

        let probe = Vec3::new(
            pos.x + candidate.x * probe_dist,
            pos.y,
            pos.z + candidate.z * probe_dist,
        );
        let pressure = pressure_at(obstacles, probe, probe_radius, agent.size());

        let mut score = candidate.dot(flat_dir) * 1.28 + candidate.dot(base) * 0.34;
        score -= pressure * pressure_weight;
        if prefer_outward {
            score += candidate.dot(outward) * outward_weight;
        }
        if stuck > 0.45 && raw.abs() > 0.2 {
            score += 0.2;
        }

        if score > best_score {
            best_score = score;
            best_dir = candidate;
        }
    }

    best_dir
}

/// True when a short probe along `dir` lands in heavy obstacle pressure
pub fn is_heading_into_obstacle(agent: &Agent, dir: Vec3, obstacles: &[ObstacleRecord]) -> bool {
    if dir.length_squared() < 0.0001 {
        return false;
    }
    let probe_dist = if agent.is_boss { 2.8 } else { 1.5 };
    let pos = agent.body.position;
    let probe = Vec3::new(pos.x + dir.x * probe_dist, pos.y, pos.z + dir.z * probe_dist);
    pressure_at(obstacles, probe, agent.radius, agent.size()) > HEADING_BLOCKED_PRESSURE
}

/// Normalized push away from nearby enemies, scaled by role strength
pub fn separation(agent: &Agent, neighbors: &[Vec3]) -> Vec3 {
    let radius = if agent.is_boss { 5.0 } else { 3.2 };
    let radius_sq = radius * radius;
    let pos = agent.body.position;

    let mut sum = Vec3::ZERO;
    for other in neighbors {
        let d = flat(pos - *other);
        let dist_sq = d.length_squared();
        if dist_sq < 0.0001 || dist_sq > radius_sq {
            continue;
        }
        let dist = dist_sq.sqrt();
        sum += d / dist * ((radius - dist) / radius);
    }

    let len = planar_length(sum);
    if len <= 0.001 {
        return Vec3::ZERO;
    }
    let strength = if agent.is_boss { 0.28 } else { 0.55 };
    sum / len * strength
}

/// Push off the arena center while the player is away from it
pub fn center_avoidance(agent: &Agent, player: Vec3) -> Vec3 {
    let pos = agent.body.position;
    let self_dist = planar_length(pos);
    if planar_length(player) <= 12.0 || self_dist >= 20.0 {
        return Vec3::ZERO;
    }

    let away = flat(pos);
    if away.length_squared() <= 0.0001 {
        return Vec3::new(agent.state.orbit_sign * 0.5, 0.0, 0.0);
    }
    let pressure = ((20.0 - self_dist) / 20.0).clamp(0.0, 1.0);
    let strength = if agent.is_boss { 1.0 } else { 0.6 };
    away.normalize() * pressure * strength
}

/// Heading that swings a boss around the central structure instead of
/// through it, when the straight path to the player passes near the center
pub fn boss_detour(agent: &Agent, flat_dir: Vec3, player: Vec3) -> Option<Vec3> {
    if !agent.is_boss {
        return None;
    }
    let pos = agent.body.position;
    if planar_length(pos) < 6.0 || planar_length(player) < 11.0 {
        return None;
    }
    if segment_origin_distance_xz(pos, player) > 12.8 {
        return None;
    }

    let outward = flat(pos);
    if outward.length_squared() < 0.0001 {
        return None;
    }
    let outward = outward.normalize();
    let tangent = Vec3::new(-outward.z, 0.0, outward.x) * agent.state.orbit_sign;
    let detour = outward * 0.44 + tangent * 0.84 + flat_dir * 0.2;
    if detour.length_squared() < 0.0001 {
        return None;
    }
    Some(detour.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn agent(archetype: Archetype, is_boss: bool, pos: Vec3) -> Agent {
        let mut rng = seeded_rng(21);
        let mut agent = Agent::new(archetype, is_boss, archetype.collision_radius(is_boss), pos, &mut rng);
        agent.state.orbit_sign = 1.0;
        agent
    }

    #[test]
    fn test_clear_path_goes_straight() {
        let a = agent(Archetype::Stalker, false, Vec3::new(0.0, 0.5, 30.0));
        let player = Vec3::new(0.0, 1.0, 20.0);
        let flat_dir = flat_normalized(player - a.body.position, Vec3::Z);
        let dir = pick_steering_direction(&a, flat_dir, flat_dir, 10.0, player, &[]);
        assert_relative_eq!(dir.dot(flat_dir), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_steers_around_wall() {
        let a = agent(Archetype::Stalker, false, Vec3::new(0.0, 0.5, 30.0));
        let player = Vec3::new(0.0, 1.0, 15.0);
        let wall = [ObstacleRecord::new(Vec3::new(0.0, 1.5, 27.5), Vec3::new(2.0, 1.5, 0.5))];
        let flat_dir = flat_normalized(player - a.body.position, Vec3::Z);

        assert!(is_heading_into_obstacle(&a, flat_dir, &wall));
        let dir = pick_steering_direction(&a, flat_dir, flat_dir, 15.0, player, &wall);
        assert!(dir.dot(flat_dir) < 0.99, "expected a turn, got {:?}", dir);
        assert!(dir.dot(flat_dir) > 0.0);
    }

    #[test]
    fn test_separation_pushes_apart() {
        let a = agent(Archetype::Brute, false, Vec3::ZERO);
        let neighbors = [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)];
        let push = separation(&a, &neighbors);
        assert_relative_eq!(push.x, -0.55, epsilon = 1e-5);
        assert_eq!(push.z, 0.0);

        assert_eq!(separation(&a, &[Vec3::ZERO]), Vec3::ZERO);
    }

    #[test]
    fn test_center_avoidance() {
        let a = agent(Archetype::Brute, false, Vec3::new(10.0, 0.0, 0.0));
        let push = center_avoidance(&a, Vec3::new(0.0, 0.0, 30.0));
        assert_relative_eq!(push.x, 0.5 * 0.6, epsilon = 1e-5);

        // Player in the middle: no push
        assert_eq!(center_avoidance(&a, Vec3::new(0.0, 0.0, 5.0)), Vec3::ZERO);

        let centered = agent(Archetype::Brute, false, Vec3::ZERO);
        assert_eq!(center_avoidance(&centered, Vec3::new(0.0, 0.0, 30.0)), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_boss_detour_only_when_path_crosses_center() {
        let boss = agent(Archetype::BossWarlord, true, Vec3::new(0.0, 1.0, -25.0));
        let flat_dir = Vec3::Z;
        let detour = boss_detour(&boss, flat_dir, Vec3::new(0.0, 1.0, 25.0)).unwrap();
        assert_relative_eq!(detour.length(), 1.0, epsilon = 1e-5);
        assert!(detour.x.abs() > 0.5);

        // Path along the rim stays clear of the center
        assert!(boss_detour(&boss, Vec3::X, Vec3::new(30.0, 1.0, -25.0)).is_none());

        let minion = agent(Archetype::Brute, false, Vec3::new(0.0, 1.0, -25.0));
        assert!(boss_detour(&minion, flat_dir, Vec3::new(0.0, 1.0, 25.0)).is_none());
    }
}
