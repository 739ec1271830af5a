//! Movement safeguards and stuck recovery
//!
//! Runs before steering every tick. Keeps the body inside the arena, pops it
//! out of static geometry, holds ground units on the floor and flyers above
//! it, and escalates through recovery actions while an enemy is wedged.

use arena_core::prelude::*;
use arena_physics::ObstacleRecord;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use crate::agent::{Agent, LocomotionContext, Recovery};
use crate::tuning::LocomotionTuning;

/// Spawn height used by recovery placements
const RECOVERY_HEIGHT: f32 = 5.0;

/// Run the safeguards for one tick
///
/// Returns the recovery action taken, if any. Flyers only get the floor lift
/// and never enter stuck detection.
pub fn apply_safeguards<R: Rng + ?Sized>(
    agent: &mut Agent,
    ctx: &LocomotionContext<'_>,
    rng: &mut R,
) -> Option<Recovery> {
    let tuning = ctx.tuning;

    if agent.body.position.y < tuning.fall_height {
        let target = safe_recovery_position(agent, ctx.player, tuning, rng);
        agent.teleport(target);
        clamp_to_arena(agent, tuning.arena_clamp);
        agent.state.stuck_timer = 0.0;
        log::debug!("{} fell out of the arena, reset to {:?}", agent.archetype, target);
        return Some(Recovery::FallReset);
    }

    agent.state.unstick_cooldown = (agent.state.unstick_cooldown - ctx.dt).max(0.0);
    agent.state.overlap_timer += ctx.dt;
    if agent.state.overlap_timer >= tuning.overlap_interval {
        resolve_static_overlap(agent, ctx.obstacles, tuning);
        agent.state.overlap_timer = 0.0;
    }
    clamp_to_arena(agent, tuning.arena_clamp);

    if agent.is_flying() {
        if agent.body.position.y < 1.2 {
            agent.body.velocity.y = agent.body.velocity.y.max(3.0);
        }
        return None;
    }

    hold_ground(agent);
    let recovery = update_stuck_recovery(agent, ctx, rng);
    if recovery.is_some() {
        // Recovery moves may land past the edge
        clamp_to_arena(agent, tuning.arena_clamp);
    }
    recovery
}

/// Clamp x/z into the arena square. Returns true when a clamp happened.
pub fn clamp_to_arena(agent: &mut Agent, clamp: f32) -> bool {
    let body = &mut agent.body;
    let mut clamped = false;

    if body.position.x > clamp {
        body.position.x = clamp;
        body.velocity.x = body.velocity.x.min(0.0);
        clamped = true;
    } else if body.position.x < -clamp {
        body.position.x = -clamp;
        body.velocity.x = body.velocity.x.max(0.0);
        clamped = true;
    }

    if body.position.z > clamp {
        body.position.z = clamp;
        body.velocity.z = body.velocity.z.min(0.0);
        clamped = true;
    } else if body.position.z < -clamp {
        body.position.z = -clamp;
        body.velocity.z = body.velocity.z.max(0.0);
        clamped = true;
    }

    if clamped {
        agent.state.stuck_timer = 0.0;
    }
    clamped
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Z,
}

/// Push the body out of the shallowest penetrated obstacle along its smaller
/// horizontal axis. Returns true when a push was applied.
pub fn resolve_static_overlap(
    agent: &mut Agent,
    obstacles: &[ObstacleRecord],
    tuning: &LocomotionTuning,
) -> bool {
    let radius = agent.radius;
    let pos = agent.body.position;
    let mut best: Option<(Axis, f32, f32)> = None;

    for obs in obstacles {
        let d = pos - obs.center;
        let half = obs.half_extents;
        let ox = half.x + radius - d.x.abs();
        let oy = half.y + radius - d.y.abs();
        let oz = half.z + radius - d.z.abs();
        if ox <= 0.0 || oy <= 0.0 || oz <= 0.0 {
            continue;
        }
        if ox.min(oz) <= 0.02 {
            continue;
        }

        let (axis, depth, delta) = if ox < oz { (Axis::X, ox, d.x) } else { (Axis::Z, oz, d.z) };
        if best.map_or(true, |(_, best_depth, _)| depth < best_depth) {
            let sign = if delta >= 0.0 { 1.0 } else { -1.0 };
            best = Some((axis, depth, sign));
        }
    }

    let Some((axis, depth, sign)) = best else {
        return false;
    };

    let push = tuning.overlap_max_push.pick(agent.is_boss).min(depth + 0.08) * sign;
    let min_escape = tuning.overlap_min_escape.pick(agent.is_boss);
    let body = &mut agent.body;
    match axis {
        Axis::X => {
            body.position.x += push;
            body.velocity.x = sign * min_escape.max(body.velocity.x.abs());
        }
        Axis::Z => {
            body.position.z += push;
            body.velocity.z = sign * min_escape.max(body.velocity.z.abs());
        }
    }
    true
}

/// Keep ground units on the floor and damp small vertical hops
fn hold_ground(agent: &mut Agent) {
    let min_y = agent.radius;
    let body = &mut agent.body;
    if body.position.y < min_y - 0.25 {
        body.position.y = min_y;
        if body.velocity.y < 0.0 {
            body.velocity.y = 0.0;
        }
    }
    if body.position.y <= min_y + 0.05 && body.velocity.y.abs() < 1.5 {
        body.velocity.y *= 0.5;
        if body.velocity.y.abs() < 0.08 {
            body.velocity.y = 0.0;
        }
    }
}

fn update_stuck_recovery<R: Rng + ?Sized>(
    agent: &mut Agent,
    ctx: &LocomotionContext<'_>,
    rng: &mut R,
) -> Option<Recovery> {
    let tuning = ctx.tuning;
    let is_boss = agent.is_boss;
    let pos = agent.body.position;

    let moved = planar_distance(pos, agent.state.last_position);
    agent.state.last_position = pos;

    let horizontal_speed = planar_length(agent.body.velocity);
    let dist_2d = ctx.player.map_or(0.0, |p| planar_distance(p, pos));

    match ctx.player {
        Some(player) => {
            if dist_2d > tuning.far_distance.pick(is_boss) {
                agent.state.far_timer += ctx.dt;
            } else {
                agent.state.far_timer = (agent.state.far_timer - ctx.dt * tuning.far_decay).max(0.0);
            }

            if agent.state.far_timer > tuning.far_timeout.pick(is_boss)
                && agent.state.unstick_cooldown <= 0.0
            {
                let target = close_recovery_position(agent, player, tuning, rng);
                agent.teleport(target);
                agent.state.stuck_timer = 0.0;
                agent.state.far_timer = 0.0;
                agent.state.unstick_cooldown = tuning.far_cooldown.pick(is_boss);
                log::debug!("{} lost the player, relocated to {:?}", agent.archetype, target);
                return Some(Recovery::FarRelocate);
            }
        }
        None => agent.state.far_timer = 0.0,
    }

    let preferred = if is_boss { 2.2 } else { 1.5 };
    let closing_gap = ctx.player.is_some() && dist_2d > preferred + 0.4;
    let trying = horizontal_speed > 0.6 || closing_gap;
    let moving = moved > tuning.min_movement.pick(is_boss);

    if !trying || moving {
        agent.state.stuck_timer = 0.0;
        return None;
    }

    agent.state.stuck_timer += ctx.dt * tuning.stuck_rate.pick(is_boss);
    let stuck = agent.state.stuck_timer;

    if is_boss && stuck > tuning.boss_relocate_after && agent.state.unstick_cooldown <= 0.0 {
        let target = safe_recovery_position(agent, ctx.player, tuning, rng);
        let vy = agent.body.velocity.y;
        agent.teleport(target);
        if let Some(player) = ctx.player {
            let to_player = flat(player - target);
            if to_player.length_squared() > 0.001 {
                let launch = to_player.normalize() * agent.cruise_speed() * 0.85;
                agent.body.velocity.x = launch.x;
                agent.body.velocity.z = launch.z;
            }
        }
        agent.body.velocity.y = vy.max(1.2);
        agent.state.stuck_timer = 0.0;
        agent.state.unstick_cooldown = tuning.relocate_cooldown;
        log::debug!("boss {} wedged, relocated to {:?}", agent.archetype, target);
        return Some(Recovery::BossRelocate);
    }

    if stuck > tuning.nudge_after {
        let mut nudge = Vec3::new(rng.gen::<f32>() - 0.5, 0.0, rng.gen::<f32>() - 0.5);
        if let Some(player) = ctx.player {
            let to_player = flat(player - pos);
            if to_player.length_squared() > 0.0001 {
                let to_player = to_player.normalize();
                let sidestep = Vec3::new(-to_player.z, 0.0, to_player.x) * agent.state.orbit_sign;
                nudge = to_player * 0.7 + sidestep * 0.8;
            }
        }
        if nudge.length_squared() < 0.0001 {
            nudge = Vec3::new(rng.gen::<f32>() - 0.5, 0.0, rng.gen::<f32>() - 0.5);
        }
        let nudge = nudge.normalize_or_zero();
        let distance = if is_boss { 2.8 } else { 1.1 };
        let escape = agent.cruise_speed() * if is_boss { 0.9 } else { 0.65 };

        agent.body.position.x += nudge.x * distance;
        agent.body.position.z += nudge.z * distance;
        agent.body.velocity.x = nudge.x * escape;
        agent.body.velocity.z = nudge.z * escape;
        agent.state.stuck_timer = 0.0;
        agent.state.unstick_cooldown = tuning.nudge_cooldown.pick(is_boss);
        return Some(Recovery::Nudge);
    }

    if stuck > tuning.sidestep_after.pick(is_boss) {
        let sign = agent.state.orbit_sign;
        let mut side = Vec3::new(sign * agent.body.velocity.z, 0.0, -sign * agent.body.velocity.x);
        if side.length_squared() < 0.001 {
            side = Vec3::new(rng.gen::<f32>() - 0.5, 0.0, rng.gen::<f32>() - 0.5);
        }
        let side = side.normalize_or_zero();
        let boost = if is_boss { 3.6 } else { 5.2 };
        agent.body.velocity.x += side.x * boost;
        agent.body.velocity.z += side.z * boost;
        if is_boss {
            agent.body.velocity.y = agent.body.velocity.y.max(1.1);
        }
        agent.state.stuck_timer = if is_boss { 0.25 } else { 0.2 };
        return Some(Recovery::SideStep);
    }

    None
}

/// Open ground 20-30 units from the player, away from the central structure
///
/// Candidates are checked after clamping, so a placement never lands inside
/// the role's clearance around the player. When every candidate fails, the
/// clamped corner farthest from the player is used.
pub fn safe_recovery_position<R: Rng + ?Sized>(
    agent: &Agent,
    player: Option<Vec3>,
    tuning: &LocomotionTuning,
    rng: &mut R,
) -> Vec3 {
    let clamp = tuning.recovery_clamp;
    let avoid = if agent.is_boss { 18.0 } else { 15.0 };

    let Some(player) = player else {
        let angle = rng.gen::<f32>() * TAU;
        let radius = if agent.is_boss { 30.0 } else { 26.0 };
        return Vec3::new(angle.cos() * radius, RECOVERY_HEIGHT, angle.sin() * radius);
    };

    let clearance = tuning.recovery_player_clearance.pick(agent.is_boss);
    let base_angle = rng.gen::<f32>() * TAU;
    for i in 0..10 {
        let angle = base_angle + i as f32 * (PI * 0.6);
        let radius = 20.0 + rng.gen::<f32>() * 10.0;
        let candidate = Vec3::new(
            (player.x + angle.cos() * radius).clamp(-clamp, clamp),
            RECOVERY_HEIGHT,
            (player.z + angle.sin() * radius).clamp(-clamp, clamp),
        );
        if planar_length(candidate) > avoid && planar_distance(candidate, player) >= clearance {
            return candidate;
        }
    }

    let x = if player.x > 0.0 { -clamp } else { clamp };
    let z = if player.z > 0.0 { -clamp } else { clamp };
    Vec3::new(x, RECOVERY_HEIGHT, z)
}

/// A point on a ring around the player, used when an enemy strays too far
pub fn close_recovery_position<R: Rng + ?Sized>(
    agent: &Agent,
    player: Vec3,
    tuning: &LocomotionTuning,
    rng: &mut R,
) -> Vec3 {
    let clamp = tuning.recovery_clamp;
    let distance = if agent.is_boss { 16.0 } else { 12.0 };
    let angle = rng.gen::<f32>() * TAU;
    let y = if agent.is_flying() {
        (player.y + 2.6).max(3.8)
    } else {
        agent.radius.max(3.4)
    };
    Vec3::new(
        (player.x + angle.cos() * distance).clamp(-clamp, clamp),
        y,
        (player.z + angle.sin() * distance).clamp(-clamp, clamp),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::ByRole;
    use approx::assert_relative_eq;

    fn ctx<'a>(
        tuning: &'a LocomotionTuning,
        obstacles: &'a [ObstacleRecord],
        player: Option<Vec3>,
    ) -> LocomotionContext<'a> {
        LocomotionContext {
            dt: 1.0 / 60.0,
            player,
            neighbors: &[],
            obstacles,
            tuning,
        }
    }

    fn brute_at(pos: Vec3) -> Agent {
        let mut rng = seeded_rng(5);
        let mut agent = Agent::new(Archetype::Brute, false, 0.95, pos, &mut rng);
        agent.state.overlap_timer = 0.0;
        agent
    }

    #[test]
    fn test_fall_reset() {
        let tuning = LocomotionTuning::default();
        let mut rng = seeded_rng(1);
        let mut agent = brute_at(Vec3::new(0.0, -11.0, 0.0));
        agent.body.velocity = Vec3::new(0.0, -20.0, 0.0);
        agent.state.stuck_timer = 1.0;

        let result = apply_safeguards(&mut agent, &ctx(&tuning, &[], Some(Vec3::new(0.0, 1.0, 30.0))), &mut rng);
        assert_eq!(result, Some(Recovery::FallReset));
        assert_eq!(agent.body.position.y, 5.0);
        assert_eq!(agent.body.velocity, Vec3::ZERO);
        assert_eq!(agent.state.stuck_timer, 0.0);
        assert!(agent.body.position.x.abs() <= 34.0 && agent.body.position.z.abs() <= 34.0);
    }

    #[test]
    fn test_arena_clamp_drops_outward_velocity() {
        let mut agent = brute_at(Vec3::new(50.0, 1.0, -60.0));
        agent.body.velocity = Vec3::new(4.0, 0.0, -3.0);
        agent.state.stuck_timer = 0.9;

        assert!(clamp_to_arena(&mut agent, 42.0));
        assert_eq!(agent.body.position.x, 42.0);
        assert_eq!(agent.body.position.z, -42.0);
        assert_eq!(agent.body.velocity.x, 0.0);
        assert_eq!(agent.body.velocity.z, 0.0);
        assert_eq!(agent.state.stuck_timer, 0.0);

        agent.body.velocity = Vec3::new(-2.0, 0.0, 2.0);
        assert!(!clamp_to_arena(&mut agent, 42.0));
        assert_eq!(agent.body.velocity, Vec3::new(-2.0, 0.0, 2.0));
    }

    #[test]
    fn test_overlap_pushes_along_shallow_axis() {
        let tuning = LocomotionTuning::default();
        let wall = [ObstacleRecord::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(5.0, 1.5, 1.0))];
        // Inside the wall near its +z face
        let mut agent = brute_at(Vec3::new(0.0, 1.0, 1.5));

        assert!(resolve_static_overlap(&mut agent, &wall, &tuning));
        // overlap z = 1 + 0.95 - 1.5 = 0.45, push = 0.53
        assert_relative_eq!(agent.body.position.z, 2.03, epsilon = 1e-5);
        assert_relative_eq!(agent.body.velocity.z, 2.0);
        assert_eq!(agent.body.position.x, 0.0);
    }

    #[test]
    fn test_flyer_lifted_and_skips_stuck() {
        let tuning = LocomotionTuning::default();
        let mut rng = seeded_rng(3);
        let mut agent = Agent::new(Archetype::Harpy, false, 0.52, Vec3::new(0.0, 0.8, 0.0), &mut rng);
        agent.body.velocity.y = -1.0;
        agent.state.stuck_timer = 2.0;

        let result = apply_safeguards(&mut agent, &ctx(&tuning, &[], Some(Vec3::new(0.0, 1.0, 20.0))), &mut rng);
        assert_eq!(result, None);
        assert_eq!(agent.body.velocity.y, 3.0);
        assert_eq!(agent.state.stuck_timer, 2.0);
    }

    #[test]
    fn test_ground_snap() {
        let mut agent = brute_at(Vec3::new(0.0, 0.2, 0.0));
        agent.body.velocity.y = -0.1;
        hold_ground(&mut agent);
        assert_eq!(agent.body.position.y, 0.95);
        assert_eq!(agent.body.velocity.y, 0.0);
    }

    #[test]
    fn test_stuck_escalates_to_sidestep_then_nudge() {
        let tuning = LocomotionTuning::default();
        let mut rng = seeded_rng(8);
        let player = Some(Vec3::new(0.0, 1.0, 30.0));
        let mut agent = brute_at(Vec3::new(0.0, 0.95, 0.0));
        // Wants to move but never gets anywhere
        agent.body.velocity = Vec3::new(0.0, 0.0, 5.0);

        let mut seen = Vec::new();
        for _ in 0..200 {
            agent.body.position = Vec3::new(0.0, 0.95, 0.0);
            agent.state.last_position = agent.body.position;
            if let Some(r) = apply_safeguards(&mut agent, &ctx(&tuning, &[], player), &mut rng) {
                seen.push(r);
            }
        }
        assert!(seen.contains(&Recovery::SideStep));
        // Side-step resets the timer to 0.2, so it keeps firing instead of nudging
        assert!(!seen.contains(&Recovery::Nudge));

        agent.state.stuck_timer = 1.6;
        agent.body.position = Vec3::new(0.0, 0.95, 0.0);
        agent.state.last_position = agent.body.position;
        let r = apply_safeguards(&mut agent, &ctx(&tuning, &[], player), &mut rng);
        assert_eq!(r, Some(Recovery::Nudge));
        assert_eq!(agent.state.stuck_timer, 0.0);
        assert_relative_eq!(planar_length(agent.body.position), 1.1, epsilon = 1e-4);
    }

    #[test]
    fn test_boss_relocates_when_wedged() {
        let tuning = LocomotionTuning::default();
        let mut rng = seeded_rng(9);
        let player = Vec3::new(0.0, 1.0, 30.0);
        let mut agent = Agent::new(Archetype::BossWarlord, true, 1.42, Vec3::new(5.0, 1.42, 0.0), &mut rng);
        agent.state.overlap_timer = 0.0;
        agent.state.stuck_timer = 1.25;
        agent.body.velocity = Vec3::new(0.0, 0.0, 3.0);

        let r = apply_safeguards(&mut agent, &ctx(&tuning, &[], Some(player)), &mut rng);
        assert_eq!(r, Some(Recovery::BossRelocate));
        assert_eq!(agent.body.position.y, 5.0);
        assert!(agent.body.velocity.y >= 1.2);
        assert_relative_eq!(
            planar_length(agent.body.velocity),
            agent.cruise_speed() * 0.85,
            epsilon = 1e-3
        );
        assert_eq!(agent.state.unstick_cooldown, 1.3);
        assert!(planar_distance(agent.body.position, player) >= 20.0);
    }

    #[test]
    fn test_boss_relocation_keeps_clear_of_cornered_player() {
        let tuning = LocomotionTuning::default();
        let player = Vec3::new(32.0, 1.0, 32.0);
        for seed in 0..200 {
            let mut rng = seeded_rng(seed);
            let mut agent = Agent::new(Archetype::BossWarlord, true, 1.42, Vec3::new(28.0, 1.42, 20.0), &mut rng);
            agent.state.overlap_timer = 0.0;
            agent.state.stuck_timer = 1.25;
            agent.body.velocity = Vec3::new(0.0, 0.0, 3.0);

            let r = apply_safeguards(&mut agent, &ctx(&tuning, &[], Some(player)), &mut rng);
            assert_eq!(r, Some(Recovery::BossRelocate));
            let pos = agent.body.position;
            assert!(planar_distance(pos, player) >= 20.0, "seed {seed}: {pos:?}");
            assert!(pos.x.abs() <= 34.0 && pos.z.abs() <= 34.0);
        }
    }

    #[test]
    fn test_safe_recovery_falls_back_to_far_corner() {
        let tuning = LocomotionTuning::default();
        let mut rng = seeded_rng(2);
        let agent = Agent::new(Archetype::BossWarlord, true, 1.42, Vec3::ZERO, &mut rng);
        // Every candidate around this player clamps back into the clearance
        let tight = LocomotionTuning {
            recovery_player_clearance: ByRole::new(60.0, 60.0),
            ..tuning
        };
        let p = safe_recovery_position(&agent, Some(Vec3::new(30.0, 1.0, -12.0)), &tight, &mut rng);
        assert_eq!(p, Vec3::new(-34.0, 5.0, 34.0));
    }

    #[test]
    fn test_nudge_at_edge_stays_in_arena() {
        let tuning = LocomotionTuning::default();
        let player = Some(Vec3::new(41.0, 1.0, 10.0));
        let mut nudged = 0;
        for seed in 0..100 {
            let mut rng = seeded_rng(seed);
            let mut agent = Agent::new(Archetype::Brute, false, 0.95, Vec3::new(42.0, 0.95, 0.0), &mut rng);
            agent.state.overlap_timer = 0.0;
            agent.state.stuck_timer = 1.6;
            agent.body.velocity = Vec3::new(0.0, 0.0, 5.0);

            let r = apply_safeguards(&mut agent, &ctx(&tuning, &[], player), &mut rng);
            if r == Some(Recovery::Nudge) {
                nudged += 1;
            }
            let pos = agent.body.position;
            assert!(pos.x.abs() <= 42.0 && pos.z.abs() <= 42.0, "seed {seed}: {pos:?}");
            assert!(agent.body.velocity.x <= 0.0);
        }
        assert_eq!(nudged, 100);
    }

    #[test]
    fn test_far_relocation_near_player() {
        let tuning = LocomotionTuning::default();
        let mut rng = seeded_rng(4);
        let player = Vec3::new(0.0, 1.0, -10.0);
        let mut agent = brute_at(Vec3::new(0.0, 0.95, 42.0));
        agent.state.far_timer = 7.0;

        let r = apply_safeguards(&mut agent, &ctx(&tuning, &[], Some(player)), &mut rng);
        assert_eq!(r, Some(Recovery::FarRelocate));
        assert_relative_eq!(planar_distance(agent.body.position, player), 12.0, epsilon = 1e-3);
        assert_eq!(agent.body.position.y, 3.4);
        assert_eq!(agent.state.far_timer, 0.0);
        assert_eq!(agent.state.unstick_cooldown, 0.9);
    }

    #[test]
    fn test_safe_recovery_avoids_center() {
        let tuning = LocomotionTuning::default();
        let mut rng = seeded_rng(12);
        let agent = brute_at(Vec3::ZERO);
        for _ in 0..100 {
            let p = safe_recovery_position(&agent, Some(Vec3::new(0.0, 1.0, 0.0)), &tuning, &mut rng);
            assert!(planar_length(p) > 15.0 - 1e-3);
            assert!(p.x.abs() <= 34.0 && p.z.abs() <= 34.0);
            assert_eq!(p.y, 5.0);
        }
        let p = safe_recovery_position(&agent, None, &tuning, &mut rng);
        assert_relative_eq!(planar_length(p), 26.0, epsilon = 1e-3);
    }
}
