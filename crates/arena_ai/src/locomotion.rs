//! Per-tick enemy locomotion
//!
//! A tick runs in a fixed order:
//!
//! 1. safeguards and stuck recovery ([`crate::safeguards`])
//! 2. presentation smoothing of the visual position
//! 3. chase behavior, only while a player exists: pattern, orbit, detour,
//!    separation and center avoidance compose a heading, the steering fan
//!    picks a clear direction, and the body velocity and yaw are blended
//!    toward it
//! 4. the animation clock advances
//!
//! The tick writes the desired velocity into [`Agent::body`]; integrating
//! position is left to the physics step.

use arena_core::prelude::*;
use rand::Rng;
use std::f32::consts::FRAC_PI_2;

use crate::agent::{Agent, LocomotionContext, Recovery};
use crate::patterns::{apply_movement_pattern, orbit_direction};
use crate::safeguards::apply_safeguards;
use crate::steering::{
    boss_detour, center_avoidance, is_heading_into_obstacle, pick_steering_direction, separation,
};

/// Distance a boss tries to hold from the player
pub const BOSS_STANDOFF: f32 = 2.3;
/// Distance under which regular units start circling
pub const CLOSE_ORBIT_DISTANCE: f32 = 1.5;

const VISUAL_FOLLOW_RATE: f32 = 11.0;
const HEADING_SMOOTH_RATE: f32 = 3.6;

/// What happened during one locomotion tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutcome {
    pub recovery: Option<Recovery>,
    /// Heading chosen this tick, absent without a player
    pub heading: Option<Vec3>,
}

/// Advance one agent by `ctx.dt`
pub fn tick<R: Rng + ?Sized>(
    agent: &mut Agent,
    ctx: &LocomotionContext<'_>,
    rng: &mut R,
) -> TickOutcome {
    let recovery = apply_safeguards(agent, ctx, rng);
    update_visual_position(agent, ctx.dt);

    let heading = ctx.player.map(|player| update_behavior(agent, ctx, player, rng));

    agent.state.time += ctx.dt;
    TickOutcome { recovery, heading }
}

/// Heavy and boss models trail the body; everything else tracks it exactly
fn update_visual_position(agent: &mut Agent, dt: f32) {
    let body = agent.body.position;
    if !agent.smooths_heading() {
        agent.state.visual_position = body;
        return;
    }

    let snap_sq = if agent.is_boss { 14.0 } else { 10.0 };
    let gap = body - agent.state.visual_position;
    if gap.length_squared() > snap_sq {
        agent.state.visual_position = body;
    } else {
        let alpha = 1.0 - (-VISUAL_FOLLOW_RATE * dt).exp();
        agent.state.visual_position += gap * alpha;
    }
}

fn update_behavior<R: Rng + ?Sized>(
    agent: &mut Agent,
    ctx: &LocomotionContext<'_>,
    player: Vec3,
    rng: &mut R,
) -> Vec3 {
    let pos = agent.body.position;
    let to_player = player - pos;
    let dist = to_player.length();
    let flat_dir = flat_normalized(to_player, Vec3::Z);

    let dir = compose_heading(agent, ctx, player, dist, flat_dir, rng);
    integrate_velocity(agent, ctx.dt, player, dist, dir);
    update_orientation(agent, ctx.dt);
    dir
}

/// Build the unit heading for this tick
fn compose_heading<R: Rng + ?Sized>(
    agent: &mut Agent,
    ctx: &LocomotionContext<'_>,
    player: Vec3,
    dist: f32,
    flat_dir: Vec3,
    rng: &mut R,
) -> Vec3 {
    let is_boss = agent.is_boss;
    let orbit = agent.state.orbit_sign;

    let mut move_dir = flat_dir;
    move_dir = apply_movement_pattern(agent, move_dir, flat_dir, dist, rng);

    let orbit_range = if is_boss { BOSS_STANDOFF } else { CLOSE_ORBIT_DISTANCE };
    if dist < orbit_range && agent.archetype.orbits_player() {
        move_dir = move_dir.lerp(orbit_direction(flat_dir, orbit), 0.8);
    }

    if let Some(detour) = boss_detour(agent, flat_dir, player) {
        let blend = if agent.state.stuck_timer > 0.2 { 0.8 } else { 0.62 };
        move_dir = move_dir.lerp(detour, blend);
    }

    move_dir += separation(agent, ctx.neighbors);
    move_dir += center_avoidance(agent, player);

    if agent.state.stuck_timer > 0.5 {
        move_dir = rotate_y(move_dir, FRAC_PI_2 * orbit);
    }

    let mut dir = pick_steering_direction(agent, move_dir, flat_dir, dist, player, ctx.obstacles);

    if is_heading_into_obstacle(agent, dir, ctx.obstacles) {
        let turn = if is_boss { 0.92 } else { 1.2 };
        dir = rotate_y(dir, turn * orbit);
    }

    if agent.smooths_heading() {
        let t = (ctx.dt * HEADING_SMOOTH_RATE).min(1.0);
        agent.state.smoothed_dir = agent.state.smoothed_dir.lerp(dir, t);
        if agent.state.smoothed_dir.length_squared() > 0.0001 {
            dir = agent.state.smoothed_dir;
        }
    }

    if dir.length_squared() < 0.0001 {
        dir = flat_dir;
    }
    dir.normalize()
}

/// Scale factor on cruise speed from the distance to the player
pub fn approach_factor(agent: &Agent, dist: f32) -> f32 {
    if agent.archetype == Archetype::Kamikaze {
        return 1.0;
    }
    let floor = if agent.is_boss { 0.18 } else { 0.35 };
    let factor = ((dist - 0.5) / 2.3).clamp(floor, 1.05);
    if !agent.is_boss {
        return factor;
    }

    let stop = BOSS_STANDOFF + 0.5;
    let slow = BOSS_STANDOFF + 4.2;
    let arrival = ((dist - stop) / (slow - stop).max(0.5)).clamp(0.08, 1.0);
    factor.min(arrival)
}

/// Blend rate of horizontal velocity toward the desired velocity
pub fn steering_response(agent: &Agent) -> f32 {
    let base = agent.archetype.steering_response();
    let mut response = if agent.is_boss { (base * 0.7).max(4.8) } else { base };
    if agent.state.stuck_timer > 0.45 {
        response += if agent.is_boss { 1.0 } else { 0.7 };
    }
    response
}

fn integrate_velocity(agent: &mut Agent, dt: f32, player: Vec3, dist: f32, dir: Vec3) {
    let speed = agent.cruise_speed();
    let target = dir * speed * approach_factor(agent, dist);
    let blend = (dt * steering_response(agent)).min(1.0);

    let pos_y = agent.body.position.y;
    let flying = agent.is_flying();
    let hover = agent.archetype.hover_offset();
    let velocity = &mut agent.body.velocity;

    velocity.x += (target.x - velocity.x) * blend;
    velocity.z += (target.z - velocity.z) * blend;

    if flying {
        let target_vy = ((player.y + hover - pos_y) * 2.0).clamp(-6.0, 6.0);
        velocity.y += (target_vy - velocity.y) * (dt * 4.0).min(1.0);
    }

    let cap = speed * if flying || agent.is_boss { 1.25 } else { 1.1 };
    let horizontal = planar_length(*velocity);
    if horizontal > cap {
        let scale = cap / horizontal;
        velocity.x *= scale;
        velocity.z *= scale;
    }
}

fn update_orientation(agent: &mut Agent, dt: f32) {
    let mut facing = flat(agent.body.velocity);
    if agent.smooths_heading() && agent.state.smoothed_dir.length_squared() > 0.0001 {
        facing = facing.lerp(flat(agent.state.smoothed_dir), 0.65);
    }
    if facing.length_squared() > 0.0001 {
        agent.state.target_yaw = facing.x.atan2(facing.z);
    }

    let rate = if agent.is_boss { 6.2 } else { 10.0 };
    let delta = normalize_angle(agent.state.target_yaw - agent.state.yaw);
    agent.state.yaw += delta * (dt * rate).min(1.0);
}
