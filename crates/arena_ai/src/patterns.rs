//! Archetype movement patterns layered on top of the chase direction

use arena_core::prelude::*;
use rand::Rng;

use crate::agent::Agent;

/// Chance per tick that a scuttler picks a new wander heading
const WANDER_CHANGE_CHANCE: f64 = 0.02;

/// Chance per tick that a scuttler drifts toward its wander heading
const WANDER_FOLLOW_CHANCE: f64 = 0.9;

/// Shape the raw move direction with the agent's movement pattern
///
/// `flat_dir` is the planar unit direction to the player and `dist` the 3D
/// distance to the player. Scuttlers update their stored wander heading.
pub fn apply_movement_pattern<R: Rng + ?Sized>(
    agent: &mut Agent,
    move_dir: Vec3,
    flat_dir: Vec3,
    dist: f32,
    rng: &mut R,
) -> Vec3 {
    let t = agent.state.time;
    match agent.archetype.movement_pattern() {
        MovementPattern::Direct => move_dir,
        MovementPattern::ZigZag => {
            let right = Vec3::new(flat_dir.z, 0.0, -flat_dir.x);
            move_dir + right * (t * 10.0).sin() * 1.5
        }
        MovementPattern::Swoop => {
            let bob = if dist > 10.0 { (t * 2.0).sin() * 0.5 } else { -0.5 };
            move_dir + Vec3::Y * bob
        }
        MovementPattern::Scuttle => {
            if rng.gen_bool(WANDER_CHANGE_CHANCE) {
                let raw = Vec3::new(rng.gen::<f32>() - 0.5, 0.0, rng.gen::<f32>() - 0.5);
                agent.state.wander_dir = raw.try_normalize();
            }
            match agent.state.wander_dir {
                Some(wander) if rng.gen_bool(WANDER_FOLLOW_CHANCE) => move_dir.lerp(wander, 0.3),
                _ => move_dir,
            }
        }
    }
}

/// Tangential heading used to circle the player at close range
pub fn orbit_direction(flat_dir: Vec3, orbit_sign: f32) -> Vec3 {
    Vec3::new(-flat_dir.z, 0.0, flat_dir.x) * orbit_sign
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn agent(archetype: Archetype) -> Agent {
        let mut rng = seeded_rng(3);
        Agent::new(archetype, false, archetype.collision_radius(false), Vec3::ZERO, &mut rng)
    }

    #[test]
    fn test_direct_is_untouched() {
        let mut rng = seeded_rng(1);
        let mut a = agent(Archetype::Brute);
        let out = apply_movement_pattern(&mut a, Vec3::Z, Vec3::Z, 20.0, &mut rng);
        assert_eq!(out, Vec3::Z);
    }

    #[test]
    fn test_zigzag_is_lateral() {
        let mut rng = seeded_rng(1);
        let mut a = agent(Archetype::Kamikaze);
        a.state.time = 0.157;
        let out = apply_movement_pattern(&mut a, Vec3::Z, Vec3::Z, 20.0, &mut rng);
        assert_relative_eq!(out.z, 1.0);
        assert_relative_eq!(out.x, (1.57f32).sin() * 1.5, epsilon = 1e-4);
    }

    #[test]
    fn test_swoop_dives_when_close() {
        let mut rng = seeded_rng(1);
        let mut a = agent(Archetype::Harpy);
        let out = apply_movement_pattern(&mut a, Vec3::Z, Vec3::Z, 5.0, &mut rng);
        assert_relative_eq!(out.y, -0.5);
    }

    #[test]
    fn test_scuttle_eventually_wanders() {
        let mut rng = seeded_rng(9);
        let mut a = agent(Archetype::Arachnid);
        for _ in 0..1000 {
            apply_movement_pattern(&mut a, Vec3::Z, Vec3::Z, 20.0, &mut rng);
        }
        let wander = a.state.wander_dir.expect("wander heading after many ticks");
        assert_eq!(wander.y, 0.0);
        assert_relative_eq!(wander.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_orbit_direction_is_perpendicular() {
        let orbit = orbit_direction(Vec3::X, -1.0);
        assert_relative_eq!(orbit.dot(Vec3::X), 0.0);
        assert_eq!(orbit, Vec3::new(0.0, 0.0, -1.0));
    }
}
