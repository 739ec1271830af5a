//! Power-up pickups and timed player buffs
//!
//! While a wave is active a timer rolls an interval of 14-22 seconds, scaled
//! by the difficulty. Each time it elapses a pickup appears with even odds,
//! 12-30 units from the player on open floor. Walking within
//! [`COLLECT_RADIUS`] of a pickup collects it.

use arena_physics::ObstacleRecord;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;
use std::fmt;

use crate::collaborators::VisualHandle;
use crate::level::{is_over_floor, HOLE_HALF_EXTENT};

/// Planar and vertical reach for collecting a pickup
pub const COLLECT_RADIUS: f32 = 1.5;
/// Health restored by a health pickup
pub const HEALTH_RESTORE: f32 = 50.0;
/// Seconds a speed or damage buff lasts
pub const BUFF_DURATION: f32 = 10.0;
/// Speed buff, on top of the difficulty speed scale
pub const SPEED_BUFF: f32 = 1.3;
/// Multiplier on player damage while the damage buff runs
pub const DAMAGE_BUFF: f32 = 1.45;

const SPAWN_CLAMP: f32 = 36.0;
const SPAWN_HEIGHT: f32 = 0.5;
const SPAWN_ATTEMPTS: usize = 20;
const MIN_PICKUP_GAP: f32 = 3.2;
const BLOCK_RADIUS: f32 = 0.7;
/// Boxes with a top at or below this are floor, not obstacles
const WALKABLE_TOP: f32 = 0.35;

/// What a pickup grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Health,
    Ammo,
    Speed,
    Damage,
}

impl PowerUpKind {
    /// Weighted pick, leaning toward what the player is short of
    pub fn roll<R: Rng + ?Sized>(health_ratio: f32, ammo_ratio: f32, rng: &mut R) -> Self {
        let roll = rng.gen::<f32>();
        if health_ratio < 0.35 && roll < 0.46 {
            return Self::Health;
        }
        if ammo_ratio < 0.3 && roll < 0.58 {
            return Self::Ammo;
        }
        match roll {
            r if r < 0.35 => Self::Health,
            r if r < 0.65 => Self::Ammo,
            r if r < 0.85 => Self::Speed,
            _ => Self::Damage,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Ammo => "ammo",
            Self::Speed => "speed",
            Self::Damage => "damage",
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pickup waiting on the floor
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub position: Vec3,
    pub visual: Option<VisualHandle>,
}

impl PowerUp {
    pub fn in_reach(&self, player: Vec3) -> bool {
        self.position.distance(player) < COLLECT_RADIUS
    }
}

/// Decides when a pickup spawn is attempted
#[derive(Debug, Clone)]
pub struct PowerUpTimer {
    interval_scale: f32,
    elapsed: f32,
    interval: f32,
}

impl PowerUpTimer {
    pub fn new<R: Rng + ?Sized>(interval_scale: f32, rng: &mut R) -> Self {
        let mut timer = Self {
            interval_scale,
            elapsed: 0.0,
            interval: 0.0,
        };
        timer.interval = timer.roll_interval(rng);
        timer
    }

    /// Seconds until the next attempt
    pub fn remaining(&self) -> f32 {
        (self.interval - self.elapsed).max(0.0)
    }

    /// Advance by `dt`; true when a pickup should spawn this tick
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> bool {
        self.elapsed += dt;
        if self.elapsed <= self.interval {
            return false;
        }
        self.elapsed = 0.0;
        self.interval = self.roll_interval(rng);
        rng.gen_bool(0.5)
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.elapsed = 0.0;
        self.interval = self.roll_interval(rng);
    }

    fn roll_interval<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        (14.0 + rng.gen::<f32>() * 8.0) * self.interval_scale
    }
}

/// True when a pickup of `radius` at `position` would overlap a raised obstacle
pub fn is_pickup_blocked(obstacles: &[ObstacleRecord], position: Vec3, radius: f32) -> bool {
    obstacles.iter().any(|obs| {
        let half = obs.half_extents;
        if obs.center.y + half.y <= WALKABLE_TOP {
            return false;
        }
        let dx = (position.x - obs.center.x).abs();
        let dz = (position.z - obs.center.z).abs();
        dx < half.x + radius + 0.15 && dz < half.z + radius + 0.15
    })
}

/// Pick open floor for a new pickup
///
/// Tries random points 12-30 units from the player that are over the floor,
/// clear of obstacles and apart from other pickups. Falls back to a point
/// 12 units behind the player, pushed off the hole.
pub fn place_power_up<R: Rng + ?Sized>(
    player: Vec3,
    obstacles: &[ObstacleRecord],
    existing: &[Vec3],
    rng: &mut R,
) -> Vec3 {
    for _ in 0..SPAWN_ATTEMPTS {
        let angle = rng.gen::<f32>() * TAU;
        let radius = 12.0 + rng.gen::<f32>() * 18.0;
        let candidate = Vec3::new(
            (player.x + angle.cos() * radius).clamp(-SPAWN_CLAMP, SPAWN_CLAMP),
            SPAWN_HEIGHT,
            (player.z + angle.sin() * radius).clamp(-SPAWN_CLAMP, SPAWN_CLAMP),
        );
        if !is_over_floor(candidate) || is_pickup_blocked(obstacles, candidate, BLOCK_RADIUS) {
            continue;
        }
        if existing.iter().any(|p| p.distance(candidate) < MIN_PICKUP_GAP) {
            continue;
        }
        return candidate;
    }

    let off_hole = HOLE_HALF_EXTENT + 1.5;
    let x = player.x.clamp(-SPAWN_CLAMP, SPAWN_CLAMP);
    let mut z = (player.z - 12.0).clamp(-SPAWN_CLAMP, SPAWN_CLAMP);
    if !is_over_floor(Vec3::new(x, SPAWN_HEIGHT, z)) {
        z = if z >= 0.0 { off_hole } else { -off_hole };
    }
    let fallback = Vec3::new(x, SPAWN_HEIGHT, z);
    if is_pickup_blocked(obstacles, fallback, BLOCK_RADIUS) {
        let z = if player.z >= 0.0 { -off_hole } else { off_hole };
        return Vec3::new(x, SPAWN_HEIGHT, z);
    }
    fallback
}

/// Timed speed and damage buffs
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerBuffs {
    /// Difficulty speed scale, the multiplier with no buff running
    base_speed: f32,
    speed_timer: f32,
    damage_timer: f32,
}

impl PlayerBuffs {
    pub fn new(base_speed: f32) -> Self {
        Self {
            base_speed,
            speed_timer: 0.0,
            damage_timer: 0.0,
        }
    }

    pub fn speed_multiplier(&self) -> f32 {
        if self.speed_timer > 0.0 {
            SPEED_BUFF * self.base_speed
        } else {
            self.base_speed
        }
    }

    pub fn damage_multiplier(&self) -> f32 {
        if self.damage_timer > 0.0 {
            DAMAGE_BUFF
        } else {
            1.0
        }
    }

    /// Start or refresh the speed buff
    pub fn grant_speed(&mut self) {
        self.speed_timer = BUFF_DURATION;
    }

    /// Start or refresh the damage buff
    pub fn grant_damage(&mut self) {
        self.damage_timer = BUFF_DURATION;
    }

    /// Count buffs down; true when the speed buff ran out this tick
    pub fn tick(&mut self, dt: f32) -> bool {
        let mut speed_expired = false;
        if self.speed_timer > 0.0 {
            self.speed_timer -= dt;
            speed_expired = self.speed_timer <= 0.0;
        }
        if self.damage_timer > 0.0 {
            self.damage_timer -= dt;
        }
        speed_expired
    }

    pub fn reset(&mut self) {
        self.speed_timer = 0.0;
        self.damage_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use arena_core::seeded_rng;

    #[test]
    fn test_roll_covers_every_kind() {
        let mut rng = seeded_rng(3);
        let mut seen = [false; 4];
        for _ in 0..400 {
            let index = match PowerUpKind::roll(1.0, 1.0, &mut rng) {
                PowerUpKind::Health => 0,
                PowerUpKind::Ammo => 1,
                PowerUpKind::Speed => 2,
                PowerUpKind::Damage => 3,
            };
            seen[index] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn test_roll_favors_health_when_low() {
        let mut low = seeded_rng(8);
        let mut full = seeded_rng(8);
        let count = |rng: &mut arena_core::ArenaRng, health: f32| {
            (0..1000)
                .filter(|_| PowerUpKind::roll(health, 1.0, rng) == PowerUpKind::Health)
                .count()
        };
        assert!(count(&mut low, 0.2) > count(&mut full, 1.0));
    }

    #[test]
    fn test_timer_interval_scales() {
        let mut rng = seeded_rng(1);
        for _ in 0..50 {
            let easy = PowerUpTimer::new(0.8, &mut rng);
            assert!(easy.remaining() >= 14.0 * 0.8 && easy.remaining() <= 22.0 * 0.8);
            let hard = PowerUpTimer::new(1.15, &mut rng);
            assert!(hard.remaining() >= 14.0 * 1.15 && hard.remaining() <= 22.0 * 1.15);
        }
    }

    #[test]
    fn test_timer_fires_about_half_the_time() {
        let mut rng = seeded_rng(21);
        let mut timer = PowerUpTimer::new(1.0, &mut rng);
        let mut attempts = 0;
        let mut spawns = 0;
        // 400 simulated minutes at 10 Hz
        for _ in 0..240_000 {
            let before = timer.remaining();
            let spawn = timer.tick(0.1, &mut rng);
            if timer.remaining() > before {
                attempts += 1;
            }
            if spawn {
                spawns += 1;
            }
        }
        assert!(attempts > 1000);
        let ratio = spawns as f32 / attempts as f32;
        assert!((0.4..0.6).contains(&ratio), "spawn ratio {ratio}");
    }

    #[test]
    fn test_placement_on_open_floor() {
        let mut rng = seeded_rng(4);
        let pillar = [ObstacleRecord::new(Vec3::new(20.0, 2.0, 20.0), Vec3::new(1.0, 2.0, 1.0))];
        let player = Vec3::new(0.0, 1.1, 30.0);
        let mut existing = Vec::new();
        for _ in 0..40 {
            let p = place_power_up(player, &pillar, &existing, &mut rng);
            assert!(is_over_floor(p), "{p:?}");
            assert!(!is_pickup_blocked(&pillar, p, BLOCK_RADIUS));
            assert!(p.x.abs() <= SPAWN_CLAMP && p.z.abs() <= SPAWN_CLAMP);
            assert_eq!(p.y, SPAWN_HEIGHT);
            existing.push(p);
        }
    }

    #[test]
    fn test_placement_fallback_leaves_the_hole() {
        let mut rng = seeded_rng(6);
        // A wall of obstacles over the whole floor rejects every random candidate
        let everything = [ObstacleRecord::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(60.0, 2.0, 60.0))];
        let p = place_power_up(Vec3::new(0.0, 1.1, 20.0), &everything, &[], &mut rng);
        assert_eq!(p, Vec3::new(0.0, SPAWN_HEIGHT, -16.5));
    }

    #[test]
    fn test_low_obstacles_do_not_block() {
        let step = [ObstacleRecord::new(Vec3::new(0.0, 0.1, 0.0), Vec3::new(2.0, 0.2, 2.0))];
        assert!(!is_pickup_blocked(&step, Vec3::new(0.0, 0.5, 0.0), BLOCK_RADIUS));
        let crate_box = [ObstacleRecord::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, 1.0, 2.0))];
        assert!(is_pickup_blocked(&crate_box, Vec3::new(2.5, 0.5, 0.0), BLOCK_RADIUS));
        assert!(!is_pickup_blocked(&crate_box, Vec3::new(3.0, 0.5, 0.0), BLOCK_RADIUS));
    }

    #[test]
    fn test_buffs_expire() {
        let mut buffs = PlayerBuffs::new(1.05);
        assert_eq!(buffs.speed_multiplier(), 1.05);
        assert_eq!(buffs.damage_multiplier(), 1.0);

        buffs.grant_speed();
        buffs.grant_damage();
        assert_relative_eq!(buffs.speed_multiplier(), 1.365, epsilon = 1e-5);
        assert_eq!(buffs.damage_multiplier(), DAMAGE_BUFF);

        assert!(!buffs.tick(9.0));
        assert!(buffs.tick(1.5));
        assert_eq!(buffs.speed_multiplier(), 1.05);
        assert_eq!(buffs.damage_multiplier(), 1.0);
        assert!(!buffs.tick(1.0));
    }

    #[test]
    fn test_reach() {
        let pickup = PowerUp {
            kind: PowerUpKind::Health,
            position: Vec3::new(20.0, 0.5, 20.0),
            visual: None,
        };
        assert!(pickup.in_reach(Vec3::new(20.5, 1.1, 20.5)));
        assert!(!pickup.in_reach(Vec3::new(22.0, 1.1, 20.0)));
    }
}
