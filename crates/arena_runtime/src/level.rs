//! Temple arena layout
//!
//! The arena is a floating square floor with a 30x30 hole in the middle.
//! Enemies walk across the hole on an invisible cover that the player falls
//! through. Everything here is static geometry registered with the physics
//! world; decorative trap sets are only described, the visual layer draws them.

use arena_physics::{CollisionGroups, PhysicsWorld, StaticBoxDesc};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Top of the floor slabs
pub const FLOOR_TOP: f32 = 0.0;
/// Half-width of the hole in the floor
pub const HOLE_HALF_EXTENT: f32 = 15.0;
/// Half-width of the enemy-only cover over the hole
pub const COVER_HALF_EXTENT: f32 = 10.0;

const FLOOR_Y: f32 = -2.0;
const FLOOR_THICKNESS: f32 = 4.0;
const PERIMETER_RADIUS: f32 = 41.5;

/// Decorative trap sites per arena phase, as (x, z)
pub const TRAP_SETS: [[(f32, f32); 4]; 3] = [
    [(13.0, 13.0), (-13.0, -13.0), (-13.0, 13.0), (13.0, -13.0)],
    [(0.0, -24.0), (0.0, 24.0), (-22.0, 0.0), (22.0, 0.0)],
    [(0.0, 18.0), (0.0, -18.0), (18.0, 0.0), (-18.0, 0.0)],
];

/// Trap sites shown in an arena phase; out-of-range phases show the first set
pub fn trap_sites(phase: u8) -> &'static [(f32, f32); 4] {
    TRAP_SETS.get(phase as usize).unwrap_or(&TRAP_SETS[0])
}

/// Summary of what [`build_arena`] registered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArenaLayout {
    /// Static boxes added, floor and cover included
    pub static_boxes: usize,
    pub floor_slabs: usize,
}

/// True when `position` is above solid floor for the player
pub fn is_over_floor(position: Vec3) -> bool {
    let inside_hole = position.x.abs() < HOLE_HALF_EXTENT && position.z.abs() < HOLE_HALF_EXTENT;
    let inside_island = position.x.abs() < 45.0 && position.z.abs() < 55.0;
    inside_island && !inside_hole
}

struct Builder<'a> {
    physics: &'a mut PhysicsWorld,
    layout: ArenaLayout,
}

impl Builder<'_> {
    /// Box given by its center and full size
    fn wall(&mut self, x: f32, y: f32, z: f32, w: f32, h: f32, d: f32) {
        self.physics
            .add_static_box(StaticBoxDesc::from_size(Vec3::new(x, y, z), Vec3::new(w, h, d)));
        self.layout.static_boxes += 1;
    }

    fn floor_block(&mut self, x: f32, z: f32, w: f32, d: f32) {
        self.wall(x, FLOOR_Y, z, w, FLOOR_THICKNESS, d);
        self.layout.floor_slabs += 1;
    }

    fn pillar(&mut self, x: f32, z: f32, size: f32, height: f32) {
        self.wall(x, height / 2.0, z, size, height, size);
    }

    /// Four shrinking stacked levels
    fn pyramid(&mut self, x: f32, z: f32, size: f32) {
        let level_height = size * 0.3;
        for i in 0..4 {
            let level_size = size * (1.0 - i as f32 * 0.2);
            let y = i as f32 * level_height + level_height / 2.0;
            self.wall(x, y, z, level_size, level_height, level_size);
        }
    }

    /// Box tilted about Z so it slopes over its depth
    fn ramp(&mut self, x: f32, z: f32, w: f32, h: f32, d: f32) {
        let tilt = (h / d).atan();
        self.physics.add_static_box(
            StaticBoxDesc::from_size(Vec3::new(x, h / 2.0, z), Vec3::new(w, h, d))
                .with_rotation(Vec3::Z * tilt),
        );
        self.layout.static_boxes += 1;
    }

    fn arch(&mut self, x: f32, z: f32) {
        self.wall(x - 5.0, 5.0, z, 3.0, 10.0, 3.0);
        self.wall(x + 5.0, 5.0, z, 3.0, 10.0, 3.0);
        self.wall(x, 10.0, z, 13.0, 2.0, 3.0);
    }

    /// Altar with four broken walls facing it
    fn ruin_cluster<R: Rng + ?Sized>(&mut self, cx: f32, cz: f32, rng: &mut R) {
        self.pillar(cx, cz, 2.0, 6.0);

        for i in 0..4 {
            let angle = i as f32 / 4.0 * TAU + rng.gen::<f32>() * 0.5;
            let x = cx + angle.cos() * 8.0;
            let z = cz + angle.sin() * 8.0;
            let h = 2.0 + rng.gen::<f32>() * 4.0;
            let w = 4.0 + rng.gen::<f32>() * 2.0;
            self.physics.add_static_box(
                StaticBoxDesc::from_size(Vec3::new(x, h / 2.0, z), Vec3::new(w, h, 1.5))
                    .with_rotation(Vec3::Y * (angle + FRAC_PI_2)),
            );
            self.layout.static_boxes += 1;
        }
    }

    fn shard_totem(&mut self, x: f32, z: f32, scale: f32) {
        let half = Vec3::new(0.86, 1.1, 0.86) * scale;
        self.physics
            .add_static_box(StaticBoxDesc::new(Vec3::new(x, half.y, z), half));
        self.layout.static_boxes += 1;
    }

    fn pylon(&mut self, x: f32, z: f32, scale: f32) {
        let half = Vec3::new(0.62, 1.72, 0.62) * scale;
        self.physics
            .add_static_box(StaticBoxDesc::new(Vec3::new(x, half.y, z), half));
        self.layout.static_boxes += 1;
    }
}

/// Register the temple arena with `physics`
///
/// Ruin walls and the artifact field are scattered with `rng`, so a seeded
/// RNG gives a reproducible arena.
pub fn build_arena<R: Rng + ?Sized>(physics: &mut PhysicsWorld, rng: &mut R) -> ArenaLayout {
    let mut b = Builder {
        physics,
        layout: ArenaLayout::default(),
    };

    // Floor quadrants around the hole, then the rim
    b.floor_block(0.0, -35.0, 90.0, 40.0);
    b.floor_block(0.0, 35.0, 90.0, 40.0);
    b.floor_block(-35.0, 0.0, 20.0, 30.0);
    b.floor_block(35.0, 0.0, 20.0, 30.0);
    b.floor_block(0.0, -16.0, 30.0, 2.0);
    b.floor_block(0.0, 16.0, 30.0, 2.0);
    b.floor_block(-16.0, 0.0, 2.0, 30.0);
    b.floor_block(16.0, 0.0, 2.0, 30.0);

    // Walkable for enemies only
    let cover_thickness = FLOOR_THICKNESS;
    b.physics.add_static_box(
        StaticBoxDesc::new(
            Vec3::new(0.0, FLOOR_Y, 0.0),
            Vec3::new(COVER_HALF_EXTENT, cover_thickness / 2.0, COVER_HALF_EXTENT),
        )
        .with_groups(CollisionGroups::enemy_floor()),
    );
    b.layout.static_boxes += 1;

    // Temple entrance
    let mut x = -15.0;
    while x <= 15.0 {
        b.pillar(x, -45.0, 3.0, 12.0);
        x += 10.0;
    }
    b.wall(0.0, 13.0, -45.0, 40.0, 3.0, 5.0);

    for (x, z) in [(30.0, 30.0), (-30.0, 30.0), (30.0, -30.0), (-30.0, -30.0)] {
        b.pillar(x, z, 5.0, 20.0);
    }

    b.pyramid(40.0, 0.0, 12.0);
    b.pyramid(-40.0, 0.0, 10.0);

    b.ramp(20.0, 35.0, 15.0, 6.0, 12.0);
    b.ramp(-20.0, -35.0, 15.0, 6.0, 12.0);

    b.wall(0.0, 4.0, 45.0, 12.0, 2.0, 12.0);
    b.wall(0.0, 4.0, -45.0, 12.0, 2.0, 12.0);

    b.arch(35.0, 20.0);
    b.arch(-35.0, -20.0);

    // Low cover around the sanctum, kept short so bosses path around it
    b.wall(0.0, 1.5, 12.0, 10.0, 3.0, 2.0);
    b.wall(0.0, 1.5, -12.0, 10.0, 3.0, 2.0);
    b.wall(12.0, 1.5, 0.0, 2.0, 3.0, 10.0);
    b.wall(-12.0, 1.5, 0.0, 2.0, 3.0, 10.0);

    for (cx, cz) in [(25.0, 25.0), (-25.0, 25.0), (25.0, -25.0), (-25.0, -25.0)] {
        b.ruin_cluster(cx, cz, rng);
    }

    for _ in 0..10 {
        let angle = rng.gen::<f32>() * TAU;
        let dist = 17.0 + rng.gen::<f32>() * 21.0;
        let scale = 0.82 + rng.gen::<f32>() * 0.5;
        b.shard_totem(angle.cos() * dist, angle.sin() * dist, scale);
    }

    for i in 0..12 {
        let angle = i as f32 / 12.0 * TAU;
        b.pylon(angle.cos() * PERIMETER_RADIUS, angle.sin() * PERIMETER_RADIUS, 0.72);
    }

    log::info!(
        "Arena built: {} static boxes ({} floor slabs)",
        b.layout.static_boxes,
        b.layout.floor_slabs
    );
    b.layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::seeded_rng;
    use arena_physics::{ObstacleIndexState, PhysicsConfig, StaticColliderSource};

    fn arena() -> (PhysicsWorld, ArenaLayout) {
        let mut physics = PhysicsWorld::new(PhysicsConfig::fast()).unwrap();
        let mut rng = seeded_rng(3);
        let layout = build_arena(&mut physics, &mut rng);
        (physics, layout)
    }

    #[test]
    fn test_layout_counts() {
        let (physics, layout) = arena();
        assert_eq!(layout.static_boxes, physics.static_boxes().len());
        assert_eq!(layout.floor_slabs, 8);
        assert_eq!(physics.static_revision(), layout.static_boxes as u64);
    }

    #[test]
    fn test_index_skips_floor_and_cover() {
        let (physics, layout) = arena();
        let mut index = ObstacleIndexState::new();
        let obstacles = index.obstacles(&physics);

        // Everything but the eight slabs and the cover
        assert_eq!(obstacles.len(), layout.static_boxes - layout.floor_slabs - 1);
        assert!(obstacles.iter().all(|o| o.center.y > FLOOR_Y));
    }

    #[test]
    fn test_hole_is_not_floor() {
        assert!(!is_over_floor(Vec3::new(0.0, 1.0, 0.0)));
        assert!(!is_over_floor(Vec3::new(12.0, 1.0, -12.0)));
        assert!(is_over_floor(Vec3::new(0.0, 1.0, 30.0)));
        assert!(!is_over_floor(Vec3::new(60.0, 1.0, 0.0)));
    }

    #[test]
    fn test_trap_sites_clamp() {
        assert_eq!(trap_sites(1)[0], (0.0, -24.0));
        assert_eq!(trap_sites(9), &TRAP_SETS[0]);
    }
}
