//! Static obstacle index
//!
//! Steering and spawn placement treat the arena's static colliders as a flat
//! list of axis-aligned boxes. Building that list walks every static collider,
//! so it is cached and only rebuilt when the physics world reports a new
//! static revision.
//!
//! Two kinds of static geometry are left out:
//! - the enemy-only floor cover (it is walkable, not an obstacle)
//! - large floor slabs, which sit under everything and would otherwise make
//!   every probe look blocked

use crate::layers::{CollisionGroups, CollisionLayer};
use crate::world::StaticBox;
use glam::Vec3;

/// Anything that can enumerate static boxes and report a revision counter
pub trait StaticColliderSource {
    /// Monotonic counter bumped on every static add/remove
    fn static_revision(&self) -> u64;

    fn static_boxes(&self) -> &[StaticBox];
}

/// A static obstacle as seen by steering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleRecord {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub groups: CollisionGroups,
}

impl ObstacleRecord {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
            groups: CollisionGroups::world(),
        }
    }

    /// True when `point` is inside this box grown by `pad` on every axis
    pub fn contains_padded(&self, point: Vec3, pad: f32) -> bool {
        let d = (point - self.center).abs();
        let limit = self.half_extents + Vec3::splat(pad);
        d.x < limit.x && d.y < limit.y && d.z < limit.z
    }
}

/// Large horizontal slab near floor level
fn is_floor_slab(center: Vec3, half: Vec3) -> bool {
    center.y <= 0.5 && half.y >= 1.5 && (half.x >= 10.0 || half.z >= 10.0)
}

/// Cached obstacle list keyed by the physics static revision
#[derive(Debug, Default)]
pub struct ObstacleIndexState {
    cached_revision: Option<u64>,
    records: Vec<ObstacleRecord>,
}

impl ObstacleIndexState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Obstacles for the current static revision, rebuilding if stale
    pub fn obstacles<S: StaticColliderSource + ?Sized>(&mut self, source: &S) -> &[ObstacleRecord] {
        let revision = source.static_revision();
        if self.cached_revision != Some(revision) {
            self.rebuild(source);
            self.cached_revision = Some(revision);
        }
        &self.records
    }

    /// Cached list without checking the revision
    pub fn cached(&self) -> &[ObstacleRecord] {
        &self.records
    }

    fn rebuild<S: StaticColliderSource + ?Sized>(&mut self, source: &S) {
        self.records.clear();
        self.records.extend(
            source
                .static_boxes()
                .iter()
                .filter(|b| !b.groups.belongs_to(CollisionLayer::ENEMY_FLOOR))
                .filter(|b| !is_floor_slab(b.center, b.half_extents))
                .map(|b| ObstacleRecord {
                    center: b.center,
                    half_extents: b.half_extents,
                    groups: b.groups,
                }),
        );
        log::debug!(
            "obstacle index rebuilt: {} of {} static boxes",
            self.records.len(),
            source.static_boxes().len()
        );
    }
}

/// Obstacle pressure at `probe` for a body of `radius`
///
/// `size` is the archetype's nominal size and widens the vertical band in
/// which an obstacle counts. Returns 0 when clear, a value in (0, 0.82] near
/// an edge, and at least 1 when inside a padded box (deeper is larger).
pub fn pressure_at(obstacles: &[ObstacleRecord], probe: Vec3, radius: f32, size: f32) -> f32 {
    let pad = radius + 0.12;
    let mut pressure = 0.0f32;

    for obs in obstacles {
        let half = obs.half_extents;
        if (probe.y - obs.center.y).abs() - (half.y + size + 0.24) > 0.0 {
            continue;
        }

        let dx = (probe.x - obs.center.x).abs() - (half.x + pad);
        let dz = (probe.z - obs.center.z).abs() - (half.z + pad);

        if dx < 0.0 && dz < 0.0 {
            pressure = pressure.max(1.0 + (-dx).min(-dz) * 0.9);
        } else {
            let edge = dx.max(0.0).hypot(dz.max(0.0));
            if edge < 0.95 {
                pressure = pressure.max((0.95 - edge) / 0.95 * 0.82);
            }
        }
    }

    pressure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::world::{PhysicsWorld, StaticBoxDesc};
    use approx::assert_relative_eq;

    fn arena() -> PhysicsWorld {
        let mut world = PhysicsWorld::new(PhysicsConfig::fast()).unwrap();
        // floor slab
        world.add_static_box(StaticBoxDesc::from_size(Vec3::new(0.0, -2.0, -35.0), Vec3::new(90.0, 4.0, 40.0)));
        // enemy floor cover
        world.add_static_box(
            StaticBoxDesc::from_size(Vec3::new(0.0, -2.0, 0.0), Vec3::new(20.0, 4.0, 20.0))
                .with_groups(CollisionGroups::enemy_floor()),
        );
        // center wall
        world.add_static_box(StaticBoxDesc::from_size(Vec3::new(0.0, 1.5, 12.0), Vec3::new(10.0, 3.0, 2.0)));
        world
    }

    #[test]
    fn test_excludes_floor_and_cover() {
        let world = arena();
        let mut index = ObstacleIndexState::new();
        let obstacles = index.obstacles(&world);
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].center, Vec3::new(0.0, 1.5, 12.0));
    }

    #[test]
    fn test_rebuilds_only_on_revision_change() {
        let mut world = arena();
        let mut index = ObstacleIndexState::new();
        assert_eq!(index.obstacles(&world).len(), 1);

        // Same revision: cached list survives even if we peek without source
        assert_eq!(index.cached().len(), 1);

        let pillar = world.add_static_box(StaticBoxDesc::from_size(
            Vec3::new(15.0, 6.0, -45.0),
            Vec3::new(3.0, 12.0, 3.0),
        ));
        assert_eq!(index.cached().len(), 1);
        assert_eq!(index.obstacles(&world).len(), 2);

        world.remove_static_box(pillar).unwrap();
        assert_eq!(index.obstacles(&world).len(), 1);
    }

    #[test]
    fn test_tall_narrow_box_is_not_a_floor_slab() {
        assert!(is_floor_slab(Vec3::new(0.0, -2.0, 0.0), Vec3::new(45.0, 2.0, 20.0)));
        assert!(!is_floor_slab(Vec3::new(0.0, 1.5, 0.0), Vec3::new(45.0, 2.0, 20.0)));
        assert!(!is_floor_slab(Vec3::new(0.0, -2.0, 16.0), Vec3::new(15.0, 1.0, 1.0)));
        assert!(!is_floor_slab(Vec3::new(0.0, 0.0, 0.0), Vec3::new(5.0, 2.0, 5.0)));
    }

    #[test]
    fn test_pressure_field() {
        let obstacles = [ObstacleRecord::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 1.0))];

        let inside = pressure_at(&obstacles, Vec3::new(0.0, 1.0, 0.0), 0.5, 0.5);
        assert!(inside >= 1.0);

        let near = pressure_at(&obstacles, Vec3::new(2.0, 1.0, 0.0), 0.5, 0.5);
        assert!(near > 0.0 && near <= 0.82);
        // dx = 2 - 1.62 = 0.38
        assert_relative_eq!(near, (0.95 - 0.38) / 0.95 * 0.82, epsilon = 1e-5);

        let far = pressure_at(&obstacles, Vec3::new(10.0, 1.0, 0.0), 0.5, 0.5);
        assert_eq!(far, 0.0);

        // Above the vertical band
        let above = pressure_at(&obstacles, Vec3::new(0.0, 10.0, 0.0), 0.5, 0.5);
        assert_eq!(above, 0.0);
    }

    #[test]
    fn test_contains_padded() {
        let obs = ObstacleRecord::new(Vec3::ZERO, Vec3::ONE);
        assert!(obs.contains_padded(Vec3::new(1.5, 0.0, 0.0), 0.6));
        assert!(!obs.contains_padded(Vec3::new(1.7, 0.0, 0.0), 0.6));
    }
}
