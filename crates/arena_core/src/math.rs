//! Planar math helpers
//!
//! The arena is navigated on the XZ plane with +Y up. These helpers keep the
//! "drop the Y component, then normalize with a fallback" dance in one place.

use glam::{Quat, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Squared length below which a direction counts as degenerate
pub const DEGENERATE_SQ: f32 = 1e-6;

/// Copy of `v` with Y zeroed
#[inline]
pub fn flat(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Flattened and normalized, or `fallback` when degenerate
#[inline]
pub fn flat_normalized(v: Vec3, fallback: Vec3) -> Vec3 {
    let f = flat(v);
    if f.length_squared() < DEGENERATE_SQ {
        fallback
    } else {
        f.normalize()
    }
}

#[inline]
pub fn planar_length(v: Vec3) -> f32 {
    v.x.hypot(v.z)
}

#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    (a.x - b.x).hypot(a.z - b.z)
}

/// Rotate `v` about +Y by `angle` radians (right-handed)
#[inline]
pub fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    Quat::from_rotation_y(angle) * v
}

/// Wrap an angle into (-PI, PI]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Distance from `p` to the segment `a..b`
pub fn point_segment_distance(p: Vec3, a: Vec3, b: Vec3) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < DEGENERATE_SQ {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Planar distance from the origin to the segment `a..b`
pub fn segment_origin_distance_xz(a: Vec3, b: Vec3) -> f32 {
    let a2 = Vec2::new(a.x, a.z);
    let ab = Vec2::new(b.x, b.z) - a2;
    let len_sq = ab.length_squared();
    if len_sq < DEGENERATE_SQ {
        return a2.length();
    }
    let t = (-a2.dot(ab) / len_sq).clamp(0.0, 1.0);
    (a2 + ab * t).length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotate_y_quarter_turn() {
        let v = rotate_y(Vec3::Z, PI / 2.0);
        assert_relative_eq!(v.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(v.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_normalize_angle() {
        assert_relative_eq!(normalize_angle(3.0 * PI), PI, epsilon = 1e-5);
        assert_relative_eq!(normalize_angle(-PI / 2.0 - TAU), -PI / 2.0, epsilon = 1e-5);
        assert_relative_eq!(normalize_angle(0.25), 0.25);
    }

    #[test]
    fn test_flat_normalized_fallback() {
        assert_eq!(flat_normalized(Vec3::Y, Vec3::Z), Vec3::Z);
        let n = flat_normalized(Vec3::new(3.0, 9.0, 4.0), Vec3::Z);
        assert_relative_eq!(n.x, 0.6, epsilon = 1e-6);
        assert_relative_eq!(n.z, 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_point_segment_distance() {
        let a = Vec3::ZERO;
        let b = Vec3::new(10.0, 0.0, 0.0);
        assert_relative_eq!(point_segment_distance(Vec3::new(5.0, 2.0, 0.0), a, b), 2.0);
        assert_relative_eq!(point_segment_distance(Vec3::new(-3.0, 0.0, 4.0), a, b), 5.0);
        assert_relative_eq!(point_segment_distance(Vec3::new(0.0, 1.0, 0.0), a, a), 1.0);
    }

    #[test]
    fn test_segment_origin_distance() {
        let d = segment_origin_distance_xz(Vec3::new(-10.0, 0.0, 5.0), Vec3::new(10.0, 0.0, 5.0));
        assert_relative_eq!(d, 5.0, epsilon = 1e-5);
        let d = segment_origin_distance_xz(Vec3::new(3.0, 0.0, 4.0), Vec3::new(3.0, 0.0, 4.0));
        assert_relative_eq!(d, 5.0, epsilon = 1e-5);
    }
}
