//! Planar math helpers for combat positioning.

use glam::Vec2;

/// Unit vector for a facing angle in radians.
#[must_use]
pub fn facing_vec(radians: f32) -> Vec2 {
    Vec2::new(radians.cos(), radians.sin())
}

/// Planar distance between two points.
#[must_use]
pub fn planar_distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Bearing (radians) from one point toward another.
#[must_use]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Normalized direction from one point toward another.
///
/// Returns `Vec2::ZERO` when the points coincide.
#[must_use]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}
