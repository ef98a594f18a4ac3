//! Closed-form contact tests for the common pairs
//!
//! Circles against circles and circles against axis-aligned paddles are the
//! whole game, so they skip GJK entirely.

use glam::DVec2;

use super::vector::{Vector2, VectorExt};

/// Result of a collision check
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Nearest point on the other shape (circle-rectangle) or midpoint (circle-circle)
    pub point: Vector2,
    /// Contact normal; zero when no direction is defined
    pub normal: Vector2,
    /// Overlap depth (for position correction)
    pub penetration: f64,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: DVec2::ZERO,
            normal: DVec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Circle against circle
///
/// Hit iff the centers are strictly closer than the radius sum. The normal
/// points from `a` to `b` and is zero when the centers coincide.
pub fn circle_circle(
    center_a: Vector2,
    radius_a: f64,
    center_b: Vector2,
    radius_b: f64,
) -> CollisionResult {
    let distance = center_a.distance(center_b);
    if distance >= radius_a + radius_b {
        return CollisionResult::miss();
    }

    CollisionResult {
        hit: true,
        point: (center_a + center_b) * 0.5,
        normal: (center_b - center_a).checked_normalize().unwrap_or(DVec2::ZERO),
        penetration: radius_a + radius_b - distance,
    }
}

/// Point on an axis-aligned rectangle nearest to `point`
pub fn closest_point_on_rect(point: Vector2, rect_center: Vector2, width: f64, height: f64) -> Vector2 {
    let half = DVec2::new(width / 2.0, height / 2.0);
    point.clamp(rect_center - half, rect_center + half)
}

/// Circle against an axis-aligned rectangle
///
/// `epsilon` widens the hit test slightly so exact tangency does not flap
/// between frames. The normal points from the rectangle toward the circle and
/// is zero when the circle center lies on or inside the rectangle.
pub fn circle_rect(
    circle_center: Vector2,
    radius: f64,
    rect_center: Vector2,
    width: f64,
    height: f64,
    epsilon: f64,
) -> CollisionResult {
    let nearest = closest_point_on_rect(circle_center, rect_center, width, height);
    let offset = circle_center - nearest;
    let distance = offset.length();

    if distance > radius + epsilon {
        return CollisionResult::miss();
    }

    let normal = if distance > epsilon {
        offset / distance
    } else {
        DVec2::ZERO
    };

    CollisionResult {
        hit: true,
        point: nearest,
        normal,
        penetration: radius - distance,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vector2, normal: Vector2) -> Vector2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
