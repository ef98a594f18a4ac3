//! Impulse-based collision response
//!
//! Pairwise only: each detected contact is resolved once, in detection order,
//! with no iterative solving across simultaneous contacts.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::RigidBody;
use super::collision::{closest_point_on_rect, reflect_velocity};
use super::shape::Shape;
use super::vector::{Vector2, VectorExt};

/// Counters for the defensive numeric clamps
///
/// The simulation keeps running when these trip, but callers and tests can
/// see how often it happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericGuards {
    /// Integration produced a NaN position and was skipped
    pub skipped_positions: u32,
    /// An impulse produced a NaN velocity that was zeroed
    pub zeroed_velocities: u32,
    /// A contact had no usable normal and was not resolved
    pub degenerate_normals: u32,
}

impl NumericGuards {
    pub fn total(&self) -> u32 {
        self.skipped_positions + self.zeroed_velocities + self.degenerate_normals
    }

    pub fn merge(&mut self, other: &NumericGuards) {
        self.skipped_positions += other.skipped_positions;
        self.zeroed_velocities += other.zeroed_velocities;
        self.degenerate_normals += other.degenerate_normals;
    }
}

/// Perfectly elastic circle-circle response
///
/// No-op when either body is a rectangle, when the centers coincide, or when
/// the pair is already separating. Returns true if an impulse was applied.
pub fn resolve_circle_circle(
    a: &mut RigidBody,
    b: &mut RigidBody,
    nudge: f64,
    guards: &mut NumericGuards,
) -> bool {
    if a.shape.is_rectangle() || b.shape.is_rectangle() {
        return false;
    }

    let Ok(normal) = (b.position - a.position).checked_normalize() else {
        guards.degenerate_normals += 1;
        log::debug!("Coincident circles {:?}/{:?}, no contact normal", a.id, b.id);
        return false;
    };

    if !apply_elastic_impulse(a, b, normal, guards) {
        return false;
    }

    // Push apart to counter discrete-step sinking
    a.position -= normal * nudge;
    b.position += normal * nudge;
    a.sync_geometry();
    b.sync_geometry();
    true
}

/// Exchange momentum along `normal` (pointing from `a` to `b`)
///
/// Returns false if the bodies are already moving apart.
pub fn apply_elastic_impulse(
    a: &mut RigidBody,
    b: &mut RigidBody,
    normal: Vector2,
    guards: &mut NumericGuards,
) -> bool {
    let relative_velocity = b.velocity - a.velocity;
    let speed = relative_velocity.dot(normal);
    if speed > 0.0 {
        return false;
    }

    let impulse = 2.0 * speed / (a.mass + b.mass);
    a.velocity += normal * (impulse * b.mass);
    b.velocity -= normal * (impulse * a.mass);

    zero_if_nan(a, guards);
    zero_if_nan(b, guards);
    true
}

fn zero_if_nan(body: &mut RigidBody, guards: &mut NumericGuards) {
    if body.velocity.has_nan() {
        log::debug!("Body {:?}: NaN velocity after impulse, zeroing", body.id);
        body.velocity = DVec2::ZERO;
        guards.zeroed_velocities += 1;
    }
}

/// Bounce a circle off a paddle; the paddle never moves
///
/// `normal` points from the rectangle toward the circle. The circle is
/// reflected (unless it is already leaving) and pushed out of the overlap.
pub fn resolve_circle_rect(
    circle: &mut RigidBody,
    rect: &RigidBody,
    normal: Vector2,
    guards: &mut NumericGuards,
) -> bool {
    let (Shape::Circle { radius }, Shape::Rectangle { width, height }) = (circle.shape, rect.shape)
    else {
        return false;
    };
    if normal == DVec2::ZERO {
        guards.degenerate_normals += 1;
        log::debug!("Circle {:?} centered inside rectangle {:?}", circle.id, rect.id);
        return false;
    }

    let reflected = reflect_off(circle, normal);

    let nearest = closest_point_on_rect(circle.position, rect.position, width, height);
    let penetration = radius - circle.position.distance(nearest);
    circle.position += normal * penetration;
    circle.sync_geometry();
    reflected
}

/// Reflect a body's velocity unless it already moves along `normal`
pub fn reflect_off(body: &mut RigidBody, normal: Vector2) -> bool {
    if body.velocity.dot(normal) > 0.0 {
        return false;
    }
    body.velocity = reflect_velocity(body.velocity, normal);
    true
}

/// Push a body out of an overlap along `normal` by `depth`
pub fn separate(body: &mut RigidBody, normal: Vector2, depth: f64) {
    if depth > 0.0 && depth.is_finite() {
        body.position += normal * depth;
        body.sync_geometry();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SEPARATION_NUDGE;

    fn total_kinetic(a: &RigidBody, b: &RigidBody) -> f64 {
        a.kinetic_energy() + b.kinetic_energy()
    }

    #[test]
    fn test_head_on_equal_mass_swaps_velocities() {
        let mut a = RigidBody::circle(Vector2::new(0.0, 0.0), 5.0)
            .with_velocity(Vector2::new(0.3, 0.0));
        let mut b = RigidBody::circle(Vector2::new(9.0, 0.0), 5.0)
            .with_velocity(Vector2::new(-0.1, 0.0));
        let before = total_kinetic(&a, &b);
        let mut guards = NumericGuards::default();

        assert!(resolve_circle_circle(&mut a, &mut b, SEPARATION_NUDGE, &mut guards));
        assert!((a.velocity.x - (-0.1)).abs() < 1e-12);
        assert!((b.velocity.x - 0.3).abs() < 1e-12);

        let after = total_kinetic(&a, &b);
        assert!((after - before).abs() / before < 0.01);
        assert_eq!(guards.total(), 0);
    }

    #[test]
    fn test_nudge_pushes_apart() {
        let mut a = RigidBody::circle(Vector2::new(0.0, 0.0), 5.0)
            .with_velocity(Vector2::new(0.3, 0.0));
        let mut b = RigidBody::circle(Vector2::new(9.0, 0.0), 5.0);
        let mut guards = NumericGuards::default();
        resolve_circle_circle(&mut a, &mut b, 0.1, &mut guards);
        assert!((a.position.x - (-0.1)).abs() < 1e-12);
        assert!((b.position.x - 9.1).abs() < 1e-12);
    }

    #[test]
    fn test_separating_pair_untouched() {
        let mut a = RigidBody::circle(Vector2::new(0.0, 0.0), 5.0)
            .with_velocity(Vector2::new(-0.2, 0.0));
        let mut b = RigidBody::circle(Vector2::new(9.0, 0.0), 5.0)
            .with_velocity(Vector2::new(0.2, 0.0));
        let mut guards = NumericGuards::default();
        assert!(!resolve_circle_circle(&mut a, &mut b, SEPARATION_NUDGE, &mut guards));
        assert_eq!(a.velocity, Vector2::new(-0.2, 0.0));
        assert_eq!(a.position, Vector2::ZERO);
    }

    #[test]
    fn test_rectangle_pair_skipped() {
        let mut a = RigidBody::circle(Vector2::ZERO, 5.0).with_velocity(Vector2::X);
        let mut b = RigidBody::rectangle(Vector2::new(4.0, 0.0), 4.0, 10.0);
        let mut guards = NumericGuards::default();
        assert!(!resolve_circle_circle(&mut a, &mut b, SEPARATION_NUDGE, &mut guards));
        assert_eq!(a.velocity, Vector2::X);
    }

    #[test]
    fn test_coincident_centers_counted() {
        let mut a = RigidBody::circle(Vector2::ONE, 5.0);
        let mut b = RigidBody::circle(Vector2::ONE, 5.0);
        let mut guards = NumericGuards::default();
        assert!(!resolve_circle_circle(&mut a, &mut b, SEPARATION_NUDGE, &mut guards));
        assert_eq!(guards.degenerate_normals, 1);
    }

    #[test]
    fn test_unequal_masses_conserve_momentum() {
        let mut a = RigidBody::circle(Vector2::new(0.0, 0.0), 5.0)
            .with_mass(3.0)
            .with_velocity(Vector2::new(0.2, 0.1));
        let mut b = RigidBody::circle(Vector2::new(6.0, 6.0), 5.0)
            .with_mass(1.0)
            .with_velocity(Vector2::new(-0.3, -0.2));
        let momentum_before = a.velocity * a.mass + b.velocity * b.mass;
        let energy_before = total_kinetic(&a, &b);
        let mut guards = NumericGuards::default();
        assert!(resolve_circle_circle(&mut a, &mut b, SEPARATION_NUDGE, &mut guards));
        let momentum_after = a.velocity * a.mass + b.velocity * b.mass;
        assert!((momentum_after - momentum_before).length() < 1e-12);
        assert!((total_kinetic(&a, &b) - energy_before).abs() < 1e-12);
    }

    #[test]
    fn test_nan_velocity_zeroed_and_counted() {
        let mut a = RigidBody::circle(Vector2::new(0.0, 0.0), 5.0);
        a.mass = f64::INFINITY;
        let mut b = RigidBody::circle(Vector2::new(9.0, 0.0), 5.0)
            .with_velocity(Vector2::new(-0.3, 0.0));
        let mut guards = NumericGuards::default();
        resolve_circle_circle(&mut a, &mut b, SEPARATION_NUDGE, &mut guards);
        // Zero impulse times infinite mass is NaN on the lighter body
        assert_eq!(a.velocity, Vector2::ZERO);
        assert_eq!(b.velocity, Vector2::ZERO);
        assert_eq!(guards.zeroed_velocities, 1);
    }

    #[test]
    fn test_circle_rect_reflects_and_pushes_out() {
        let mut ball = RigidBody::circle(Vector2::new(6.0, 5.0), 3.0)
            .with_velocity(Vector2::new(0.4, 0.1));
        let paddle = RigidBody::rectangle(Vector2::new(10.0, 5.0), 4.0, 10.0);
        let mut guards = NumericGuards::default();

        assert!(resolve_circle_rect(&mut ball, &paddle, Vector2::new(-1.0, 0.0), &mut guards));
        assert!((ball.velocity - Vector2::new(-0.4, 0.1)).length() < 1e-12);
        // Was 1 unit inside the paddle face at x=8
        assert!((ball.position.x - 5.0).abs() < 1e-12);
        assert_eq!(paddle.velocity, Vector2::ZERO);
    }

    #[test]
    fn test_circle_rect_separating_keeps_velocity_but_pushes_out() {
        // Already leaving the paddle face at x=8 but still 1 unit inside
        let mut ball = RigidBody::circle(Vector2::new(6.0, 5.0), 3.0)
            .with_velocity(Vector2::new(-0.4, 0.1));
        let paddle = RigidBody::rectangle(Vector2::new(10.0, 5.0), 4.0, 10.0);
        let mut guards = NumericGuards::default();

        assert!(!resolve_circle_rect(&mut ball, &paddle, Vector2::new(-1.0, 0.0), &mut guards));
        assert_eq!(ball.velocity, Vector2::new(-0.4, 0.1));
        assert!((ball.position.x - 5.0).abs() < 1e-12);
        assert_eq!(guards.total(), 0);
    }

    #[test]
    fn test_circle_rect_zero_normal_counted() {
        let mut ball = RigidBody::circle(Vector2::new(10.0, 5.0), 3.0).with_velocity(Vector2::X);
        let paddle = RigidBody::rectangle(Vector2::new(10.0, 5.0), 4.0, 10.0);
        let mut guards = NumericGuards::default();
        assert!(!resolve_circle_rect(&mut ball, &paddle, Vector2::ZERO, &mut guards));
        assert_eq!(ball.velocity, Vector2::X);
        assert_eq!(guards.degenerate_normals, 1);
    }
}
