//! Rigid body model
//!
//! Bodies are created by the caller with zero velocity and acceleration and
//! handed to a [`super::World`]. The core mutates them each step but never
//! creates or destroys them on its own.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::shape::Shape;
use super::vector::Vector2;

/// Stable identity of a body inside a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// How a body participates in integration and pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionClass {
    /// Fully integrated: gravity, speed limit, impulses
    #[default]
    Dynamic,
    /// Moved by an external controller (paddles); never paired with other anchors/borders
    Anchor,
    /// Immovable boundary geometry
    Border,
}

impl MotionClass {
    #[inline]
    pub fn is_dynamic(self) -> bool {
        self == MotionClass::Dynamic
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    /// Assigned by the world on insert
    pub id: BodyId,
    pub position: Vector2,
    pub previous_position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
    pub mass: f64,
    pub shape: Shape,
    /// World-space outline; empty for circles
    pub vertices: Vec<Vector2>,
    /// Geometric centroid, recomputed on every update
    pub center: Vector2,
    /// Diagnostic: kinetic plus potential energy
    pub mechanical_energy: f64,
    pub motion: MotionClass,
    /// Drawing metadata, passed through untouched
    #[serde(default)]
    pub style: serde_json::Value,
}

impl RigidBody {
    pub fn new(shape: Shape, position: Vector2) -> Self {
        Self {
            id: BodyId(0),
            position,
            previous_position: position,
            velocity: DVec2::ZERO,
            acceleration: DVec2::ZERO,
            mass: 1.0,
            shape,
            vertices: shape.world_vertices(position),
            center: shape.centroid(position),
            mechanical_energy: 0.0,
            motion: MotionClass::Dynamic,
            style: serde_json::Value::Null,
        }
    }

    pub fn circle(position: Vector2, radius: f64) -> Self {
        Self::new(Shape::Circle { radius }, position)
    }

    /// Rectangle centered on `position`
    pub fn rectangle(position: Vector2, width: f64, height: f64) -> Self {
        Self::new(Shape::Rectangle { width, height }, position)
    }

    pub fn polygon(position: Vector2, sides: u32, radius: f64) -> Self {
        Self::new(Shape::Polygon { sides, radius }, position)
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self.mechanical_energy = self.kinetic_energy();
        self
    }

    /// Non-positive or non-finite masses are ignored
    pub fn with_mass(mut self, mass: f64) -> Self {
        if mass > 0.0 && mass.is_finite() {
            self.mass = mass;
            self.mechanical_energy = self.kinetic_energy();
        } else {
            log::warn!("Ignoring invalid mass {}", mass);
        }
        self
    }

    pub fn with_motion(mut self, motion: MotionClass) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_style(mut self, style: serde_json::Value) -> Self {
        self.style = style;
        self
    }

    /// ½·m·|v|²
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    /// Re-derive vertices and center from the current position
    pub fn sync_geometry(&mut self) {
        self.vertices = self.shape.world_vertices(self.position);
        self.center = self.shape.centroid(self.position);
    }

    /// Move the body without integrating (controller-driven anchors, borders)
    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
        self.sync_geometry();
    }

    /// Convex outline for GJK
    pub fn hull(&self) -> Vec<Vector2> {
        self.shape.hull(self.position)
    }
}

/// Construction helper for the game layer
///
/// `style` is opaque drawing metadata; the core never reads it.
pub fn create_body(shape: Shape, position: Vector2, style: serde_json::Value) -> RigidBody {
    RigidBody::new(shape, position).with_style(style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_body_at_rest() {
        let body = RigidBody::circle(Vector2::new(5.0, 5.0), 3.0);
        assert_eq!(body.velocity, Vector2::ZERO);
        assert_eq!(body.acceleration, Vector2::ZERO);
        assert_eq!(body.previous_position, body.position);
        assert_eq!(body.center, body.position);
        assert!(body.vertices.is_empty());
        assert_eq!(body.motion, MotionClass::Dynamic);
    }

    #[test]
    fn test_create_body_passes_style_through() {
        let style = serde_json::json!({ "fillStyle": "white", "lineWidth": 2 });
        let body = create_body(
            Shape::Rectangle {
                width: 10.0,
                height: 80.0,
            },
            Vector2::new(20.0, 300.0),
            style.clone(),
        );
        assert_eq!(body.style, style);
        assert_eq!(body.vertices.len(), 4);
    }

    #[test]
    fn test_with_mass_rejects_zero() {
        let body = RigidBody::circle(Vector2::ZERO, 1.0).with_mass(0.0);
        assert_eq!(body.mass, 1.0);
        let body = body.with_mass(2.5);
        assert_eq!(body.mass, 2.5);
    }

    #[test]
    fn test_set_position_resyncs_vertices() {
        let mut body = RigidBody::rectangle(Vector2::ZERO, 2.0, 2.0);
        body.set_position(Vector2::new(10.0, 0.0));
        assert_eq!(body.vertices[0], Vector2::new(9.0, -1.0));
        assert_eq!(body.center, Vector2::new(10.0, 0.0));
    }

    #[test]
    fn test_kinetic_energy() {
        let body = RigidBody::circle(Vector2::ZERO, 1.0)
            .with_mass(2.0)
            .with_velocity(Vector2::new(3.0, 4.0));
        assert_eq!(body.kinetic_energy(), 25.0);
        assert_eq!(body.mechanical_energy, 25.0);
    }
}
