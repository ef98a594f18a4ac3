//! Shape descriptors and derived geometry
//!
//! A shape is a canonical descriptor (radius; width and height; side count and
//! radius). World-space geometry is always derived from the descriptor plus
//! the owning body's position, never stored independently of it.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::vector::Vector2;
use crate::consts::CIRCLE_HULL_SIDES;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Described by center and radius, no vertex list
    Circle { radius: f64 },
    /// Axis-aligned box centered on the body position
    Rectangle { width: f64, height: f64 },
    /// Regular polygon with `sides` vertices on a circle of `radius`
    Polygon { sides: u32, radius: f64 },
}

impl Shape {
    /// World-space outline at `position`
    ///
    /// Empty for circles; see [`Shape::hull`] when a circle has to be treated
    /// as a polygon.
    pub fn world_vertices(&self, position: Vector2) -> Vec<Vector2> {
        match *self {
            Shape::Circle { .. } => Vec::new(),
            Shape::Rectangle { width, height } => {
                let hw = width / 2.0;
                let hh = height / 2.0;
                vec![
                    Vector2::new(position.x - hw, position.y - hh),
                    Vector2::new(position.x + hw, position.y - hh),
                    Vector2::new(position.x + hw, position.y + hh),
                    Vector2::new(position.x - hw, position.y + hh),
                ]
            }
            Shape::Polygon { sides, radius } => regular_polygon(position, sides as usize, radius),
        }
    }

    /// Convex outline suitable for GJK, approximating circles
    pub fn hull(&self, position: Vector2) -> Vec<Vector2> {
        match *self {
            Shape::Circle { radius } => regular_polygon(position, CIRCLE_HULL_SIDES, radius),
            _ => self.world_vertices(position),
        }
    }

    /// Geometric centroid. Every variant is centered on its position.
    #[inline]
    pub fn centroid(&self, position: Vector2) -> Vector2 {
        position
    }

    /// Half of the vertical extent, used for wall contact
    pub fn vertical_extent(&self) -> f64 {
        match *self {
            Shape::Circle { radius } => radius,
            Shape::Rectangle { height, .. } => height / 2.0,
            Shape::Polygon { radius, .. } => radius,
        }
    }

    pub fn is_rectangle(&self) -> bool {
        matches!(self, Shape::Rectangle { .. })
    }
}

fn regular_polygon(center: Vector2, sides: usize, radius: f64) -> Vec<Vector2> {
    if sides == 0 {
        return Vec::new();
    }
    let step = TAU / sides as f64;
    (0..sides)
        .map(|i| {
            let angle = i as f64 * step;
            center + Vector2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_vertices_centered() {
        let shape = Shape::Rectangle {
            width: 4.0,
            height: 10.0,
        };
        let verts = shape.world_vertices(Vector2::new(10.0, 5.0));
        assert_eq!(verts.len(), 4);
        assert_eq!(verts[0], Vector2::new(8.0, 0.0));
        assert_eq!(verts[2], Vector2::new(12.0, 10.0));
    }

    #[test]
    fn test_polygon_vertices_on_radius() {
        let shape = Shape::Polygon {
            sides: 6,
            radius: 30.0,
        };
        let center = Vector2::new(100.0, 50.0);
        let verts = shape.world_vertices(center);
        assert_eq!(verts.len(), 6);
        for v in &verts {
            assert!((v.distance(center) - 30.0).abs() < 1e-9);
        }
        // First vertex sits at angle 0
        assert!((verts[0] - Vector2::new(130.0, 50.0)).length() < 1e-9);
    }

    #[test]
    fn test_circle_has_no_vertices_but_has_hull() {
        let shape = Shape::Circle { radius: 5.0 };
        assert!(shape.world_vertices(Vector2::ZERO).is_empty());
        assert_eq!(shape.hull(Vector2::ZERO).len(), CIRCLE_HULL_SIDES);
    }

    #[test]
    fn test_vertical_extent() {
        assert_eq!(Shape::Circle { radius: 7.0 }.vertical_extent(), 7.0);
        assert_eq!(
            Shape::Rectangle {
                width: 10.0,
                height: 80.0
            }
            .vertical_extent(),
            40.0
        );
    }
}
