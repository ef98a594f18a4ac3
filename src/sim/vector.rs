//! 2D vector helpers
//!
//! `glam::DVec2` is already an immutable-by-value type with arithmetic, dot,
//! length and distance. This adds the pieces the collision code needs on top:
//! a normalize that refuses zero-length input, a scalar cross product, and an
//! edge perpendicular oriented toward a target.

use glam::DVec2;

use crate::error::PhysicsError;

/// The simulation's vector type
pub type Vector2 = DVec2;

pub trait VectorExt: Sized {
    /// Unit vector, or `DegenerateVector` when the length is zero or not finite
    fn checked_normalize(self) -> Result<Self, PhysicsError>;

    /// z-component of the 3D cross product
    fn cross(self, other: Self) -> f64;

    /// True if either component is NaN
    fn has_nan(self) -> bool;
}

impl VectorExt for DVec2 {
    fn checked_normalize(self) -> Result<Self, PhysicsError> {
        let length = self.length();
        if length == 0.0 || !length.is_finite() {
            return Err(PhysicsError::DegenerateVector {
                x: self.x,
                y: self.y,
            });
        }
        Ok(self / length)
    }

    #[inline]
    fn cross(self, other: Self) -> f64 {
        self.perp_dot(other)
    }

    #[inline]
    fn has_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
}

/// Perpendicular of `edge` lying on the same side as `target`
///
/// Returns zero when `target` is collinear with `edge`.
#[inline]
pub fn perpendicular_toward(edge: Vector2, target: Vector2) -> Vector2 {
    let side = edge.cross(target);
    if side > 0.0 {
        // Left-hand perpendicular (-y, x)
        edge.perp()
    } else if side < 0.0 {
        -edge.perp()
    } else {
        Vector2::ZERO
    }
}
