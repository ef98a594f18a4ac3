//! Expanding Polytope Algorithm (opt-in)
//!
//! Grows the terminal GJK triangle toward the Minkowski boundary to find the
//! penetration depth and direction. Numerically fragile on near-degenerate
//! edges, so it is only run when `PhysicsSettings::use_epa` is set and its
//! failure never blocks the GJK verdict.

use serde::{Deserialize, Serialize};

use super::gjk::{Simplex, support};
use super::vector::{Vector2, VectorExt};

/// Minimum translation out of an overlap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Penetration {
    pub depth: f64,
    /// Unit normal pointing from A toward B
    pub normal: Vector2,
}

/// Extract penetration from a GJK simplex that encloses the origin
///
/// Returns `None` when the simplex is not a triangle, every edge is
/// degenerate, or the expansion does not settle within `max_iterations`.
pub fn epa(
    simplex: &Simplex,
    a: &[Vector2],
    b: &[Vector2],
    tolerance: f64,
    max_iterations: usize,
) -> Option<Penetration> {
    if simplex.len() < Simplex::MAX_POINTS {
        return None;
    }
    let mut polytope = simplex.points().to_vec();

    for _ in 0..max_iterations {
        let (index, distance, normal) = closest_edge(&polytope)?;

        let point = support(a, b, normal)?;
        let support_distance = normal.dot(point);

        if (support_distance - distance).abs() <= tolerance {
            return Some(Penetration {
                depth: distance,
                normal,
            });
        }
        polytope.insert(index, point);
    }

    log::debug!(
        "EPA did not converge after {} iterations ({} vertices)",
        max_iterations,
        polytope.len()
    );
    None
}

/// Edge nearest the origin: (insert index, distance, outward normal)
fn closest_edge(polytope: &[Vector2]) -> Option<(usize, f64, Vector2)> {
    let mut best: Option<(usize, f64, Vector2)> = None;

    for i in 0..polytope.len() {
        let j = (i + 1) % polytope.len();
        let edge = polytope[j] - polytope[i];

        let Ok(mut normal) = Vector2::new(edge.y, -edge.x).checked_normalize() else {
            continue;
        };
        let mut distance = normal.dot(polytope[i]);
        if distance < 0.0 {
            distance = -distance;
            normal = -normal;
        }

        if best.is_none_or(|(_, min, _)| distance < min) {
            best = Some((j, distance, normal));
        }
    }
    best
}
