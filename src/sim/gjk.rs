//! GJK intersection test for convex polygons
//!
//! Works on the Minkowski difference A − B: the shapes overlap iff it
//! contains the origin. The simplex lives on the stack of a single call.

use super::vector::{Vector2, VectorExt, perpendicular_toward};

/// GJK working set: at most three points, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Simplex {
    points: Vec<Vector2>,
}

impl Simplex {
    pub const MAX_POINTS: usize = 3;

    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(Self::MAX_POINTS),
        }
    }

    fn push(&mut self, point: Vector2) {
        debug_assert!(self.points.len() < Self::MAX_POINTS);
        self.points.push(point);
    }

    fn set(&mut self, points: &[Vector2]) {
        self.points.clear();
        self.points.extend_from_slice(points);
    }

    pub fn points(&self) -> &[Vector2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Outcome of a GJK query
#[derive(Debug, Clone)]
pub struct GjkResult {
    pub collision: bool,
    /// Terminal simplex (seed for EPA when it encloses the origin)
    pub simplex: Simplex,
    /// Support points added after the seed
    pub iterations: usize,
    /// The iteration cap was hit and the collision is assumed
    pub capped: bool,
}

/// Vertex furthest along `direction`; ties keep the first one seen
pub fn furthest_vertex(vertices: &[Vector2], direction: Vector2) -> Option<Vector2> {
    let mut best: Option<(f64, Vector2)> = None;
    for &v in vertices {
        let projection = v.dot(direction);
        match best {
            Some((max, _)) if projection <= max => {}
            _ => best = Some((projection, v)),
        }
    }
    best.map(|(_, v)| v)
}

/// Support point of the Minkowski difference A − B
pub fn support(a: &[Vector2], b: &[Vector2], direction: Vector2) -> Option<Vector2> {
    Some(furthest_vertex(a, direction)? - furthest_vertex(b, -direction)?)
}

/// Do the convex outlines `a` and `b` overlap?
///
/// Running past `max_iterations` reports a collision: a slowly converging
/// configuration may give a false positive, never an endless loop.
pub fn gjk(a: &[Vector2], b: &[Vector2], max_iterations: usize) -> GjkResult {
    let mut simplex = Simplex::new();
    let miss = |simplex: Simplex, iterations| GjkResult {
        collision: false,
        simplex,
        iterations,
        capped: false,
    };

    let Some(first) = support(a, b, Vector2::X) else {
        return miss(simplex, 0);
    };
    simplex.push(first);
    let mut direction = -first;
    let mut iterations = 0;

    loop {
        if direction == Vector2::ZERO {
            // Origin sits on the simplex itself: touching counts
            return GjkResult {
                collision: true,
                simplex,
                iterations,
                capped: false,
            };
        }

        let Some(point) = support(a, b, direction) else {
            return miss(simplex, iterations);
        };
        if point.dot(direction) <= 0.0 {
            return miss(simplex, iterations);
        }

        simplex.push(point);
        iterations += 1;

        if iterations > max_iterations {
            log::trace!("GJK hit iteration cap ({}), assuming overlap", max_iterations);
            return GjkResult {
                collision: true,
                simplex,
                iterations,
                capped: true,
            };
        }

        if evolve_simplex(&mut simplex, &mut direction) {
            return GjkResult {
                collision: true,
                simplex,
                iterations,
                capped: false,
            };
        }
    }
}

/// Reduce the simplex toward the origin; true once the origin is enclosed
fn evolve_simplex(simplex: &mut Simplex, direction: &mut Vector2) -> bool {
    match simplex.len() {
        2 => line_case(simplex, direction),
        3 => triangle_case(simplex, direction),
        _ => false,
    }
}

fn line_case(simplex: &mut Simplex, direction: &mut Vector2) -> bool {
    let (b, a) = (simplex.points[0], simplex.points[1]);
    let ab = b - a;
    let ao = -a;

    if ab.dot(ao) > 0.0 {
        let perp = perpendicular_toward(ab, ao);
        if perp == Vector2::ZERO {
            // Origin is collinear with the edge; inside the segment means contact
            if (a - b).dot(-b) >= 0.0 {
                return true;
            }
            simplex.set(&[b]);
            *direction = -b;
            return false;
        }
        *direction = perp;
    } else {
        simplex.set(&[a]);
        *direction = ao;
    }
    false
}

fn triangle_case(simplex: &mut Simplex, direction: &mut Vector2) -> bool {
    let (c, b, a) = (simplex.points[0], simplex.points[1], simplex.points[2]);
    let ab = b - a;
    let ac = c - a;
    let ao = -a;

    if ab.cross(ac) == 0.0 {
        // Flat triangle, keep the newest edge
        simplex.set(&[b, a]);
        return line_case(simplex, direction);
    }

    // Edge normals pointing away from the third vertex
    let ab_perp = perpendicular_toward(ab, -ac);
    let ac_perp = perpendicular_toward(ac, -ab);

    if ab_perp.dot(ao) > 0.0 {
        simplex.set(&[b, a]);
        *direction = ab_perp;
        false
    } else if ac_perp.dot(ao) > 0.0 {
        simplex.set(&[c, a]);
        *direction = ac_perp;
        false
    } else {
        true
    }
}
