//! One simulation step
//!
//! integrate every body → clamp to the channel walls → test every unordered
//! pair → resolve each hit in detection order.

use super::body::{BodyId, RigidBody};
use super::bounds::{WallHit, confine_to_channel};
use super::collision::{circle_circle, circle_rect};
use super::epa::{Penetration, epa};
use super::gjk::gjk;
use super::integrator::{Advance, advance, check_timestep, mechanical_energy};
use super::response::{
    NumericGuards, apply_elastic_impulse, reflect_off, resolve_circle_circle,
    resolve_circle_rect, separate,
};
use super::shape::Shape;
use super::vector::{Vector2, VectorExt};
use super::world::World;
use crate::error::PhysicsError;
use crate::settings::PhysicsSettings;

/// Which narrow-phase path produced a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    CircleCircle,
    /// `a` is the circle, `b` the rectangle
    CircleRect,
    /// General convex pair found by GJK
    Convex,
}

/// A detected contact and what the responder did with it
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
    pub kind: ContactKind,
    /// Points from `a` toward `b` (circle-rect: from the rectangle toward the circle)
    pub normal: Vector2,
    /// Present only when EPA ran and converged
    pub penetration: Option<Penetration>,
    /// Whether a velocity change was applied
    pub resolved: bool,
}

/// Everything that happened during one step
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Contacts in resolution order
    pub contacts: Vec<Contact>,
    pub wall_hits: Vec<(BodyId, WallHit)>,
    /// Guard trips during this step only
    pub guards: NumericGuards,
    /// Sum of mechanical energy after the step
    pub total_energy: f64,
}

/// Narrow-phase hit between bodies at indices `a` and `b`
struct Detection {
    a: usize,
    b: usize,
    kind: ContactKind,
    normal: Vector2,
    penetration: Option<Penetration>,
}

/// Advance the world by `dt` milliseconds
///
/// An invalid `dt` (NaN or `<= 0`) is rejected before anything is mutated.
pub fn step(world: &mut World, dt: f64) -> Result<StepReport, PhysicsError> {
    if let Err(err) = check_timestep(dt) {
        log::warn!("Rejected step: {}", err);
        return Err(err);
    }

    let mut report = StepReport::default();
    let settings = &world.settings;
    let bodies = &mut world.bodies;

    for body in bodies.iter_mut() {
        if advance(body, dt, settings)? == Advance::SkippedNonFinite {
            report.guards.skipped_positions += 1;
        }
    }

    if let Some(channel) = world.channel {
        for body in bodies.iter_mut() {
            if let Some(hit) = confine_to_channel(body, channel) {
                report.wall_hits.push((body.id, hit));
            }
        }
    }

    let detections = detect_all(bodies, settings, &mut report.guards);

    for detection in detections {
        let resolved = respond(bodies, &detection, settings, &mut report.guards);
        let contact = Contact {
            a: bodies[detection.a].id,
            b: bodies[detection.b].id,
            kind: detection.kind,
            normal: detection.normal,
            penetration: detection.penetration,
            resolved,
        };
        log::trace!("Contact {:?}", contact);
        report.contacts.push(contact);
    }

    // Responses changed velocities; keep the energy diagnostic current
    for body in bodies.iter_mut() {
        body.mechanical_energy = mechanical_energy(body, settings);
    }

    report.total_energy = world.total_energy();
    world.guards.merge(&report.guards);
    world.time_ticks += 1;
    Ok(report)
}

/// Exhaustive broad phase over unordered pairs
///
/// Pairs where neither body is dynamic (anchor/border against anchor/border)
/// are never tested.
fn detect_all(
    bodies: &[RigidBody],
    settings: &PhysicsSettings,
    guards: &mut NumericGuards,
) -> Vec<Detection> {
    let mut detections = Vec::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            if !bodies[i].motion.is_dynamic() && !bodies[j].motion.is_dynamic() {
                continue;
            }
            if let Some(detection) = detect_pair(bodies, i, j, settings, guards) {
                detections.push(detection);
            }
        }
    }
    detections
}

/// Narrow phase for one pair, dispatched on the shape combination
fn detect_pair(
    bodies: &[RigidBody],
    i: usize,
    j: usize,
    settings: &PhysicsSettings,
    guards: &mut NumericGuards,
) -> Option<Detection> {
    let (a, b) = (&bodies[i], &bodies[j]);

    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            let result = circle_circle(a.position, ra, b.position, rb);
            result.hit.then_some(Detection {
                a: i,
                b: j,
                kind: ContactKind::CircleCircle,
                normal: result.normal,
                penetration: None,
            })
        }
        (Shape::Circle { radius }, Shape::Rectangle { width, height }) => {
            circle_rect_detection(i, j, a.position, radius, b.position, width, height, settings)
        }
        (Shape::Rectangle { width, height }, Shape::Circle { radius }) => {
            circle_rect_detection(j, i, b.position, radius, a.position, width, height, settings)
        }
        _ => convex_detection(bodies, i, j, settings, guards),
    }
}

#[allow(clippy::too_many_arguments)]
fn circle_rect_detection(
    circle: usize,
    rect: usize,
    circle_center: Vector2,
    radius: f64,
    rect_center: Vector2,
    width: f64,
    height: f64,
    settings: &PhysicsSettings,
) -> Option<Detection> {
    let result = circle_rect(
        circle_center,
        radius,
        rect_center,
        width,
        height,
        settings.contact_epsilon,
    );
    result.hit.then_some(Detection {
        a: circle,
        b: rect,
        kind: ContactKind::CircleRect,
        normal: result.normal,
        penetration: None,
    })
}

fn convex_detection(
    bodies: &[RigidBody],
    i: usize,
    j: usize,
    settings: &PhysicsSettings,
    guards: &mut NumericGuards,
) -> Option<Detection> {
    let hull_a = bodies[i].hull();
    let hull_b = bodies[j].hull();

    let result = gjk(&hull_a, &hull_b, settings.gjk_max_iterations);
    if !result.collision {
        return None;
    }

    let penetration = if settings.use_epa {
        epa(
            &result.simplex,
            &hull_a,
            &hull_b,
            settings.epa_tolerance,
            settings.epa_max_iterations,
        )
    } else {
        None
    };

    let normal = match penetration {
        Some(p) => p.normal,
        None => (bodies[j].center - bodies[i].center)
            .checked_normalize()
            .unwrap_or_else(|_| {
                guards.degenerate_normals += 1;
                Vector2::ZERO
            }),
    };

    Some(Detection {
        a: i,
        b: j,
        kind: ContactKind::Convex,
        normal,
        penetration,
    })
}

fn respond(
    bodies: &mut [RigidBody],
    detection: &Detection,
    settings: &PhysicsSettings,
    guards: &mut NumericGuards,
) -> bool {
    let (a, b) = pair_mut(bodies, detection.a, detection.b);

    match detection.kind {
        ContactKind::CircleCircle => {
            if a.motion.is_dynamic() && b.motion.is_dynamic() {
                resolve_circle_circle(a, b, settings.separation_nudge, guards)
            } else {
                respond_against_fixed(a, b, detection.normal, None, settings, guards)
            }
        }
        ContactKind::CircleRect => {
            if a.motion.is_dynamic() {
                resolve_circle_rect(a, b, detection.normal, guards)
            } else {
                false
            }
        }
        ContactKind::Convex => {
            if detection.normal == Vector2::ZERO {
                return false;
            }
            let depth = detection.penetration.map(|p| p.depth);
            if a.motion.is_dynamic() && b.motion.is_dynamic() {
                let resolved = apply_elastic_impulse(a, b, detection.normal, guards);
                if resolved {
                    let push = depth.map_or(settings.separation_nudge, |d| d / 2.0);
                    separate(a, -detection.normal, push);
                    separate(b, detection.normal, push);
                }
                resolved
            } else {
                respond_against_fixed(a, b, detection.normal, depth, settings, guards)
            }
        }
    }
}

/// One side is an anchor/border: bounce the dynamic side off it
fn respond_against_fixed(
    a: &mut RigidBody,
    b: &mut RigidBody,
    normal: Vector2,
    depth: Option<f64>,
    settings: &PhysicsSettings,
    guards: &mut NumericGuards,
) -> bool {
    if normal == Vector2::ZERO {
        guards.degenerate_normals += 1;
        return false;
    }
    // `normal` points from a to b; the moving body is pushed away from the fixed one
    let (moving, away) = if b.motion.is_dynamic() {
        (b, normal)
    } else {
        (a, -normal)
    };

    let resolved = reflect_off(moving, away);
    if resolved {
        separate(moving, away, depth.unwrap_or(settings.separation_nudge));
    }
    resolved
}

/// Two distinct mutable bodies out of one slice
fn pair_mut(bodies: &mut [RigidBody], i: usize, j: usize) -> (&mut RigidBody, &mut RigidBody) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = bodies.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = bodies.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

impl World {
    /// Convenience for [`step`]
    pub fn step(&mut self, dt: f64) -> Result<StepReport, PhysicsError> {
        step(self, dt)
    }
}
