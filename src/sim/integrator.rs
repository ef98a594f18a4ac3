//! Explicit Euler integration with a speed limit
//!
//! Advances one body by `dt` milliseconds. Border bodies never integrate: they
//! only re-sync their geometry after the caller repositions them.

use super::body::{MotionClass, RigidBody};
use super::vector::VectorExt;
use crate::error::PhysicsError;
use crate::settings::PhysicsSettings;

/// What a call to [`advance`] did to the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Position moved forward by `velocity * dt`
    Moved,
    /// Border body re-synced to its externally set position
    Resynced,
    /// New position was NaN; the body was left untouched
    SkippedNonFinite,
}

/// Reject NaN and non-positive timesteps
#[inline]
pub fn check_timestep(dt: f64) -> Result<(), PhysicsError> {
    if dt.is_nan() || dt <= 0.0 {
        return Err(PhysicsError::InvalidTimestep(dt));
    }
    Ok(())
}

/// Advance a body's kinematics by `dt`
pub fn advance(
    body: &mut RigidBody,
    dt: f64,
    settings: &PhysicsSettings,
) -> Result<Advance, PhysicsError> {
    if body.motion == MotionClass::Border {
        // Frozen update is allowed for borders
        if dt.is_nan() || dt < 0.0 {
            return Err(PhysicsError::InvalidTimestep(dt));
        }
        resync_border(body, settings);
        return Ok(Advance::Resynced);
    }

    check_timestep(dt)?;

    let mut velocity = body.velocity;
    let mut acceleration = body.acceleration;

    if body.motion == MotionClass::Dynamic {
        acceleration += settings.gravity;
        velocity += acceleration * dt;

        let speed = velocity.length();
        if speed > settings.max_speed {
            velocity = velocity / speed * settings.max_speed;
        }
    }

    let new_position = body.position + velocity * dt;
    if new_position.has_nan() {
        log::debug!(
            "Body {:?}: NaN position after integration, skipping step",
            body.id
        );
        return Ok(Advance::SkippedNonFinite);
    }

    body.acceleration = acceleration;
    body.velocity = velocity;
    body.vertices = body.shape.world_vertices(new_position);
    body.center = body.shape.centroid(new_position);
    body.previous_position = body.position;
    body.position = new_position;
    body.mechanical_energy = mechanical_energy(body, settings);

    Ok(Advance::Moved)
}

/// Shift a border's outline to wherever the caller placed it
fn resync_border(body: &mut RigidBody, settings: &PhysicsSettings) {
    let displacement = body.position - body.previous_position;
    if displacement != glam::DVec2::ZERO {
        log::trace!("Border {:?} moved by {}", body.id, displacement);
    }
    body.sync_geometry();
    body.previous_position = body.position;
    body.mechanical_energy = mechanical_energy(body, settings);
}

/// ½·m·|v|² + m·|g|·(reference height − y)
pub fn mechanical_energy(body: &RigidBody, settings: &PhysicsSettings) -> f64 {
    let g = settings.gravity.length();
    let potential = if g == 0.0 {
        0.0
    } else {
        body.mass * g * (settings.energy_reference_height - body.position.y)
    };
    body.kinetic_energy() + potential
}
