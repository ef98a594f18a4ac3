//! Errors surfaced by the simulation core
//!
//! Numeric guards (NaN positions, NaN velocities after an impulse) are not
//! errors: they are recovered locally and counted in
//! [`crate::sim::NumericGuards`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Normalize of a zero-length (or non-finite) vector
    #[error("cannot normalize a degenerate vector ({x}, {y})")]
    DegenerateVector { x: f64, y: f64 },

    /// Non-positive or NaN timestep handed to the integrator or step driver
    #[error("invalid timestep: {0}")]
    InvalidTimestep(f64),

    /// Settings that would make the simulation meaningless
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings JSON could not be parsed or written
    #[error("settings serialization failed: {0}")]
    Config(#[from] serde_json::Error),
}
