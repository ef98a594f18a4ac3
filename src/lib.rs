//! Paddle Physics - a minimal real-time 2D rigid-body core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, integration, contacts, prediction)
//! - `settings`: Data-driven physics tunables
//! - `error`: Error taxonomy surfaced to callers
//!
//! Drawing, input, scoring and audio belong to the caller. The caller owns a
//! [`sim::World`], advances it with [`sim::step`] once per tick and reads the
//! mutated bodies back.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::PhysicsError;
pub use settings::PhysicsSettings;

/// Default tunables (units are pixels and milliseconds)
pub mod consts {
    /// Fixed simulation timestep (120 Hz), in milliseconds
    pub const SIM_DT_MS: f64 = 1000.0 / 120.0;

    /// Speed limit applied to dynamic bodies (units/ms)
    pub const MAX_SPEED: f64 = 0.5;

    /// GJK iteration cap; exceeding it reports a collision
    pub const GJK_MAX_ITERATIONS: usize = 6;

    /// Margin used by the circle-rectangle test to avoid flapping at tangency
    pub const CONTACT_EPSILON: f64 = 1e-4;

    /// Distance each circle is pushed apart after an elastic response
    pub const SEPARATION_NUDGE: f64 = 0.1;

    /// EPA convergence tolerance
    pub const EPA_TOLERANCE: f64 = 1e-4;
    /// EPA expansion cap
    pub const EPA_MAX_ITERATIONS: usize = 32;

    /// Wall bounces the predictor will follow before giving up
    pub const PREDICT_MAX_BOUNCES: usize = 1024;

    /// Sides used when a circle has to be fed to GJK as a polygon
    pub const CIRCLE_HULL_SIDES: usize = 32;
}
