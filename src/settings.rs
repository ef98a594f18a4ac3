//! Physics tunables
//!
//! The surrounding game layer sets these before calling `step`. Stored as
//! JSON so a host can ship them alongside its own configuration.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::PhysicsError;

/// Process-wide tunables consumed (never computed) by the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Constant acceleration added to dynamic bodies every step
    pub gravity: DVec2,
    /// Dynamic body speed limit (units/ms)
    pub max_speed: f64,

    // === Detection ===
    /// GJK iteration cap
    pub gjk_max_iterations: usize,
    /// Circle-rectangle tangency margin
    pub contact_epsilon: f64,

    // === Response ===
    /// Positional push applied to each circle after an elastic response
    pub separation_nudge: f64,

    // === EPA (opt-in) ===
    /// Run EPA on GJK contacts to extract a penetration normal
    pub use_epa: bool,
    pub epa_tolerance: f64,
    pub epa_max_iterations: usize,

    // === Prediction ===
    pub predict_max_bounces: usize,

    /// Height the potential energy term is measured from (y grows downward)
    pub energy_reference_height: f64,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: DVec2::ZERO,
            max_speed: MAX_SPEED,

            gjk_max_iterations: GJK_MAX_ITERATIONS,
            contact_epsilon: CONTACT_EPSILON,

            separation_nudge: SEPARATION_NUDGE,

            use_epa: false,
            epa_tolerance: EPA_TOLERANCE,
            epa_max_iterations: EPA_MAX_ITERATIONS,

            predict_max_bounces: PREDICT_MAX_BOUNCES,

            energy_reference_height: 0.0,
        }
    }
}

impl PhysicsSettings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, PhysicsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        log::debug!("Loaded physics settings: {:?}", settings);
        Ok(settings)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, PhysicsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings that would break the integrator or detector
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidSettings(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if !(self.max_speed > 0.0 && self.max_speed.is_finite()) {
            return Err(PhysicsError::InvalidSettings(format!(
                "max_speed must be positive, got {}",
                self.max_speed
            )));
        }
        if self.gjk_max_iterations == 0 {
            return Err(PhysicsError::InvalidSettings(
                "gjk_max_iterations must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("contact_epsilon", self.contact_epsilon),
            ("separation_nudge", self.separation_nudge),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(PhysicsError::InvalidSettings(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        if !(self.epa_tolerance > 0.0 && self.epa_tolerance.is_finite()) {
            return Err(PhysicsError::InvalidSettings(format!(
                "epa_tolerance must be positive, got {}",
                self.epa_tolerance
            )));
        }
        Ok(())
    }
}
