//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep supplied by the caller
//! - No randomness
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod bounds;
pub mod collision;
pub mod epa;
pub mod gjk;
pub mod integrator;
pub mod predict;
pub mod response;
pub mod shape;
pub mod step;
pub mod vector;
pub mod world;

pub use body::{BodyId, MotionClass, RigidBody, create_body};
pub use bounds::{Channel, WallHit, confine_to_channel};
pub use collision::{CollisionResult, circle_circle, circle_rect, reflect_velocity};
pub use epa::{Penetration, epa};
pub use gjk::{GjkResult, Simplex, gjk, support};
pub use integrator::{Advance, advance, mechanical_energy};
pub use predict::{Prediction, predict_position_at_x, predict_trajectory};
pub use response::{NumericGuards, resolve_circle_circle, resolve_circle_rect};
pub use shape::Shape;
pub use step::{Contact, ContactKind, StepReport, step};
pub use vector::{Vector2, VectorExt};
pub use world::World;
