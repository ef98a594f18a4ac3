//! Channel walls
//!
//! The playfield is a horizontal channel: walls at `y = 0` and `y = height`.
//! Anything that pokes through is clamped back inside with its vertical
//! velocity flipped.

use serde::{Deserialize, Serialize};

use super::body::{MotionClass, RigidBody};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub height: f64,
}

/// Which wall a body was pushed off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallHit {
    Top,
    Bottom,
}

/// Clamp a body inside the channel, reflecting its vertical velocity
///
/// Border bodies are left alone. Returns which wall was hit, if any.
pub fn confine_to_channel(body: &mut RigidBody, channel: Channel) -> Option<WallHit> {
    if body.motion == MotionClass::Border {
        return None;
    }

    let extent = body.shape.vertical_extent();
    let floor = channel.height - extent;

    let hit = if body.position.y > floor {
        body.position.y = floor;
        body.velocity.y = -body.velocity.y;
        WallHit::Bottom
    } else if body.position.y < extent {
        body.position.y = extent;
        body.velocity.y = -body.velocity.y;
        WallHit::Top
    } else {
        return None;
    };

    body.sync_geometry();
    Some(hit)
}
