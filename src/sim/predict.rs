//! Forward trajectory prediction
//!
//! Answers "where will this ball be when it reaches x?" for an AI paddle.
//! Motion is straight in x; y bounces between the two channel walls exactly
//! like the live wall correction, but solved analytically per wall leg
//! instead of tick by tick. Read-only: the body is never touched.

use super::body::RigidBody;

/// A successful prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted y at the target x
    pub y: f64,
    /// Time until the target x is reached
    pub time: f64,
    /// Wall bounces on the way
    pub bounces: usize,
}

/// Predicted y when `body` reaches `target_x`, or `None` if unavailable
pub fn predict_position_at_x(
    target_x: f64,
    body: &RigidBody,
    channel_height: f64,
    max_bounces: usize,
) -> Option<f64> {
    predict_trajectory(target_x, body, channel_height, max_bounces).map(|p| p.y)
}

/// Full prediction including time-to-target and bounce count
///
/// Unavailable when the body is not moving toward `+x`, the target is behind
/// it, the channel is narrower than the body, a value turns NaN, or more than
/// `max_bounces` wall hits would be needed.
pub fn predict_trajectory(
    target_x: f64,
    body: &RigidBody,
    channel_height: f64,
    max_bounces: usize,
) -> Option<Prediction> {
    let vx = body.velocity.x;
    if !(vx > 0.0) {
        return None;
    }

    let time_to_x = (target_x - body.position.x) / vx;
    if !time_to_x.is_finite() || time_to_x < 0.0 {
        return None;
    }

    let radius = body.shape.vertical_extent();
    let min_y = radius;
    let max_y = channel_height - radius;
    if !(max_y >= min_y) || !body.position.y.is_finite() {
        return None;
    }

    let mut y = body.position.y.clamp(min_y, max_y);
    let mut vy = body.velocity.y;
    if vy.is_nan() {
        return None;
    }
    // No room to move vertically
    if vy == 0.0 || max_y == min_y {
        return Some(Prediction {
            y,
            time: time_to_x,
            bounces: 0,
        });
    }

    let mut t = 0.0;
    let mut bounces = 0;

    while t < time_to_x {
        let wall = if vy > 0.0 { max_y } else { min_y };
        let time_to_wall = (wall - y) / vy;

        if t + time_to_wall <= time_to_x {
            t += time_to_wall;
            y = wall;
            vy = -vy;
            bounces += 1;
            if bounces > max_bounces {
                log::trace!("Prediction gave up after {} bounces", max_bounces);
                return None;
            }
        } else {
            y += vy * (time_to_x - t);
            t = time_to_x;
        }

        if y.is_nan() {
            return None;
        }
    }

    Some(Prediction {
        y,
        time: time_to_x,
        bounces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PREDICT_MAX_BOUNCES;
    use crate::sim::vector::Vector2;

    fn ball(x: f64, y: f64, vx: f64, vy: f64) -> RigidBody {
        RigidBody::circle(Vector2::new(x, y), 10.0).with_velocity(Vector2::new(vx, vy))
    }

    #[test]
    fn test_straight_line() {
        let body = ball(0.0, 50.0, 1.0, 0.0);
        let y = predict_position_at_x(100.0, &body, 100.0, PREDICT_MAX_BOUNCES);
        assert!((y.unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_diagonal_without_wall() {
        let body = ball(0.0, 50.0, 1.0, 0.2);
        let y = predict_position_at_x(100.0, &body, 100.0, PREDICT_MAX_BOUNCES).unwrap();
        assert!((y - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounces_off_ceiling() {
        // Ceiling at 90: 5 units up, then 12 full legs of 80, then 35 down
        let body = ball(0.0, 85.0, 1.0, 5.0);
        let p = predict_trajectory(200.0, &body, 100.0, PREDICT_MAX_BOUNCES).unwrap();
        assert!(p.bounces >= 1);
        assert_eq!(p.bounces, 13);
        assert!((p.y - 55.0).abs() < 1e-9);
        assert!((10.0..=90.0).contains(&p.y));
        assert_eq!(p.time, 200.0);
    }

    #[test]
    fn test_moving_away_unavailable() {
        let body = ball(50.0, 50.0, -1.0, 0.0);
        assert!(predict_position_at_x(100.0, &body, 100.0, PREDICT_MAX_BOUNCES).is_none());
        let body = ball(50.0, 50.0, 0.0, 1.0);
        assert!(predict_position_at_x(100.0, &body, 100.0, PREDICT_MAX_BOUNCES).is_none());
    }

    #[test]
    fn test_target_behind_unavailable() {
        let body = ball(50.0, 50.0, 1.0, 0.0);
        assert!(predict_position_at_x(10.0, &body, 100.0, PREDICT_MAX_BOUNCES).is_none());
    }

    #[test]
    fn test_bounce_cap() {
        let body = ball(0.0, 50.0, 0.001, 10.0);
        assert!(predict_position_at_x(1000.0, &body, 100.0, 16).is_none());
    }

    #[test]
    fn test_channel_too_narrow() {
        let body = ball(0.0, 10.0, 1.0, 1.0);
        assert!(predict_position_at_x(100.0, &body, 15.0, PREDICT_MAX_BOUNCES).is_none());
    }

    #[test]
    fn test_channel_exactly_body_height() {
        let body = ball(0.0, 10.0, 1.0, 3.0);
        let p = predict_trajectory(100.0, &body, 20.0, PREDICT_MAX_BOUNCES).unwrap();
        assert_eq!(p.y, 10.0);
        assert_eq!(p.bounces, 0);
        assert_eq!(p.time, 100.0);
    }

    #[test]
    fn test_body_untouched() {
        let body = ball(0.0, 85.0, 1.0, 5.0);
        let snapshot = body.clone();
        predict_position_at_x(500.0, &body, 100.0, PREDICT_MAX_BOUNCES);
        assert_eq!(body.position, snapshot.position);
        assert_eq!(body.velocity, snapshot.velocity);
    }
}
