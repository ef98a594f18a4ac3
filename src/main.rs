//! Paddle Physics headless demo
//!
//! Plays an AI-vs-AI rally at the fixed tick rate and prints a JSON summary.
//!
//! Usage: `paddle-physics [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use serde::Serialize;

    use paddle_physics::consts::SIM_DT_MS;
    use paddle_physics::sim::{
        BodyId, MotionClass, RigidBody, Vector2, World, predict_position_at_x,
    };
    use paddle_physics::{PhysicsError, PhysicsSettings};

    pub const FIELD_WIDTH: f64 = 800.0;
    pub const FIELD_HEIGHT: f64 = 600.0;
    const PADDLE_WIDTH: f64 = 12.0;
    const PADDLE_HEIGHT: f64 = 90.0;
    const PADDLE_INSET: f64 = 30.0;
    /// Paddle speed limit (units/ms)
    const PADDLE_SPEED: f64 = 0.35;
    const BALL_RADIUS: f64 = 8.0;
    /// Serve speed as a fraction of the speed limit
    const SERVE_SCALE: f64 = 0.75;
    /// One minute of play
    pub const DEMO_TICKS: u64 = 120 * 60;

    #[derive(Debug, Default, Serialize)]
    pub struct Summary {
        pub seed: u64,
        pub ticks: u64,
        pub left_score: u32,
        pub right_score: u32,
        pub paddle_hits: u32,
        pub wall_hits: u32,
        pub predictions_missed: u32,
        pub final_energy: f64,
        pub guard_trips: u32,
    }

    pub struct Rally {
        world: World,
        rng: Pcg32,
        left: BodyId,
        right: BodyId,
        ball: BodyId,
        serve_left: bool,
        pub summary: Summary,
    }

    impl Rally {
        pub fn new(settings: PhysicsSettings, seed: u64) -> Self {
            let mut world = World::new(settings).with_channel(FIELD_HEIGHT);
            let paddle = |x: f64, side: &str| {
                RigidBody::rectangle(
                    Vector2::new(x, FIELD_HEIGHT / 2.0),
                    PADDLE_WIDTH,
                    PADDLE_HEIGHT,
                )
                .with_motion(MotionClass::Anchor)
                .with_style(serde_json::json!({ "side": side }))
            };
            let left = world.insert(paddle(PADDLE_INSET, "left"));
            let right = world.insert(paddle(FIELD_WIDTH - PADDLE_INSET, "right"));

            let mut rally = Self {
                world,
                rng: Pcg32::seed_from_u64(seed),
                left,
                right,
                ball: BodyId(0),
                serve_left: false,
                summary: Summary {
                    seed,
                    ..Default::default()
                },
            };
            rally.ball = rally.serve();
            rally
        }

        /// Put a fresh ball in the middle, heading toward whoever lost the last point
        fn serve(&mut self) -> BodyId {
            let angle = self.rng.random_range(-0.6..0.6_f64);
            let sign = if self.serve_left { -1.0 } else { 1.0 };
            let speed = self.world.settings.max_speed * SERVE_SCALE;
            let velocity = Vector2::new(sign * angle.cos(), angle.sin()) * speed;

            let ball = RigidBody::circle(
                Vector2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0),
                BALL_RADIUS,
            )
            .with_velocity(velocity);
            let id = self.world.insert(ball);
            log::debug!("Serve {:?} with velocity {}", id, velocity);
            id
        }

        pub fn run(&mut self, ticks: u64) -> Result<(), PhysicsError> {
            for _ in 0..ticks {
                self.drive_paddles();

                let report = self.world.step(SIM_DT_MS)?;
                self.summary.wall_hits += report
                    .wall_hits
                    .iter()
                    .filter(|(id, _)| *id == self.ball)
                    .count() as u32;
                for contact in report.contacts.iter().filter(|c| c.resolved) {
                    log::trace!("Paddle contact {:?} <-> {:?}", contact.a, contact.b);
                    self.summary.paddle_hits += 1;
                }

                self.check_score();
            }

            self.summary.ticks = self.world.time_ticks;
            self.summary.final_energy = self.world.total_energy();
            self.summary.guard_trips = self.world.guards.total();
            Ok(())
        }

        /// Steer each paddle toward where the ball will cross its face
        fn drive_paddles(&mut self) {
            let Some(ball) = self.world.get(self.ball).cloned() else {
                return;
            };
            let max_bounces = self.world.settings.predict_max_bounces;

            // The predictor only looks toward +x; mirror the ball for the left side
            let mut mirrored = ball.clone();
            mirrored.position.x = FIELD_WIDTH - ball.position.x;
            mirrored.velocity.x = -ball.velocity.x;

            let face = FIELD_WIDTH - PADDLE_INSET - PADDLE_WIDTH / 2.0 - BALL_RADIUS;
            let targets = [
                (self.left, predict_position_at_x(face, &mirrored, FIELD_HEIGHT, max_bounces)),
                (self.right, predict_position_at_x(face, &ball, FIELD_HEIGHT, max_bounces)),
            ];

            for (id, target) in targets {
                let Some(paddle) = self.world.get_mut(id) else {
                    continue;
                };
                // Drift back to center while the ball is heading away
                let target_y = target.unwrap_or(FIELD_HEIGHT / 2.0);
                let dy = (target_y - paddle.position.y) / SIM_DT_MS;
                paddle.velocity = Vector2::new(0.0, dy.clamp(-PADDLE_SPEED, PADDLE_SPEED));
            }

            if ball.velocity.x != 0.0
                && predict_position_at_x(face, &ball, FIELD_HEIGHT, max_bounces).is_none()
                && predict_position_at_x(face, &mirrored, FIELD_HEIGHT, max_bounces).is_none()
            {
                self.summary.predictions_missed += 1;
            }
        }

        fn check_score(&mut self) {
            let Some(x) = self.world.get(self.ball).map(|b| b.position.x) else {
                return;
            };
            if (0.0..=FIELD_WIDTH).contains(&x) {
                return;
            }

            if x < 0.0 {
                self.summary.right_score += 1;
                self.serve_left = true;
            } else {
                self.summary.left_score += 1;
                self.serve_left = false;
            }
            log::info!(
                "Point! {} - {}",
                self.summary.left_score,
                self.summary.right_score
            );

            self.world.remove(self.ball);
            self.ball = self.serve();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Paddle Physics (native) starting...");

    let mut args = std::env::args().skip(1);

    let settings = match args.next() {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| {
                    paddle_physics::PhysicsSettings::from_json(&json).map_err(|e| e.to_string())
                });
            match loaded {
                Ok(settings) => settings,
                Err(e) => {
                    log::error!("Failed to load settings from {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => paddle_physics::PhysicsSettings::default(),
    };

    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let mut rally = demo::Rally::new(settings, seed);
    if let Err(e) = rally.run(demo::DEMO_TICKS) {
        log::error!("Simulation failed: {}", e);
        std::process::exit(1);
    }

    match serde_json::to_string_pretty(&rally.summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to write summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the product on wasm; there is no standalone entry point
}
