//! Scene controller: setup, per-frame update, game over and restart
//!
//! Frame order: input is resolved before movement, movement before collision
//! consequences, and obstacles that leave the screen are swept in the same
//! frame they leave.

use glam::Vec2;

use super::collision::overlapping_obstacles;
use super::daynight::DayPhase;
use super::input::{InputIntent, InputQueue};
use super::spawner::{ObstacleSpawner, SpawnParams};
use super::state::{GameEvent, GamePhase, GameSession, Viewport};
use crate::consts::*;
use crate::lane_x;
use crate::tuning::{MovementMode, ScoreMode, Tuning};

/// Owns the running session and the balance sheet it is played with
#[derive(Debug, Clone)]
pub struct SceneController {
    tuning: Tuning,
    session: GameSession,
    /// Skip cosmetic cross-fades
    reduced_motion: bool,
}

impl SceneController {
    /// Set up a fresh session
    pub fn new(tuning: Tuning, viewport: Viewport, seed: u64) -> Self {
        let session = GameSession::new(&tuning, viewport, seed);
        log::info!(
            "Session initialized (seed {}, {} movement, {}x{})",
            seed,
            tuning.movement.as_str(),
            viewport.width,
            viewport.height
        );
        Self {
            tuning,
            session,
            reduced_motion: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
        self.reduced_motion = reduced_motion;
    }

    /// Hand pending events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session.take_events()
    }

    /// One host frame: fold queued input, fire due timers, then update.
    ///
    /// Timers see the full wall-clock delta; only movement is clamped.
    pub fn frame(&mut self, dt: f32, queue: &mut InputQueue) {
        let intent = queue.drain(self.session.viewport.width);
        let dt = dt.max(0.0);
        self.advance_clock(dt as f64 * 1000.0);
        self.update(dt.min(MAX_FRAME_DT), &intent);
    }

    /// Advance wall-clock timers: spawns, day/night, guide text.
    ///
    /// Nothing advances once the session has ended.
    pub fn advance_clock(&mut self, dt_ms: f64) {
        if self.session.is_game_over() {
            return;
        }
        let dt_ms = dt_ms.max(0.0);
        let fade_ms = if self.reduced_motion {
            0.0
        } else {
            self.tuning.cross_fade_ms
        };

        let session = &mut self.session;
        session.elapsed_ms += dt_ms;
        session.guide.advance(dt_ms);

        for phase in session.day_night.advance(dt_ms, fade_ms) {
            session.bike.texture = phase.bike_texture();
            session.push_event(GameEvent::DayNightChanged {
                night: phase == DayPhase::Night,
            });
        }

        let due = session.spawner.due(dt_ms);
        for _ in 0..due {
            self.spawn_one();
        }
    }

    /// Drop one obstacle using the current speed and lighting
    pub fn spawn_one(&mut self) {
        let tuning = &self.tuning;
        let session = &mut self.session;
        let params = SpawnParams {
            viewport: session.viewport,
            movement: tuning.movement,
            fall_speed: if tuning.obstacle_speed_scaled {
                session.speed
            } else {
                tuning.obstacle_fixed_speed
            },
            with_light: tuning.obstacle_lights && session.is_night(),
        };
        let id = session.spawner.spawn_one(&mut session.obstacles, params);
        if let Some(obstacle) = session.obstacles.last() {
            let event = GameEvent::ObstacleSpawned {
                id,
                kind: obstacle.kind,
                light: obstacle.light,
            };
            session.push_event(event);
        }
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Does nothing once the session has ended or for zero-length frames.
    pub fn update(&mut self, dt: f32, intent: &InputIntent) {
        if self.session.is_game_over() || dt <= 0.0 {
            return;
        }
        let dt = dt.min(MAX_FRAME_DT);
        let score_before = self.session.score;

        self.move_bike(dt, intent);

        let session = &mut self.session;
        for obstacle in &mut session.obstacles {
            obstacle.advance(dt);
        }
        session.background.advance(session.speed, dt);

        for id in overlapping_obstacles(&self.session.bike, &self.session.obstacles) {
            self.report_overlap(id);
        }
        if self.session.is_game_over() {
            return;
        }

        self.accumulate_score(dt);
        self.sweep();
        self.apply_difficulty();

        if self.session.score != score_before {
            let score = self.session.score;
            self.session.push_event(GameEvent::ScoreChanged { score });
        }
    }

    fn move_bike(&mut self, dt: f32, intent: &InputIntent) {
        let tuning = &self.tuning;
        let viewport = self.session.viewport;
        let bike = &mut self.session.bike;

        match tuning.movement {
            MovementMode::Free => {
                let axis = intent.steer.axis();
                bike.vel.x = axis * tuning.steer_speed;
                let half = BIKE_WIDTH / 2.0;
                let max_x = (viewport.width - half).max(half);
                bike.pos.x = (bike.pos.x + bike.vel.x * dt).clamp(half, max_x);
                bike.target_x = bike.pos.x;

                if intent.jump && bike.on_ground(&viewport) {
                    bike.vel.y = -tuning.jump_velocity;
                }
                bike.vel.y += tuning.gravity * dt;
                bike.pos.y += bike.vel.y * dt;

                let ground = viewport.ground_y();
                let ceiling = BIKE_HEIGHT / 2.0;
                if bike.pos.y >= ground {
                    bike.pos.y = ground;
                    bike.vel.y = 0.0;
                } else if bike.pos.y < ceiling {
                    bike.pos.y = ceiling;
                    bike.vel.y = 0.0;
                }

                let smoothing = tuning.tilt_smoothing;
                bike.tilt = bike.tilt * smoothing + axis * tuning.max_tilt * (1.0 - smoothing);
            }
            MovementMode::Lanes => {
                if let Some(shift) = intent.lane_shift {
                    if bike.request_lane_change(shift, &viewport, tuning.lane_change_ms) {
                        log::debug!("Lane change to {}", bike.lane);
                    }
                }
                bike.advance_lane_tween(dt as f64 * 1000.0, tuning.max_tilt);
            }
        }
    }

    fn accumulate_score(&mut self, dt: f32) {
        let tuning = &self.tuning;
        let session = &mut self.session;
        match tuning.score_mode {
            ScoreMode::PerFrame => {
                session.score = session.score.saturating_add(tuning.per_frame_points);
            }
            ScoreMode::Distance => {
                session.score_carry += session.speed * dt * tuning.points_per_unit;
                let whole = session.score_carry.floor();
                if whole >= 1.0 {
                    session.score = session.score.saturating_add(whole as u64);
                    session.score_carry -= whole;
                }
            }
            ScoreMode::ObstaclesOnly => {}
        }
    }

    /// Remove obstacles that have left the screen, crediting each one
    fn sweep(&mut self) {
        let session = &mut self.session;
        let gone = ObstacleSpawner::sweep_and_clean(
            &mut session.obstacles,
            &session.viewport,
            self.tuning.cleanup_margin,
        );
        for obstacle in gone {
            session.score = session.score.saturating_add(self.tuning.pass_bonus);
            log::debug!("Obstacle #{} passed (+{})", obstacle.id, self.tuning.pass_bonus);
            session.push_event(GameEvent::ObstacleRemoved {
                id: obstacle.id,
                light: obstacle.light,
                passed: true,
            });
        }
    }

    fn apply_difficulty(&mut self) {
        let tuning = &self.tuning;
        let session = &mut self.session;
        let level = tuning.level_for_score(session.score);
        if level <= session.level {
            return;
        }
        session.level = level;
        session.speed = tuning.speed_for_level(level);
        session
            .spawner
            .set_interval(tuning.spawn_interval_for_level(level));
        log::info!("Difficulty level {} (speed {:.0})", level, session.speed);
        let speed = session.speed;
        session.push_event(GameEvent::SpeedUp { level, speed });
    }

    /// The physics side saw the bike overlapping an obstacle.
    ///
    /// Ends a running session; repeated reports are ignored. Returns true if
    /// this report ended the session.
    pub fn report_overlap(&mut self, obstacle_id: u32) -> bool {
        let session = &mut self.session;
        if session.phase == GamePhase::Ended {
            return false;
        }
        if !session.obstacles.iter().any(|o| o.id == obstacle_id) {
            log::warn!("Overlap reported for unknown obstacle #{}", obstacle_id);
            return false;
        }

        session.phase = GamePhase::Ended;
        session.spawner.stop();
        session.bike.vel = Vec2::ZERO;
        let score = session.score;
        log::info!("Game over: hit obstacle #{} with score {}", obstacle_id, score);
        session.push_event(GameEvent::GameOver { score, obstacle_id });
        true
    }

    /// Throw the current session away and start a new one.
    ///
    /// Undelivered events survive, followed by a removal for every obstacle
    /// that was still on screen so hosts can release their lights.
    pub fn restart(&mut self, seed: u64) {
        let viewport = self.session.viewport;
        let old = std::mem::replace(
            &mut self.session,
            GameSession::new(&self.tuning, viewport, seed),
        );

        let mut events = old.events;
        events.extend(old.obstacles.into_iter().map(|o| GameEvent::ObstacleRemoved {
            id: o.id,
            light: o.light,
            passed: false,
        }));
        events.push(GameEvent::Restarted);
        self.session.events = events;
        log::info!("Session restarted (seed {}, previous score {})", seed, old.score);
    }

    /// The host viewport changed size
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        let session = &mut self.session;
        let old = session.viewport;
        if old == viewport {
            return;
        }
        session.viewport = viewport;
        session.background.relayout(viewport.height);

        let scale_x = viewport.width / old.width;
        let bike = &mut session.bike;
        match self.tuning.movement {
            MovementMode::Lanes => {
                bike.lane_tween = None;
                bike.tilt = 0.0;
                bike.pos.x = lane_x(bike.lane, viewport.width);
            }
            MovementMode::Free => {
                let half = BIKE_WIDTH / 2.0;
                bike.pos.x = (bike.pos.x * scale_x).clamp(half, (viewport.width - half).max(half));
            }
        }
        bike.target_x = bike.pos.x;
        bike.pos.y += viewport.ground_y() - old.ground_y();

        for obstacle in &mut session.obstacles {
            obstacle.pos.x = match obstacle.lane {
                Some(lane) => lane_x(lane, viewport.width),
                None => obstacle.pos.x * scale_x,
            };
        }
        log::info!("Viewport resized to {}x{}", viewport.width, viewport.height);
    }
}
