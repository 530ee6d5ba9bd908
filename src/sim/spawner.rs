//! Obstacle spawning and off-screen cleanup

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{LightHandle, Obstacle, ObstacleKind, Viewport};
use super::timer::RepeatingTimer;
use crate::consts::*;
use crate::tuning::MovementMode;

/// Per-spawn parameters decided by the controller
#[derive(Debug, Clone, Copy)]
pub struct SpawnParams {
    pub viewport: Viewport,
    pub movement: MovementMode,
    /// Downward speed given to the new obstacle
    pub fall_speed: f32,
    /// Attach a light to the new obstacle
    pub with_light: bool,
}

/// Drops obstacles on a wall-clock cadence
#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    timer: RepeatingTimer,
    rng: Pcg32,
    next_id: u32,
    next_light: u32,
    spawned: u64,
}

impl ObstacleSpawner {
    /// Spawner whose first obstacle drops on the first clock advance
    pub fn new(seed: u64, interval_ms: f64) -> Self {
        Self {
            timer: RepeatingTimer::immediate(interval_ms),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            next_light: 1,
            spawned: 0,
        }
    }

    /// Advance the spawn timer; returns how many obstacles are due
    pub fn due(&mut self, dt_ms: f64) -> u32 {
        self.timer.advance(dt_ms)
    }

    pub fn set_interval(&mut self, interval_ms: f64) {
        if (self.timer.period_ms() - interval_ms).abs() > f64::EPSILON {
            log::debug!("Spawn interval {} -> {} ms", self.timer.period_ms(), interval_ms);
            self.timer.set_period(interval_ms);
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.timer.period_ms()
    }

    /// Cancel future spawns
    pub fn stop(&mut self) {
        self.timer.stop();
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_active()
    }

    /// Total obstacles created by this spawner
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Create one obstacle just above the top edge and add it to `obstacles`
    pub fn spawn_one(&mut self, obstacles: &mut Vec<Obstacle>, params: SpawnParams) -> u32 {
        let viewport = params.viewport;
        let (x, lane) = match params.movement {
            MovementMode::Lanes => {
                let lane = self.rng.random_range(0..LANE_COUNT);
                (viewport.lanes()[lane], Some(lane))
            }
            MovementMode::Free => {
                let half = OBSTACLE_WIDTH / 2.0;
                let max = (viewport.width - half).max(half);
                let x = if max > half {
                    self.rng.random_range(half..=max)
                } else {
                    half
                };
                (x, None)
            }
        };
        let kind = if self.rng.random_bool(0.5) {
            ObstacleKind::Car
        } else {
            ObstacleKind::Hurdle
        };
        let light = params.with_light.then(|| {
            let handle = LightHandle(self.next_light);
            self.next_light += 1;
            handle
        });

        let id = self.next_id;
        self.next_id += 1;
        self.spawned += 1;

        obstacles.push(Obstacle {
            id,
            kind,
            pos: Vec2::new(x, -OBSTACLE_HEIGHT / 2.0),
            fall_speed: params.fall_speed,
            lane,
            light,
        });
        log::debug!("Spawned {:?} #{} at x={:.0}", kind, id, x);
        id
    }

    /// Remove every obstacle that has travelled `margin` past the bottom edge.
    ///
    /// Removed obstacles are returned in their original order; each one
    /// leaves the active set exactly once.
    pub fn sweep_and_clean(
        obstacles: &mut Vec<Obstacle>,
        viewport: &Viewport,
        margin: f32,
    ) -> Vec<Obstacle> {
        if !obstacles.iter().any(|o| o.is_past(viewport, margin)) {
            return Vec::new();
        }
        let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(obstacles)
            .into_iter()
            .partition(|o| o.is_past(viewport, margin));
        *obstacles = kept;
        gone
    }
}
