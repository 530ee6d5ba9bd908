//! Game session and core simulation types
//!
//! Everything that belongs to one play-through lives in `GameSession`.
//! Restarting never edits a session back into shape; it builds a new one.

use glam::Vec2;

use super::background::ScrollBackground;
use super::collision::Aabb;
use super::daynight::DayNightCycle;
use super::input::LaneShift;
use super::spawner::ObstacleSpawner;
use super::timer::OneShotTimer;
use super::tween::{Ease, Tween};
use crate::consts::*;
use crate::lane_x;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Bike hit an obstacle; only a restart leaves this state
    Ended,
}

/// Visible play area in pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Lane center x positions, left to right
    pub fn lanes(&self) -> [f32; LANE_COUNT] {
        std::array::from_fn(|i| lane_x(i, self.width))
    }

    /// Bike center y when resting on the ground line
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_MARGIN - BIKE_HEIGHT / 2.0
    }
}

/// Day or night art for a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureVariant {
    #[default]
    Day,
    Night,
}

/// Lane change in flight
#[derive(Debug, Clone, PartialEq)]
pub struct LaneTween {
    pub tween: Tween,
    pub direction: LaneShift,
}

/// The player's bike
#[derive(Debug, Clone, PartialEq)]
pub struct Bike {
    /// Center position
    pub pos: Vec2,
    /// Velocity (free movement only; lane changes are tweened)
    pub vel: Vec2,
    /// Current lane (lane movement)
    pub lane: usize,
    /// Where the bike is heading horizontally
    pub target_x: f32,
    /// Lean angle in radians (positive leans right)
    pub tilt: f32,
    pub texture: TextureVariant,
    /// Active lane change; new lane requests are ignored while set
    pub lane_tween: Option<LaneTween>,
}

impl Bike {
    /// Bike in the middle lane, resting on the ground line
    pub fn new(viewport: &Viewport) -> Self {
        let x = lane_x(START_LANE, viewport.width);
        Self {
            pos: Vec2::new(x, viewport.ground_y()),
            vel: Vec2::ZERO,
            lane: START_LANE,
            target_x: x,
            tilt: 0.0,
            texture: TextureVariant::Day,
            lane_tween: None,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(BIKE_WIDTH, BIKE_HEIGHT))
    }

    pub fn on_ground(&self, viewport: &Viewport) -> bool {
        self.pos.y >= viewport.ground_y() - 0.01
    }

    pub fn is_changing_lane(&self) -> bool {
        self.lane_tween.is_some()
    }

    /// Request a move to the neighboring lane.
    ///
    /// Ignored while a lane change is in flight or when it would leave the
    /// road. Returns true if a lane change started.
    pub fn request_lane_change(
        &mut self,
        shift: LaneShift,
        viewport: &Viewport,
        duration_ms: f64,
    ) -> bool {
        if self.lane_tween.is_some() {
            return false;
        }
        let Some(lane) = self.lane.checked_add_signed(shift.delta()) else {
            return false;
        };
        if lane >= LANE_COUNT {
            return false;
        }

        self.lane = lane;
        self.target_x = lane_x(lane, viewport.width);
        self.lane_tween = Some(LaneTween {
            tween: Tween::new(self.pos.x, self.target_x, duration_ms, Ease::QuadOut),
            direction: shift,
        });
        true
    }

    /// Advance an in-flight lane change; lean while moving, snap upright on arrival
    pub fn advance_lane_tween(&mut self, dt_ms: f64, max_tilt: f32) {
        let Some(lane_tween) = &mut self.lane_tween else {
            self.tilt = 0.0;
            return;
        };
        let finished = lane_tween.tween.advance(dt_ms);
        self.pos.x = lane_tween.tween.value();
        if finished {
            self.pos.x = self.target_x;
            self.tilt = 0.0;
            self.lane_tween = None;
        } else {
            self.tilt = lane_tween.direction.delta() as f32 * max_tilt;
        }
    }
}

/// Obstacle art
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Car,
    Hurdle,
}

/// Opaque handle to a light owned by the host's lighting system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightHandle(pub u32);

/// A falling obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Center position
    pub pos: Vec2,
    /// Downward speed (pixels/second)
    pub fall_speed: f32,
    /// Lane it was dropped into (lane movement only)
    pub lane: Option<usize>,
    /// Headlight attached while it is night
    pub light: Option<LightHandle>,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT))
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos.y += self.fall_speed * dt;
    }

    /// Top edge has gone more than `margin` past the bottom of the viewport
    pub fn is_past(&self, viewport: &Viewport, margin: f32) -> bool {
        self.pos.y - OBSTACLE_HEIGHT / 2.0 > viewport.height + margin
    }
}

/// Controls hint shown at the start of a session
#[derive(Debug, Clone, PartialEq)]
pub struct GuideText {
    delay: OneShotTimer,
    fade: Option<Tween>,
    fade_ms: f64,
}

impl GuideText {
    pub fn new(delay_ms: f64, fade_ms: f64) -> Self {
        Self {
            delay: OneShotTimer::new(delay_ms),
            fade: None,
            fade_ms,
        }
    }

    pub fn advance(&mut self, dt_ms: f64) {
        if let Some(fade) = &mut self.fade {
            fade.advance(dt_ms);
        } else if self.delay.advance(dt_ms) {
            self.fade = Some(Tween::new(1.0, 0.0, self.fade_ms, Ease::Linear));
        }
    }

    /// Opacity of the hint (1 = fully visible)
    pub fn alpha(&self) -> f32 {
        self.fade.as_ref().map(Tween::value).unwrap_or(1.0)
    }
}

/// Something the host should react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ObstacleSpawned {
        id: u32,
        kind: ObstacleKind,
        light: Option<LightHandle>,
    },
    /// Obstacle destroyed; its light (if any) must be released
    ObstacleRemoved {
        id: u32,
        light: Option<LightHandle>,
        /// Left the screen (as opposed to being discarded by a restart)
        passed: bool,
    },
    ScoreChanged {
        score: u64,
    },
    SpeedUp {
        level: u32,
        speed: f32,
    },
    DayNightChanged {
        night: bool,
    },
    GameOver {
        score: u64,
        obstacle_id: u32,
    },
    Restarted,
}

/// One play-through
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Seed for reproducibility
    pub seed: u64,
    pub viewport: Viewport,
    pub phase: GamePhase,
    /// Score (never decreases while running)
    pub score: u64,
    /// Fractional distance points not yet credited
    pub score_carry: f32,
    /// Difficulty level reached
    pub level: u32,
    /// Scroll speed (pixels/second)
    pub speed: f32,
    /// Wall-clock time the session has been running
    pub elapsed_ms: f64,
    pub bike: Bike,
    /// Active obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    pub spawner: ObstacleSpawner,
    pub background: ScrollBackground,
    pub day_night: DayNightCycle,
    pub guide: GuideText,
    /// Events not yet drained by the host
    pub(crate) events: Vec<GameEvent>,
}

impl GameSession {
    /// Fresh session in its initial state
    pub fn new(tuning: &Tuning, viewport: Viewport, seed: u64) -> Self {
        Self {
            seed,
            viewport,
            phase: GamePhase::Running,
            score: 0,
            score_carry: 0.0,
            level: 0,
            speed: tuning.base_speed,
            elapsed_ms: 0.0,
            bike: Bike::new(&viewport),
            obstacles: Vec::new(),
            spawner: ObstacleSpawner::new(seed, tuning.spawn_interval_ms),
            background: ScrollBackground::new(tuning.background, viewport.height),
            day_night: DayNightCycle::new(tuning.day_night_period_ms),
            guide: GuideText::new(tuning.guide_delay_ms, tuning.guide_fade_ms),
            events: Vec::new(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::Ended
    }

    pub fn is_night(&self) -> bool {
        self.day_night.is_night()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_initial_state() {
        let tuning = Tuning::default();
        let session = GameSession::new(&tuning, Viewport::default(), 42);
        assert_eq!(session.score, 0);
        assert!(!session.is_game_over());
        assert!(!session.is_night());
        assert_eq!(session.speed, tuning.base_speed);
        assert!(session.obstacles.is_empty());
        assert_eq!(session.bike.lane, START_LANE);
        assert_eq!(session.bike.pos.x, VIEWPORT_WIDTH / 2.0);
        assert!(session.bike.on_ground(&session.viewport));
    }

    #[test]
    fn test_lane_change_bounds() {
        let viewport = Viewport::default();
        let mut bike = Bike::new(&viewport);

        assert!(bike.request_lane_change(LaneShift::Left, &viewport, 0.0));
        bike.advance_lane_tween(0.0, 0.2);
        assert_eq!(bike.lane, 0);
        assert_eq!(bike.pos.x, viewport.lanes()[0]);

        // Already at the left edge
        assert!(!bike.request_lane_change(LaneShift::Left, &viewport, 0.0));
        assert_eq!(bike.lane, 0);
        assert_eq!(bike.target_x, viewport.lanes()[0]);
    }

    #[test]
    fn test_lane_change_locked_while_in_flight() {
        let viewport = Viewport::default();
        let mut bike = Bike::new(&viewport);

        assert!(bike.request_lane_change(LaneShift::Right, &viewport, 150.0));
        assert!(!bike.request_lane_change(LaneShift::Left, &viewport, 150.0));
        assert_eq!(bike.lane, 2);
        assert_eq!(bike.target_x, viewport.lanes()[2]);

        bike.advance_lane_tween(75.0, 0.2);
        assert!(bike.tilt > 0.0);
        assert!(bike.pos.x > viewport.lanes()[1] && bike.pos.x < viewport.lanes()[2]);

        bike.advance_lane_tween(75.0, 0.2);
        assert_eq!(bike.pos.x, viewport.lanes()[2]);
        assert_eq!(bike.tilt, 0.0);
        assert!(!bike.is_changing_lane());
    }

    #[test]
    fn test_obstacle_past_margin() {
        let viewport = Viewport::default();
        let mut obstacle = Obstacle {
            id: 1,
            kind: ObstacleKind::Car,
            pos: Vec2::new(100.0, viewport.height + 100.0 + OBSTACLE_HEIGHT / 2.0),
            fall_speed: 200.0,
            lane: None,
            light: None,
        };
        assert!(!obstacle.is_past(&viewport, 100.0));
        obstacle.advance(0.01);
        assert!(obstacle.is_past(&viewport, 100.0));
    }

    #[test]
    fn test_guide_text_fades_after_delay() {
        let mut guide = GuideText::new(3000.0, 500.0);
        guide.advance(2999.0);
        assert_eq!(guide.alpha(), 1.0);
        guide.advance(1.0);
        assert_eq!(guide.alpha(), 1.0);
        guide.advance(250.0);
        assert!((guide.alpha() - 0.5).abs() < 1e-4);
        guide.advance(1000.0);
        assert_eq!(guide.alpha(), 0.0);
    }
}
