//! Game balance and variant selection
//!
//! Every gameplay knob the simulation reads lives here. The different flavors
//! of the game (discrete lanes vs free steering, scoring by time, distance or
//! obstacles passed, one or two background layers, optional day/night cycle)
//! are just different `Tuning` values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::SPEED_LIMIT;

/// How the bike moves sideways
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MovementMode {
    /// Hop between three fixed lanes with a short tween
    #[default]
    Lanes,
    /// Continuous steering with velocity, plus jumping
    Free,
}

impl MovementMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementMode::Lanes => "Lanes",
            MovementMode::Free => "Free",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lanes" | "lane" => Some(MovementMode::Lanes),
            "free" | "free_roam" => Some(MovementMode::Free),
            _ => None,
        }
    }
}

/// Where continuous points come from (pass bonuses are separate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScoreMode {
    /// Flat increment every frame
    PerFrame,
    /// Proportional to distance travelled
    #[default]
    Distance,
    /// Only obstacles passed score
    ObstaclesOnly,
}

/// Background scrolling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BackgroundMode {
    /// Two full-screen images leapfrogging each other
    #[default]
    TwoLayer,
    /// One tiling texture with a wrapped offset
    Tile,
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub movement: MovementMode,
    pub score_mode: ScoreMode,
    pub background: BackgroundMode,

    // === Scoring ===
    /// Points per frame in `ScoreMode::PerFrame`
    pub per_frame_points: u64,
    /// Points per pixel travelled in `ScoreMode::Distance`
    pub points_per_unit: f32,
    /// Points credited for each obstacle that leaves the screen
    pub pass_bonus: u64,

    // === Speed / difficulty ===
    /// Starting scroll speed (pixels/second)
    pub base_speed: f32,
    /// Every this many points the difficulty level goes up (0 disables)
    pub ramp_every_points: u64,
    /// Speed added per difficulty level
    pub ramp_speed_step: f32,
    /// Speed cap (None = uncapped)
    pub max_speed: Option<f32>,

    // === Bike ===
    /// Horizontal speed while steering in free mode (pixels/second)
    pub steer_speed: f32,
    /// Upward launch speed of a jump in free mode
    pub jump_velocity: f32,
    /// Downward acceleration in free mode (pixels/second^2)
    pub gravity: f32,
    /// Duration of a lane change tween
    pub lane_change_ms: f64,
    /// Maximum lean angle (radians)
    pub max_tilt: f32,
    /// Per-frame tilt retention in free mode (0..1)
    pub tilt_smoothing: f32,

    // === Obstacles ===
    /// Spawn period at difficulty level 0
    pub spawn_interval_ms: f64,
    /// Period reduction per difficulty level (0 keeps the cadence fixed)
    pub spawn_interval_step_ms: f64,
    /// Spawn period floor
    pub min_spawn_interval_ms: f64,
    /// Obstacles fall at the current scroll speed instead of a fixed speed
    pub obstacle_speed_scaled: bool,
    /// Fall speed when not speed-scaled
    pub obstacle_fixed_speed: f32,
    /// How far past the bottom edge an obstacle travels before cleanup
    pub cleanup_margin: f32,
    /// Obstacles spawned at night carry a light
    pub obstacle_lights: bool,

    // === Day / night ===
    /// Toggle period (None disables the cycle)
    pub day_night_period_ms: Option<f64>,
    /// Opacity cross-fade duration for the background swap
    pub cross_fade_ms: f64,

    // === Guide text ===
    /// Delay before the controls hint starts fading
    pub guide_delay_ms: f64,
    /// Fade duration of the controls hint
    pub guide_fade_ms: f64,

    // === Feedback ===
    /// Vibration pulse on game over
    pub haptic_pulse_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            movement: MovementMode::Lanes,
            score_mode: ScoreMode::Distance,
            background: BackgroundMode::TwoLayer,

            per_frame_points: 1,
            points_per_unit: 0.05,
            pass_bonus: 2,

            base_speed: 200.0,
            ramp_every_points: 50,
            ramp_speed_step: 20.0,
            max_speed: Some(600.0),

            steer_speed: 200.0,
            jump_velocity: 350.0,
            gravity: 300.0,
            lane_change_ms: 150.0,
            max_tilt: 0.2,
            tilt_smoothing: 0.9,

            spawn_interval_ms: 1200.0,
            spawn_interval_step_ms: 0.0,
            min_spawn_interval_ms: 500.0,
            obstacle_speed_scaled: true,
            obstacle_fixed_speed: 200.0,
            cleanup_margin: 100.0,
            obstacle_lights: true,

            day_night_period_ms: Some(30_000.0),
            cross_fade_ms: 1000.0,

            guide_delay_ms: 3000.0,
            guide_fade_ms: 500.0,

            haptic_pulse_ms: 200,
        }
    }
}

/// Why a tuning sheet was rejected
#[derive(Debug)]
pub enum TuningError {
    /// Not valid JSON, or a field has the wrong type
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "tuning parse error: {}", e),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning field `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

impl Tuning {
    /// Three-lane variant with distance scoring and the day/night cycle
    pub fn lanes() -> Self {
        Self::default()
    }

    /// Free-steering variant: per-frame scoring, tiled road, 60 s day/night,
    /// obstacles fall at a fixed speed while spawns speed up
    pub fn free_roam() -> Self {
        Self {
            movement: MovementMode::Free,
            score_mode: ScoreMode::PerFrame,
            background: BackgroundMode::Tile,
            obstacle_speed_scaled: false,
            spawn_interval_step_ms: 100.0,
            max_speed: None,
            day_night_period_ms: Some(60_000.0),
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON sheet; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every value keeps the simulation well-defined
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.spawn_interval_ms > 0.0) {
            return invalid("spawn_interval_ms", "must be positive");
        }
        if !(self.min_spawn_interval_ms > 0.0) {
            return invalid("min_spawn_interval_ms", "must be positive");
        }
        if self.spawn_interval_step_ms < 0.0 {
            return invalid("spawn_interval_step_ms", "must not be negative");
        }
        if let Some(period) = self.day_night_period_ms {
            if !(period > 0.0) {
                return invalid("day_night_period_ms", "must be positive");
            }
        }
        if !(0.0..1.0).contains(&self.tilt_smoothing) {
            return invalid("tilt_smoothing", "must be in [0, 1)");
        }
        if !(0.0..=SPEED_LIMIT).contains(&self.base_speed) {
            return invalid("base_speed", "must be in [0, SPEED_LIMIT]");
        }
        if let Some(max) = self.max_speed {
            if !(self.base_speed..=SPEED_LIMIT).contains(&max) {
                return invalid("max_speed", "must be in [base_speed, SPEED_LIMIT]");
            }
        }
        let non_negative = [
            ("ramp_speed_step", self.ramp_speed_step),
            ("steer_speed", self.steer_speed),
            ("jump_velocity", self.jump_velocity),
            ("gravity", self.gravity),
            ("max_tilt", self.max_tilt),
            ("obstacle_fixed_speed", self.obstacle_fixed_speed),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(field, "must be finite and not negative");
            }
        }
        if self.obstacle_fixed_speed > SPEED_LIMIT {
            return invalid("obstacle_fixed_speed", "must not exceed SPEED_LIMIT");
        }
        if self.lane_change_ms < 0.0 || self.cross_fade_ms < 0.0 || self.guide_fade_ms < 0.0 {
            return invalid("durations", "must not be negative");
        }
        if self.cleanup_margin < 0.0 {
            return invalid("cleanup_margin", "must not be negative");
        }
        Ok(())
    }

    /// Difficulty level reached at `score`
    pub fn level_for_score(&self, score: u64) -> u32 {
        if self.ramp_every_points == 0 {
            0
        } else {
            (score / self.ramp_every_points).min(u32::MAX as u64) as u32
        }
    }

    /// Scroll speed at a difficulty level
    pub fn speed_for_level(&self, level: u32) -> f32 {
        let speed = self.base_speed + level as f32 * self.ramp_speed_step;
        match self.max_speed {
            Some(cap) => speed.min(cap),
            None => speed.min(SPEED_LIMIT),
        }
    }

    /// Spawn period at a difficulty level
    pub fn spawn_interval_for_level(&self, level: u32) -> f64 {
        (self.spawn_interval_ms - level as f64 * self.spawn_interval_step_ms)
            .max(self.min_spawn_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::lanes().validate().is_ok());
        assert!(Tuning::free_roam().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "movement": "Free", "pass_bonus": 5 }"#).unwrap();
        assert_eq!(tuning.movement, MovementMode::Free);
        assert_eq!(tuning.pass_bonus, 5);
        assert_eq!(tuning.spawn_interval_ms, 1200.0);
        assert_eq!(tuning.day_night_period_ms, Some(30_000.0));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Tuning::from_json(r#"{ "spawn_interval_ms": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "spawn_interval_ms",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "tilt_smoothing": 1.5 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "tilt_smoothing", .. }));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().starts_with("tuning parse error"));
    }

    #[test]
    fn test_speed_ramp_capped() {
        let tuning = Tuning::default();
        assert_eq!(tuning.level_for_score(0), 0);
        assert_eq!(tuning.level_for_score(49), 0);
        assert_eq!(tuning.level_for_score(50), 1);
        assert_eq!(tuning.speed_for_level(0), 200.0);
        assert_eq!(tuning.speed_for_level(1), 220.0);
        assert_eq!(tuning.speed_for_level(1000), 600.0);

        let uncapped = Tuning::free_roam();
        assert_eq!(uncapped.speed_for_level(1000), 200.0 + 1000.0 * 20.0);
        assert_eq!(uncapped.speed_for_level(u32::MAX), SPEED_LIMIT);
    }

    #[test]
    fn test_runaway_speed_rejected() {
        let err = Tuning::from_json(r#"{ "base_speed": 1e30, "max_speed": null }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "base_speed", .. }));

        let err = Tuning::from_json(r#"{ "max_speed": 1e30 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "max_speed", .. }));
    }

    #[test]
    fn test_negative_physics_rejected() {
        for field in ["gravity", "steer_speed", "jump_velocity", "max_tilt"] {
            let json = format!(r#"{{ "{}": -1.0 }}"#, field);
            match Tuning::from_json(&json) {
                Err(TuningError::Invalid { field: f, .. }) => assert_eq!(f, field),
                other => panic!("{} accepted: {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_spawn_interval_floor() {
        let tuning = Tuning::free_roam();
        assert_eq!(tuning.spawn_interval_for_level(0), 1200.0);
        assert_eq!(tuning.spawn_interval_for_level(3), 900.0);
        assert_eq!(tuning.spawn_interval_for_level(100), 500.0);
    }

    #[test]
    fn test_movement_mode_names() {
        assert_eq!(MovementMode::from_str("LANES"), Some(MovementMode::Lanes));
        assert_eq!(MovementMode::from_str("free"), Some(MovementMode::Free));
        assert_eq!(MovementMode::from_str("hover"), None);
        assert_eq!(MovementMode::Free.as_str(), "Free");
    }
}
