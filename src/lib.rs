//! Bike Sim - a lane-dodging 2D bike arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, obstacles, scoring, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Host collaborator contracts (audio, haptics, HUD, lighting)
//! - `tuning`: Data-driven game balance and variant selection
//! - `settings`: Player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Default viewport size
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Number of discrete lanes
    pub const LANE_COUNT: usize = 3;
    /// Lane the bike starts in
    pub const START_LANE: usize = 1;

    /// Distance from the bottom edge to the ground line the bike rides on
    pub const GROUND_MARGIN: f32 = 70.0;

    /// Bike hitbox
    pub const BIKE_WIDTH: f32 = 50.0;
    pub const BIKE_HEIGHT: f32 = 100.0;

    /// Obstacle hitbox
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const OBSTACLE_HEIGHT: f32 = 60.0;

    /// Hard ceiling on scroll speed (pixels/second), even when uncapped by tuning
    pub const SPEED_LIMIT: f32 = 50_000.0;

    /// Upper bound on a single frame delta (seconds); longer stalls are clamped
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// X coordinate of the center of `lane` for a viewport `width` wide
#[inline]
pub fn lane_x(lane: usize, width: f32) -> f32 {
    width * (2 * lane + 1) as f32 / (2 * consts::LANE_COUNT) as f32
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
