//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only arrives as host-supplied deltas
//! - Seeded RNG only
//! - Stable iteration order (obstacles kept oldest first)
//! - No rendering or platform dependencies

pub mod background;
pub mod collision;
pub mod daynight;
pub mod input;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;
pub mod tween;

pub use background::ScrollBackground;
pub use collision::{Aabb, overlapping_obstacles};
pub use daynight::{DAY_AMBIENT, DayNightCycle, DayPhase, NIGHT_AMBIENT};
pub use input::{InputEvent, InputIntent, InputQueue, LaneShift, Steer};
pub use spawner::{ObstacleSpawner, SpawnParams};
pub use state::{
    Bike, GameEvent, GamePhase, GameSession, GuideText, LightHandle, Obstacle, ObstacleKind,
    TextureVariant, Viewport,
};
pub use tick::SceneController;
pub use timer::{OneShotTimer, RepeatingTimer};
pub use tween::{Ease, Tween};
