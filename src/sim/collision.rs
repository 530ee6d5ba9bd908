//! Overlap detection between the bike and obstacles
//!
//! Everything collides as an axis-aligned box. Reporting is per pair per
//! frame; deciding what an overlap means is the controller's job.

use glam::Vec2;

use super::state::{Bike, Obstacle};

/// Axis-aligned bounding box given by center and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Strict overlap; boxes that only touch edges do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let delta = (self.center - other.center).abs();
        let reach = self.half + other.half;
        delta.x < reach.x && delta.y < reach.y
    }

    /// Shrink by a factor on each axis (forgiving hitboxes)
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            center: self.center,
            half: self.half * factor,
        }
    }
}

/// Fraction of the sprite box that counts as the bike's body
pub const BIKE_HITBOX_SCALE: f32 = 0.8;

/// IDs of every obstacle overlapping the bike, in collection order
pub fn overlapping_obstacles(bike: &Bike, obstacles: &[Obstacle]) -> Vec<u32> {
    let bike_box = bike.bounds().scaled(BIKE_HITBOX_SCALE);
    obstacles
        .iter()
        .filter(|o| bike_box.overlaps(&o.bounds()))
        .map(|o| o.id)
        .collect()
}
