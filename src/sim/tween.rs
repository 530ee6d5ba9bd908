//! Bounded-duration eased tweens

use crate::lerp;

/// Easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    /// Quadratic ease-out (fast start, gentle landing)
    QuadOut,
    /// Sine ease-in-out
    SineInOut,
}

impl Ease {
    /// Map linear progress `t` in [0, 1] onto the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::SineInOut => 0.5 - 0.5 * (std::f32::consts::PI * t).cos(),
        }
    }
}

/// A value moving from `from` to `to` over a fixed duration
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    duration_ms: f64,
    elapsed_ms: f64,
    ease: Ease,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration_ms: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            ease,
        }
    }

    /// Advance the tween; returns true once it has reached its end
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.duration_ms);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Linear progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms) as f32
        }
    }

    /// Current eased value
    pub fn value(&self) -> f32 {
        lerp(self.from, self.to, self.ease.apply(self.progress()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_tween() {
        let mut tween = Tween::new(0.0, 100.0, 200.0, Ease::Linear);
        assert_eq!(tween.value(), 0.0);
        assert!(!tween.advance(100.0));
        assert!((tween.value() - 50.0).abs() < 1e-4);
        assert!(tween.advance(500.0));
        assert_eq!(tween.value(), 100.0);
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let tween = Tween::new(1.0, 0.0, 0.0, Ease::SineInOut);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 0.0);
    }

    #[test]
    fn test_ease_endpoints() {
        for ease in [Ease::Linear, Ease::QuadOut, Ease::SineInOut] {
            assert!(ease.apply(0.0).abs() < 1e-6);
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6);
        }
        assert!(Ease::QuadOut.apply(0.5) > 0.5);
    }
}
