//! Day/night cycle
//!
//! Two states toggled by a repeating timer. The cross-fade is cosmetic and
//! never delays the logical switch.

use super::state::TextureVariant;
use super::timer::RepeatingTimer;
use super::tween::{Ease, Tween};

/// Ambient light preset during the day
pub const DAY_AMBIENT: [f32; 3] = [1.0, 1.0, 1.0];
/// Ambient light preset at night
pub const NIGHT_AMBIENT: [f32; 3] = [0.35, 0.35, 0.5];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayPhase {
    #[default]
    Day,
    Night,
}

impl DayPhase {
    pub fn toggled(self) -> Self {
        match self {
            DayPhase::Day => DayPhase::Night,
            DayPhase::Night => DayPhase::Day,
        }
    }

    pub fn background_key(self) -> &'static str {
        match self {
            DayPhase::Day => "background_day",
            DayPhase::Night => "background_night",
        }
    }

    pub fn bike_key(self) -> &'static str {
        match self {
            DayPhase::Day => "bike_day",
            DayPhase::Night => "bike_night",
        }
    }

    pub fn bike_texture(self) -> TextureVariant {
        match self {
            DayPhase::Day => TextureVariant::Day,
            DayPhase::Night => TextureVariant::Night,
        }
    }

    pub fn ambient(self) -> [f32; 3] {
        match self {
            DayPhase::Day => DAY_AMBIENT,
            DayPhase::Night => NIGHT_AMBIENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayNightCycle {
    phase: DayPhase,
    /// None when the cycle is disabled
    timer: Option<RepeatingTimer>,
    /// Opacity of the incoming background (0 -> 1)
    fade: Option<Tween>,
}

impl DayNightCycle {
    pub fn new(period_ms: Option<f64>) -> Self {
        Self {
            phase: DayPhase::Day,
            timer: period_ms.map(RepeatingTimer::new),
            fade: None,
        }
    }

    pub fn phase(&self) -> DayPhase {
        self.phase
    }

    pub fn is_night(&self) -> bool {
        self.phase == DayPhase::Night
    }

    /// Advance timer and fade; returns the phases entered, in order
    pub fn advance(&mut self, dt_ms: f64, cross_fade_ms: f64) -> Vec<DayPhase> {
        if let Some(fade) = &mut self.fade {
            if fade.advance(dt_ms) {
                self.fade = None;
            }
        }

        let fired = self.timer.as_mut().map(|t| t.advance(dt_ms)).unwrap_or(0);
        (0..fired).map(|_| self.toggle(cross_fade_ms)).collect()
    }

    /// Switch phase immediately; a positive `cross_fade_ms` eases the new
    /// background in over that long
    pub fn toggle(&mut self, cross_fade_ms: f64) -> DayPhase {
        self.phase = self.phase.toggled();
        self.fade = (cross_fade_ms > 0.0)
            .then(|| Tween::new(0.0, 1.0, cross_fade_ms, Ease::SineInOut));
        log::info!("Day/night switched to {:?}", self.phase);
        self.phase
    }

    /// Opacity of the current phase's background over the previous one
    pub fn fade_alpha(&self) -> f32 {
        self.fade.as_ref().map(Tween::value).unwrap_or(1.0)
    }

    /// Ambient light, blended across the cross-fade
    pub fn ambient(&self) -> [f32; 3] {
        let Some(fade) = &self.fade else {
            return self.phase.ambient();
        };
        let t = fade.value();
        let from = self.phase.toggled().ambient();
        let to = self.phase.ambient();
        std::array::from_fn(|i| crate::lerp(from[i], to[i], t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles_on_period() {
        let mut cycle = DayNightCycle::new(Some(30_000.0));
        assert!(!cycle.is_night());

        assert!(cycle.advance(29_999.0, 0.0).is_empty());
        assert!(!cycle.is_night());

        assert_eq!(cycle.advance(1.0, 0.0), vec![DayPhase::Night]);
        assert!(cycle.is_night());

        assert!(cycle.advance(29_999.0, 0.0).is_empty());
        assert_eq!(cycle.advance(1.0, 0.0), vec![DayPhase::Day]);
        assert!(!cycle.is_night());
    }

    #[test]
    fn test_disabled_cycle_never_toggles() {
        let mut cycle = DayNightCycle::new(None);
        assert!(cycle.advance(1_000_000.0, 0.0).is_empty());
        assert_eq!(cycle.phase(), DayPhase::Day);
    }

    #[test]
    fn test_cross_fade_blends_ambient() {
        let mut cycle = DayNightCycle::new(Some(10_000.0));
        cycle.advance(10_000.0, 1000.0);
        assert!(cycle.is_night());
        // Fade just started: still lit like day
        assert_eq!(cycle.fade_alpha(), 0.0);
        assert_eq!(cycle.ambient(), DAY_AMBIENT);

        cycle.advance(500.0, 1000.0);
        assert!((cycle.fade_alpha() - 0.5).abs() < 1e-4);

        cycle.advance(500.0, 1000.0);
        assert_eq!(cycle.fade_alpha(), 1.0);
        assert_eq!(cycle.ambient(), NIGHT_AMBIENT);
    }

    #[test]
    fn test_texture_keys() {
        assert_eq!(DayPhase::Day.background_key(), "background_day");
        assert_eq!(DayPhase::Night.bike_key(), "bike_night");
        assert_eq!(DayPhase::Night.bike_texture(), TextureVariant::Night);
    }
}
