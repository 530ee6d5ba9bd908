//! Endless vertical road scroll

use crate::tuning::BackgroundMode;

/// Scrolling road background.
///
/// Offsets are layer center y positions in screen space (y down).
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollBackground {
    /// Two full-height images; the one that scrolls off the bottom jumps
    /// back above the other so they always sit exactly one screen apart
    TwoLayer { a: f32, b: f32, height: f32 },
    /// A single tiling texture scrolled by a wrapped offset
    Tile { offset: f32, height: f32 },
}

impl ScrollBackground {
    pub fn new(mode: BackgroundMode, height: f32) -> Self {
        match mode {
            BackgroundMode::TwoLayer => ScrollBackground::TwoLayer {
                a: height / 2.0,
                b: -height / 2.0,
                height,
            },
            BackgroundMode::Tile => ScrollBackground::Tile {
                offset: 0.0,
                height,
            },
        }
    }

    /// Scroll by `speed * dt` pixels
    pub fn advance(&mut self, speed: f32, dt: f32) {
        let delta = (speed * dt).max(0.0);
        if !delta.is_finite() {
            return;
        }
        match self {
            ScrollBackground::TwoLayer { a, b, height } => {
                let h = *height;
                if h <= 0.0 {
                    return;
                }
                let a_leads = *a >= *b;
                let lead = a.max(*b) + delta;
                if lead < 1.5 * h {
                    *a += delta;
                    *b += delta;
                    return;
                }
                // Every wrap sends the leading image behind the other one,
                // so an odd number of wraps swaps which image leads
                let over = lead - 0.5 * h;
                let wraps = (over / h).floor();
                let rem = over.rem_euclid(h);
                let new_lead = 0.5 * h + if rem < h { rem } else { 0.0 };
                let new_trail = new_lead - h;
                if a_leads == (wraps % 2.0 == 0.0) {
                    *a = new_lead;
                    *b = new_trail;
                } else {
                    *a = new_trail;
                    *b = new_lead;
                }
            }
            ScrollBackground::Tile { offset, height } => {
                if *height > 0.0 {
                    *offset = (*offset + delta).rem_euclid(*height);
                }
            }
        }
    }

    /// Adapt to a new viewport height, keeping scroll progress
    pub fn relayout(&mut self, new_height: f32) {
        match self {
            ScrollBackground::TwoLayer { a, b, height } => {
                let ratio = if *height > 0.0 { new_height / *height } else { 1.0 };
                *a *= ratio;
                *b *= ratio;
                *height = new_height;
            }
            ScrollBackground::Tile { offset, height } => {
                let ratio = if *height > 0.0 { new_height / *height } else { 1.0 };
                *offset = (*offset * ratio).rem_euclid(new_height.max(1.0));
                *height = new_height;
            }
        }
    }

    /// Center y of every image to draw; tiles need two copies to cover the seam
    pub fn layer_centers(&self) -> [f32; 2] {
        match *self {
            ScrollBackground::TwoLayer { a, b, .. } => [a, b],
            ScrollBackground::Tile { offset, height } => {
                [offset + height / 2.0, offset - height / 2.0]
            }
        }
    }

    pub fn height(&self) -> f32 {
        match *self {
            ScrollBackground::TwoLayer { height, .. } | ScrollBackground::Tile { height, .. } => {
                height
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_layer_wraps() {
        let mut bg = ScrollBackground::new(BackgroundMode::TwoLayer, 600.0);
        bg.advance(600.0, 1.0);
        let [a, b] = bg.layer_centers();
        assert!((a - (-300.0)).abs() < 1e-3, "a = {}", a);
        assert!((b - 300.0).abs() < 1e-3, "b = {}", b);
    }

    #[test]
    fn test_tile_wraps_modulo_height() {
        let mut bg = ScrollBackground::new(BackgroundMode::Tile, 600.0);
        bg.advance(200.0, 2.0);
        assert!(matches!(bg, ScrollBackground::Tile { offset, .. } if (offset - 400.0).abs() < 1e-3));
        bg.advance(200.0, 1.0);
        assert!(matches!(bg, ScrollBackground::Tile { offset, .. } if offset.abs() < 1e-3));
    }

    #[test]
    fn test_relayout_keeps_spacing() {
        let mut bg = ScrollBackground::new(BackgroundMode::TwoLayer, 600.0);
        bg.advance(100.0, 1.0);
        bg.relayout(900.0);
        let [a, b] = bg.layer_centers();
        assert!(((a - b).abs() - 900.0).abs() < 1e-2);
        assert_eq!(bg.height(), 900.0);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut bg = ScrollBackground::new(BackgroundMode::TwoLayer, 600.0);
        let before = bg.clone();
        bg.advance(300.0, 0.0);
        assert_eq!(bg, before);
    }

    #[test]
    fn test_huge_scroll_wraps_in_one_step() {
        let h = 600.0;
        let mut bg = ScrollBackground::new(BackgroundMode::TwoLayer, h);
        bg.advance(1e30, 0.016);
        let [a, b] = bg.layer_centers();
        assert!(a.is_finite() && b.is_finite());
        assert!(((a - b).abs() - h).abs() < 1e-3);
        assert!(a.max(b) < 1.5 * h && a.max(b) >= 0.5 * h);
    }

    #[test]
    fn test_many_screens_keep_layer_identity() {
        // 3.5 screens: three wraps, so the images end up swapped
        let mut bg = ScrollBackground::new(BackgroundMode::TwoLayer, 600.0);
        bg.advance(2100.0, 1.0);
        let [a, b] = bg.layer_centers();
        assert!((a - 0.0).abs() < 1e-3, "a = {}", a);
        assert!((b - 600.0).abs() < 1e-3, "b = {}", b);
    }

    #[test]
    fn test_infinite_speed_is_ignored() {
        let mut bg = ScrollBackground::new(BackgroundMode::TwoLayer, 600.0);
        let before = bg.clone();
        bg.advance(f32::INFINITY, 0.016);
        assert_eq!(bg, before);
    }

    proptest! {
        #[test]
        fn prop_layers_stay_one_screen_apart(
            steps in prop::collection::vec((0.0f32..900.0, 0.0f32..0.1), 1..200),
        ) {
            let h = 600.0;
            let mut bg = ScrollBackground::new(BackgroundMode::TwoLayer, h);
            for (speed, dt) in steps {
                bg.advance(speed, dt);
                let [a, b] = bg.layer_centers();
                prop_assert!(((a - b).abs() - h).abs() < 0.05);
                // Together the two images always cover the screen
                let top = a.min(b) - h / 2.0;
                let bottom = a.max(b) + h / 2.0;
                prop_assert!(top <= 0.05 && bottom >= h - 0.05);
            }
        }
    }
}
