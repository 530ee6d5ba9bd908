//! Platform abstraction layer
//!
//! The simulation only emits `GameEvent`s. Everything it needs from the
//! outside world (music, vibration, the score label, lighting, texture swaps)
//! goes through `SceneHost`. Every method defaults to doing nothing, so a
//! host that lacks a capability simply does not override it.

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::collections::HashSet;

use crate::settings::Settings;
use crate::sim::{DayPhase, GameEvent, LightHandle};

/// Sounds the game can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKey {
    /// Looping engine/music track while riding
    Music,
    /// One-shot crash on game over
    Crash,
    /// Short chime when the speed goes up
    SpeedUp,
}

impl SoundKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundKey::Music => "music",
            SoundKey::Crash => "crash",
            SoundKey::SpeedUp => "speed_up",
        }
    }
}

/// Host-side collaborators, all best-effort
pub trait SceneHost {
    /// Start a looping sound
    fn start_loop(&mut self, _key: SoundKey) {}

    /// Stop a looping sound
    fn stop_loop(&mut self, _key: SoundKey) {}

    /// Fire a one-shot sound
    fn play_once(&mut self, _key: SoundKey) {}

    /// Vibrate for `ms`; returns false when the device cannot
    fn vibrate(&mut self, _ms: u32) -> bool {
        false
    }

    /// Show the current score
    fn set_score_label(&mut self, _score: u64) {}

    /// Show or hide the restart action
    fn show_restart(&mut self, _visible: bool) {}

    /// Set the ambient light color (linear RGB, 0..1)
    fn set_ambient_light(&mut self, _rgb: [f32; 3]) {}

    /// Swap background and bike textures
    fn set_textures(&mut self, _background: &'static str, _bike: &'static str) {}

    /// An obstacle with a light entered the scene
    fn attach_light(&mut self, _light: LightHandle) {}

    /// The obstacle carrying `light` is gone
    fn release_light(&mut self, _light: LightHandle) {}
}

/// Lighting state the host keeps for the renderer: ambient color plus the
/// obstacle lights that are currently alive
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    ambient: [f32; 3],
    lights: HashSet<LightHandle>,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: DayPhase::Day.ambient(),
            lights: HashSet::new(),
        }
    }
}

impl LightRig {
    pub fn ambient(&self) -> [f32; 3] {
        self.ambient
    }

    /// Is this light still attached?
    pub fn is_lit(&self, light: LightHandle) -> bool {
        self.lights.contains(&light)
    }
}

impl SceneHost for LightRig {
    fn set_ambient_light(&mut self, rgb: [f32; 3]) {
        self.ambient = rgb;
    }

    fn attach_light(&mut self, light: LightHandle) {
        self.lights.insert(light);
        log::debug!("Light {} attached ({} live)", light.0, self.lights.len());
    }

    fn release_light(&mut self, light: LightHandle) {
        if !self.lights.remove(&light) {
            log::warn!("Released unknown light {}", light.0);
        }
    }
}

/// Apply a batch of simulation events to the host
pub fn dispatch_events<H: SceneHost + ?Sized>(
    host: &mut H,
    events: &[GameEvent],
    settings: &Settings,
    haptic_pulse_ms: u32,
) {
    for event in events {
        match *event {
            GameEvent::ObstacleSpawned { light, .. } => {
                if let Some(light) = light {
                    host.attach_light(light);
                }
            }
            GameEvent::ObstacleRemoved { light, .. } => {
                if let Some(light) = light {
                    host.release_light(light);
                }
            }
            GameEvent::ScoreChanged { score } => host.set_score_label(score),
            GameEvent::SpeedUp { .. } => host.play_once(SoundKey::SpeedUp),
            GameEvent::DayNightChanged { night } => {
                let phase = if night { DayPhase::Night } else { DayPhase::Day };
                host.set_textures(phase.background_key(), phase.bike_key());
                host.set_ambient_light(phase.ambient());
            }
            GameEvent::GameOver { score, .. } => {
                host.stop_loop(SoundKey::Music);
                host.play_once(SoundKey::Crash);
                if settings.haptics && !host.vibrate(haptic_pulse_ms) {
                    log::debug!("Vibration unavailable, skipped");
                }
                host.set_score_label(score);
                host.show_restart(true);
            }
            GameEvent::Restarted => {
                host.show_restart(false);
                host.set_score_label(0);
                let phase = DayPhase::Day;
                host.set_textures(phase.background_key(), phase.bike_key());
                host.set_ambient_light(phase.ambient());
                host.start_loop(SoundKey::Music);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ObstacleKind;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Start(SoundKey),
        Stop(SoundKey),
        Play(SoundKey),
        Vibrate(u32),
        Score(u64),
        Restart(bool),
        Ambient([f32; 3]),
        Textures(&'static str, &'static str),
        Attach(LightHandle),
        Release(LightHandle),
    }

    #[derive(Default)]
    struct RecordingHost {
        calls: Vec<Call>,
        can_vibrate: bool,
    }

    impl SceneHost for RecordingHost {
        fn start_loop(&mut self, key: SoundKey) {
            self.calls.push(Call::Start(key));
        }
        fn stop_loop(&mut self, key: SoundKey) {
            self.calls.push(Call::Stop(key));
        }
        fn play_once(&mut self, key: SoundKey) {
            self.calls.push(Call::Play(key));
        }
        fn vibrate(&mut self, ms: u32) -> bool {
            self.calls.push(Call::Vibrate(ms));
            self.can_vibrate
        }
        fn set_score_label(&mut self, score: u64) {
            self.calls.push(Call::Score(score));
        }
        fn show_restart(&mut self, visible: bool) {
            self.calls.push(Call::Restart(visible));
        }
        fn set_ambient_light(&mut self, rgb: [f32; 3]) {
            self.calls.push(Call::Ambient(rgb));
        }
        fn set_textures(&mut self, background: &'static str, bike: &'static str) {
            self.calls.push(Call::Textures(background, bike));
        }
        fn attach_light(&mut self, light: LightHandle) {
            self.calls.push(Call::Attach(light));
        }
        fn release_light(&mut self, light: LightHandle) {
            self.calls.push(Call::Release(light));
        }
    }

    /// Host that supports nothing at all
    struct BareHost;
    impl SceneHost for BareHost {}

    #[test]
    fn test_game_over_feedback() {
        let mut host = RecordingHost::default();
        let events = [GameEvent::GameOver {
            score: 42,
            obstacle_id: 3,
        }];
        dispatch_events(&mut host, &events, &Settings::default(), 200);
        assert_eq!(
            host.calls,
            vec![
                Call::Stop(SoundKey::Music),
                Call::Play(SoundKey::Crash),
                Call::Vibrate(200),
                Call::Score(42),
                Call::Restart(true),
            ]
        );
    }

    #[test]
    fn test_haptics_setting_respected() {
        let mut host = RecordingHost::default();
        let settings = Settings {
            haptics: false,
            ..Settings::default()
        };
        let events = [GameEvent::GameOver {
            score: 1,
            obstacle_id: 1,
        }];
        dispatch_events(&mut host, &events, &settings, 200);
        assert!(!host.calls.iter().any(|c| matches!(c, Call::Vibrate(_))));
    }

    #[test]
    fn test_music_key_is_symmetric() {
        let mut host = RecordingHost::default();
        let events = [
            GameEvent::GameOver {
                score: 0,
                obstacle_id: 1,
            },
            GameEvent::Restarted,
        ];
        dispatch_events(&mut host, &events, &Settings::default(), 100);
        let stopped: Vec<_> = host
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Stop(k) => Some(*k),
                _ => None,
            })
            .collect();
        let started: Vec<_> = host
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Start(k) => Some(*k),
                _ => None,
            })
            .collect();
        assert_eq!(stopped, started);
        assert_eq!(host.calls.last(), Some(&Call::Start(SoundKey::Music)));
    }

    #[test]
    fn test_lights_follow_obstacles() {
        let mut host = RecordingHost::default();
        let events = [
            GameEvent::ObstacleSpawned {
                id: 1,
                kind: ObstacleKind::Car,
                light: Some(LightHandle(7)),
            },
            GameEvent::ObstacleSpawned {
                id: 2,
                kind: ObstacleKind::Hurdle,
                light: None,
            },
            GameEvent::ObstacleRemoved {
                id: 1,
                light: Some(LightHandle(7)),
                passed: true,
            },
        ];
        dispatch_events(&mut host, &events, &Settings::default(), 100);
        assert_eq!(
            host.calls,
            vec![Call::Attach(LightHandle(7)), Call::Release(LightHandle(7))]
        );
    }

    #[test]
    fn test_night_swaps_textures_and_light() {
        let mut host = RecordingHost::default();
        dispatch_events(
            &mut host,
            &[GameEvent::DayNightChanged { night: true }],
            &Settings::default(),
            100,
        );
        assert_eq!(
            host.calls,
            vec![
                Call::Textures("background_night", "bike_night"),
                Call::Ambient(crate::sim::NIGHT_AMBIENT),
            ]
        );
    }

    #[test]
    fn test_missing_capabilities_are_harmless() {
        let events = [
            GameEvent::ScoreChanged { score: 5 },
            GameEvent::SpeedUp {
                level: 1,
                speed: 220.0,
            },
            GameEvent::GameOver {
                score: 5,
                obstacle_id: 1,
            },
            GameEvent::Restarted,
        ];
        dispatch_events(&mut BareHost, &events, &Settings::default(), 200);
    }

    #[test]
    fn test_light_rig_tracks_live_lights() {
        let mut rig = LightRig::default();
        let events = [
            GameEvent::ObstacleSpawned {
                id: 1,
                kind: ObstacleKind::Car,
                light: Some(LightHandle(1)),
            },
            GameEvent::ObstacleSpawned {
                id: 2,
                kind: ObstacleKind::Car,
                light: Some(LightHandle(2)),
            },
            GameEvent::ObstacleRemoved {
                id: 1,
                light: Some(LightHandle(1)),
                passed: true,
            },
        ];
        dispatch_events(&mut rig, &events, &Settings::default(), 100);
        assert!(!rig.is_lit(LightHandle(1)));
        assert!(rig.is_lit(LightHandle(2)));
        assert_eq!(rig.lights.len(), 1);

        // Releasing twice is harmless
        rig.release_light(LightHandle(1));
        assert_eq!(rig.lights.len(), 1);
    }

    #[test]
    fn test_light_rig_follows_day_night() {
        let mut rig = LightRig::default();
        assert_eq!(rig.ambient(), crate::sim::DAY_AMBIENT);
        dispatch_events(
            &mut rig,
            &[GameEvent::DayNightChanged { night: true }],
            &Settings::default(),
            100,
        );
        assert_eq!(rig.ambient(), crate::sim::NIGHT_AMBIENT);
        dispatch_events(&mut rig, &[GameEvent::Restarted], &Settings::default(), 100);
        assert_eq!(rig.ambient(), crate::sim::DAY_AMBIENT);
    }

    #[test]
    fn test_sound_key_names() {
        assert_eq!(SoundKey::Music.as_str(), "music");
        assert_eq!(SoundKey::Crash.as_str(), "crash");
    }
}
