//! Audio system using Web Audio API
//!
//! Procedurally generated sounds - no external files needed. Every sound is
//! addressed by `SoundKey`, so the loop that gets stopped is always the loop
//! that was started.

use web_sys::{AudioContext, BiquadFilterNode, BiquadFilterType, GainNode, OscillatorNode, OscillatorType};

use crate::platform::SoundKey;

/// Engine drone pitch at standstill (Hz)
const ENGINE_BASE_FREQ: f32 = 45.0;
/// Extra pitch per pixel/second of scroll speed
const ENGINE_FREQ_PER_SPEED: f32 = 0.08;

/// A running looped sound
struct LoopVoice {
    osc: OscillatorNode,
    filter: BiquadFilterNode,
    gain: GainNode,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Engine drone gain
    music_level: f32,
    /// One-shot gain
    sfx_level: f32,
    music: Option<LoopVoice>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context; the game runs silent then
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let mut manager = Self {
            ctx,
            music_level: 0.0,
            sfx_level: 0.0,
            music: None,
        };
        manager.apply_settings(&crate::Settings::default());
        manager
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Apply volumes from player settings; a running drone follows at once
    pub fn apply_settings(&mut self, settings: &crate::Settings) {
        // The drone sits well under the one-shots
        self.music_level = settings.effective_music_volume() * 0.25;
        self.sfx_level = settings.effective_sfx_volume();
        if let Some(voice) = &self.music {
            voice.gain.gain().set_value(self.music_level);
        }
    }

    /// Start a looping sound; only `SoundKey::Music` loops
    pub fn start_loop(&mut self, key: SoundKey) {
        if key != SoundKey::Music {
            log::warn!("Sound '{}' is not a loop", key.as_str());
            return;
        }
        if self.music.is_some() {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        self.music = Self::create_engine_loop(ctx, self.music_level);
        if self.music.is_some() {
            log::info!("Started loop '{}'", key.as_str());
        }
    }

    /// Stop a looping sound
    pub fn stop_loop(&mut self, key: SoundKey) {
        if key != SoundKey::Music {
            return;
        }
        if let Some(voice) = self.music.take() {
            let _ = voice.osc.stop();
            let _ = voice.osc.disconnect();
            let _ = voice.filter.disconnect();
            let _ = voice.gain.disconnect();
            log::info!("Stopped loop '{}'", key.as_str());
        }
    }

    /// Track scroll speed with the engine pitch
    pub fn set_engine_speed(&self, speed: f32) {
        if let Some(voice) = &self.music {
            let freq = ENGINE_BASE_FREQ + speed * ENGINE_FREQ_PER_SPEED;
            voice.osc.frequency().set_value(freq);
            voice.filter.frequency().set_value(300.0 + freq * 6.0);
        }
    }

    /// Play a one-shot sound
    pub fn play(&self, key: SoundKey) {
        let vol = self.sfx_level;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match key {
            SoundKey::Crash => self.play_crash(ctx, vol),
            SoundKey::SpeedUp => self.play_speed_up(ctx, vol),
            SoundKey::Music => log::warn!("Sound 'music' is a loop, use start_loop"),
        }
    }

    // === Sound generators ===

    /// Sawtooth through a low-pass filter: a motor hum
    fn create_engine_loop(ctx: &AudioContext, vol: f32) -> Option<LoopVoice> {
        let osc = ctx.create_oscillator().ok()?;
        let filter = ctx.create_biquad_filter().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(OscillatorType::Sawtooth);
        osc.frequency().set_value(ENGINE_BASE_FREQ);
        filter.set_type(BiquadFilterType::Lowpass);
        filter.frequency().set_value(600.0);
        gain.gain().set_value(vol);

        osc.connect_with_audio_node(&filter).ok()?;
        filter.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        osc.start().ok()?;

        Some(LoopVoice { osc, filter, gain })
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Crash - low thud plus a falling square sweep
    fn play_crash(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.8, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.35)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                .ok();
            osc.frequency().set_value_at_time(600.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(80.0, t + 0.6)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.65).ok();
        }
    }

    /// Speed up - quick rising two-note chime
    fn play_speed_up(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [520.0, 780.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }
    }
}
