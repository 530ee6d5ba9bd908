//! Browser host: Web Audio, the Vibration API and DOM overlays

use wasm_bindgen::JsValue;
use web_sys::Document;

use super::{LightRig, SceneHost, SoundKey};
use crate::audio::AudioManager;
use crate::settings::Settings;
use crate::sim::LightHandle;

/// `SceneHost` backed by the page the canvas lives in
pub struct WebHost {
    document: Option<Document>,
    audio: AudioManager,
    lighting: LightRig,
    last_score: Option<u64>,
    guide_alpha: Option<f32>,
}

impl WebHost {
    pub fn new(settings: &Settings) -> Self {
        let document = web_sys::window().and_then(|w| w.document());
        if document.is_none() {
            log::warn!("No document - HUD updates disabled");
        }
        let mut audio = AudioManager::new();
        audio.apply_settings(settings);
        Self {
            document,
            audio,
            lighting: LightRig::default(),
            last_score: None,
            guide_alpha: None,
        }
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.audio.apply_settings(settings);
    }

    /// Ambient color and live obstacle lights, read by the renderer
    pub fn lighting(&self) -> &LightRig {
        &self.lighting
    }

    /// Fade the controls hint; only touches the DOM when the value changes
    pub fn set_guide_alpha(&mut self, alpha: f32) {
        let alpha = (alpha * 100.0).round() / 100.0;
        if self.guide_alpha == Some(alpha) {
            return;
        }
        self.guide_alpha = Some(alpha);
        if let Some(el) = self.element("guide") {
            let _ = el.set_attribute("style", &format!("opacity: {alpha}"));
            let class = if alpha > 0.0 { "" } else { "hidden" };
            let _ = el.set_attribute("class", class);
        }
    }

    fn element(&self, id: &str) -> Option<web_sys::Element> {
        self.document.as_ref()?.get_element_by_id(id)
    }
}

impl SceneHost for WebHost {
    fn start_loop(&mut self, key: SoundKey) {
        self.audio.start_loop(key);
    }

    fn stop_loop(&mut self, key: SoundKey) {
        self.audio.stop_loop(key);
    }

    fn play_once(&mut self, key: SoundKey) {
        self.audio.play(key);
    }

    fn vibrate(&mut self, ms: u32) -> bool {
        let Some(navigator) = web_sys::window().map(|w| w.navigator()) else {
            return false;
        };
        // Not every browser ships the Vibration API
        let supported = js_sys::Reflect::has(&navigator, &JsValue::from_str("vibrate"))
            .unwrap_or(false);
        supported && navigator.vibrate_with_duration(ms)
    }

    fn set_score_label(&mut self, score: u64) {
        if self.last_score == Some(score) {
            return;
        }
        self.last_score = Some(score);
        let Some(document) = &self.document else { return };
        let text = score.to_string();
        if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
            el.set_text_content(Some(&text));
        }
        if let Some(el) = document.get_element_by_id("final-score") {
            el.set_text_content(Some(&text));
        }
    }

    fn show_restart(&mut self, visible: bool) {
        if let Some(el) = self.element("game-over") {
            let class = if visible { "" } else { "hidden" };
            let _ = el.set_attribute("class", class);
        }
    }

    fn set_ambient_light(&mut self, rgb: [f32; 3]) {
        self.lighting.set_ambient_light(rgb);
    }

    fn set_textures(&mut self, background: &'static str, bike: &'static str) {
        // Page CSS themes the overlays off these
        if let Some(el) = self.element("hud") {
            let _ = el.set_attribute("data-background", background);
            let _ = el.set_attribute("data-bike", bike);
        }
    }

    fn attach_light(&mut self, light: LightHandle) {
        self.lighting.attach_light(light);
    }

    fn release_light(&mut self, light: LightHandle) {
        self.lighting.release_light(light);
    }
}
