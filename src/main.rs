//! Bike Sim entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use bike_sim::platform::web::WebHost;
    use bike_sim::platform::{SceneHost, SoundKey, dispatch_events};
    use bike_sim::renderer::{RenderState, scene_vertices, sky_color};
    use bike_sim::sim::{InputEvent, InputQueue, SceneController, Viewport};
    use bike_sim::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        controller: SceneController,
        input: InputQueue,
        host: WebHost,
        settings: Settings,
        render_state: Option<RenderState>,
        last_time: f64,
    }

    impl Game {
        fn new(tuning: Tuning, viewport: Viewport, seed: u64) -> Self {
            let settings = Settings::load();
            let mut controller = SceneController::new(tuning, viewport, seed);
            controller.set_reduced_motion(settings.reduced_motion);
            let mut host = WebHost::new(&settings);
            host.start_loop(SoundKey::Music);
            Self {
                controller,
                input: InputQueue::new(),
                host,
                settings,
                render_state: None,
                last_time: 0.0,
            }
        }

        /// One frame of simulation plus host feedback
        fn update(&mut self, dt: f32) {
            self.controller.frame(dt, &mut self.input);

            let events = self.controller.drain_events();
            let pulse = self.controller.tuning().haptic_pulse_ms;
            dispatch_events(&mut self.host, &events, &self.settings, pulse);

            let session = self.controller.session();
            // Events only carry the end points of a cross-fade
            if session.day_night.fade_alpha() < 1.0 {
                self.host.set_ambient_light(session.day_night.ambient());
            }
            if !session.is_game_over() {
                self.host.audio().set_engine_speed(session.speed);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let session = self.controller.session();
            if let Some(ref mut render_state) = self.render_state {
                let vertices = scene_vertices(session, &self.settings, self.host.lighting());
                match render_state.render(&vertices, sky_color(session)) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size();
                        render_state.resize(w, h, session.viewport);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// HUD bits the event stream does not cover
        fn update_hud(&mut self) {
            let alpha = if self.settings.show_guide {
                self.controller.session().guide.alpha()
            } else {
                0.0
            };
            self.host.set_guide_alpha(alpha);
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.host.apply_settings(&self.settings);
            self.settings.save();
            log::info!("Audio {}", if self.settings.muted { "muted" } else { "unmuted" });
        }

        fn restart(&mut self, seed: u64) {
            self.input.clear();
            self.controller.restart(seed);
            self.last_time = 0.0;
        }
    }

    /// Balance sheet: inline JSON in the page wins, then `?mode=free`
    fn load_tuning(document: &web_sys::Document) -> Tuning {
        if let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        {
            match Tuning::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from page");
                    return tuning;
                }
                Err(e) => log::warn!("Ignoring page tuning: {}", e),
            }
        }

        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        if search.contains("mode=free") {
            Tuning::free_roam()
        } else {
            Tuning::lanes()
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Bike Sim starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // World is CSS pixels, surface is physical pixels
        let (width, height, viewport) = canvas_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let tuning = load_tuning(&document);
        let game = Rc::new(RefCell::new(Game::new(tuning, viewport, seed)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, viewport).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_resize(canvas, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Bike Sim running!");
    }

    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32, Viewport) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        (width, height, Viewport::new(client_w as f32, client_h as f32))
    }

    fn key_event(key: &str, pressed: bool) -> Option<InputEvent> {
        let event = match (key, pressed) {
            ("ArrowLeft" | "a" | "A", true) => InputEvent::PressLeft,
            ("ArrowLeft" | "a" | "A", false) => InputEvent::ReleaseLeft,
            ("ArrowRight" | "d" | "D", true) => InputEvent::PressRight,
            ("ArrowRight" | "d" | "D", false) => InputEvent::ReleaseRight,
            (" " | "ArrowUp" | "w" | "W", true) => InputEvent::PressJump,
            (" " | "ArrowUp" | "w" | "W", false) => InputEvent::ReleaseJump,
            _ => return None,
        };
        Some(event)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard
        for (name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if pressed && event.repeat() {
                    return;
                }
                if pressed && event.key().eq_ignore_ascii_case("m") {
                    game.borrow_mut().toggle_mute();
                    return;
                }
                if let Some(input) = key_event(&event.key(), pressed) {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    g.host.audio().resume();
                    g.input.push(input);
                }
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer down (mouse or touch)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                let mut g = game.borrow_mut();
                g.host.audio().resume();
                g.input.push(InputEvent::PointerDown { x });
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up anywhere ends the hold
        for name in ["pointerup", "pointercancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().input.push(InputEvent::PointerUp);
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                let mut g = game.borrow_mut();
                g.host.audio().resume();
                g.restart(seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let (width, height, viewport) = canvas_size(&window, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);

            let mut g = game.borrow_mut();
            g.controller.resize(viewport.width, viewport.height);
            let world = g.controller.session().viewport;
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(width, height, world);
            }
            log::info!("Resized to {}x{}", viewport.width, viewport.height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bike Sim (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    let free = std::env::args().any(|a| a == "--free");
    let tuning = if free {
        bike_sim::Tuning::free_roam()
    } else {
        bike_sim::Tuning::lanes()
    };
    headless_run(tuning, 60.0);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Ride with a random steering hand until the crash or the time limit
#[cfg(not(target_arch = "wasm32"))]
fn headless_run(tuning: bike_sim::Tuning, seconds: f32) {
    use bike_sim::sim::{GameEvent, InputEvent, InputQueue, SceneController, Viewport};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    let seed = rand::random::<u64>();
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut controller = SceneController::new(tuning, Viewport::default(), seed);
    let mut input = InputQueue::new();
    let dt = 1.0 / 60.0;
    let frames = (seconds / dt) as u32;

    for frame in 0..frames {
        if frame % 20 == 0 {
            let event = match rng.random_range(0..4) {
                0 => InputEvent::PressLeft,
                1 => InputEvent::PressRight,
                2 => InputEvent::PressJump,
                _ => InputEvent::PointerUp,
            };
            input.push(event);
        } else if frame % 20 == 5 {
            input.push(InputEvent::ReleaseLeft);
            input.push(InputEvent::ReleaseRight);
            input.push(InputEvent::ReleaseJump);
        }

        controller.frame(dt, &mut input);
        for event in controller.drain_events() {
            match event {
                GameEvent::SpeedUp { level, speed } => {
                    log::info!("Level {} - speed {:.0}", level, speed)
                }
                GameEvent::DayNightChanged { night } => {
                    log::info!("{}", if night { "Night falls" } else { "Day breaks" })
                }
                GameEvent::GameOver { score, .. } => {
                    log::info!("Crashed after {:.1}s", frame as f32 * dt);
                    println!("Final score: {}", score);
                    return;
                }
                _ => {}
            }
        }
    }

    println!(
        "Survived {:.0}s, score: {}",
        seconds,
        controller.session().score
    );
}
