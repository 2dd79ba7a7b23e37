//! Bubble Pop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, PointerEvent, TouchEvent};

    use bubble_pop::renderer::SdfRenderState;
    use bubble_pop::sim::{Frame, GameEvent, GameSession, tick};
    use bubble_pop::{GameConfig, HandleId, Scene, StatusBar, frame_delta};

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        scene: Scene,
        status_bar: StatusBar,
        render_state: Option<SdfRenderState>,
        /// rAF timestamp of the previous frame (0 = none yet)
        last_time: f64,
        /// Page hidden: no ticking, no rendering
        hidden: bool,
        /// Text handles mirrored into the DOM
        dom_texts: Vec<HandleId>,
    }

    fn ms_to_duration(ms: f64) -> Duration {
        Duration::from_secs_f64(ms.max(0.0) / 1000.0)
    }

    fn performance_now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    impl Game {
        fn new(config: GameConfig, seed: u64, now: f64) -> Self {
            let mut scene = Scene::new(config.viewport);
            let session = GameSession::new(config, seed, ms_to_duration(now));
            let status_bar = StatusBar::new(&mut scene, &session.config().display, session.state());
            Self {
                session,
                scene,
                status_bar,
                render_state: None,
                last_time: 0.0,
                hidden: false,
                dom_texts: Vec::new(),
            }
        }

        /// Hit-test a tap in canvas coordinates and queue it
        fn tap_at(&mut self, x: f32, y: f32) {
            let Some(handle) = self.scene.hit_test(Vec2::new(x, y)) else {
                return;
            };
            if let Some(id) = self.session.bubble_by_handle(handle) {
                self.session.tap(id);
            }
        }

        fn frame(&mut self, time: f64) {
            if self.hidden {
                return;
            }

            let delta = if self.last_time > 0.0 {
                frame_delta(time - self.last_time)
            } else {
                1.0
            };
            self.last_time = time;

            tick(
                &mut self.session,
                &mut self.scene,
                &Frame::new(ms_to_duration(time), delta),
            );

            for event in self.session.drain_events() {
                self.on_event(&event);
            }

            self.status_bar
                .refresh(&mut self.scene, self.session.state());
            self.sync_text_layer();
            self.render(time);
        }

        fn on_event(&self, event: &GameEvent) {
            match event {
                GameEvent::PauseChanged { paused } => set_hidden("pause-menu", !paused),
                GameEvent::GameOver { final_score } => {
                    if let Some(el) = document().and_then(|d| d.get_element_by_id("final-score")) {
                        el.set_text_content(Some(&final_score.to_string()));
                    }
                    set_hidden("game-over", false);
                    set_hidden("pause-btn", true);
                }
                _ => {}
            }
        }

        fn render(&mut self, time: f64) {
            let display = &self.session.config().display;
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.scene, display, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Mirror scene text handles into absolutely positioned DOM nodes
        fn sync_text_layer(&mut self) {
            let Some(document) = document() else {
                return;
            };
            let Some(layer) = document.get_element_by_id("text-layer") else {
                return;
            };

            let scene = &self.scene;
            self.dom_texts.retain(|handle| {
                if scene.text(*handle).is_some() {
                    return true;
                }
                if let Some(el) = document.get_element_by_id(&format!("text-{}", handle)) {
                    el.remove();
                }
                false
            });

            for handle in self.scene.take_text_updates() {
                let Some(text) = self.scene.text(handle) else {
                    continue;
                };
                let id = format!("text-{}", handle);
                let el = match document.get_element_by_id(&id) {
                    Some(el) => el,
                    None => match create_text_node(&document, &layer, &id, text) {
                        Ok(el) => {
                            self.dom_texts.push(handle);
                            el
                        }
                        Err(e) => {
                            log::warn!("Failed to create text node: {:?}", e);
                            continue;
                        }
                    },
                };
                el.set_text_content(Some(&text.content));
            }
        }

        /// Restart with a fresh seed
        fn restart(&mut self) {
            let seed = js_sys::Date::now() as u64;
            let now = performance_now();
            self.session
                .restart(&mut self.scene, seed, ms_to_duration(now));
            self.last_time = 0.0;
            set_hidden("game-over", true);
            set_hidden("pause-menu", true);
            set_hidden("pause-btn", false);
            log::info!("Game restarted with seed: {}", seed);
        }

        /// Canvas resized: new viewport for spawning, the scene and the status bar
        fn resize(&mut self, width: f32, height: f32, dpr: f64) {
            let viewport = Vec2::new(width, height);
            self.scene.resize(viewport);
            self.session.resize(viewport);
            let status_bar = StatusBar::new(
                &mut self.scene,
                &self.session.config().display,
                self.session.state(),
            );
            std::mem::replace(&mut self.status_bar, status_bar).destroy(&mut self.scene);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(
                    (width as f64 * dpr) as u32,
                    (height as f64 * dpr) as u32,
                );
            }
        }

        /// Page visibility changed. Suspends the surface; `paused` is untouched.
        fn set_page_hidden(&mut self, hidden: bool) {
            self.hidden = hidden;
            if !hidden {
                self.last_time = 0.0;
                self.session
                    .resync_clock(ms_to_duration(performance_now()));
            }
            log::info!("Display {}", if hidden { "suspended" } else { "resumed" });
        }
    }

    fn create_text_node(
        document: &Document,
        layer: &Element,
        id: &str,
        text: &bubble_pop::scene::TextSprite,
    ) -> Result<Element, JsValue> {
        let el = document.create_element("div")?;
        el.set_id(id);
        let style = &text.style;
        el.set_attribute(
            "style",
            &format!(
                "position:absolute;left:{}px;top:{}px;transform:translateY(-50%);\
                 font-family:'{}',sans-serif;font-size:{}px;font-weight:{};color:{};\
                 -webkit-text-stroke:1px {};white-space:nowrap;pointer-events:none;",
                text.position.x,
                text.position.y,
                style.font_family,
                style.font_size,
                if style.bold { "bold" } else { "normal" },
                style.fill.to_css(),
                style.stroke.to_css(),
            ),
        )?;
        layer.append_child(&el)?;
        Ok(el)
    }

    /// Default config sized to the canvas, overridden by `data-config` JSON
    fn load_config(canvas: &HtmlCanvasElement, width: f32, height: f32) -> GameConfig {
        let Some(json) = canvas.get_attribute("data-config") else {
            return GameConfig::with_viewport(width, height);
        };
        match GameConfig::from_json(&json) {
            Ok(mut config) => {
                config.viewport = Vec2::new(width, height);
                log::info!("Loaded config from data-config");
                config
            }
            Err(e) => {
                log::error!("Ignoring data-config: {}", e);
                GameConfig::with_viewport(width, height)
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Bubble Pop starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        set_hidden("loading", true);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let config = load_config(&canvas, client_w as f32, client_h as f32);
        if let Err(e) = config.validate() {
            return Err(JsValue::from_str(&e.to_string()));
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(config, seed, performance_now())));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {}", e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = SdfRenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {}", e)))?;
        render_state.set_start_time(performance_now());
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_visibility(game.clone());
        setup_resize(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Bubble Pop running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse and pen taps (touch is handled by touchstart below)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if event.pointer_type() == "touch" {
                    return;
                }
                game.borrow_mut()
                    .tap_at(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start: every new finger is a tap
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let rect = canvas_clone.get_bounding_client_rect();
                let touches = event.changed_touches();
                let mut g = game.borrow_mut();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        let x = touch.client_x() as f32 - rect.left() as f32;
                        let y = touch.client_y() as f32 - rect.top() as f32;
                        g.tap_at(x, y);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "Escape" | "p" | "P" => g.session.toggle_pause(),
                    "Enter" if g.session.state().game_over => g.restart(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(id: &str, mut handler: impl FnMut() + 'static) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) else {
            log::warn!("Missing #{} button", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click("pause-btn", move || game.borrow_mut().session.toggle_pause());
        }
        {
            let game = game.clone();
            on_click("resume-btn", move || game.borrow_mut().session.toggle_pause());
        }
        on_click("restart-btn", move || game.borrow_mut().restart());
    }

    fn setup_visibility(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            game.borrow_mut().set_page_hidden(hidden);
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let w = canvas_clone.client_width();
            let h = canvas_clone.client_height();
            if w <= 0 || h <= 0 {
                return;
            }
            canvas_clone.set_width((w as f64 * dpr) as u32);
            canvas_clone.set_height((h as f64 * dpr) as u32);
            game.borrow_mut().resize(w as f32, h as f32, dpr);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Bubble Pop failed to start: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::Duration;

    use bubble_pop::sim::{Frame, GameEvent, GameSession, tick};
    use bubble_pop::{GameConfig, Scene, StatusBar, frame_delta};

    /// Simulated frame rate
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// The scripted player reacts every this many frames
    const REACTION_FRAMES: u64 = 24;

    #[derive(Debug, Default)]
    pub struct Summary {
        pub seconds: u32,
        pub score: u32,
        pub lives: u32,
        pub spawned: u32,
        pub difficulty: u32,
        pub game_over: bool,
    }

    /// Play a session against a retained scene with a scripted tapper
    pub fn run(config: GameConfig, seed: u64, limit: Duration) -> Summary {
        let mut scene = Scene::new(config.viewport);
        let mut session = GameSession::new(config, seed, Duration::ZERO);
        let mut status_bar = StatusBar::new(&mut scene, &session.config().display, session.state());
        let mut summary = Summary::default();

        let mut frame_index: u64 = 0;
        loop {
            frame_index += 1;
            let now_ms = frame_index as f64 * FRAME_MS;
            let now = Duration::from_secs_f64(now_ms / 1000.0);
            if now > limit {
                break;
            }

            if frame_index % REACTION_FRAMES == 0 {
                // Tap the lowest active bubble through the hit-test path
                let target = session
                    .bubbles()
                    .iter()
                    .filter(|b| b.is_active())
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                    .map(|b| b.pos);
                if let Some(pos) = target
                    && let Some(id) = scene.hit_test(pos).and_then(|h| session.bubble_by_handle(h))
                {
                    session.tap(id);
                }
            }

            tick(&mut session, &mut scene, &Frame::new(now, frame_delta(FRAME_MS)));
            status_bar.refresh(&mut scene, session.state());

            for event in session.drain_events() {
                match event {
                    GameEvent::Spawned { .. } => summary.spawned += 1,
                    GameEvent::DifficultyRaised { level, .. } => summary.difficulty = level,
                    GameEvent::GameOver { final_score } => {
                        log::info!("Headless game over with {} points", final_score);
                        summary.game_over = true;
                    }
                    _ => {}
                }
            }

            if summary.game_over && session.bubbles().is_empty() {
                break;
            }
        }

        let state = session.state();
        summary.seconds = state.elapsed_seconds;
        summary.score = state.final_score.unwrap_or(state.score);
        summary.lives = state.lives;
        summary
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::Duration;

    use bubble_pop::GameConfig;

    env_logger::init();
    log::info!("Bubble Pop (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    // Optional JSON config path as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => GameConfig::from_json(&json).unwrap_or_else(|e| {
                log::error!("Bad config {}: {}; using defaults", path, e);
                GameConfig::default()
            }),
            Err(e) => {
                log::error!("Cannot read {}: {}; using defaults", path, e);
                GameConfig::default()
            }
        },
        None => GameConfig::default(),
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let summary = headless::run(config, seed, Duration::from_secs(180));
    println!(
        "Played {}s: score {}, lives {}, {} bubbles spawned, difficulty level {}{}",
        summary.seconds,
        summary.score,
        summary.lives,
        summary.spawned,
        summary.difficulty,
        if summary.game_over { " (game over)" } else { "" }
    );
}
