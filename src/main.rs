//! Cyber Flap entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Skills used when the page does not provide any
const DEFAULT_SKILLS: [&str; 6] = ["Rust", "Go", "TypeScript", "React", "Docker", "SQL"];

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use cyber_flap::persistence::LocalStorage;
    use cyber_flap::platform::{init_logging, now_ms};
    use cyber_flap::renderer::CanvasSurface;
    use cyber_flap::sim::GamePhase;
    use cyber_flap::{Overrides, Session};

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStorage>,
        surface: CanvasSurface,
        canvas: HtmlCanvasElement,
        size: (f32, f32),
    }

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    fn with_game<R>(f: impl FnOnce(&mut Game) -> R) -> Option<R> {
        let game = GAME.with(|g| g.borrow().clone())?;
        let mut g = game.borrow_mut();
        Some(f(&mut g))
    }

    impl Game {
        /// Match the backing store to the CSS size and device pixel ratio
        fn fit_canvas(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let rect = self.canvas.get_bounding_client_rect();
            let (w, h) = (rect.width() as f32, rect.height() as f32);
            let dpr = window.device_pixel_ratio();
            self.canvas.set_width((w as f64 * dpr) as u32);
            self.canvas.set_height((h as f64 * dpr) as u32);
            self.surface.set_pixel_ratio(dpr);

            if (w, h) != self.size {
                self.size = (w, h);
                self.session.resize(w, h);
                log::info!("Canvas resized to {}x{} (dpr {})", w, h, dpr);
            }
        }

        /// Primary action: resume, then flap or start a run
        fn primary(&mut self) {
            self.session.primary(now_ms());
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let snap = self.session.snapshot();

            let set = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };
            set("hud-score", &snap.score.to_string());
            set("hud-best", &snap.high_score.to_string());
            set("hud-fps", &snap.fps.to_string());
            set(
                "hud-keys",
                &format!("{}/{}", snap.key_fragments, snap.target_words.len()),
            );

            let phase = match snap.phase {
                GamePhase::Idle => "idle",
                GamePhase::Playing => "playing",
                GamePhase::Dead => "dead",
            };
            let _ = self.canvas.set_attribute("data-phase", phase);
            let _ = self
                .canvas
                .set_attribute("data-paused", if snap.paused { "true" } else { "false" });
        }
    }

    /// Skills from the canvas `data-skills` attribute (comma separated)
    fn read_skills(canvas: &HtmlCanvasElement) -> Vec<String> {
        match canvas.get_attribute("data-skills") {
            Some(list) => list.split(',').map(|s| s.to_string()).collect(),
            None => super::DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn run() -> Result<(), JsValue> {
        init_logging();
        log::info!("Cyber Flap starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let surface = CanvasSurface::from_canvas(&canvas).ok_or("no 2d context")?;

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(&read_skills(&canvas), LocalStorage::new(), seed);
        let game = Rc::new(RefCell::new(Game {
            session,
            surface,
            canvas: canvas.clone(),
            size: (0.0, 0.0),
        }));
        game.borrow_mut().fit_canvas();
        GAME.with(|g| *g.borrow_mut() = Some(game.clone()));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());
        request_animation_frame(game);

        log::info!("Cyber Flap running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Click flaps or starts
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().primary();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        g.primary();
                    }
                    "Enter" => {
                        if g.session.state().phase != GamePhase::Playing {
                            event.prevent_default();
                            g.session.start(now_ms());
                        }
                    }
                    "Escape" | "p" | "P" => {
                        if g.session.state().phase == GamePhase::Playing {
                            g.session.toggle_pause(now_ms());
                        }
                    }
                    "m" | "M" => g.session.return_to_menu(now_ms()),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().fit_canvas();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.session.state().phase == GamePhase::Playing {
                        g.session.pause(now_ms());
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.session.state().phase == GamePhase::Playing {
                    g.session.pause(now_ms());
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            let Game {
                session, surface, ..
            } = &mut *g;
            // Spawn timing uses the wall clock, same as pause bookkeeping
            session.frame(surface, now_ms());
            g.update_hud();
        }

        request_animation_frame(game);
    }

    // ---- UI shell bindings ----

    /// Current snapshot as JSON (camelCase fields)
    #[wasm_bindgen(js_name = snapshot)]
    pub fn snapshot_json() -> String {
        with_game(|g| serde_json::to_string(&g.session.snapshot()).unwrap_or_default())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = startGame)]
    pub fn start_game() {
        with_game(|g| g.session.start(now_ms()));
    }

    #[wasm_bindgen(js_name = returnToMenu)]
    pub fn return_to_menu() {
        with_game(|g| g.session.return_to_menu(now_ms()));
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause() {
        with_game(|g| g.session.toggle_pause(now_ms()));
    }

    #[wasm_bindgen(js_name = resetProgress)]
    pub fn reset_progress() {
        with_game(|g| g.session.reset_progress());
    }

    /// Apply debug overrides from JSON; malformed input is logged and ignored
    #[wasm_bindgen(js_name = setOverrides)]
    pub fn set_overrides(json: &str) {
        match serde_json::from_str::<Overrides>(json) {
            Ok(overrides) => {
                with_game(|g| g.session.set_overrides(overrides, now_ms()));
            }
            Err(e) => log::warn!("Ignoring overrides: {}", e),
        }
    }

    #[wasm_bindgen(js_name = debugCompleteWord)]
    pub fn debug_complete_word() {
        with_game(|g| g.session.debug_complete_word());
    }

    #[wasm_bindgen(js_name = debugUnlockAll)]
    pub fn debug_unlock_all() {
        with_game(|g| g.session.debug_unlock_all());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    cyber_flap::platform::init_logging();
    log::info!("Cyber Flap (native) starting...");
    log::info!("Interactive play needs the web build - run with `trunk serve`");
    log::info!("Running headless autopilot demo");

    autopilot::run(5, 60 * 120);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: a simple controller flies a few runs and reports results
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use cyber_flap::renderer::{MeshSurface, Surface};
    use cyber_flap::sim::{GamePhase, GameState};
    use cyber_flap::{MemoryStorage, Session};

    const WIDTH: f32 = 480.0;
    const HEIGHT: f32 = 720.0;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Height the bird should hold: the next letter if one is ahead, else the next gap
    fn target_y(state: &GameState) -> f32 {
        let bird = &state.bird;
        let letter = state
            .collectibles
            .active_collectibles
            .iter()
            .find(|c| !c.collected && c.pos.x > bird.pos.x - 20.0)
            .map(|c| c.pos.y);
        let gap = state
            .pipes
            .iter()
            .find(|p| p.right() > bird.pos.x - bird.radius)
            .map(|p| p.gap_center().y);
        letter.or(gap).unwrap_or(state.rest_y())
    }

    fn should_flap(state: &GameState) -> bool {
        let bird = &state.bird;
        bird.pos.y > target_y(state) + 12.0 && bird.vel > 0.5
    }

    pub fn run(runs: u32, max_frames: u32) {
        let skills: Vec<String> = super::DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect();
        let mut session = Session::new(&skills, MemoryStorage::new(), 0xC0FFEE);
        session.resize(WIDTH, HEIGHT);
        let mut mesh = MeshSurface::new();

        let mut now = 0.0;
        for run in 1..=runs {
            session.start(now);
            let mut frames = 0;
            while session.state().phase == GamePhase::Playing && frames < max_frames {
                if should_flap(session.state()) {
                    session.jump();
                }
                mesh.clear();
                session.frame(&mut mesh as &mut dyn Surface, now);
                now += FRAME_MS;
                frames += 1;
            }

            let snap = session.snapshot();
            log::info!(
                "Run {}: score {} x{} = {} over {} frames (best {}, keys {}/{}, {} vertices last frame)",
                run,
                snap.score,
                snap.score_multiplier,
                snap.final_score,
                frames,
                snap.high_score,
                snap.key_fragments,
                snap.target_words.len(),
                mesh.vertices().len()
            );
        }

        let snap = session.snapshot();
        println!(
            "Autopilot finished: best {}, words {:?}, reward unlocked: {}",
            snap.high_score, snap.collected_words, snap.is_reward_unlocked
        );
    }
}
