//! Full Margin entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlSelectElement, KeyboardEvent, MouseEvent, TouchEvent};

    use full_margin::consts::*;
    use full_margin::renderer::CanvasSurface;
    use full_margin::sim::{GameMode, GamePhase, HudSnapshot, InputAction};
    use full_margin::{FrameLoop, Settings, SpeedPreset};

    /// Game instance holding all state
    struct Game {
        frames: FrameLoop,
        surface: Option<CanvasSurface>,
        /// A requestAnimationFrame callback is pending
        scheduled: bool,
    }

    impl Game {
        /// Draw the current state without ticking (menus, overlays)
        fn redraw(&mut self) {
            if let Some(surface) = self.surface.as_mut() {
                self.frames.redraw(surface);
            }
        }

        /// Size the canvas for the current viewport and redraw
        fn fit_to_viewport(&mut self) {
            let Some(surface) = self.surface.as_mut() else {
                return;
            };
            let parent_width = surface
                .canvas()
                .parent_element()
                .map(|p| p.client_width())
                .unwrap_or(PLAYFIELD_WIDTH as i32);
            self.frames.set_viewport_width(parent_width as f32);
            let scale = self.frames.scale();
            surface.resize(PLAYFIELD_WIDTH * scale, PLAYFIELD_HEIGHT * scale);
            self.redraw();
        }

        fn teardown(&mut self) {
            self.frames.cancel();
            if let Some(surface) = self.surface.as_mut() {
                surface.detach();
            }
            self.scheduled = false;
        }
    }

    /// Update HUD elements in DOM
    fn update_hud(hud: &HudSnapshot) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
            el.set_text_content(Some(&format!("${}", hud.score)));
        }
        if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
            el.set_text_content(Some(&hud.lives.to_string()));
        }
        if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
            el.set_text_content(Some(&hud.level.to_string()));
        }
        if let Some(el) = document.query_selector("#hud-progress .hud-value").ok().flatten() {
            el.set_text_content(Some(&format!("{:.0}%", hud.progress * 100.0)));
        }
        if let Some(el) = document.get_element_by_id("hud-checkpoint") {
            let class = match hud.mode {
                Some(GameMode::Standard) if hud.checkpoint => "hud-item claimed",
                Some(GameMode::Standard) => "hud-item",
                _ => "hud-item hidden",
            };
            let _ = el.set_attribute("class", class);
        }

        // One overlay per non-playing phase
        let overlays = [
            ("menu", GamePhase::Menu),
            ("start-prompt", GamePhase::Start),
            ("game-over", GamePhase::GameOver),
            ("level-complete", GamePhase::LevelComplete),
        ];
        for (id, phase) in overlays {
            if let Some(el) = document.get_element_by_id(id) {
                let class = if hud.phase == phase { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
        if hud.phase == GamePhase::GameOver {
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&hud.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("final-level") {
                el.set_text_content(Some(&hud.level.to_string()));
            }
        }
    }

    /// Apply an input, refresh the page and (re)start the loop if play began
    fn dispatch(game: &Rc<RefCell<Game>>, action: InputAction) {
        let start_loop = {
            let mut g = game.borrow_mut();
            if g.frames.is_cancelled() {
                return;
            }
            let events = g.frames.handle_input(action);
            log::debug!("{action:?} -> {} events", events.len());
            if g.frames.state().phase() != GamePhase::Playing {
                g.redraw();
            }
            update_hud(&g.frames.state().hud());
            let start = g.frames.is_running() && !g.scheduled;
            if start {
                g.scheduled = true;
            }
            start
        };
        if start_loop {
            request_animation_frame(game.clone());
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Full Margin starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let settings = Settings::from_json_or_default(canvas.get_attribute("data-settings").as_deref());
        let seed = js_sys::Date::now() as u64;
        let frames = FrameLoop::new(settings, Pcg32::seed_from_u64(seed));
        log::info!("Game initialized with seed: {}", seed);

        let surface = CanvasSurface::new(canvas.clone(), window.device_pixel_ratio())?;
        let game = Rc::new(RefCell::new(Game {
            frames,
            surface: Some(surface),
            scheduled: false,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_menu_controls(game.clone());
        setup_lifecycle(game.clone());

        {
            let mut g = game.borrow_mut();
            g.fit_to_viewport();
            update_hud(&g.frames.state().hud());
        }

        log::info!("Full Margin ready");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                dispatch(&game, InputAction::Jump);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                dispatch(&game, InputAction::Jump);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let action = match event.key().as_str() {
                " " | "ArrowUp" | "Enter" => {
                    event.prevent_default();
                    InputAction::Jump
                }
                "s" | "S" => InputAction::SelectMode(GameMode::Standard),
                "h" | "H" => InputAction::SelectMode(GameMode::Hardcore),
                "1" => InputAction::SelectSpeed(SpeedPreset::Slow),
                "2" => InputAction::SelectSpeed(SpeedPreset::Normal),
                "3" => InputAction::SelectSpeed(SpeedPreset::Fast),
                "r" | "R" => InputAction::Retry,
                "Escape" | "m" | "M" => InputAction::Menu,
                _ => return,
            };
            dispatch(&game, action);
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_menu_controls(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let buttons = [
            ("mode-standard", InputAction::SelectMode(GameMode::Standard)),
            ("mode-hardcore", InputAction::SelectMode(GameMode::Hardcore)),
            ("retry-btn", InputAction::Retry),
            ("menu-btn", InputAction::Menu),
            ("next-btn", InputAction::NextLevel),
        ];
        for (id, action) in buttons {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    dispatch(&game, action);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Speed preference
        if let Some(select) = document
            .get_element_by_id("speed")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            let select_clone = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                match SpeedPreset::from_str(&select_clone.value()) {
                    Some(speed) => dispatch(&game, InputAction::SelectSpeed(speed)),
                    None => log::warn!("Unknown speed option: {}", select_clone.value()),
                }
            });
            let _ =
                select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_lifecycle(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Responsive scaling
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().fit_to_viewport();
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Teardown
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PageTransitionEvent| {
            game.borrow_mut().teardown();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        if game.borrow().frames.is_cancelled() {
            return;
        }
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
        let reschedule = {
            let mut g = game.borrow_mut();
            let report = {
                let Game {
                    frames, surface, ..
                } = &mut *g;
                frames.frame(surface.as_mut())
            };
            if let Some(hud) = report.hud.as_ref() {
                update_hud(hud);
            }
            g.scheduled = report.reschedule;
            report.reschedule
        };

        if reschedule {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::Context;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use full_margin::Rect;
    use full_margin::renderer::{Font, Surface, TextAlign};
    use full_margin::sim::{GameEvent, GameMode, GamePhase, GameState, InputAction};
    use full_margin::{FrameLoop, Settings};

    const MAX_FRAMES: u64 = 50_000;
    const MAX_LEVEL: u32 = 3;

    /// Discards every draw
    struct NullSurface;

    impl Surface for NullSurface {
        fn clear(&mut self, _color: &str) {}
        fn set_scale(&mut self, _scale: f32) {}
        fn fill_rect(&mut self, _rect: Rect, _color: &str) {}
        fn fill_text(&mut self, _t: &str, _x: f32, _y: f32, _f: Font, _a: TextAlign, _c: &str) {}
    }

    #[derive(Debug, Default)]
    struct Summary {
        frames: u64,
        jumps: u64,
        lives_lost: u64,
        checkpoints: u64,
        levels_cleared: u32,
        score: u64,
    }

    /// Jump when the candle underfoot is about to run out, double jump when
    /// falling with nothing below
    fn wants_jump(state: &GameState) -> bool {
        let player = &state.world.player;
        let speed = state.world.scroll_speed;
        let p = player.rect;
        let under = |x: f32| {
            state
                .world
                .entities
                .iter()
                .filter(|e| e.is_solid())
                .any(|e| e.rect.x <= x && x <= e.rect.right() && e.rect.y >= p.bottom() - 1.0)
        };

        if player.grounded {
            return !under(p.right() + speed * 6.0);
        }
        player.dy > 0.0 && player.jump_count < full_margin::consts::MAX_JUMPS && !under(p.x)
    }

    impl Summary {
        fn record(&mut self, events: &[GameEvent]) {
            for event in events {
                match event {
                    GameEvent::Jumped { .. } => self.jumps += 1,
                    GameEvent::LifeLost { .. } => self.lives_lost += 1,
                    GameEvent::CheckpointClaimed => self.checkpoints += 1,
                    GameEvent::LevelComplete { .. } => self.levels_cleared += 1,
                    _ => {}
                }
            }
        }
    }

    /// Command line: `[settings.json | - | ""] [standard | hardcore]`
    #[derive(Debug, PartialEq)]
    struct Args {
        settings_path: Option<String>,
        mode: GameMode,
    }

    fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
        let settings_path = args.next().filter(|p| !p.is_empty() && p != "-");
        let mode = args
            .next()
            .map(|m| GameMode::from_str(&m).with_context(|| format!("unknown mode {m}")))
            .transpose()?
            .unwrap_or_default();
        Ok(Args {
            settings_path,
            mode,
        })
    }

    fn load_settings(path: Option<&str>) -> anyhow::Result<Settings> {
        let Some(path) = path else {
            return Ok(Settings::default());
        };
        let json =
            std::fs::read_to_string(path).with_context(|| format!("reading settings from {path}"))?;
        Settings::from_json(&json).with_context(|| format!("parsing settings in {path}"))
    }

    /// Play from the start screen until game over, `MAX_LEVEL` or `max_frames`
    fn autopilot(frames: &mut FrameLoop, mode: GameMode, max_frames: u64) -> Summary {
        let mut surface = NullSurface;
        let mut summary = Summary::default();
        summary.record(&frames.handle_input(InputAction::SelectMode(mode)));
        summary.record(&frames.handle_input(InputAction::Jump));

        while summary.frames < max_frames {
            if wants_jump(frames.state()) {
                summary.record(&frames.handle_input(InputAction::Jump));
            }
            let report = frames.frame(Some(&mut surface));
            summary.frames += 1;
            summary.record(&report.events);

            match frames.state().phase() {
                GamePhase::Playing => {}
                GamePhase::LevelComplete if frames.state().session.level < MAX_LEVEL => {
                    summary.record(&frames.handle_input(InputAction::NextLevel));
                }
                _ => break,
            }
        }
        summary.score = frames.state().session.score;
        summary
    }

    pub fn run() -> anyhow::Result<()> {
        let args = parse_args(std::env::args().skip(1))?;
        let settings = load_settings(args.settings_path.as_deref())?;
        let mode = args.mode;
        let seed = std::env::var("FULL_MARGIN_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0x5eed);

        log::info!("Headless run: mode {}, seed {seed}", mode.as_str());
        let mut frames = FrameLoop::new(settings, Pcg32::seed_from_u64(seed));
        let summary = autopilot(&mut frames, mode, MAX_FRAMES);

        let state = frames.state();
        log::info!("Headless run finished in phase {}", state.phase().as_str());
        println!(
            "mode={} level={} phase={} score={} frames={} jumps={} lives_lost={} checkpoints={} levels_cleared={}",
            mode.as_str(),
            state.session.level,
            state.phase().as_str(),
            summary.score,
            summary.frames,
            summary.jumps,
            summary.lives_lost,
            summary.checkpoints,
            summary.levels_cleared,
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Full Margin (native) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
