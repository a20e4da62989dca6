//! Pixel Invaders entry point
//!
//! The browser build wires DOM events and `requestAnimationFrame` to a
//! [`Session`]. The native build runs a headless self-playing demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_host {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, VisibilityState};

    use pixel_invaders::audio::AudioManager;
    use pixel_invaders::render::CanvasPresenter;
    use pixel_invaders::{GameError, Session, Settings};

    type Shared = Rc<RefCell<Session<CanvasPresenter>>>;

    thread_local! {
        static SESSION: RefCell<Option<Shared>> = const { RefCell::new(None) };
        static FRAME_ID: Cell<Option<i32>> = const { Cell::new(None) };
    }

    fn create_presenter(document: &Document, settings: &Settings) -> Result<CanvasPresenter, GameError> {
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| GameError::Surface("no #canvas element".into()))?
            .dyn_into()
            .map_err(|_| GameError::Surface("#canvas is not a canvas".into()))?;
        CanvasPresenter::new(&canvas, settings.viewport_width, settings.viewport_height)
    }

    /// Replace the game with a message when it cannot start
    fn show_fallback(document: &Document, err: &GameError) {
        if let Some(el) = document.get_element_by_id("fallback") {
            let _ = el.set_attribute("class", "");
            return;
        }
        if let (Ok(el), Some(body)) = (document.create_element("p"), document.body()) {
            el.set_text_content(Some(&format!("Pixel Invaders could not start: {err}")));
            let _ = body.append_child(&el);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pixel Invaders starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::default();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        let session = create_presenter(&document, &settings)
            .and_then(|presenter| Session::new(settings, seed, presenter));
        let session = match session {
            Ok(session) => Rc::new(RefCell::new(session)),
            Err(e) => {
                log::error!("Startup failed: {}", e);
                show_fallback(&document, &e);
                return;
            }
        };

        let audio = AudioManager::new();
        session.borrow().events().domain.subscribe(move |event| {
            audio.on_event(event);
            Ok(())
        });

        setup_input_handlers(&document, session.clone());
        SESSION.with(|s| *s.borrow_mut() = Some(session.clone()));

        request_animation_frame(session);

        log::info!("Pixel Invaders running!");
    }

    fn setup_input_handlers(document: &Document, session: Shared) {
        let window = web_sys::window().expect("no window");

        // Keyboard: only allow-listed keys lose their default action
        {
            let session = session.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if session.borrow_mut().key_down(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let session = session.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if session.borrow_mut().key_up(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside)
        {
            let session = session.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                session.borrow_mut().focus_lost();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Visibility change (tab switch, minimize)
        {
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == VisibilityState::Hidden;
                session.borrow_mut().visibility_changed(hidden);
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn request_animation_frame(session: Shared) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(session, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => FRAME_ID.with(|f| f.set(Some(id))),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(session: Shared, time: f64) {
        FRAME_ID.with(|f| f.set(None));
        let running = {
            let mut s = session.borrow_mut();
            s.frame(time);
            s.is_running()
        };
        if running {
            request_animation_frame(session);
        }
    }

    /// Stop the loop and cancel the pending frame callback
    pub fn stop() {
        SESSION.with(|s| {
            if let Some(session) = s.borrow().as_ref() {
                session.borrow_mut().stop();
            }
        });
        if let (Some(id), Some(window)) = (FRAME_ID.with(Cell::take), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
        log::info!("Pixel Invaders stopped");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_host::run();
}

/// Tear the game down from JavaScript
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn stop_game() {
    web_host::stop();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::Cell;
    use std::rc::Rc;

    use pixel_invaders::render::HeadlessPresenter;
    use pixel_invaders::sim::{GameEvent, GamePhase};
    use pixel_invaders::{GameError, Session, Settings};

    /// Simulated display refresh
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Demo length cap (ten minutes of simulated play)
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    #[derive(Default)]
    struct Tally {
        shots: Cell<u64>,
        kills: Cell<u64>,
        hits: Cell<u64>,
        levels: Cell<u64>,
    }

    /// Keyboard driver aiming at the lowest enemy
    struct Autopilot {
        fire_held: bool,
        started: bool,
    }

    impl Autopilot {
        fn drive(&mut self, session: &mut Session<HeadlessPresenter>) {
            let game = session.game();
            match game.phase() {
                GamePhase::Start if !self.started => {
                    self.started = true;
                    session.key_down("Enter");
                    return;
                }
                GamePhase::Playing => {}
                _ => return,
            }

            let player = game.state().player.rect;
            let target = game
                .state()
                .enemies
                .iter()
                .filter(|e| e.active)
                .max_by(|a, b| a.rect.y.total_cmp(&b.rect.y))
                .map(|e| e.rect.center().0);
            let (cx, _) = player.center();
            let speed = game.state().player.speed;

            let (left, right) = match target {
                Some(tx) if tx < cx - speed => (true, false),
                Some(tx) if tx > cx + speed => (false, true),
                _ => (false, false),
            };
            session.key_up("Enter");
            set_key(session, "ArrowLeft", left);
            set_key(session, "ArrowRight", right);

            // Alternate frames so every press is a fresh edge
            self.fire_held = !self.fire_held;
            set_key(session, "Space", self.fire_held);
        }
    }

    fn set_key(session: &mut Session<HeadlessPresenter>, code: &str, down: bool) {
        if down {
            session.key_down(code);
        } else {
            session.key_up(code);
        }
    }

    pub fn run(args: &[String]) -> Result<(), GameError> {
        let settings = match args.get(1) {
            Some(path) => Settings::load_file(std::path::Path::new(path))?,
            None => Settings::default(),
        };
        let seed = settings.seed.unwrap_or(0x5eed);
        let mut session = Session::new(settings, seed, HeadlessPresenter::new())?;

        let tally = Rc::new(Tally::default());
        {
            let tally = tally.clone();
            session.events().domain.subscribe(move |event| {
                let counter = match event {
                    GameEvent::Shot => &tally.shots,
                    GameEvent::EnemyDestroyed { .. } => &tally.kills,
                    GameEvent::PlayerHit { .. } => &tally.hits,
                    GameEvent::LevelComplete { .. } => &tally.levels,
                    GameEvent::GameOver { .. } => return Ok(()),
                };
                counter.set(counter.get() + 1);
                Ok(())
            });
        }

        let mut pilot = Autopilot {
            fire_held: false,
            started: false,
        };
        let mut frames = 0;
        let mut dropped_ms = 0.0;
        while frames < MAX_FRAMES {
            pilot.drive(&mut session);
            let report = session.frame(frames as f64 * FRAME_MS);
            dropped_ms += report.dropped_ms;
            frames += 1;
            if session.game().phase() == GamePhase::GameOver {
                break;
            }
        }
        session.stop();

        let game = session.game();
        log::info!(
            "Demo finished after {} frames: score {} level {}",
            frames,
            game.score(),
            game.level()
        );

        let summary = serde_json::json!({
            "seed": game.seed(),
            "frames": frames,
            "ticks": game.state().ticks,
            "phase": game.phase(),
            "score": game.score(),
            "level": game.level(),
            "lives": game.lives(),
            "shots": tally.shots.get(),
            "kills": tally.kills.get(),
            "hits_taken": tally.hits.get(),
            "levels_cleared": tally.levels.get(),
            "enemies_remaining": game.state().enemies_remaining(),
            "frames_presented": session.presenter().frames(),
            "dropped_ms": dropped_ms,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pixel Invaders (native) starting headless demo...");
    log::info!("Build for wasm32 (e.g. `trunk serve`) to play in the browser");

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = demo::run(&args) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}
