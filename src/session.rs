//! Per-frame glue
//!
//! A host owns one `Session` and calls [`Session::frame`] once per display
//! refresh. Raw key events go in through `key_down` / `key_up`; everything
//! else (edge detection, fixed-step catch-up, screen selection) happens here.

use std::rc::Rc;

use crate::error::GameError;
use crate::platform::{FixedStepScheduler, FrameReport, InputLatch, Simulation};
use crate::render::{Presenter, Snapshot, present};
use crate::settings::Settings;
use crate::sim::{Events, Game, TickInput};

pub struct Session<P: Presenter> {
    game: Game,
    latch: InputLatch,
    scheduler: FixedStepScheduler,
    presenter: P,
    /// Input not yet seen by a tick; edges wait here across zero-update frames
    pending: TickInput,
}

/// Borrowed view the scheduler drives for one frame
struct FrameRunner<'a, P: Presenter> {
    game: &'a mut Game,
    presenter: &'a mut P,
    input: &'a mut TickInput,
}

impl<P: Presenter> Simulation for FrameRunner<'_, P> {
    type Error = GameError;

    fn update(&mut self, _dt_ms: f64) -> Result<(), GameError> {
        self.game.tick(&*self.input);
        // A press is consumed by the first tick that runs after it
        self.input.clear_edges();
        Ok(())
    }

    fn render(&mut self, alpha: f64) -> Result<(), GameError> {
        present(&mut *self.presenter, &Snapshot::new(self.game, alpha)).map(|_| ())
    }
}

impl<P: Presenter> Session<P> {
    pub fn new(settings: Settings, seed: u64, presenter: P) -> Result<Self, GameError> {
        let scheduler = FixedStepScheduler::from_settings(&settings);
        let game = Game::new(settings, seed)?;
        log::info!("Session created (seed {})", seed);
        Ok(Self {
            game,
            latch: InputLatch::new(),
            scheduler,
            presenter,
            pending: TickInput::default(),
        })
    }

    /// Run one display frame at host time `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        if !self.scheduler.is_running() {
            return FrameReport {
                stopped: true,
                ..Default::default()
            };
        }

        self.latch.update();
        self.pending.merge(&self.latch.tick_input());
        self.game.set_frame_timing(now_ms, self.scheduler.fps());

        let mut runner = FrameRunner {
            game: &mut self.game,
            presenter: &mut self.presenter,
            input: &mut self.pending,
        };
        self.scheduler.frame(now_ms, &mut runner)
    }

    /// Returns whether the key is one the game uses
    pub fn key_down(&mut self, code: &str) -> bool {
        self.latch.key_down(code)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.latch.key_up(code)
    }

    /// Window lost focus: drop held keys and pause
    pub fn focus_lost(&mut self) {
        self.latch.clear();
        self.pending = TickInput::default();
        if self.game.pause_game() {
            log::info!("Auto-paused (focus lost)");
        }
    }

    /// Page visibility changed
    pub fn visibility_changed(&mut self, hidden: bool) {
        if hidden {
            self.focus_lost();
        } else {
            // Don't replay the time spent hidden
            self.scheduler.reset_clock();
        }
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn events(&self) -> Rc<Events> {
        self.game.events()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn scheduler(&self) -> &FixedStepScheduler {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{HeadlessPresenter, Screen};
    use crate::sim::GamePhase;

    // Exactly representable so frame timestamps add up without drift
    const TICK: f64 = 16.0;

    fn session() -> Session<HeadlessPresenter> {
        let settings = Settings {
            tick_ms: TICK,
            ..Default::default()
        };
        Session::new(settings, 77, HeadlessPresenter::new()).unwrap()
    }

    fn started() -> (Session<HeadlessPresenter>, f64) {
        let mut s = session();
        s.frame(0.0);
        s.key_down("Enter");
        s.frame(TICK);
        s.key_up("Enter");
        assert_eq!(s.game().phase(), GamePhase::Playing);
        (s, TICK)
    }

    #[test]
    fn test_start_screen_until_confirm() {
        let mut s = session();
        s.frame(0.0);
        s.frame(TICK);
        assert_eq!(s.presenter().last_screen(), Some(Screen::Start));

        s.key_down("Enter");
        s.frame(2.0 * TICK);
        assert_eq!(s.game().phase(), GamePhase::Playing);
        assert_eq!(s.presenter().last_screen(), Some(Screen::Playing));
    }

    #[test]
    fn test_one_press_fires_once_across_catch_up() {
        let (mut s, now) = started();
        s.key_down("Space");
        // Several ticks due in one frame
        let report = s.frame(now + 4.0 * TICK + 1.0);
        assert_eq!(report.updates, 4);
        assert_eq!(s.game().active_bullets(), 1);

        // Holding the key does not fire again
        s.frame(now + 5.0 * TICK + 1.0);
        assert_eq!(s.game().active_bullets(), 1);
    }

    #[test]
    fn test_press_on_frame_without_update_still_fires() {
        let (mut s, now) = started();
        s.key_down("Space");
        // Half a tick: no update runs this frame
        let report = s.frame(now + TICK / 2.0);
        assert_eq!(report.updates, 0);
        assert_eq!(s.game().active_bullets(), 0);

        let report = s.frame(now + TICK);
        assert_eq!(report.updates, 1);
        assert_eq!(s.game().active_bullets(), 1);

        // Consumed: later ticks while still held fire nothing new
        s.frame(now + 3.0 * TICK);
        assert_eq!(s.game().active_bullets(), 1);
    }

    #[test]
    fn test_pause_survives_jittery_frames() {
        let settings = Settings::default();
        let tick = settings.tick_ms;
        let mut s = Session::new(settings, 5, HeadlessPresenter::new()).unwrap();
        s.frame(0.0);
        s.key_down("Enter");
        s.frame(tick + 0.5);
        s.key_up("Enter");
        assert_eq!(s.game().phase(), GamePhase::Playing);

        // Frame times off the tick grid, landing short of the next tick
        s.key_down("Escape");
        let report = s.frame(tick * 1.9);
        assert_eq!(report.updates, 0);
        s.frame(tick * 3.2);
        assert_eq!(s.game().phase(), GamePhase::Paused);
    }

    #[test]
    fn test_held_movement_applies_every_tick() {
        let (mut s, now) = started();
        let x = s.game().state().player.rect.x;
        s.key_down("ArrowLeft");
        s.frame(now + 3.0 * TICK + 1.0);
        assert_eq!(s.game().state().player.rect.x, x - 15.0);
    }

    #[test]
    fn test_pause_toggles_on_edges() {
        let (mut s, now) = started();
        s.key_down("Escape");
        s.frame(now + TICK);
        assert_eq!(s.game().phase(), GamePhase::Paused);
        assert_eq!(s.presenter().last_screen(), Some(Screen::Paused));

        // Still held: no toggle
        s.frame(now + 2.0 * TICK);
        assert_eq!(s.game().phase(), GamePhase::Paused);

        s.key_up("Escape");
        s.frame(now + 3.0 * TICK);
        s.key_down("KeyP");
        s.frame(now + 4.0 * TICK);
        assert_eq!(s.game().phase(), GamePhase::Playing);
    }

    #[test]
    fn test_focus_lost_pauses_and_clears_keys() {
        let (mut s, now) = started();
        s.key_down("ArrowRight");
        s.focus_lost();
        assert_eq!(s.game().phase(), GamePhase::Paused);

        s.key_down("Escape");
        s.frame(now + TICK);
        assert_eq!(s.game().phase(), GamePhase::Playing);
        let x = s.game().state().player.rect.x;
        s.key_up("Escape");
        s.frame(now + 2.0 * TICK);
        // The right key was forgotten
        assert_eq!(s.game().state().player.rect.x, x);
    }

    #[test]
    fn test_visible_again_does_not_replay_hidden_time() {
        let (mut s, now) = started();
        s.visibility_changed(true);
        assert_eq!(s.game().phase(), GamePhase::Paused);
        s.visibility_changed(false);
        let report = s.frame(now + 60_000.0);
        assert_eq!(report.updates, 0);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let mut s = session();
        assert!(!s.key_down("F5"));
        assert!(s.key_down("KeyA"));
        assert!(!s.key_up("F5"));
    }

    #[test]
    fn test_stop_ends_the_loop() {
        let (mut s, now) = started();
        let frames = s.presenter().frames();
        s.stop();
        assert!(!s.is_running());
        let report = s.frame(now + 10.0 * TICK);
        assert!(report.stopped);
        assert_eq!(s.presenter().frames(), frames);
    }

    #[test]
    fn test_frame_timing_recorded() {
        let (mut s, now) = started();
        s.frame(now + TICK);
        assert_eq!(s.game().state().last_update_ms, now + TICK);
    }
}
