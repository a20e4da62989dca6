//! Presentation boundary
//!
//! The core picks which screen to draw from the phase and hands the
//! presenter a read-only [`Snapshot`]. Presenters never mutate game state.

use crate::error::GameError;
use crate::sim::{Bullet, Enemy, Game, GamePhase, GameState, Particle, Pool};

pub mod headless;
pub use headless::HeadlessPresenter;

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPresenter;

/// Read-only view of everything a frame needs
#[derive(Clone, Copy)]
pub struct Snapshot<'a> {
    pub state: &'a GameState,
    pub bullets: &'a Pool<Bullet>,
    pub particles: &'a Pool<Particle>,
    /// Fraction of a tick elapsed since the last update, in [0, 1)
    pub alpha: f64,
    pub show_fps: bool,
}

impl<'a> Snapshot<'a> {
    pub fn new(game: &'a Game, alpha: f64) -> Self {
        Self {
            state: game.state(),
            bullets: game.bullets(),
            particles: game.particles(),
            alpha,
            show_fps: game.settings().show_fps,
        }
    }

    /// Enemies still alive, in grid order
    pub fn enemies(&self) -> impl Iterator<Item = &'a Enemy> {
        self.state.enemies.iter().filter(|e| e.active)
    }

    pub fn bullets(&self) -> impl Iterator<Item = &'a Bullet> {
        self.bullets.active_view()
    }

    pub fn particles(&self) -> impl Iterator<Item = &'a Particle> {
        self.particles.active_view()
    }

    /// The formation was just cleared and the next level is pending
    pub fn level_complete(&self) -> bool {
        self.state.phase == GamePhase::LevelComplete
    }
}

/// Which screen a phase shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Playing,
    Paused,
    GameOver,
}

impl Screen {
    pub fn for_phase(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Start => Screen::Start,
            GamePhase::Playing | GamePhase::LevelComplete => Screen::Playing,
            GamePhase::Paused => Screen::Paused,
            GamePhase::GameOver => Screen::GameOver,
        }
    }
}

/// Something that can draw the four screens
pub trait Presenter {
    fn draw_start(&mut self, snapshot: &Snapshot) -> Result<(), GameError>;
    fn draw_playing(&mut self, snapshot: &Snapshot) -> Result<(), GameError>;
    fn draw_paused(&mut self, snapshot: &Snapshot) -> Result<(), GameError>;
    fn draw_game_over(&mut self, snapshot: &Snapshot) -> Result<(), GameError>;
}

/// Draw the screen selected by the snapshot's phase
pub fn present<P: Presenter + ?Sized>(
    presenter: &mut P,
    snapshot: &Snapshot,
) -> Result<Screen, GameError> {
    let screen = Screen::for_phase(snapshot.state.phase);
    match screen {
        Screen::Start => presenter.draw_start(snapshot)?,
        Screen::Playing => presenter.draw_playing(snapshot)?,
        Screen::Paused => presenter.draw_paused(snapshot)?,
        Screen::GameOver => presenter.draw_game_over(snapshot)?,
    }
    Ok(screen)
}
