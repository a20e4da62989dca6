//! Presenter that draws nothing
//!
//! Used by the native driver and tests. It records what it was asked to
//! show so callers can inspect the last frame.

use super::{Presenter, Screen, Snapshot};
use crate::error::GameError;

/// Summary of the last presented frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameSummary {
    pub enemies: usize,
    pub bullets: usize,
    pub particles: usize,
    pub score: u64,
    pub alpha: f64,
}

#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    counts: [u64; 4],
    last_screen: Option<Screen>,
    last: FrameSummary,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames drawn for a screen
    pub fn count(&self, screen: Screen) -> u64 {
        self.counts[Self::index(screen)]
    }

    /// Frames drawn in total
    pub fn frames(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn last_screen(&self) -> Option<Screen> {
        self.last_screen
    }

    pub fn last_frame(&self) -> FrameSummary {
        self.last
    }

    fn index(screen: Screen) -> usize {
        match screen {
            Screen::Start => 0,
            Screen::Playing => 1,
            Screen::Paused => 2,
            Screen::GameOver => 3,
        }
    }

    fn record(&mut self, screen: Screen, snapshot: &Snapshot) {
        self.counts[Self::index(screen)] += 1;
        self.last_screen = Some(screen);
        self.last = FrameSummary {
            enemies: snapshot.enemies().count(),
            bullets: snapshot.bullets().count(),
            particles: snapshot.particles().count(),
            score: snapshot.state.score,
            alpha: snapshot.alpha,
        };
    }
}

impl Presenter for HeadlessPresenter {
    fn draw_start(&mut self, snapshot: &Snapshot) -> Result<(), GameError> {
        self.record(Screen::Start, snapshot);
        Ok(())
    }

    fn draw_playing(&mut self, snapshot: &Snapshot) -> Result<(), GameError> {
        self.record(Screen::Playing, snapshot);
        Ok(())
    }

    fn draw_paused(&mut self, snapshot: &Snapshot) -> Result<(), GameError> {
        self.record(Screen::Paused, snapshot);
        Ok(())
    }

    fn draw_game_over(&mut self, snapshot: &Snapshot) -> Result<(), GameError> {
        self.record(Screen::GameOver, snapshot);
        Ok(())
    }
}
