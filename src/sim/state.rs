//! Game state and core simulation types
//!
//! Everything the state machine owns directly. Bullets and particles are not
//! here; they live in their pools.

use serde::{Deserialize, Serialize};

use super::entities::{Enemy, Player};
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the first start
    Start,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended; terminal until restart
    GameOver,
    /// Formation cleared; next level begins after a short delay
    LevelComplete,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Start => "start",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameOver",
            GamePhase::LevelComplete => "levelComplete",
        }
    }
}

/// Complete state owned by the state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    /// Score (only reset by a new game)
    pub score: u64,
    /// Remaining lives
    pub lives: u32,
    /// Current level (1-based)
    pub level: u32,
    /// Formation, including destroyed (inactive) members
    pub enemies: Vec<Enemy>,
    /// Player cannon
    pub player: Player,
    /// Simulation tick counter
    pub ticks: u64,
    /// Ticks left in the level-complete transition
    pub transition_ticks: u32,
    /// Host timestamp of the last simulation update (ms)
    pub last_update_ms: f64,
    /// Measured display frame rate
    pub fps: u32,
}

impl GameState {
    /// Title-screen state: full lives, no formation yet
    pub fn new(settings: &Settings) -> Self {
        Self {
            phase: GamePhase::Start,
            score: 0,
            lives: settings.initial_lives,
            level: 1,
            enemies: Vec::new(),
            player: Player::new(settings),
            ticks: 0,
            transition_ticks: 0,
            last_update_ms: 0.0,
            fps: 0,
        }
    }

    /// Number of enemies still standing
    pub fn enemies_remaining(&self) -> usize {
        self.enemies.iter().filter(|e| e.active).count()
    }
}
