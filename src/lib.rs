//! Pixel Invaders - A fixed-formation arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, pools, formation, collisions, game state)
//! - `platform`: Host-facing input latch and fixed-timestep scheduler
//! - `session`: Per-frame glue between host, scheduler, game and presenter
//! - `render`: Presentation boundary (phase-selected screens over a snapshot)
//! - `audio`: Audio cues derived from domain events
//! - `settings`: Data-driven game tuning

pub mod audio;
pub mod error;
pub mod platform;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
///
/// These are the defaults behind [`Settings`]; the simulation reads the
/// settings instance so hosts can override them.
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    /// Maximum catch-up updates per display frame to prevent spiral of death
    pub const MAX_CATCH_UP: u32 = 5;

    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    /// Horizontal speed (pixels per tick)
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Gap between the player's bottom edge and the viewport bottom
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;
    pub const INITIAL_LIVES: u32 = 3;

    /// Enemy grid defaults
    pub const ENEMY_ROWS: usize = 5;
    pub const ENEMY_COLS: usize = 10;
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 30.0;
    pub const ENEMY_START_X: f32 = 80.0;
    pub const ENEMY_START_Y: f32 = 60.0;
    pub const ENEMY_COL_PITCH: f32 = 60.0;
    pub const ENEMY_ROW_PITCH: f32 = 50.0;
    /// Horizontal formation speed at level 1 (pixels per tick)
    pub const ENEMY_BASE_SPEED: f32 = 1.0;
    pub const ENEMY_SPEED_PER_LEVEL: f32 = 0.25;
    pub const ENEMY_MAX_SPEED: f32 = 4.0;
    /// Vertical drop on a formation bounce
    pub const ENEMY_DROP: f32 = 20.0;
    /// Ticks between march animation frames
    pub const ENEMY_ANIM_TICKS: u64 = 30;

    /// Bullet defaults
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 12.0;
    /// Upward speed (pixels per tick)
    pub const BULLET_SPEED: f32 = 8.0;
    /// Gameplay ceiling on simultaneous player bullets
    pub const MAX_ACTIVE_BULLETS: usize = 5;
    /// Backing storage for bullets (above the gameplay ceiling)
    pub const BULLET_POOL_CAPACITY: usize = 20;

    /// Particle defaults
    pub const PARTICLES_PER_EXPLOSION: usize = 10;
    pub const PARTICLE_POOL_CAPACITY: usize = 200;
    /// Particle lifetime in ticks
    pub const PARTICLE_LIFE: u32 = 30;
    pub const PARTICLE_MAX_SPEED: f32 = 3.0;

    /// Pause between clearing a formation and the next level (1.5 seconds)
    pub const LEVEL_TRANSITION_TICKS: u32 = 90;
}
