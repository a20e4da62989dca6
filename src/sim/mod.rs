//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (grid order for enemies, acquisition order for pools)
//! - No rendering or platform dependencies

pub mod entities;
pub mod events;
pub mod formation;
pub mod game;
pub mod geometry;
pub mod pool;
pub mod state;
pub mod tick;

pub use entities::{Bullet, Direction, Enemy, EnemyKind, Particle, Player};
pub use events::{
    Emitter, Events, GameEvent, ListenerError, ListenerResult, PhaseChange, Subscription,
};
pub use formation::{
    FormationStep, animate_formation, is_level_complete, lowest_active_edge, spawn_formation,
    step_formation,
};
pub use game::Game;
pub use geometry::{Rect, clamp_to_bounds, is_out_of_viewport, overlaps};
pub use pool::{Handle, Pool, Poolable};
pub use state::{GamePhase, GameState};
pub use tick::TickInput;
