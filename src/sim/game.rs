//! Game state machine
//!
//! `Game` is the only mutator of phase, score, lives, level, player and
//! formation. Bullet and particle storage belongs to the pools handed to it
//! at construction; the game only acquires and releases instances.

use std::f32::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entities::{Bullet, Particle};
use super::events::{Events, GameEvent, PhaseChange};
use super::formation::spawn_formation;
use super::pool::Pool;
use super::state::{GamePhase, GameState};
use crate::consts::{BULLET_HEIGHT, BULLET_WIDTH, PARTICLE_MAX_SPEED};
use crate::error::GameError;
use crate::settings::Settings;

/// The game: state, entity pools and event channels
pub struct Game {
    pub(super) settings: Settings,
    pub(super) state: GameState,
    pub(super) bullets: Pool<Bullet>,
    pub(super) particles: Pool<Particle>,
    events: Rc<Events>,
    rng: Pcg32,
    seed: u64,
}

impl Game {
    /// Create a game with pools sized from the settings
    pub fn new(settings: Settings, seed: u64) -> Result<Self, GameError> {
        let bullets = Pool::new(settings.bullet_pool_capacity);
        let particles = Pool::with_prewarm(
            settings.particle_pool_capacity,
            settings.particles_per_explosion,
        );
        Self::with_pools(settings, seed, bullets, particles)
    }

    /// Create a game around caller-provided pools
    pub fn with_pools(
        settings: Settings,
        seed: u64,
        mut bullets: Pool<Bullet>,
        mut particles: Pool<Particle>,
    ) -> Result<Self, GameError> {
        settings.validate()?;
        bullets.release_all();
        particles.release_all();

        Ok(Self {
            state: GameState::new(&settings),
            settings,
            bullets,
            particles,
            events: Rc::new(Events::new()),
            rng: Pcg32::seed_from_u64(seed),
            seed,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bullets(&self) -> &Pool<Bullet> {
        &self.bullets
    }

    pub fn particles(&self) -> &Pool<Particle> {
        &self.particles
    }

    /// Event channels (clone the `Rc` to subscribe from elsewhere)
    pub fn events(&self) -> Rc<Events> {
        self.events.clone()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn lives(&self) -> u32 {
        self.state.lives
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    /// Bullets currently in flight
    pub fn active_bullets(&self) -> usize {
        self.bullets.active_view().count()
    }

    /// Record host frame timing for the HUD
    pub fn set_frame_timing(&mut self, now_ms: f64, fps: u32) {
        self.state.last_update_ms = now_ms;
        self.state.fps = fps;
    }

    pub(super) fn set_phase(&mut self, next: GamePhase) {
        let previous = self.state.phase;
        if previous == next {
            return;
        }
        self.state.phase = next;
        log::info!("Phase {} -> {}", previous.as_str(), next.as_str());
        self.events.phase.emit(&PhaseChange {
            previous,
            current: next,
        });
    }

    pub(super) fn emit(&self, event: GameEvent) {
        self.events.domain.emit(&event);
    }

    /// Fresh formation for the current level, empty pools, player at start
    fn reset_field(&mut self) {
        self.state.enemies = spawn_formation(&self.settings, self.state.level);
        self.bullets.release_all();
        self.particles.release_all();
        self.state.player.respawn(&self.settings);
    }

    /// Begin a new game from initial conditions (also restarts after game over)
    pub fn start(&mut self) {
        self.state.score = 0;
        self.state.lives = self.settings.initial_lives;
        self.state.player.lives = self.state.lives;
        self.state.level = 1;
        self.state.ticks = 0;
        self.state.transition_ticks = 0;
        self.reset_field();
        log::info!("New game (seed {})", self.seed);
        self.set_phase(GamePhase::Playing);
    }

    /// Pause; only valid while playing
    pub fn pause_game(&mut self) -> bool {
        if self.state.phase != GamePhase::Playing {
            return false;
        }
        self.set_phase(GamePhase::Paused);
        true
    }

    /// Resume; only valid while paused
    pub fn resume_game(&mut self) -> bool {
        if self.state.phase != GamePhase::Paused {
            return false;
        }
        self.set_phase(GamePhase::Playing);
        true
    }

    /// Pause when playing, resume when paused
    pub fn toggle_pause(&mut self) -> bool {
        self.pause_game() || self.resume_game()
    }

    /// Take a life from the player
    ///
    /// Only acts while playing. The last life ends the run; otherwise the
    /// field is reset while score and level carry over.
    pub fn lose_life(&mut self) {
        if self.state.phase != GamePhase::Playing {
            return;
        }

        self.state.lives = self.state.lives.saturating_sub(1);
        self.state.player.lives = self.state.lives;
        self.emit(GameEvent::PlayerHit {
            lives_left: self.state.lives,
        });

        if self.state.lives == 0 {
            self.state.player.active = false;
            self.set_phase(GamePhase::GameOver);
            self.emit(GameEvent::GameOver {
                score: self.state.score,
                level: self.state.level,
            });
        } else {
            self.reset_field();
        }
    }

    /// Advance to the next level, keeping score and lives
    pub fn next_level(&mut self) {
        self.state.level += 1;
        self.state.transition_ticks = 0;
        self.reset_field();
        log::info!("Level {}", self.state.level);
        self.set_phase(GamePhase::Playing);
    }

    /// Enter the level-complete transition
    pub(super) fn complete_level(&mut self) {
        self.state.transition_ticks = self.settings.level_transition_ticks;
        self.set_phase(GamePhase::LevelComplete);
        self.emit(GameEvent::LevelComplete {
            level: self.state.level,
        });
    }

    pub fn add_score(&mut self, points: u64) {
        self.state.score = self.state.score.saturating_add(points);
    }

    /// Fire a bullet if the gameplay ceiling and the pool allow it
    pub fn try_shoot(&mut self) -> bool {
        if self.state.phase != GamePhase::Playing {
            return false;
        }
        if self.active_bullets() >= self.settings.max_active_bullets {
            return false;
        }

        let (x, y) = self.state.player.muzzle(BULLET_WIDTH, BULLET_HEIGHT);
        let speed = self.settings.bullet_speed;
        let fired = self
            .bullets
            .acquire_with(|b| b.fire(x, y, BULLET_WIDTH, BULLET_HEIGHT, speed));
        if fired.is_none() {
            log::debug!("Bullet pool exhausted");
            return false;
        }

        self.emit(GameEvent::Shot);
        true
    }

    /// Burst of particles around a point; stops early if the pool runs dry
    pub(super) fn spawn_explosion(&mut self, center: Vec2, color: u32) {
        let life = self.settings.particle_life;
        for _ in 0..self.settings.particles_per_explosion {
            let angle = self.rng.random_range(0.0..TAU);
            let speed = self.rng.random_range(0.5..PARTICLE_MAX_SPEED);
            let vel = Vec2::from_angle(angle) * speed;
            if self
                .particles
                .acquire_with(|p| p.spawn(center, vel, life, color))
                .is_none()
            {
                log::debug!("Particle pool exhausted");
                break;
            }
        }
    }

    /// Self-update particles and reclaim the expired ones
    pub(super) fn update_particles(&mut self) {
        self.particles.update_active(Particle::update);
        self.particles.reap_inactive();
    }

    /// Number of live particles
    pub fn active_particles(&self) -> usize {
        self.particles.active_view().count()
    }
}
