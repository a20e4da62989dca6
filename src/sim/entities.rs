//! Entity records
//!
//! Plain data sharing a [`Rect`] for geometry. Bullets and particles
//! implement [`Poolable`] so their storage can be recycled.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::pool::Poolable;
use crate::consts::PLAYER_BOTTOM_MARGIN;
use crate::settings::Settings;

/// The player's cannon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Horizontal speed (pixels per tick)
    pub speed: f32,
    pub lives: u32,
    pub active: bool,
}

impl Player {
    pub fn new(settings: &Settings) -> Self {
        let mut player = Self {
            rect: Rect::new(0.0, 0.0, settings.player_width, settings.player_height),
            speed: settings.player_speed,
            lives: settings.initial_lives,
            active: true,
        };
        player.respawn(settings);
        player
    }

    /// Move back to the start position (bottom center)
    pub fn respawn(&mut self, settings: &Settings) {
        self.rect.x = (settings.viewport_width - self.rect.width) / 2.0;
        self.rect.y = settings.viewport_height - self.rect.height - PLAYER_BOTTOM_MARGIN;
        self.active = true;
    }

    /// Where a fired bullet starts: centered on the cannon, just above it
    pub fn muzzle(&self, bullet_width: f32, bullet_height: f32) -> (f32, f32) {
        let (cx, _) = self.rect.center();
        (cx - bullet_width / 2.0, self.rect.y - bullet_height)
    }
}

/// Horizontal march direction of the formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// -1 for left, +1 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Enemy variants, assigned by grid row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Top row, small
    Scout,
    /// Middle rows
    Soldier,
    /// Bottom rows, large
    Brute,
}

impl EnemyKind {
    /// Kind for a grid row
    pub fn for_row(row: usize) -> Self {
        match row {
            0 => EnemyKind::Scout,
            1 | 2 => EnemyKind::Soldier,
            _ => EnemyKind::Brute,
        }
    }

    /// Score awarded for destroying one
    pub fn points(self) -> u64 {
        match self {
            EnemyKind::Scout => 30,
            EnemyKind::Soldier => 20,
            EnemyKind::Brute => 10,
        }
    }

    /// Explosion color (0xRRGGBB)
    pub fn color(self) -> u32 {
        match self {
            EnemyKind::Scout => 0xff4fd8,
            EnemyKind::Soldier => 0x4fd8ff,
            EnemyKind::Brute => 0x7cff4f,
        }
    }
}

/// A formation member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    /// Horizontal speed (pixels per tick)
    pub speed: f32,
    pub direction: Direction,
    /// Two-frame march animation (0 or 1)
    pub anim_frame: u8,
    /// Grid row (layout identifier only)
    pub row: usize,
    /// Grid column (layout identifier only)
    pub col: usize,
    pub kind: EnemyKind,
    pub active: bool,
}

/// A player projectile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bullet {
    pub rect: Rect,
    /// Upward speed (pixels per tick)
    pub speed: f32,
    pub active: bool,
}

impl Bullet {
    /// Launch from a position
    pub fn fire(&mut self, x: f32, y: f32, width: f32, height: f32, speed: f32) {
        self.rect = Rect::new(x, y, width, height);
        self.speed = speed;
        self.active = true;
    }

    /// Advance one tick
    pub fn update(&mut self) {
        if self.active {
            self.rect.y -= self.speed;
        }
    }

    /// Vertical position extrapolated `alpha` of a tick ahead (for rendering)
    pub fn interpolated_y(&self, alpha: f32) -> f32 {
        self.rect.y - self.speed * alpha
    }
}

impl Poolable for Bullet {
    /// Live until hit or fully above the viewport
    fn is_active(&self) -> bool {
        self.active && self.rect.y >= -self.rect.height
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A cosmetic explosion fragment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining ticks
    pub life: u32,
    /// Lifetime at spawn (for fading)
    pub max_life: u32,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f32,
}

/// Velocity retained per tick
const PARTICLE_DRAG: f32 = 0.95;

impl Particle {
    pub fn spawn(&mut self, pos: Vec2, vel: Vec2, life: u32, color: u32) {
        self.pos = pos;
        self.vel = vel;
        self.life = life;
        self.max_life = life;
        self.color = color;
        self.size = 3.0;
    }

    /// Advance one tick
    pub fn update(&mut self) {
        if self.life == 0 {
            return;
        }
        self.pos += self.vel;
        self.vel *= PARTICLE_DRAG;
        self.life -= 1;
    }

    /// Remaining life as 0..=1 (for alpha fading)
    pub fn fade(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

impl Poolable for Particle {
    fn is_active(&self) -> bool {
        self.life > 0
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
