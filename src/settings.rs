//! Game settings and tuning
//!
//! Every tunable the simulation reads lives here. Defaults come from
//! [`crate::consts`]; hosts may override them from JSON.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Viewport ===
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Timing ===
    /// Fixed simulation tick (milliseconds)
    pub tick_ms: f64,
    /// Maximum catch-up updates per display frame
    pub max_catch_up: u32,
    /// Pause between a cleared formation and the next level (ticks)
    pub level_transition_ticks: u32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub initial_lives: u32,

    // === Formation ===
    pub enemy_rows: usize,
    pub enemy_cols: usize,
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_start_x: f32,
    pub enemy_start_y: f32,
    pub enemy_col_pitch: f32,
    pub enemy_row_pitch: f32,
    pub enemy_base_speed: f32,
    pub enemy_speed_per_level: f32,
    pub enemy_max_speed: f32,
    pub enemy_drop: f32,

    // === Projectiles ===
    pub bullet_speed: f32,
    /// Gameplay ceiling on simultaneous bullets (not the pool capacity)
    pub max_active_bullets: usize,
    pub bullet_pool_capacity: usize,

    // === Particles ===
    pub particles_per_explosion: usize,
    pub particle_pool_capacity: usize,
    pub particle_life: u32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    /// RNG seed for cosmetic randomness (None = host picks one)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            tick_ms: TICK_MS,
            max_catch_up: MAX_CATCH_UP,
            level_transition_ticks: LEVEL_TRANSITION_TICKS,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,
            initial_lives: INITIAL_LIVES,

            enemy_rows: ENEMY_ROWS,
            enemy_cols: ENEMY_COLS,
            enemy_width: ENEMY_WIDTH,
            enemy_height: ENEMY_HEIGHT,
            enemy_start_x: ENEMY_START_X,
            enemy_start_y: ENEMY_START_Y,
            enemy_col_pitch: ENEMY_COL_PITCH,
            enemy_row_pitch: ENEMY_ROW_PITCH,
            enemy_base_speed: ENEMY_BASE_SPEED,
            enemy_speed_per_level: ENEMY_SPEED_PER_LEVEL,
            enemy_max_speed: ENEMY_MAX_SPEED,
            enemy_drop: ENEMY_DROP,

            bullet_speed: BULLET_SPEED,
            max_active_bullets: MAX_ACTIVE_BULLETS,
            bullet_pool_capacity: BULLET_POOL_CAPACITY,

            particles_per_explosion: PARTICLES_PER_EXPLOSION,
            particle_pool_capacity: PARTICLE_POOL_CAPACITY,
            particle_life: PARTICLE_LIFE,

            show_fps: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), GameError> {
        fn invalid(msg: &str) -> Result<(), GameError> {
            Err(GameError::InvalidSettings(msg.to_string()))
        }

        if !(self.tick_ms > 0.0) {
            return invalid("tick_ms must be positive");
        }
        if self.max_catch_up == 0 {
            return invalid("max_catch_up must be at least 1");
        }
        if !(self.viewport_width.is_finite() && self.viewport_width > 0.0)
            || !(self.viewport_height.is_finite() && self.viewport_height > 0.0)
        {
            return invalid("viewport must have a positive, finite size");
        }
        if self.player_width < 0.0 || self.player_height < 0.0 {
            return invalid("player size must not be negative");
        }
        if self.player_width > self.viewport_width {
            return invalid("player is wider than the viewport");
        }
        if self.enemy_width < 0.0 || self.enemy_height < 0.0 {
            return invalid("enemy size must not be negative");
        }
        if self.initial_lives == 0 {
            return invalid("initial_lives must be at least 1");
        }
        if !(self.bullet_speed.is_finite() && self.bullet_speed > 0.0) {
            return invalid("bullet_speed must be positive");
        }
        if self.max_active_bullets > self.bullet_pool_capacity {
            return invalid("max_active_bullets exceeds bullet_pool_capacity");
        }
        Ok(())
    }

    /// Horizontal formation speed for a level (1-based)
    pub fn enemy_speed_for_level(&self, level: u32) -> f32 {
        let bonus = level.saturating_sub(1) as f32 * self.enemy_speed_per_level;
        (self.enemy_base_speed + bonus).min(self.enemy_max_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let settings = Settings::from_json(r#"{ "initial_lives": 5, "seed": 7 }"#).unwrap();
        assert_eq!(settings.initial_lives, 5);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.enemy_rows, ENEMY_ROWS);
        assert_eq!(settings.max_active_bullets, MAX_ACTIVE_BULLETS);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let err = Settings::from_json(r#"{ "max_catch_up": 0 }"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidSettings(_)));

        let err = Settings::from_json("not json").unwrap_err();
        assert!(matches!(err, GameError::Settings(_)));
    }

    #[test]
    fn test_bullet_ceiling_must_fit_pool() {
        let settings = Settings {
            max_active_bullets: 10,
            bullet_pool_capacity: 4,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_stalled_bullets_rejected() {
        for speed in [0.0, -3.0, f32::NAN] {
            let settings = Settings {
                bullet_speed: speed,
                ..Default::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(GameError::InvalidSettings(_))
            ));
        }
    }

    #[test]
    fn test_non_finite_viewport_rejected() {
        let settings = Settings {
            viewport_width: f32::NAN,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            viewport_height: f32::INFINITY,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_enemy_speed_scales_and_caps() {
        let settings = Settings::default();
        assert_eq!(settings.enemy_speed_for_level(1), ENEMY_BASE_SPEED);
        assert_eq!(
            settings.enemy_speed_for_level(3),
            ENEMY_BASE_SPEED + 2.0 * ENEMY_SPEED_PER_LEVEL
        );
        assert_eq!(settings.enemy_speed_for_level(1000), ENEMY_MAX_SPEED);
    }
}
