//! Enemy formation: grid layout and lock-step march
//!
//! The formation moves as one rigid body. If any member would reach either
//! side wall, the whole formation reverses and drops instead of stepping.

use serde::{Deserialize, Serialize};

use super::entities::{Direction, Enemy, EnemyKind};
use super::geometry::Rect;
use crate::consts::ENEMY_ANIM_TICKS;
use crate::settings::Settings;

/// What the formation did on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormationStep {
    /// Every active enemy moved horizontally
    Advanced,
    /// Direction flipped and every active enemy moved down
    Dropped,
    /// No active enemies
    Idle,
}

/// Build a fresh, fully active grid for a level (1-based)
pub fn spawn_formation(settings: &Settings, level: u32) -> Vec<Enemy> {
    let speed = settings.enemy_speed_for_level(level);
    let mut enemies = Vec::with_capacity(settings.enemy_rows * settings.enemy_cols);

    for row in 0..settings.enemy_rows {
        for col in 0..settings.enemy_cols {
            enemies.push(Enemy {
                rect: Rect::new(
                    settings.enemy_start_x + col as f32 * settings.enemy_col_pitch,
                    settings.enemy_start_y + row as f32 * settings.enemy_row_pitch,
                    settings.enemy_width,
                    settings.enemy_height,
                ),
                speed,
                direction: Direction::Right,
                anim_frame: 0,
                row,
                col,
                kind: EnemyKind::for_row(row),
                active: true,
            });
        }
    }

    enemies
}

/// Advance the formation by one tick
///
/// The wall test is inclusive: a projected x of exactly `0` or exactly
/// `viewport_width - enemy.width` triggers the drop.
pub fn step_formation(enemies: &mut [Enemy], viewport_width: f32, drop_distance: f32) -> FormationStep {
    let mut any_active = false;
    let mut hits_wall = false;

    for enemy in enemies.iter().filter(|e| e.active) {
        any_active = true;
        let next_x = enemy.rect.x + enemy.speed * enemy.direction.sign();
        if next_x <= 0.0 || next_x >= viewport_width - enemy.rect.width {
            hits_wall = true;
            break;
        }
    }

    if !any_active {
        return FormationStep::Idle;
    }

    if hits_wall {
        for enemy in enemies.iter_mut().filter(|e| e.active) {
            enemy.direction = enemy.direction.flipped();
            enemy.rect.y += drop_distance;
        }
        FormationStep::Dropped
    } else {
        for enemy in enemies.iter_mut().filter(|e| e.active) {
            enemy.rect.x += enemy.speed * enemy.direction.sign();
        }
        FormationStep::Advanced
    }
}

/// Flip the march animation frame every [`ENEMY_ANIM_TICKS`] ticks
pub fn animate_formation(enemies: &mut [Enemy], ticks: u64) {
    if ticks == 0 || ticks % ENEMY_ANIM_TICKS != 0 {
        return;
    }
    for enemy in enemies.iter_mut().filter(|e| e.active) {
        enemy.anim_frame ^= 1;
    }
}

/// True when no enemy is left standing (an empty grid counts as cleared)
pub fn is_level_complete(enemies: &[Enemy]) -> bool {
    enemies.iter().all(|e| !e.active)
}

/// Bottom edge of the lowest active enemy
pub fn lowest_active_edge(enemies: &[Enemy]) -> Option<f32> {
    enemies
        .iter()
        .filter(|e| e.active)
        .map(|e| e.rect.bottom())
        .reduce(f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(x: f32, speed: f32, direction: Direction) -> Enemy {
        Enemy {
            rect: Rect::new(x, 100.0, 40.0, 30.0),
            speed,
            direction,
            anim_frame: 0,
            row: 0,
            col: 0,
            kind: EnemyKind::Scout,
            active: true,
        }
    }

    #[test]
    fn test_spawn_full_grid() {
        let settings = Settings::default();
        let enemies = spawn_formation(&settings, 1);
        assert_eq!(enemies.len(), 50);
        assert!(enemies.iter().all(|e| e.active));

        let first = &enemies[0];
        assert_eq!((first.row, first.col), (0, 0));
        assert_eq!(first.rect.x, settings.enemy_start_x);
        assert_eq!(first.rect.y, settings.enemy_start_y);

        let below = enemies.iter().find(|e| e.row == 1 && e.col == 0).unwrap();
        assert_eq!(below.rect.x, first.rect.x);
        assert_eq!(below.rect.y - first.rect.y, settings.enemy_row_pitch);
    }

    #[test]
    fn test_spawn_speed_follows_level() {
        let settings = Settings::default();
        let level_one = spawn_formation(&settings, 1);
        let level_three = spawn_formation(&settings, 3);
        assert!(level_three[0].speed > level_one[0].speed);
    }

    #[test]
    fn test_step_advances_all_active() {
        let mut enemies = vec![
            single(100.0, 2.0, Direction::Right),
            single(200.0, 2.0, Direction::Right),
        ];
        assert_eq!(step_formation(&mut enemies, 800.0, 20.0), FormationStep::Advanced);
        assert_eq!(enemies[0].rect.x, 102.0);
        assert_eq!(enemies[1].rect.x, 202.0);
        assert_eq!(enemies[0].rect.y, 100.0);
    }

    #[test]
    fn test_one_enemy_at_wall_drops_whole_formation() {
        // Right wall is at 800 - 40 = 760
        let mut enemies = vec![
            single(100.0, 2.0, Direction::Right),
            single(759.0, 2.0, Direction::Right),
        ];
        assert_eq!(step_formation(&mut enemies, 800.0, 20.0), FormationStep::Dropped);
        for enemy in &enemies {
            assert_eq!(enemy.direction, Direction::Left);
            assert_eq!(enemy.rect.y, 120.0);
        }
        // No horizontal movement on a drop tick
        assert_eq!(enemies[0].rect.x, 100.0);
        assert_eq!(enemies[1].rect.x, 759.0);

        // Next tick marches left
        assert_eq!(step_formation(&mut enemies, 800.0, 20.0), FormationStep::Advanced);
        assert_eq!(enemies[0].rect.x, 98.0);
    }

    #[test]
    fn test_wall_check_is_inclusive() {
        // Lands exactly on the right wall
        let mut enemies = vec![single(758.0, 2.0, Direction::Right)];
        assert_eq!(step_formation(&mut enemies, 800.0, 20.0), FormationStep::Dropped);

        // Lands exactly on the left wall
        let mut enemies = vec![single(2.0, 2.0, Direction::Left)];
        assert_eq!(step_formation(&mut enemies, 800.0, 20.0), FormationStep::Dropped);

        // Two pixels short of the wall
        let mut enemies = vec![single(756.0, 2.0, Direction::Right)];
        assert_eq!(step_formation(&mut enemies, 800.0, 20.0), FormationStep::Advanced);
    }

    #[test]
    fn test_inactive_enemies_ignored() {
        let mut enemies = vec![
            single(100.0, 2.0, Direction::Right),
            single(759.0, 2.0, Direction::Right),
        ];
        enemies[1].active = false;

        assert_eq!(step_formation(&mut enemies, 800.0, 20.0), FormationStep::Advanced);
        assert_eq!(enemies[0].rect.x, 102.0);
        // Untouched
        assert_eq!(enemies[1].rect.x, 759.0);
        assert_eq!(enemies[1].rect.y, 100.0);
        assert_eq!(enemies[1].direction, Direction::Right);
    }

    #[test]
    fn test_idle_when_nothing_active() {
        let mut enemies: Vec<Enemy> = Vec::new();
        assert_eq!(step_formation(&mut enemies, 800.0, 20.0), FormationStep::Idle);

        let mut enemies = vec![single(100.0, 2.0, Direction::Right)];
        enemies[0].active = false;
        assert_eq!(step_formation(&mut enemies, 800.0, 20.0), FormationStep::Idle);
    }

    #[test]
    fn test_level_complete() {
        assert!(is_level_complete(&[]));

        let mut enemies = vec![
            single(100.0, 1.0, Direction::Right),
            single(200.0, 1.0, Direction::Right),
        ];
        assert!(!is_level_complete(&enemies));
        enemies[0].active = false;
        assert!(!is_level_complete(&enemies));
        enemies[1].active = false;
        assert!(is_level_complete(&enemies));
    }

    #[test]
    fn test_animation_toggles_on_interval() {
        let mut enemies = vec![single(100.0, 1.0, Direction::Right)];
        animate_formation(&mut enemies, 1);
        assert_eq!(enemies[0].anim_frame, 0);
        animate_formation(&mut enemies, ENEMY_ANIM_TICKS);
        assert_eq!(enemies[0].anim_frame, 1);
        animate_formation(&mut enemies, ENEMY_ANIM_TICKS * 2);
        assert_eq!(enemies[0].anim_frame, 0);
    }

    #[test]
    fn test_lowest_active_edge() {
        let mut enemies = vec![
            single(100.0, 1.0, Direction::Right),
            single(200.0, 1.0, Direction::Right),
        ];
        enemies[1].rect.y = 300.0;
        assert_eq!(lowest_active_edge(&enemies), Some(330.0));
        enemies[1].active = false;
        assert_eq!(lowest_active_edge(&enemies), Some(130.0));
        enemies[0].active = false;
        assert_eq!(lowest_active_edge(&enemies), None);
    }
}
