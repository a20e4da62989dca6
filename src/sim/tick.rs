//! Fixed timestep simulation tick
//!
//! Advances the game by one step. Positions are in pixels per tick, so a
//! tick is the unit of simulated time.

use glam::Vec2;

use super::entities::Bullet;
use super::events::GameEvent;
use super::formation::{animate_formation, is_level_complete, lowest_active_edge, step_formation};
use super::game::Game;
use super::geometry::{clamp_to_bounds, is_out_of_viewport, overlaps};
use super::pool::Poolable;
use super::state::GamePhase;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left (held)
    pub left: bool,
    /// Move right (held)
    pub right: bool,
    /// Fire (edge)
    pub fire: bool,
    /// Pause toggle (edge)
    pub pause: bool,
    /// Start / restart (edge)
    pub confirm: bool,
}

impl TickInput {
    /// Fold in a newer frame's input: held state is replaced, edges are
    /// kept until a tick consumes them
    pub fn merge(&mut self, newer: &TickInput) {
        self.left = newer.left;
        self.right = newer.right;
        self.fire |= newer.fire;
        self.pause |= newer.pause;
        self.confirm |= newer.confirm;
    }

    /// Drop one-shot inputs once a tick has consumed them
    pub fn clear_edges(&mut self) {
        self.fire = false;
        self.pause = false;
        self.confirm = false;
    }
}

impl Game {
    /// Advance the game state by one fixed timestep
    pub fn tick(&mut self, input: &TickInput) {
        match self.state.phase {
            GamePhase::Start => {
                if input.confirm || input.fire {
                    self.start();
                }
                return;
            }
            // Fire may still be held from the last fight; only confirm restarts
            GamePhase::GameOver => {
                if input.confirm {
                    self.start();
                }
                return;
            }
            GamePhase::Paused => {
                if input.pause {
                    self.resume_game();
                }
                return;
            }
            GamePhase::LevelComplete => {
                self.tick_transition();
                return;
            }
            GamePhase::Playing => {}
        }

        if input.pause {
            self.pause_game();
            return;
        }

        self.state.ticks += 1;

        // Player movement
        let direction = input.right as i8 - input.left as i8;
        if direction != 0 {
            let player = &mut self.state.player;
            let x = player.rect.x + player.speed * direction as f32;
            player.rect.x = clamp_to_bounds(x, player.rect.width, self.settings.viewport_width);
        }

        if input.fire {
            self.try_shoot();
        }

        self.update_projectiles();

        step_formation(
            &mut self.state.enemies,
            self.settings.viewport_width,
            self.settings.enemy_drop,
        );
        animate_formation(&mut self.state.enemies, self.state.ticks);

        self.resolve_bullet_hits();

        if self.formation_reached_player() {
            self.lose_life();
            return;
        }

        if is_level_complete(&self.state.enemies) {
            self.complete_level();
        }
    }

    /// Let effects play out, then start the next level
    fn tick_transition(&mut self) {
        self.state.ticks += 1;
        self.update_projectiles();

        self.state.transition_ticks = self.state.transition_ticks.saturating_sub(1);
        if self.state.transition_ticks == 0 {
            self.next_level();
        }
    }

    /// Self-update bullets and particles, then reclaim the dead ones
    fn update_projectiles(&mut self) {
        let (width, height) = (self.settings.viewport_width, self.settings.viewport_height);
        self.bullets.update_active(|bullet| {
            bullet.update();
            if is_out_of_viewport(&bullet.rect, width, height) {
                bullet.active = false;
            }
        });
        self.bullets.reap_inactive();
        self.update_particles();
    }

    /// Bullets against the formation: each bullet destroys at most one enemy
    fn resolve_bullet_hits(&mut self) {
        let mut destroyed = Vec::new();
        let enemies = &mut self.state.enemies;

        self.bullets.update_active(|bullet: &mut Bullet| {
            if !bullet.is_active() {
                return;
            }
            if let Some(enemy) = enemies
                .iter_mut()
                .find(|e| e.active && overlaps(&bullet.rect, &e.rect))
            {
                bullet.active = false;
                enemy.active = false;
                destroyed.push((enemy.row, enemy.col, enemy.kind, enemy.rect.center()));
            }
        });

        for (row, col, kind, (cx, cy)) in destroyed {
            let points = kind.points();
            self.add_score(points);
            self.emit(GameEvent::EnemyDestroyed {
                row,
                col,
                kind,
                points,
            });
            self.spawn_explosion(Vec2::new(cx, cy), kind.color());
        }
    }

    /// An active enemy touching the cannon or reaching its row
    fn formation_reached_player(&self) -> bool {
        let player = &self.state.player.rect;
        let Some(lowest) = lowest_active_edge(&self.state.enemies) else {
            return false;
        };
        lowest >= player.y
            || self
                .state
                .enemies
                .iter()
                .any(|e| e.active && overlaps(&e.rect, player))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::settings::Settings;
    use crate::sim::entities::Direction;

    fn playing_game() -> Game {
        let mut game = Game::new(Settings::default(), 12345).unwrap();
        game.start();
        game
    }

    fn fire() -> TickInput {
        TickInput {
            fire: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_confirm_starts_game() {
        let mut game = Game::new(Settings::default(), 1).unwrap();
        game.tick(&TickInput::default());
        assert_eq!(game.phase(), GamePhase::Start);

        game.tick(&TickInput {
            confirm: true,
            ..Default::default()
        });
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().enemies.len(), 50);
    }

    #[test]
    fn test_merge_keeps_edges_and_replaces_held() {
        let mut pending = TickInput {
            left: true,
            fire: true,
            ..Default::default()
        };
        pending.merge(&TickInput {
            right: true,
            pause: true,
            ..Default::default()
        });
        assert_eq!(
            pending,
            TickInput {
                left: false,
                right: true,
                fire: true,
                pause: true,
                confirm: false,
            }
        );

        pending.clear_edges();
        assert!(!pending.fire && !pending.pause);
        assert!(pending.right);
    }

    #[test]
    fn test_fire_does_not_skip_game_over() {
        let mut game = playing_game();
        for _ in 0..3 {
            game.lose_life();
        }
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.tick(&fire());
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.lives(), 0);

        game.tick(&TickInput {
            confirm: true,
            ..Default::default()
        });
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.lives(), 3);
    }

    #[test]
    fn test_tick_pause() {
        let mut game = playing_game();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        game.tick(&pause);
        assert_eq!(game.phase(), GamePhase::Paused);

        // Nothing moves while paused
        let x = game.state().enemies[0].rect.x;
        game.tick(&TickInput::default());
        assert_eq!(game.state().enemies[0].rect.x, x);

        game.tick(&pause);
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let mut game = playing_game();
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        game.tick(&left);
        assert_eq!(game.state().player.rect.x, 370.0);

        for _ in 0..200 {
            game.tick(&left);
            if game.phase() != GamePhase::Playing {
                break;
            }
        }
        assert_eq!(game.state().player.rect.x, 0.0);
    }

    #[test]
    fn test_formation_marches_each_tick() {
        let mut game = playing_game();
        let x = game.state().enemies[0].rect.x;
        game.tick(&TickInput::default());
        assert_eq!(game.state().enemies[0].rect.x, x + 1.0);
    }

    #[test]
    fn test_bullet_destroys_enemy_and_scores() {
        let mut game = playing_game();
        let events = Rc::new(RefCell::new(Vec::new()));
        {
            let events = events.clone();
            game.events().domain.subscribe(move |e| {
                events.borrow_mut().push(*e);
                Ok(())
            });
        }

        // Park the cannon under the bottom-left enemy and freeze the formation
        for enemy in &mut game.state.enemies {
            enemy.speed = 0.0;
        }
        let target = game
            .state
            .enemies
            .iter()
            .find(|e| e.row == 4 && e.col == 0)
            .unwrap()
            .rect;
        game.state.player.rect.x = target.x + target.width / 2.0 - game.state.player.rect.width / 2.0;

        game.tick(&fire());
        for _ in 0..80 {
            game.tick(&TickInput::default());
        }

        assert_eq!(game.state().enemies_remaining(), 49);
        assert_eq!(game.score(), 10);
        assert!(events.borrow().iter().any(|e| matches!(
            e,
            GameEvent::EnemyDestroyed {
                row: 4,
                col: 0,
                points: 10,
                ..
            }
        )));
        // The bullet was spent on the hit
        assert_eq!(game.active_bullets(), 0);
    }

    #[test]
    fn test_explosion_particles_fade_out() {
        let mut game = playing_game();
        for enemy in &mut game.state.enemies {
            enemy.speed = 0.0;
        }
        let target = game.state.enemies[40].rect;
        game.state.player.rect.x = target.x + 10.0;
        game.tick(&fire());

        let mut peak = 0;
        for _ in 0..200 {
            game.tick(&TickInput::default());
            peak = peak.max(game.active_particles());
        }
        assert_eq!(peak, 10);
        assert_eq!(game.active_particles(), 0);
        assert_eq!(game.particles().active_count(), 0);
    }

    #[test]
    fn test_missed_bullet_is_reaped() {
        let mut game = playing_game();
        // Empty column of sky on the far right
        game.state.player.rect.x = 740.0;
        for enemy in &mut game.state.enemies {
            enemy.speed = 0.0;
        }
        game.tick(&fire());
        assert_eq!(game.bullets().active_count(), 1);

        for _ in 0..80 {
            game.tick(&TickInput::default());
        }
        assert_eq!(game.bullets().active_count(), 0);
        assert_eq!(game.bullets().free_count(), 1);
    }

    #[test]
    fn test_invasion_costs_a_life() {
        let mut game = playing_game();
        for enemy in &mut game.state.enemies {
            enemy.rect.y += 400.0;
        }
        game.tick(&TickInput::default());
        assert_eq!(game.lives(), 2);
        // Fresh formation back at the top
        assert_eq!(game.state().enemies[0].rect.y, game.settings().enemy_start_y);
    }

    #[test]
    fn test_cleared_formation_transitions_to_next_level() {
        let settings = Settings {
            level_transition_ticks: 3,
            ..Default::default()
        };
        let mut game = Game::new(settings, 9).unwrap();
        game.start();
        game.add_score(40);
        for enemy in &mut game.state.enemies {
            enemy.active = false;
        }

        game.tick(&TickInput::default());
        assert_eq!(game.phase(), GamePhase::LevelComplete);
        assert_eq!(game.level(), 1);

        // Pause is ignored during the transition
        game.tick(&TickInput {
            pause: true,
            ..Default::default()
        });
        assert_eq!(game.phase(), GamePhase::LevelComplete);

        game.tick(&TickInput::default());
        game.tick(&TickInput::default());
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.level(), 2);
        assert_eq!(game.score(), 40);
        assert_eq!(game.state().enemies_remaining(), 50);
    }

    #[test]
    fn test_formation_bounces_off_wall() {
        let mut game = playing_game();
        for _ in 0..200 {
            game.tick(&TickInput::default());
            if game.state().enemies[0].direction == Direction::Left {
                break;
            }
        }
        assert_eq!(game.state().enemies[0].direction, Direction::Left);
        assert_eq!(
            game.state().enemies[0].rect.y,
            game.settings().enemy_start_y + game.settings().enemy_drop
        );
    }

    #[test]
    fn test_determinism() {
        // Two games with the same seed produce identical results
        let mut a = playing_game();
        let mut b = playing_game();
        let inputs = [
            fire(),
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput::default(),
            fire(),
        ];

        for _ in 0..100 {
            for input in &inputs {
                a.tick(input);
                b.tick(input);
            }
        }

        assert_eq!(a.state().ticks, b.state().ticks);
        assert_eq!(a.score(), b.score());
        assert_eq!(a.state().player.rect, b.state().player.rect);
        let pa: Vec<Vec2> = a.particles().active_view().map(|p| p.pos).collect();
        let pb: Vec<Vec2> = b.particles().active_view().map(|p| p.pos).collect();
        assert_eq!(pa, pb);
    }
}
