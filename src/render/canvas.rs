//! Canvas 2D presenter for the browser build

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Presenter, Snapshot};
use crate::error::GameError;
use crate::sim::{Enemy, Player};

const BACKGROUND: &str = "#05060f";
const PLAYER_COLOR: &str = "#7cff4f";
const BULLET_COLOR: &str = "#ffffff";
const TEXT_COLOR: &str = "#e8e8ff";
const HUD_FONT: &str = "16px monospace";
const TITLE_FONT: &str = "bold 40px monospace";

fn css_color(rgb: u32) -> String {
    format!("#{:06x}", rgb & 0x00ff_ffff)
}

fn js_err(context: &str, err: JsValue) -> GameError {
    GameError::Render(format!("{context}: {err:?}"))
}

pub struct CanvasPresenter {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasPresenter {
    /// Attach to a canvas, sizing it to the viewport
    pub fn new(canvas: &HtmlCanvasElement, width: f32, height: f32) -> Result<Self, GameError> {
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let ctx = canvas
            .get_context("2d")
            .map_err(|e| GameError::Surface(format!("getContext failed: {e:?}")))?
            .ok_or_else(|| GameError::Surface("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GameError::Surface("not a 2d context".into()))?;

        log::info!("Canvas presenter ready ({}x{})", width, height);
        Ok(Self {
            ctx,
            width: width as f64,
            height: height as f64,
        })
    }

    fn clear(&self) {
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn text(&self, text: &str, x: f64, y: f64, font: &str, align: &str) -> Result<(), GameError> {
        self.ctx.set_font(font);
        self.ctx.set_text_align(align);
        self.ctx.set_fill_style_str(TEXT_COLOR);
        self.ctx
            .fill_text(text, x, y)
            .map_err(|e| js_err("fillText", e))
    }

    fn centered(&self, text: &str, dy: f64, font: &str) -> Result<(), GameError> {
        self.text(text, self.width / 2.0, self.height / 2.0 + dy, font, "center")
    }

    /// Translucent layer over the field for overlay screens
    fn dim(&self) {
        self.ctx.set_global_alpha(0.6);
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
        self.ctx.set_global_alpha(1.0);
    }

    fn draw_player(&self, player: &Player) {
        if !player.active {
            return;
        }
        let r = &player.rect;
        let (x, y, w, h) = (r.x as f64, r.y as f64, r.width as f64, r.height as f64);
        self.ctx.set_fill_style_str(PLAYER_COLOR);
        // Base and turret
        self.ctx.fill_rect(x, y + h * 0.4, w, h * 0.6);
        self.ctx.fill_rect(x + w * 0.4, y, w * 0.2, h * 0.4);
    }

    fn draw_enemy(&self, enemy: &Enemy) {
        let r = &enemy.rect;
        let (x, y, w, h) = (r.x as f64, r.y as f64, r.width as f64, r.height as f64);
        self.ctx.set_fill_style_str(&css_color(enemy.kind.color()));
        self.ctx.fill_rect(x + w * 0.15, y, w * 0.7, h * 0.7);

        // Two-frame march: legs splay out or tuck in
        let (left, right) = if enemy.anim_frame == 0 {
            (x, x + w * 0.8)
        } else {
            (x + w * 0.15, x + w * 0.65)
        };
        self.ctx.fill_rect(left, y + h * 0.7, w * 0.2, h * 0.3);
        self.ctx.fill_rect(right, y + h * 0.7, w * 0.2, h * 0.3);
    }

    fn draw_field(&self, snapshot: &Snapshot) -> Result<(), GameError> {
        self.clear();
        let alpha = snapshot.alpha as f32;

        for enemy in snapshot.enemies() {
            self.draw_enemy(enemy);
        }

        self.draw_player(&snapshot.state.player);

        self.ctx.set_fill_style_str(BULLET_COLOR);
        for bullet in snapshot.bullets() {
            let r = &bullet.rect;
            self.ctx.fill_rect(
                r.x as f64,
                bullet.interpolated_y(alpha) as f64,
                r.width as f64,
                r.height as f64,
            );
        }

        for particle in snapshot.particles() {
            let pos = particle.pos + particle.vel * alpha;
            let half = particle.size / 2.0;
            self.ctx.set_global_alpha(particle.fade() as f64);
            self.ctx.set_fill_style_str(&css_color(particle.color));
            self.ctx.fill_rect(
                (pos.x - half) as f64,
                (pos.y - half) as f64,
                particle.size as f64,
                particle.size as f64,
            );
        }
        self.ctx.set_global_alpha(1.0);

        self.draw_hud(snapshot)
    }

    fn draw_hud(&self, snapshot: &Snapshot) -> Result<(), GameError> {
        let state = snapshot.state;
        self.text(&format!("SCORE {}", state.score), 10.0, 22.0, HUD_FONT, "left")?;
        self.text(
            &format!("LEVEL {}", state.level),
            self.width / 2.0,
            22.0,
            HUD_FONT,
            "center",
        )?;
        self.text(
            &format!("LIVES {}", state.lives),
            self.width - 10.0,
            22.0,
            HUD_FONT,
            "right",
        )?;
        if snapshot.show_fps {
            self.text(
                &format!("{} FPS", state.fps),
                10.0,
                self.height - 10.0,
                HUD_FONT,
                "left",
            )?;
        }
        Ok(())
    }
}

impl Presenter for CanvasPresenter {
    fn draw_start(&mut self, _snapshot: &Snapshot) -> Result<(), GameError> {
        self.clear();
        self.centered("PIXEL INVADERS", -40.0, TITLE_FONT)?;
        self.centered("Arrows / A D to move, Space to fire", 10.0, HUD_FONT)?;
        self.centered("Press Enter to start", 40.0, HUD_FONT)
    }

    fn draw_playing(&mut self, snapshot: &Snapshot) -> Result<(), GameError> {
        self.draw_field(snapshot)?;
        if snapshot.level_complete() {
            self.centered(
                &format!("LEVEL {} CLEAR", snapshot.state.level),
                0.0,
                TITLE_FONT,
            )?;
        }
        Ok(())
    }

    fn draw_paused(&mut self, snapshot: &Snapshot) -> Result<(), GameError> {
        self.draw_field(snapshot)?;
        self.dim();
        self.centered("PAUSED", -10.0, TITLE_FONT)?;
        self.centered("Press Esc or P to resume", 30.0, HUD_FONT)
    }

    fn draw_game_over(&mut self, snapshot: &Snapshot) -> Result<(), GameError> {
        self.draw_field(snapshot)?;
        self.dim();
        self.centered("GAME OVER", -40.0, TITLE_FONT)?;
        self.centered(
            &format!(
                "Score {}  Level {}",
                snapshot.state.score, snapshot.state.level
            ),
            0.0,
            HUD_FONT,
        )?;
        self.centered("Press Enter to play again", 30.0, HUD_FONT)
    }
}
