//! Audio cues
//!
//! The simulation never plays sound itself. Domain events are mapped to a
//! small set of named cues, and the browser build turns cues into
//! procedurally generated Web Audio tones (no external files).

use crate::sim::GameEvent;

/// Named sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Player fired a bullet
    Shoot,
    /// Enemy destroyed
    Explosion,
    /// Last life lost
    GameOver,
}

impl Cue {
    /// The cue a domain event should trigger, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot => Some(Cue::Shoot),
            GameEvent::EnemyDestroyed { .. } => Some(Cue::Explosion),
            GameEvent::GameOver { .. } => Some(Cue::GameOver),
            GameEvent::PlayerHit { .. } | GameEvent::LevelComplete { .. } => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Cue::Shoot => "shoot",
            Cue::Explosion => "explosion",
            Cue::GameOver => "gameOver",
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use super::Cue;
    use crate::sim::GameEvent;

    /// Web Audio tone player
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Not available outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.5,
                muted: false,
            }
        }

        /// Set volume (0.0 - 1.0)
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.volume }
        }

        /// Play the cue for a domain event, if it has one
        pub fn on_event(&self, event: &GameEvent) {
            if let Some(cue) = Cue::for_event(event) {
                self.play(cue);
            }
        }

        pub fn play(&self, cue: Cue) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                Cue::Shoot => play_shoot(ctx, vol),
                Cue::Explosion => play_explosion(ctx, vol),
                Cue::GameOver => play_game_over(ctx, vol),
            }
        }
    }

    /// Oscillator routed through a gain node to the output
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Short square-wave chirp sweeping down
    fn play_shoot(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = create_osc(ctx, 880.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(220.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
    }

    /// Low sawtooth rumble with a brief high crack on top
    fn play_explosion(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = create_osc(ctx, 120.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(30.0, t + 0.3)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.35).ok();

        if let Some((crack, crack_gain)) = create_osc(ctx, 1200.0, OscillatorType::Square) {
            crack_gain.gain().set_value_at_time(vol * 0.15, t).ok();
            crack_gain
                .gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                .ok();
            crack.start().ok();
            crack.stop_with_when(t + 0.08).ok();
        }
    }

    /// Descending four-note phrase
    fn play_game_over(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [440.0, 370.0, 311.0, 220.0].iter().enumerate() {
            let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Triangle) else {
                continue;
            };
            let t = ctx.current_time() + i as f64 * 0.25;
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.4).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EnemyKind;

    #[test]
    fn test_cue_mapping() {
        assert_eq!(Cue::for_event(&GameEvent::Shot), Some(Cue::Shoot));
        assert_eq!(
            Cue::for_event(&GameEvent::EnemyDestroyed {
                row: 0,
                col: 3,
                kind: EnemyKind::Scout,
                points: 30,
            }),
            Some(Cue::Explosion)
        );
        assert_eq!(
            Cue::for_event(&GameEvent::GameOver { score: 10, level: 2 }),
            Some(Cue::GameOver)
        );
    }

    #[test]
    fn test_silent_events() {
        assert_eq!(Cue::for_event(&GameEvent::PlayerHit { lives_left: 2 }), None);
        assert_eq!(Cue::for_event(&GameEvent::LevelComplete { level: 1 }), None);
    }

    #[test]
    fn test_cue_names() {
        assert_eq!(Cue::Shoot.name(), "shoot");
        assert_eq!(Cue::Explosion.name(), "explosion");
        assert_eq!(Cue::GameOver.name(), "gameOver");
    }
}
