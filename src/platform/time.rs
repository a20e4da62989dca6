//! Fixed timestep scheduler
//!
//! Turns irregular display-frame timestamps into a steady stream of
//! fixed-length simulation updates, followed by one render per frame with
//! an interpolation factor for the time left over.

use std::fmt::Display;

use crate::settings::Settings;

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// What the scheduler drives each frame
pub trait Simulation {
    type Error: Display;

    /// Advance one fixed step of `dt_ms` milliseconds
    fn update(&mut self, dt_ms: f64) -> Result<(), Self::Error>;

    /// Draw; `alpha` is the fraction of a step elapsed since the last update
    fn render(&mut self, alpha: f64) -> Result<(), Self::Error>;
}

/// Outcome of one display frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    /// Updates that ran successfully
    pub updates: u32,
    /// Interpolation factor passed to render, in [0, 1)
    pub alpha: f64,
    /// Lag discarded because the catch-up cap was hit (ms)
    pub dropped_ms: f64,
    pub update_failed: bool,
    pub render_failed: bool,
    /// The scheduler was stopped; nothing ran
    pub stopped: bool,
}

/// Accumulator-based fixed-step loop
#[derive(Debug, Clone)]
pub struct FixedStepScheduler {
    tick_ms: f64,
    max_catch_up: u32,
    accumulator: f64,
    last_time: Option<f64>,
    running: bool,
    // FPS tracking
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    frames_seen: usize,
    fps: u32,
}

impl FixedStepScheduler {
    pub fn new(tick_ms: f64, max_catch_up: u32) -> Self {
        Self {
            tick_ms,
            max_catch_up,
            accumulator: 0.0,
            last_time: None,
            running: true,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            frames_seen: 0,
            fps: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.tick_ms, settings.max_catch_up)
    }

    /// Run one display frame at host time `now_ms`
    pub fn frame<S: Simulation>(&mut self, now_ms: f64, sim: &mut S) -> FrameReport {
        if !self.running {
            return FrameReport {
                stopped: true,
                ..Default::default()
            };
        }

        let lag = match self.last_time {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        self.accumulator += lag;
        self.track_fps(now_ms);

        let mut report = FrameReport::default();

        while self.accumulator >= self.tick_ms && report.updates < self.max_catch_up {
            if let Err(e) = sim.update(self.tick_ms) {
                log::error!("Simulation update failed: {}", e);
                self.accumulator = 0.0;
                report.update_failed = true;
                break;
            }
            self.accumulator -= self.tick_ms;
            report.updates += 1;
        }

        // Catch-up cap hit: drop whole ticks instead of queueing them
        if self.accumulator >= self.tick_ms {
            let kept = self.accumulator % self.tick_ms;
            report.dropped_ms = self.accumulator - kept;
            log::debug!(
                "Dropped {:.1}ms of lag after {} updates",
                report.dropped_ms,
                report.updates
            );
            self.accumulator = kept;
        }

        report.alpha = (self.accumulator / self.tick_ms).clamp(0.0, 1.0 - f64::EPSILON);
        if let Err(e) = sim.render(report.alpha) {
            log::error!("Render failed: {}", e);
            report.render_failed = true;
        }

        report
    }

    fn track_fps(&mut self, now_ms: f64) {
        let oldest = self.frame_times[self.frame_index];
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.frames_seen += 1;

        if self.frames_seen > FPS_WINDOW {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                self.fps = (FPS_WINDOW as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    /// Tear down: no further update or render calls
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Scheduler stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Forget the last timestamp and any pending lag
    pub fn reset_clock(&mut self) {
        self.last_time = None;
        self.accumulator = 0.0;
    }

    /// Measured display frame rate (0 until a full window has elapsed)
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn tick_ms(&self) -> f64 {
        self.tick_ms
    }

    /// Lag carried into the next frame (ms)
    pub fn pending_ms(&self) -> f64 {
        self.accumulator
    }
}
