//! Crate error type

use thiserror::Error;

/// Errors surfaced by construction-time and host-boundary operations.
///
/// Per-frame conditions (pool exhaustion, a failing listener) are never
/// reported through this type.
#[derive(Debug, Error)]
pub enum GameError {
    /// Settings failed validation
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    /// Settings JSON could not be parsed
    #[error("failed to parse settings: {0}")]
    Settings(#[from] serde_json::Error),
    /// Settings file could not be read
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// The drawing surface could not be acquired
    #[error("drawing surface unavailable: {0}")]
    Surface(String),
    /// A presenter failed while drawing a frame
    #[error("render failed: {0}")]
    Render(String),
}
