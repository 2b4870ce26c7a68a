//! Error types for the simulation and its configuration

use thiserror::Error;

/// Faults raised while stepping or presenting a frame.
///
/// These never escape the [`FrameScheduler`](crate::FrameScheduler): it pauses
/// the run, surfaces a notice and rebuilds the game state instead.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("non-finite {what} state after step")]
    NonFinite { what: &'static str },

    #[error("render failed: {0}")]
    Render(String),
}

/// Errors loading tuning values or level layouts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
