//! Error type for the headless runners.

use siege_core::error::GameError;
use thiserror::Error;

/// Failures while driving a simulation from the outside.
#[derive(Debug, Error)]
pub enum HeadlessError {
    /// The simulation rejected a command.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Reading requests or writing responses failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A request line was not valid protocol JSON.
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request is valid JSON but not supported by this runner.
    #[error("Unsupported in {mode} mode: {cmd}")]
    Unsupported {
        /// Runner mode.
        mode: &'static str,
        /// Request name.
        cmd: &'static str,
    },

    /// The engine task has shut down.
    #[error("Engine stopped")]
    EngineStopped,

    /// The engine task panicked or was cancelled.
    #[error("Engine task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl HeadlessError {
    /// Stable snake_case tag used in protocol error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Game(err) => err.kind(),
            Self::Io(_) => "io",
            Self::Json(_) => "parse",
            Self::Unsupported { .. } => "unsupported",
            Self::EngineStopped | Self::Join(_) => "engine_stopped",
        }
    }
}
