//! Error types shared across the store, session and user interface.

use thiserror::Error;

/// Failures raised by a [`crate::store::KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level error for CLI and TUI entry points.
#[derive(Debug, Error)]
pub enum PomoError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Task {0} not found.")]
    TaskNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
