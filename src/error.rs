//! Error types for notification delivery.
//!
//! These never cross the tool boundary: the dispatcher logs them and moves
//! on to the next fallback method.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("'{command}' not found on PATH")]
    CommandMissing { command: &'static str },

    #[error("'{command}' exited with failure: {stderr}")]
    CommandFailed {
        command: &'static str,
        stderr: String,
    },

    #[error("notification backend error: {0}")]
    Backend(String),

    #[error("sound file not found: {}", .0.display())]
    SoundMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
