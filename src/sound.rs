//! Sound bindings and audio playback.
//!
//! Every event kind resolves to exactly one sound file, established once at
//! startup from layered configuration: per-kind override, legacy override,
//! built-in system default. Overrides pointing at files that do not exist are
//! dropped at resolution time so the table never binds a kind to a path that
//! was already known to be bad.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::NotifyConfig;
use crate::error::DeliveryError;
use crate::event::EventKind;

/// System sounds directory on macOS.
pub const SYSTEM_SOUNDS_DIR: &str = "/System/Library/Sounds";

/// Read-only mapping from event kind to a resolved sound file path.
#[derive(Debug, Clone)]
pub struct SoundTable {
    bindings: HashMap<EventKind, PathBuf>,
}

impl SoundTable {
    /// Resolve bindings for all kinds from the configuration.
    pub fn resolve(config: &NotifyConfig) -> Self {
        let mut bindings = HashMap::new();
        for kind in EventKind::ALL {
            let path = match config.sound_override(kind) {
                Some(custom) if custom.exists() => {
                    tracing::info!(kind = %kind, path = %custom.display(), "Using custom notification sound");
                    custom.to_path_buf()
                }
                Some(custom) => {
                    tracing::warn!(
                        kind = %kind,
                        path = %custom.display(),
                        "Configured sound file not found, using built-in default"
                    );
                    Self::default_path(kind)
                }
                None => Self::default_path(kind),
            };
            bindings.insert(kind, path);
        }
        Self { bindings }
    }

    /// The resolved sound path for a kind.
    pub fn path_for(&self, kind: EventKind) -> &Path {
        // Resolution covers every kind in EventKind::ALL.
        &self.bindings[&kind]
    }

    /// The built-in default sound path for a kind.
    pub fn default_path(kind: EventKind) -> PathBuf {
        Path::new(SYSTEM_SOUNDS_DIR).join(kind.default_sound())
    }
}

/// Playback backend seam, mocked in dispatcher tests.
pub trait SoundPlayer: Send + Sync {
    fn play(&self, path: &Path) -> Result<(), DeliveryError>;
}

/// Plays sound files with the macOS `afplay` command, blocking until
/// playback finishes.
#[derive(Debug, Default)]
pub struct Afplay;

impl SoundPlayer for Afplay {
    fn play(&self, path: &Path) -> Result<(), DeliveryError> {
        if !path.exists() {
            return Err(DeliveryError::SoundMissing(path.to_path_buf()));
        }

        let output = Command::new("afplay").arg(path).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DeliveryError::CommandMissing { command: "afplay" }
            } else {
                DeliveryError::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeliveryError::CommandFailed {
                command: "afplay",
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}
