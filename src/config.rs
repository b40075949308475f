//! Environment-driven configuration, resolved once at startup.
//!
//! All knobs are plain environment variables read into an immutable
//! [`NotifyConfig`]; nothing re-reads the environment after that.
//! Construction is factored through a lookup closure so tests never have to
//! mutate process-global state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::event::EventKind;

/// Per-kind sound override variables.
pub const ENV_SOUND_TASK_START: &str = "NOTIFY_SOUND_TASK_START";
pub const ENV_SOUND_TASK_COMPLETE: &str = "NOTIFY_SOUND_TASK_COMPLETE";
pub const ENV_SOUND_INPUT_NEEDED: &str = "NOTIFY_SOUND_INPUT_NEEDED";
pub const ENV_SOUND_TOOL_PERMISSION: &str = "NOTIFY_SOUND_TOOL_PERMISSION";

/// Legacy single-variable override, applied to any kind without its own.
pub const ENV_SOUND_LEGACY: &str = "NOTIFY_SOUND";

/// Boolean toggle for the visual channel (default on).
pub const ENV_VISUAL: &str = "NOTIFY_VISUAL";

/// Custom icon asset for the visual channel.
pub const ENV_ICON: &str = "NOTIFY_ICON";

fn sound_env_var(kind: EventKind) -> &'static str {
    match kind {
        EventKind::TaskStart => ENV_SOUND_TASK_START,
        EventKind::TaskComplete => ENV_SOUND_TASK_COMPLETE,
        EventKind::InputNeeded => ENV_SOUND_INPUT_NEEDED,
        EventKind::ToolPermissionNeeded => ENV_SOUND_TOOL_PERMISSION,
    }
}

/// Immutable process-lifetime configuration.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    sound_overrides: HashMap<EventKind, PathBuf>,
    legacy_sound: Option<PathBuf>,
    /// Whether the visual channel is attempted at all.
    pub visual_enabled: bool,
    /// Custom icon for banner notifications, if one was configured and exists.
    pub icon: Option<PathBuf>,
}

impl NotifyConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut sound_overrides = HashMap::new();
        for kind in EventKind::ALL {
            if let Some(path) = lookup(sound_env_var(kind)) {
                sound_overrides.insert(kind, PathBuf::from(path));
            }
        }

        let legacy_sound = lookup(ENV_SOUND_LEGACY).map(PathBuf::from);

        let visual_enabled = lookup(ENV_VISUAL)
            .map(|v| parse_bool(&v))
            .unwrap_or(true);

        let icon = lookup(ENV_ICON).map(PathBuf::from).and_then(|path| {
            if path.exists() {
                Some(path)
            } else {
                tracing::warn!(path = %path.display(), "Configured notification icon not found, ignoring");
                None
            }
        });

        Self {
            sound_overrides,
            legacy_sound,
            visual_enabled,
            icon,
        }
    }

    /// The configured sound override for a kind, if any: the per-kind
    /// variable wins, the legacy variable fills in for kinds without one.
    /// Existence on disk is checked at resolution time, not here.
    pub fn sound_override(&self, kind: EventKind) -> Option<&Path> {
        self.sound_overrides
            .get(&kind)
            .or(self.legacy_sound.as_ref())
            .map(PathBuf::as_path)
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "true" | "1" | "yes" | "y" | "on"
    )
}
