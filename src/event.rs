//! Notification event kinds and per-dispatch event values.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Lifecycle event kinds the assistant can signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    TaskStart,
    TaskComplete,
    InputNeeded,
    ToolPermissionNeeded,
}

impl EventKind {
    /// All kinds, in a stable order.
    pub const ALL: [EventKind; 4] = [
        EventKind::TaskStart,
        EventKind::TaskComplete,
        EventKind::InputNeeded,
        EventKind::ToolPermissionNeeded,
    ];

    /// Kebab-case wire form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::TaskStart => "task-start",
            EventKind::TaskComplete => "task-complete",
            EventKind::InputNeeded => "input-needed",
            EventKind::ToolPermissionNeeded => "tool-permission-needed",
        }
    }

    /// Banner title shown for this kind.
    pub fn title(&self) -> &'static str {
        match self {
            EventKind::TaskStart => "Assistant Working",
            EventKind::TaskComplete => "Task Complete",
            EventKind::InputNeeded => "Input Needed",
            EventKind::ToolPermissionNeeded => "Permission Needed",
        }
    }

    /// Built-in system sound file name for this kind, distinct per kind.
    pub fn default_sound(&self) -> &'static str {
        match self {
            EventKind::TaskStart => "Glass.aiff",
            EventKind::TaskComplete => "Hero.aiff",
            EventKind::InputNeeded => "Ping.aiff",
            EventKind::ToolPermissionNeeded => "Sosumi.aiff",
        }
    }

    /// Legacy heuristic used by `task_status` when no explicit kind is given:
    /// messages mentioning "start" or "processing" are start events,
    /// everything else is a completion.
    pub fn infer_task_status(message: &str) -> EventKind {
        let lower = message.to_lowercase();
        if lower.contains("start") || lower.contains("processing") {
            EventKind::TaskStart
        } else {
            EventKind::TaskComplete
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task-start" => Ok(EventKind::TaskStart),
            "task-complete" => Ok(EventKind::TaskComplete),
            "input-needed" => Ok(EventKind::InputNeeded),
            "tool-permission-needed" => Ok(EventKind::ToolPermissionNeeded),
            other => Err(format!(
                "unknown event kind '{}' (expected one of: task-start, task-complete, \
                 input-needed, tool-permission-needed)",
                other
            )),
        }
    }
}

/// A single notification to deliver. Immutable, lives for one dispatch call.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub kind: EventKind,
    pub message: String,
    pub title: String,
}

impl NotificationEvent {
    /// Build an event with the title derived from the kind.
    pub fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            title: kind.title().to_string(),
        }
    }
}
