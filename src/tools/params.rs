//! Parameter and acknowledgment structs for all MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dispatch::{AudioOutcome, VisualOutcome};
use crate::event::EventKind;

// ── task_status ──

/// Parameters for the `task_status` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TaskStatusParams {
    /// Message describing the state of the task.
    #[schemars(
        description = "Message describing the state of the task (e.g., 'Started processing', 'Task completed')"
    )]
    #[serde(default = "default_status_message")]
    pub message: String,
    /// Explicit event kind; when omitted the kind is inferred from the message text.
    #[schemars(
        description = "Explicit event kind: 'start' or 'complete'. Preferred over omitting it, which falls back to inferring the kind from the message text."
    )]
    pub kind: Option<String>,
}

fn default_status_message() -> String {
    "Task completed".to_string()
}

// ── user_input_needed ──

/// Parameters for the `user_input_needed` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UserInputNeededParams {
    /// What the user is being asked for.
    #[schemars(description = "What the user is being asked to provide or decide")]
    pub message: String,
}

// ── task_completed ──

/// Parameters for the `task_completed` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TaskCompletedParams {
    /// Summary of the finished task.
    #[schemars(description = "Short summary of the finished task")]
    pub message: String,
}

// ── tool_permission_needed ──

/// Parameters for the `tool_permission_needed` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToolPermissionNeededParams {
    /// Which tool needs approval and why.
    #[schemars(description = "Which tool needs approval and why")]
    pub message: String,
}

// ── acknowledgment ──

/// Acknowledgment returned by every notification tool. Tool calls are
/// fire-and-forget for the assistant: this reports what landed, it never
/// signals failure as an error.
#[derive(Debug, Serialize)]
pub struct NotificationAck {
    /// `delivered`, `partial`, or `silent`.
    pub status: &'static str,
    pub kind: EventKind,
    pub message: String,
    pub visual: VisualOutcome,
    pub audio: AudioOutcome,
}
