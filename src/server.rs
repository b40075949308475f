//! MCP ServerHandler implementation for notify-mcp.
//!
//! Exposes the notification tools to the calling assistant:
//!
//! - `task_status` — start/complete notification; explicit `kind` preferred,
//!   message-text inference kept as a compatibility shim
//! - `user_input_needed` — the assistant is blocked on the operator
//! - `task_completed` — a task finished
//! - `tool_permission_needed` — a tool call awaits operator approval
//!
//! Every tool returns a JSON acknowledgment and never raises: delivery
//! failures are recorded in the ack, not surfaced as protocol errors.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ServerHandler};

use crate::config::NotifyConfig;
use crate::dispatch::Dispatcher;
use crate::event::{EventKind, NotificationEvent};
use crate::tools::*;

/// MCP server handler for desktop notifications.
#[derive(Debug, Clone)]
pub struct NotifyMcpServer {
    tool_router: ToolRouter<Self>,
    dispatcher: Arc<Dispatcher>,
}

impl Default for NotifyMcpServer {
    fn default() -> Self {
        Self::new(Dispatcher::new(NotifyConfig::from_env()))
    }
}

impl NotifyMcpServer {
    /// Create a server around a prepared dispatcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            tool_router: Self::tool_router(),
            dispatcher: Arc::new(dispatcher),
        }
    }

    fn notify(&self, kind: EventKind, message: String) -> String {
        let event = NotificationEvent::new(kind, message);
        let result = self.dispatcher.dispatch(&event);
        let ack = NotificationAck {
            status: result.status(),
            kind: result.kind,
            message: event.message,
            visual: result.visual,
            audio: result.audio,
        };
        serde_json::to_string_pretty(&ack)
            .unwrap_or_else(|e| error_json("serialization_error", &e.to_string()))
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for NotifyMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "notify-mcp".to_string(),
                title: Some("Desktop Notification Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some(
                    "MCP server delivering audible and visual desktop alerts for \
                     assistant lifecycle events"
                        .to_string(),
                ),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Alert the human operator about assistant lifecycle events. \
                 Call task_status with kind='start' when you begin working on a request \
                 and task_completed when you finish. Call user_input_needed whenever you \
                 are blocked waiting on the operator, and tool_permission_needed when a \
                 tool call awaits their approval. Every call is fire-and-forget: it \
                 always returns an acknowledgment describing what was delivered and \
                 never fails, so do not retry on a 'partial' or 'silent' status."
                    .to_string(),
            ),
        }
    }
}

#[tool_router(router = tool_router)]
impl NotifyMcpServer {
    /// Notify the operator that a task started or completed.
    #[tool(
        name = "task_status",
        description = "Notify the operator that a task started or completed. Pass kind='start' or kind='complete' explicitly; when omitted, the kind is inferred from the message text (messages containing 'start' or 'processing' count as starts). Prefer task_completed for completions."
    )]
    pub async fn task_status(&self, Parameters(params): Parameters<TaskStatusParams>) -> String {
        let kind = match params.kind.as_deref() {
            Some("start") => EventKind::TaskStart,
            Some("complete") => EventKind::TaskComplete,
            Some(other) => {
                return error_json(
                    "invalid_kind",
                    &format!("Unknown kind '{}': expected 'start' or 'complete'", other),
                );
            }
            None => EventKind::infer_task_status(&params.message),
        };
        self.notify(kind, params.message)
    }

    /// Notify the operator that the assistant needs their input.
    #[tool(
        name = "user_input_needed",
        description = "Notify the operator that the assistant is blocked waiting for their input. Use when a question or decision requires the human's attention."
    )]
    pub async fn user_input_needed(
        &self,
        Parameters(params): Parameters<UserInputNeededParams>,
    ) -> String {
        self.notify(EventKind::InputNeeded, params.message)
    }

    /// Notify the operator that a task finished.
    #[tool(
        name = "task_completed",
        description = "Notify the operator that a task finished. Call this at the end of every completed request."
    )]
    pub async fn task_completed(
        &self,
        Parameters(params): Parameters<TaskCompletedParams>,
    ) -> String {
        self.notify(EventKind::TaskComplete, params.message)
    }

    /// Notify the operator that a tool call awaits their approval.
    #[tool(
        name = "tool_permission_needed",
        description = "Notify the operator that a tool call is waiting for their permission. Use when execution is paused on an approval prompt."
    )]
    pub async fn tool_permission_needed(
        &self,
        Parameters(params): Parameters<ToolPermissionNeededParams>,
    ) -> String {
        self.notify(EventKind::ToolPermissionNeeded, params.message)
    }
}

/// Build a structured error JSON string that LLMs can parse.
fn error_json(error_code: &str, message: &str) -> String {
    serde_json::json!({
        "error": error_code,
        "message": message,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::error::DeliveryError;
    use crate::sound::SoundPlayer;
    use crate::visual::VisualMethod;

    struct AlwaysOk;

    impl VisualMethod for AlwaysOk {
        fn name(&self) -> &'static str {
            "mock-banner"
        }

        fn send(&self, _: &str, _: &str, _: Option<&Path>) -> Result<(), DeliveryError> {
            Ok(())
        }
    }

    struct SilentPlayer;

    impl SoundPlayer for SilentPlayer {
        fn play(&self, _: &Path) -> Result<(), DeliveryError> {
            Ok(())
        }
    }

    fn test_server() -> NotifyMcpServer {
        let config = NotifyConfig::from_lookup(|_| None);
        NotifyMcpServer::new(Dispatcher::with_backends(
            config,
            vec![Box::new(AlwaysOk)],
            Box::new(SilentPlayer),
        ))
    }

    #[tokio::test]
    async fn test_task_status_explicit_kind_wins_over_heuristic() {
        let server = test_server();
        let ack = server
            .task_status(Parameters(TaskStatusParams {
                message: "Started processing".to_string(),
                kind: Some("complete".to_string()),
            }))
            .await;
        let parsed: serde_json::Value = serde_json::from_str(&ack).unwrap();
        assert_eq!(parsed["kind"], "task-complete");
    }

    #[tokio::test]
    async fn test_task_status_inference_fallback() {
        let server = test_server();
        let ack = server
            .task_status(Parameters(TaskStatusParams {
                message: "Started processing".to_string(),
                kind: None,
            }))
            .await;
        let parsed: serde_json::Value = serde_json::from_str(&ack).unwrap();
        assert_eq!(parsed["kind"], "task-start");
        assert_eq!(parsed["status"], "delivered");
    }

    #[tokio::test]
    async fn test_task_status_rejects_unknown_kind() {
        let server = test_server();
        let ack = server
            .task_status(Parameters(TaskStatusParams {
                message: "hello".to_string(),
                kind: Some("begin".to_string()),
            }))
            .await;
        let parsed: serde_json::Value = serde_json::from_str(&ack).unwrap();
        assert_eq!(parsed["error"], "invalid_kind");
    }

    #[tokio::test]
    async fn test_dedicated_tools_map_to_their_kinds() {
        let server = test_server();

        let ack = server
            .user_input_needed(Parameters(UserInputNeededParams {
                message: "Pick a branch".to_string(),
            }))
            .await;
        let parsed: serde_json::Value = serde_json::from_str(&ack).unwrap();
        assert_eq!(parsed["kind"], "input-needed");

        let ack = server
            .tool_permission_needed(Parameters(ToolPermissionNeededParams {
                message: "Allow shell access?".to_string(),
            }))
            .await;
        let parsed: serde_json::Value = serde_json::from_str(&ack).unwrap();
        assert_eq!(parsed["kind"], "tool-permission-needed");
        assert_eq!(parsed["visual"]["method"], "mock-banner");
    }
}
