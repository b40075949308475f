//! Visual notification methods and the fallback chain.
//!
//! Each method is one way of putting a banner on the desktop. The dispatcher
//! walks them in priority order and stops at the first success; a method
//! that is not installed simply fails its attempt and the chain moves on.

use std::path::Path;
use std::process::Command;

use crate::error::DeliveryError;

/// One visual delivery mechanism. Implementations are capability-checked
/// strategies; `send` makes exactly one attempt.
pub trait VisualMethod: Send + Sync {
    /// Stable method name, reported in delivery results.
    fn name(&self) -> &'static str;

    /// Whether the mechanism looks usable on this host. Used by startup
    /// verification only; dispatch just attempts and falls through.
    fn available(&self) -> bool {
        true
    }

    fn send(&self, title: &str, message: &str, icon: Option<&Path>) -> Result<(), DeliveryError>;
}

/// The default chain, in priority order.
pub fn default_chain() -> Vec<Box<dyn VisualMethod>> {
    vec![
        Box::new(NotificationCenter),
        Box::new(Osascript),
        Box::new(TerminalNotifier),
    ]
}

/// Native notification-center binding via the `notify-rust` crate.
#[derive(Debug, Default)]
pub struct NotificationCenter;

impl VisualMethod for NotificationCenter {
    fn name(&self) -> &'static str {
        "notification-center"
    }

    fn send(&self, title: &str, message: &str, icon: Option<&Path>) -> Result<(), DeliveryError> {
        let mut notification = notify_rust::Notification::new();
        notification
            .summary(title)
            .body(message)
            .timeout(notify_rust::Timeout::Milliseconds(5000));
        if let Some(icon) = icon.and_then(Path::to_str) {
            notification.icon(icon);
        }
        notification
            .show()
            .map(|_| ())
            .map_err(|e| DeliveryError::Backend(e.to_string()))
    }
}

/// Scripting bridge: `osascript -e 'display notification ...'`.
#[derive(Debug, Default)]
pub struct Osascript;

impl VisualMethod for Osascript {
    fn name(&self) -> &'static str {
        "osascript"
    }

    fn available(&self) -> bool {
        command_available("osascript", &["-e", "return"])
    }

    fn send(&self, title: &str, message: &str, _icon: Option<&Path>) -> Result<(), DeliveryError> {
        let script = format!(
            r#"display notification "{}" with title "{}""#,
            applescript_escape(message),
            applescript_escape(title)
        );
        run_command("osascript", Command::new("osascript").args(["-e", &script]))
    }
}

/// Dedicated CLI utility: `terminal-notifier`, if installed.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl VisualMethod for TerminalNotifier {
    fn name(&self) -> &'static str {
        "terminal-notifier"
    }

    fn available(&self) -> bool {
        command_available("terminal-notifier", &["-help"])
    }

    fn send(&self, title: &str, message: &str, icon: Option<&Path>) -> Result<(), DeliveryError> {
        let mut command = Command::new("terminal-notifier");
        // No -sound flag; the audio channel owns the cue.
        command.args(["-title", title, "-message", message, "-timeout", "10"]);
        if let Some(icon) = icon.and_then(Path::to_str) {
            command.args(["-contentImage", icon, "-appIcon", icon]);
        }
        run_command("terminal-notifier", &mut command)
    }
}

/// Escape a string for embedding in a double-quoted AppleScript literal.
fn applescript_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn run_command(name: &'static str, command: &mut Command) -> Result<(), DeliveryError> {
    let output = command.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DeliveryError::CommandMissing { command: name }
        } else {
            DeliveryError::Io(e)
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DeliveryError::CommandFailed {
            command: name,
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(())
}

fn command_available(name: &str, args: &[&str]) -> bool {
    Command::new(name)
        .args(args)
        .output()
        .is_ok_and(|o| o.status.success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applescript_escape() {
        assert_eq!(
            applescript_escape(r#"say "done" \ exit"#),
            r#"say \"done\" \\ exit"#
        );
        assert_eq!(applescript_escape("plain text"), "plain text");
    }

    #[test]
    fn test_default_chain_priority_order() {
        let names: Vec<&str> = default_chain().iter().map(|m| m.name()).collect();
        assert_eq!(
            names,
            ["notification-center", "osascript", "terminal-notifier"]
        );
    }

    #[test]
    fn test_missing_command_reported_as_such() {
        let err = run_command(
            "definitely-not-a-real-binary",
            &mut Command::new("definitely-not-a-real-binary"),
        )
        .unwrap_err();
        assert!(matches!(err, DeliveryError::CommandMissing { .. }));
    }
}
