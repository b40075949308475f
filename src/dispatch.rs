//! Best-effort multi-channel notification delivery.
//!
//! A dispatch call walks the visual fallback chain (first success wins) and
//! independently attempts audio playback with a built-in fallback sound.
//! Channel failures are logged and recorded in the result, never raised:
//! a missing notification must not interrupt the assistant's workflow.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::NotifyConfig;
use crate::event::{EventKind, NotificationEvent};
use crate::sound::{Afplay, SoundPlayer, SoundTable};
use crate::visual::{self, VisualMethod};

/// Outcome of one dispatch call, reported verbatim in tool acknowledgments.
#[derive(Debug, Serialize)]
pub struct DeliveryResult {
    pub kind: EventKind,
    pub visual: VisualOutcome,
    pub audio: AudioOutcome,
}

impl DeliveryResult {
    /// Overall status: `delivered` when every attempted channel succeeded,
    /// `partial` when only one of two did, `silent` when nothing landed.
    pub fn status(&self) -> &'static str {
        let visual_ok = self.visual.delivered;
        let audio_ok = self.audio.played;
        if self.visual.disabled {
            if audio_ok {
                "delivered"
            } else {
                "silent"
            }
        } else {
            match (visual_ok, audio_ok) {
                (true, true) => "delivered",
                (false, false) => "silent",
                _ => "partial",
            }
        }
    }
}

/// Visual channel outcome.
#[derive(Debug, Serialize)]
pub struct VisualOutcome {
    pub delivered: bool,
    /// Name of the method that succeeded, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'static str>,
    /// True when the channel was disabled by configuration.
    pub disabled: bool,
}

impl VisualOutcome {
    fn delivered(method: &'static str) -> Self {
        Self {
            delivered: true,
            method: Some(method),
            disabled: false,
        }
    }

    fn failed() -> Self {
        Self {
            delivered: false,
            method: None,
            disabled: false,
        }
    }

    fn disabled() -> Self {
        Self {
            delivered: false,
            method: None,
            disabled: true,
        }
    }
}

/// Audio channel outcome.
#[derive(Debug, Serialize)]
pub struct AudioOutcome {
    pub played: bool,
    /// The sound file that actually played, if playback succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<PathBuf>,
    /// True when the kind's built-in default had to stand in for the
    /// resolved binding.
    pub fallback: bool,
}

/// Dispatches notification events across the visual and audio channels.
///
/// Holds only read-only state: the resolved configuration, the sound table,
/// and the channel backends. Safe to share behind an `Arc`.
pub struct Dispatcher {
    config: NotifyConfig,
    sounds: SoundTable,
    visual_methods: Vec<Box<dyn VisualMethod>>,
    player: Box<dyn SoundPlayer>,
}

impl Dispatcher {
    /// Build a dispatcher with the default method chain and `afplay` backend.
    pub fn new(config: NotifyConfig) -> Self {
        Self::with_backends(config, visual::default_chain(), Box::new(Afplay))
    }

    /// Build a dispatcher with explicit backends. The seam used by tests.
    pub fn with_backends(
        config: NotifyConfig,
        visual_methods: Vec<Box<dyn VisualMethod>>,
        player: Box<dyn SoundPlayer>,
    ) -> Self {
        let sounds = SoundTable::resolve(&config);
        Self {
            config,
            sounds,
            visual_methods,
            player,
        }
    }

    /// Deliver one event. Never fails; every failure mode is folded into
    /// the returned result.
    pub fn dispatch(&self, event: &NotificationEvent) -> DeliveryResult {
        tracing::info!(kind = %event.kind, message = %event.message, "Dispatching notification");

        let visual = if self.config.visual_enabled {
            self.dispatch_visual(event)
        } else {
            tracing::debug!("Visual channel disabled by configuration");
            VisualOutcome::disabled()
        };

        // Audio is attempted regardless of how the visual channel fared.
        let audio = self.dispatch_audio(event.kind);

        DeliveryResult {
            kind: event.kind,
            visual,
            audio,
        }
    }

    fn dispatch_visual(&self, event: &NotificationEvent) -> VisualOutcome {
        let icon = self.config.icon.as_deref();
        for method in &self.visual_methods {
            match method.send(&event.title, &event.message, icon) {
                Ok(()) => {
                    tracing::info!(method = method.name(), "Visual notification delivered");
                    return VisualOutcome::delivered(method.name());
                }
                Err(e) => {
                    tracing::warn!(method = method.name(), error = %e, "Visual method failed, trying next");
                }
            }
        }
        tracing::warn!("All visual methods failed");
        VisualOutcome::failed()
    }

    fn dispatch_audio(&self, kind: EventKind) -> AudioOutcome {
        let resolved = self.sounds.path_for(kind);
        match self.player.play(resolved) {
            Ok(()) => {
                return AudioOutcome {
                    played: true,
                    sound: Some(resolved.to_path_buf()),
                    fallback: false,
                }
            }
            Err(e) => {
                tracing::warn!(path = %resolved.display(), error = %e, "Sound playback failed");
            }
        }

        let default = SoundTable::default_path(kind);
        if default != resolved {
            match self.player.play(&default) {
                Ok(()) => {
                    return AudioOutcome {
                        played: true,
                        sound: Some(default),
                        fallback: true,
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %default.display(), error = %e, "Fallback sound playback failed");
                }
            }
        }

        AudioOutcome {
            played: false,
            sound: None,
            fallback: false,
        }
    }

    /// Log the health of every mechanism this dispatcher would use.
    /// Purely informational; never fails startup.
    pub fn verify(&self) {
        for kind in EventKind::ALL {
            let path = self.sounds.path_for(kind);
            if path.exists() {
                tracing::info!(kind = %kind, path = %path.display(), "Sound file present");
            } else {
                tracing::warn!(kind = %kind, path = %path.display(), "Sound file not found");
            }
        }

        if self.config.visual_enabled {
            for method in &self.visual_methods {
                if method.available() {
                    tracing::info!(method = method.name(), "Visual method available");
                } else {
                    tracing::warn!(method = method.name(), "Visual method unavailable");
                }
            }
            match &self.config.icon {
                Some(icon) => tracing::info!(path = %icon.display(), "Using notification icon"),
                None => tracing::info!("No notification icon configured"),
            }
        } else {
            tracing::info!("Visual notifications are disabled by configuration");
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field(
                "visual_methods",
                &self
                    .visual_methods
                    .iter()
                    .map(|m| m.name())
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::config::{ENV_SOUND_LEGACY, ENV_VISUAL};
    use crate::error::DeliveryError;

    struct MockMethod {
        name: &'static str,
        succeed: bool,
        calls: Arc<AtomicUsize>,
    }

    impl MockMethod {
        fn new(name: &'static str, succeed: bool) -> (Box<dyn VisualMethod>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Box::new(Self {
                    name,
                    succeed,
                    calls: calls.clone(),
                }),
                calls,
            )
        }
    }

    impl VisualMethod for MockMethod {
        fn name(&self) -> &'static str {
            self.name
        }

        fn send(&self, _: &str, _: &str, _: Option<&Path>) -> Result<(), DeliveryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(())
            } else {
                Err(DeliveryError::Backend("mock failure".to_string()))
            }
        }
    }

    /// Records played paths; fails for paths listed in `reject`.
    struct MockPlayer {
        played: Arc<Mutex<Vec<PathBuf>>>,
        reject: Vec<PathBuf>,
    }

    impl MockPlayer {
        fn new(reject: Vec<PathBuf>) -> (Box<dyn SoundPlayer>, Arc<Mutex<Vec<PathBuf>>>) {
            let played = Arc::new(Mutex::new(Vec::new()));
            (
                Box::new(Self {
                    played: played.clone(),
                    reject,
                }),
                played,
            )
        }
    }

    impl SoundPlayer for MockPlayer {
        fn play(&self, path: &Path) -> Result<(), DeliveryError> {
            if self.reject.iter().any(|p| p == path) {
                return Err(DeliveryError::SoundMissing(path.to_path_buf()));
            }
            self.played.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    fn env_config(pairs: &[(&str, &str)]) -> NotifyConfig {
        let env: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NotifyConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_primary_success_stops_the_chain() {
        let (first, first_calls) = MockMethod::new("first", true);
        let (second, second_calls) = MockMethod::new("second", true);
        let (player, _) = MockPlayer::new(vec![]);
        let dispatcher = Dispatcher::with_backends(env_config(&[]), vec![first, second], player);

        let result = dispatcher.dispatch(&NotificationEvent::new(EventKind::TaskStart, "go"));
        assert!(result.visual.delivered);
        assert_eq!(result.visual.method, Some("first"));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_primary_failure_advances_to_second() {
        let (first, first_calls) = MockMethod::new("first", false);
        let (second, second_calls) = MockMethod::new("second", true);
        let (player, _) = MockPlayer::new(vec![]);
        let dispatcher = Dispatcher::with_backends(env_config(&[]), vec![first, second], player);

        let result = dispatcher.dispatch(&NotificationEvent::new(EventKind::InputNeeded, "hm"));
        assert!(result.visual.delivered);
        assert_eq!(result.visual.method, Some("second"));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_all_visual_failures_still_attempt_audio() {
        let (first, _) = MockMethod::new("first", false);
        let (second, _) = MockMethod::new("second", false);
        let (player, played) = MockPlayer::new(vec![]);
        let dispatcher = Dispatcher::with_backends(env_config(&[]), vec![first, second], player);

        let result = dispatcher.dispatch(&NotificationEvent::new(EventKind::TaskComplete, "done"));
        assert!(!result.visual.delivered);
        assert!(result.visual.method.is_none());
        assert!(result.audio.played);
        assert_eq!(result.status(), "partial");
        assert_eq!(
            played.lock().unwrap().as_slice(),
            [SoundTable::default_path(EventKind::TaskComplete)]
        );
    }

    #[test]
    fn test_dispatch_never_fails_with_everything_absent() {
        let (player, _) = MockPlayer::new(
            EventKind::ALL
                .iter()
                .map(|k| SoundTable::default_path(*k))
                .collect(),
        );
        let dispatcher = Dispatcher::with_backends(env_config(&[]), vec![], player);

        for kind in EventKind::ALL {
            let result = dispatcher.dispatch(&NotificationEvent::new(kind, "anyone there?"));
            assert!(!result.visual.delivered);
            assert!(!result.audio.played);
            assert_eq!(result.status(), "silent");
        }
    }

    #[test]
    fn test_disabled_visual_channel_invokes_no_methods() {
        let (first, first_calls) = MockMethod::new("first", true);
        let (second, second_calls) = MockMethod::new("second", true);
        let (player, _) = MockPlayer::new(vec![]);
        let dispatcher = Dispatcher::with_backends(
            env_config(&[(ENV_VISUAL, "false")]),
            vec![first, second],
            player,
        );

        for kind in EventKind::ALL {
            let result = dispatcher.dispatch(&NotificationEvent::new(kind, "quiet"));
            assert!(result.visual.disabled);
            assert!(!result.visual.delivered);
            assert!(result.audio.played, "audio must be unaffected");
            assert_eq!(result.status(), "delivered");
        }
        assert_eq!(first_calls.load(Ordering::SeqCst), 0);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_audio_falls_back_to_default_when_binding_fails() {
        // A legacy override that exists at resolution time but whose
        // playback fails (file deleted between startup and dispatch).
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join("custom.aiff");
        std::fs::write(&custom, b"aiff").unwrap();

        let (first, _) = MockMethod::new("first", true);
        let (player, played) = MockPlayer::new(vec![custom.clone()]);
        let dispatcher = Dispatcher::with_backends(
            env_config(&[(ENV_SOUND_LEGACY, custom.to_str().unwrap())]),
            vec![first],
            player,
        );

        let result = dispatcher.dispatch(&NotificationEvent::new(EventKind::TaskStart, "go"));
        assert!(result.audio.played);
        assert!(result.audio.fallback);
        assert_eq!(
            result.audio.sound.as_deref(),
            Some(SoundTable::default_path(EventKind::TaskStart).as_path())
        );
        assert_eq!(
            played.lock().unwrap().as_slice(),
            [SoundTable::default_path(EventKind::TaskStart)]
        );
    }

    #[test]
    fn test_full_delivery_status() {
        let (first, _) = MockMethod::new("first", true);
        let (player, _) = MockPlayer::new(vec![]);
        let dispatcher = Dispatcher::with_backends(env_config(&[]), vec![first], player);

        let result = dispatcher.dispatch(&NotificationEvent::new(EventKind::TaskComplete, "done"));
        assert_eq!(result.status(), "delivered");
        assert!(!result.audio.fallback);
    }
}
