//! Media playback controller with token-gated readiness.
//!
//! Bridges the abstract resource/readiness model to an actual seekable
//! player. Readiness signals from the playback engine are asynchronous and
//! may arrive after the resource they belong to has been replaced; every
//! resource assignment therefore gets a fresh `ResourceToken`, and a signal
//! is honored only when its token matches the current assignment.

use std::sync::{Arc, Mutex};

use scrub_core::types::MediaKind;

use crate::error::MediaError;
use crate::player::PlayerBackend;

/// The single playable resource attached to the current response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResource {
    /// Fully resolved URL of the playable file.
    pub url: String,
    /// Whether the resource is video or audio.
    pub kind: MediaKind,
}

impl MediaResource {
    pub fn new(url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }
}

/// Opaque marker distinguishing successive resource assignments.
///
/// Comparing tokens, not URLs, is what lets the controller discard a stale
/// "loaded" event for a resource that has since been replaced by another
/// one with a coincidentally equal URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceToken(u64);

#[derive(Debug)]
struct ControllerState {
    resource: Option<MediaResource>,
    ready: bool,
    generation: u64,
}

/// Owns the lifecycle of the session's single playable resource and
/// mediates seek/play/pause against the readiness gate.
pub struct MediaPlaybackController {
    state: Mutex<ControllerState>,
    player: Arc<dyn PlayerBackend>,
}

impl std::fmt::Debug for MediaPlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaPlaybackController")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl MediaPlaybackController {
    /// Create a controller with no resource assigned, driving `player`.
    pub fn new(player: Arc<dyn PlayerBackend>) -> Self {
        Self {
            state: Mutex::new(ControllerState {
                resource: None,
                ready: false,
                generation: 0,
            }),
            player,
        }
    }

    /// Replace the active resource.
    ///
    /// Readiness drops to false unconditionally and a fresh token is
    /// issued, even if the URL and kind are unchanged: the backing player
    /// instance must be torn down and recreated, so any buffered state
    /// from the previous assignment is invalid.
    pub fn set_resource(&self, resource: MediaResource) -> ResourceToken {
        let mut state = self.state.lock().expect("media state poisoned");
        state.generation += 1;
        state.ready = false;
        tracing::debug!(
            url = %resource.url,
            kind = ?resource.kind,
            generation = state.generation,
            "Media resource replaced"
        );
        state.resource = Some(resource);
        ResourceToken(state.generation)
    }

    /// Handle a "metadata loaded" signal from the playback engine.
    ///
    /// Arms readiness only when `token` belongs to the current assignment;
    /// stale signals are dropped.
    pub fn on_loaded(&self, token: ResourceToken) {
        let mut state = self.state.lock().expect("media state poisoned");
        if token.0 != state.generation || state.resource.is_none() {
            tracing::debug!(
                token = token.0,
                generation = state.generation,
                "Ignoring stale media-loaded signal"
            );
            return;
        }
        state.ready = true;
        tracing::debug!(generation = state.generation, "Media ready for seeking");
    }

    /// Handle a load-error signal from the playback engine.
    ///
    /// On a matching token, readiness drops but the resource stays
    /// assigned, so callers can still show it as attached-but-unplayable.
    pub fn on_load_error(&self, token: ResourceToken) {
        let mut state = self.state.lock().expect("media state poisoned");
        if token.0 != state.generation {
            tracing::debug!(
                token = token.0,
                generation = state.generation,
                "Ignoring stale media-error signal"
            );
            return;
        }
        state.ready = false;
        tracing::warn!(generation = state.generation, "Media failed to load");
    }

    /// Jump playback to `seconds` from the start.
    ///
    /// Pauses the player, moves the position, and resumes. A resume
    /// rejection is reported but leaves readiness and the resource
    /// untouched, since the position change itself took effect.
    pub fn seek(&self, seconds: f64) -> Result<(), MediaError> {
        let state = self.state.lock().expect("media state poisoned");
        if state.resource.is_none() || !state.ready {
            return Err(MediaError::NotReady);
        }
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(MediaError::InvalidTime(seconds));
        }

        self.player.pause();
        self.player.set_position(seconds);
        self.player.play()?;
        tracing::debug!(seconds, "Seeked media");
        Ok(())
    }

    /// Drop the resource and invalidate the token.
    ///
    /// The generation advances so any straggling load/error signal still
    /// referencing the old token is guaranteed to miss.
    pub fn clear(&self) {
        let mut state = self.state.lock().expect("media state poisoned");
        state.generation += 1;
        state.resource = None;
        state.ready = false;
        tracing::debug!(generation = state.generation, "Media controller cleared");
    }

    /// Returns whether the current resource is ready for seeking.
    pub fn ready(&self) -> bool {
        self.state.lock().expect("media state poisoned").ready
    }

    /// Returns a copy of the current resource, if any.
    pub fn resource(&self) -> Option<MediaResource> {
        self.state
            .lock()
            .expect("media state poisoned")
            .resource
            .clone()
    }

    /// Returns the token of the current assignment.
    ///
    /// Handed to whatever wires the playback engine's callbacks, so the
    /// engine can report back for this exact assignment.
    pub fn current_token(&self) -> ResourceToken {
        ResourceToken(self.state.lock().expect("media state poisoned").generation)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerCall, RecordingPlayer};

    fn controller() -> (MediaPlaybackController, RecordingPlayer) {
        let player = RecordingPlayer::new();
        let controller = MediaPlaybackController::new(Arc::new(player.clone()));
        (controller, player)
    }

    fn video(url: &str) -> MediaResource {
        MediaResource::new(url, MediaKind::Video)
    }

    // ---- Resource assignment ----

    #[test]
    fn test_new_controller_has_no_resource() {
        let (controller, _) = controller();
        assert!(controller.resource().is_none());
        assert!(!controller.ready());
    }

    #[test]
    fn test_set_resource_resets_readiness() {
        let (controller, _) = controller();
        let token = controller.set_resource(video("http://x/a.mp4"));
        controller.on_loaded(token);
        assert!(controller.ready());

        // Replacing the resource always drops readiness, even when URL and
        // kind are identical.
        controller.set_resource(video("http://x/a.mp4"));
        assert!(!controller.ready());
    }

    #[test]
    fn test_set_resource_issues_fresh_token() {
        let (controller, _) = controller();
        let a = controller.set_resource(video("http://x/a.mp4"));
        let b = controller.set_resource(video("http://x/a.mp4"));
        assert_ne!(a, b);
        assert_eq!(b, controller.current_token());
    }

    // ---- Readiness gating ----

    #[test]
    fn test_on_loaded_matching_token_arms_readiness() {
        let (controller, _) = controller();
        let token = controller.set_resource(video("http://x/a.mp4"));
        controller.on_loaded(token);
        assert!(controller.ready());
    }

    #[test]
    fn test_on_loaded_stale_token_is_ignored() {
        let (controller, _) = controller();
        let stale = controller.set_resource(video("http://x/a.mp4"));
        controller.on_loaded(stale);

        controller.set_resource(video("http://x/b.mp4"));
        // The late signal for the superseded resource must not mark the
        // new one ready.
        controller.on_loaded(stale);
        assert!(!controller.ready());
    }

    #[test]
    fn test_on_loaded_without_resource_is_ignored() {
        let (controller, _) = controller();
        let token = controller.current_token();
        controller.on_loaded(token);
        assert!(!controller.ready());
    }

    #[test]
    fn test_on_load_error_keeps_resource() {
        let (controller, _) = controller();
        let token = controller.set_resource(video("http://x/a.mp4"));
        controller.on_load_error(token);
        assert!(!controller.ready());
        // Attached but unplayable: the resource itself stays assigned.
        assert_eq!(controller.resource(), Some(video("http://x/a.mp4")));
    }

    #[test]
    fn test_on_load_error_stale_token_is_ignored() {
        let (controller, _) = controller();
        let stale = controller.set_resource(video("http://x/a.mp4"));
        let current = controller.set_resource(video("http://x/b.mp4"));
        controller.on_loaded(current);

        controller.on_load_error(stale);
        assert!(controller.ready());
    }

    // ---- Seeking ----

    #[test]
    fn test_seek_not_ready_fails_without_touching_player() {
        let (controller, player) = controller();
        controller.set_resource(video("http://x/a.mp4"));
        let result = controller.seek(10.0);
        assert!(matches!(result, Err(MediaError::NotReady)));
        assert!(player.calls().is_empty());
    }

    #[test]
    fn test_seek_without_resource_fails() {
        let (controller, player) = controller();
        assert!(matches!(controller.seek(0.0), Err(MediaError::NotReady)));
        assert!(player.calls().is_empty());
    }

    #[test]
    fn test_seek_invalid_time_fails() {
        let (controller, player) = controller();
        let token = controller.set_resource(video("http://x/a.mp4"));
        controller.on_loaded(token);

        assert!(matches!(
            controller.seek(f64::NAN),
            Err(MediaError::InvalidTime(_))
        ));
        assert!(matches!(
            controller.seek(f64::INFINITY),
            Err(MediaError::InvalidTime(_))
        ));
        assert!(matches!(
            controller.seek(-1.0),
            Err(MediaError::InvalidTime(_))
        ));
        assert!(player.calls().is_empty());
    }

    #[test]
    fn test_seek_pauses_positions_resumes() {
        let (controller, player) = controller();
        let token = controller.set_resource(video("http://x/a.mp4"));
        controller.on_loaded(token);

        controller.seek(42.5).unwrap();
        assert_eq!(
            player.calls(),
            vec![
                PlayerCall::Pause,
                PlayerCall::SetPosition(42.5),
                PlayerCall::Play
            ]
        );
    }

    #[test]
    fn test_seek_to_zero_is_valid() {
        let (controller, _) = controller();
        let token = controller.set_resource(video("http://x/a.mp4"));
        controller.on_loaded(token);
        assert!(controller.seek(0.0).is_ok());
    }

    #[test]
    fn test_seek_resume_rejection_reported_but_state_kept() {
        let (controller, player) = controller();
        let token = controller.set_resource(video("http://x/a.mp4"));
        controller.on_loaded(token);
        player.reject_play(true);

        let result = controller.seek(5.0);
        assert!(matches!(result, Err(MediaError::PlaybackRejected(_))));
        // The seek itself succeeded; readiness and resource are untouched.
        assert!(controller.ready());
        assert!(controller.resource().is_some());
    }

    // ---- Clearing ----

    #[test]
    fn test_clear_drops_resource_and_readiness() {
        let (controller, _) = controller();
        let token = controller.set_resource(video("http://x/a.mp4"));
        controller.on_loaded(token);

        controller.clear();
        assert!(controller.resource().is_none());
        assert!(!controller.ready());
    }

    #[test]
    fn test_clear_invalidates_old_token() {
        let (controller, _) = controller();
        let token = controller.set_resource(video("http://x/a.mp4"));
        controller.clear();

        // A straggling load signal for the cleared assignment must miss.
        controller.on_loaded(token);
        assert!(!controller.ready());
    }

    #[test]
    fn test_audio_resource_round_trip() {
        let (controller, _) = controller();
        controller.set_resource(MediaResource::new("http://x/a.mp3", MediaKind::Audio));
        let resource = controller.resource().unwrap();
        assert_eq!(resource.kind, MediaKind::Audio);
        assert_eq!(resource.url, "http://x/a.mp3");
    }
}
