//! Player backend abstraction.
//!
//! The controller never talks to a decoder directly; it drives whatever
//! implements `PlayerBackend`. Real deployments wrap an actual playback
//! engine, the CLI uses `NullPlayer`, and tests use `RecordingPlayer` to
//! assert on the exact call sequence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::MediaError;

/// Contract the playback controller requires from a seekable player.
///
/// Implementations are expected to be cheap to call; none of these methods
/// should block on network or decode work.
pub trait PlayerBackend: Send + Sync {
    /// Pause playback at the current position.
    fn pause(&self);

    /// Move the playback position to `seconds` from the start.
    fn set_position(&self, seconds: f64);

    /// Resume playback from the current position.
    ///
    /// May fail when the platform refuses playback (for example an
    /// autoplay-permission rejection); such failures are reported to the
    /// caller, not swallowed.
    fn play(&self) -> Result<(), MediaError>;
}

/// Player backend that only traces the commands it receives.
///
/// Used by the CLI driver, where there is no real decode engine to steer.
#[derive(Debug, Clone, Default)]
pub struct NullPlayer;

impl NullPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl PlayerBackend for NullPlayer {
    fn pause(&self) {
        tracing::debug!("player: pause");
    }

    fn set_position(&self, seconds: f64) {
        tracing::debug!(seconds, "player: set position");
    }

    fn play(&self) -> Result<(), MediaError> {
        tracing::debug!("player: play");
        Ok(())
    }
}

/// A single command observed by the `RecordingPlayer`.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCall {
    Pause,
    SetPosition(f64),
    Play,
}

/// Recording player backend for tests.
///
/// Captures every command so tests can assert on ordering, and can be told
/// to reject `play()` to exercise the resume-failure path.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayer {
    calls: Arc<Mutex<Vec<PlayerCall>>>,
    reject_play: Arc<AtomicBool>,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `play()` calls fail with `PlaybackRejected`.
    pub fn reject_play(&self, reject: bool) {
        self.reject_play.store(reject, Ordering::SeqCst);
    }

    /// Snapshot of all commands received so far, in order.
    pub fn calls(&self) -> Vec<PlayerCall> {
        self.calls.lock().expect("player calls poisoned").clone()
    }
}

impl PlayerBackend for RecordingPlayer {
    fn pause(&self) {
        self.calls
            .lock()
            .expect("player calls poisoned")
            .push(PlayerCall::Pause);
    }

    fn set_position(&self, seconds: f64) {
        self.calls
            .lock()
            .expect("player calls poisoned")
            .push(PlayerCall::SetPosition(seconds));
    }

    fn play(&self) -> Result<(), MediaError> {
        self.calls
            .lock()
            .expect("player calls poisoned")
            .push(PlayerCall::Play);
        if self.reject_play.load(Ordering::SeqCst) {
            Err(MediaError::PlaybackRejected(
                "playback rejected by test player".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}
