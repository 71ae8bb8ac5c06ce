//! Scrub media crate - playback controller and player abstraction.
//!
//! Owns the lifecycle of the session's single playable resource: resource
//! assignment, token-gated readiness signaling, and seek/play/pause against
//! an injected `PlayerBackend`.

pub mod controller;
pub mod error;
pub mod player;

pub use controller::{MediaPlaybackController, MediaResource, ResourceToken};
pub use error::MediaError;
pub use player::{NullPlayer, PlayerBackend, PlayerCall, RecordingPlayer};
