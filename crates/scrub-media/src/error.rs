//! Error types for media playback.

use scrub_core::error::ScrubError;

/// Errors from the media playback controller.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media is not ready for seeking")]
    NotReady,
    #[error("invalid seek time: {0}")]
    InvalidTime(f64),
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),
}

impl From<MediaError> for ScrubError {
    fn from(err: MediaError) -> Self {
        ScrubError::Media(err.to_string())
    }
}
