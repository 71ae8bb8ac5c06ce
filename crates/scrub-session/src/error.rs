//! Error types for the session state machine.

use scrub_core::error::ScrubError;
use scrub_media::MediaError;

/// Errors the backend collaborator can report.
///
/// Defined next to the `BackendClient` trait so transport implementations
/// in other crates share one vocabulary.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("attachment unreadable: {0}")]
    Attachment(String),
}

/// Errors from the session state machine.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("question cannot be empty")]
    EmptyQuestion,
    #[error("no timestamp at index {0}")]
    MomentOutOfRange(usize),
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("media error: {0}")]
    Media(#[from] MediaError),
}

impl From<SessionError> for ScrubError {
    fn from(err: SessionError) -> Self {
        ScrubError::Session(err.to_string())
    }
}

impl From<BackendError> for ScrubError {
    fn from(err: BackendError) -> Self {
        ScrubError::Backend(err.to_string())
    }
}
