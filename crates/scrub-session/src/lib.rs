//! Scrub session crate - the client-side session state machine.
//!
//! Owns chat mode, the pending draft, the conversation log, and the
//! timestamp index, and composes the media playback controller. The
//! backend is an injected collaborator behind the `BackendClient` trait.

pub mod backend;
pub mod error;
pub mod log;
pub mod session;
pub mod timestamps;

pub use backend::{BackendClient, MockBackendClient};
pub use error::{BackendError, SessionError};
pub use log::ConversationLog;
pub use session::{Draft, SessionMode, SessionStateMachine, SubmitOutcome};
pub use timestamps::{TimestampEntry, TimestampIndex};
