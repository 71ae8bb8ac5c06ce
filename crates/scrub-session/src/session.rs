//! Session state machine: the top-level orchestrator.
//!
//! Owns the chat mode, the pending question/attachment draft, and the
//! in-flight request state, and composes the conversation log, timestamp
//! index, and media playback controller in response to external events.
//!
//! Mode transitions:
//! - Composing -> Submitting (submit accepted; one request in flight)
//! - Submitting -> Reviewing (response received; turn appended)
//! - Submitting -> Composing (request failed; draft preserved)
//! - any -> Composing (reset; everything cleared)

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use scrub_core::types::{AnswerPayload, Attachment, MediaKind, Turn};
use scrub_media::{
    MediaPlaybackController, MediaResource, PlayerBackend, ResourceToken,
};

use crate::backend::BackendClient;
use crate::error::SessionError;
use crate::log::ConversationLog;
use crate::timestamps::{TimestampEntry, TimestampIndex};

/// Where the session is in its compose/submit/review cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionMode {
    /// The user may edit the draft and submit.
    Composing,
    /// A submission is in flight; further submits are ignored.
    Submitting,
    /// A response is displayed; only reset is available.
    Reviewing,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Composing => write!(f, "Composing"),
            SessionMode::Submitting => write!(f, "Submitting"),
            SessionMode::Reviewing => write!(f, "Reviewing"),
        }
    }
}

/// What a `submit` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request was issued and its response applied.
    Answered,
    /// The call was dropped without a request: either a submission was
    /// already in flight or the session is reviewing a response.
    Ignored,
}

/// The user's in-progress, unsubmitted question/attachment pair.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub question: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug)]
struct SessionState {
    mode: SessionMode,
    draft: Draft,
    log: ConversationLog,
    timestamps: TimestampIndex,
}

/// Single-session orchestrator over a backend client and a media player.
///
/// All methods take `&self`; state lives behind a mutex that is never held
/// across an await, so a second `submit` arriving while one is in flight
/// observes the `Submitting` mode and is ignored rather than queued.
pub struct SessionStateMachine {
    id: Uuid,
    started_at: DateTime<Utc>,
    state: Mutex<SessionState>,
    media: MediaPlaybackController,
    client: Arc<dyn BackendClient>,
}

impl fmt::Debug for SessionStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStateMachine")
            .field("id", &self.id)
            .field("started_at", &self.started_at)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SessionStateMachine {
    /// Create a fresh session in `Composing` mode with an empty draft.
    pub fn new(client: Arc<dyn BackendClient>, player: Arc<dyn PlayerBackend>) -> Self {
        let id = Uuid::new_v4();
        tracing::info!(session_id = %id, "Session started");
        Self {
            id,
            started_at: Utc::now(),
            state: Mutex::new(SessionState {
                mode: SessionMode::Composing,
                draft: Draft::default(),
                log: ConversationLog::new(),
                timestamps: TimestampIndex::new(),
            }),
            media: MediaPlaybackController::new(player),
            client,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    // =========================================================================
    // Draft editing
    // =========================================================================

    /// Set the draft question text. Ignored outside `Composing`.
    pub fn set_question(&self, text: &str) {
        let mut state = self.lock();
        if state.mode != SessionMode::Composing {
            tracing::debug!(mode = %state.mode, "Ignoring question edit outside Composing");
            return;
        }
        state.draft.question = text.to_string();
    }

    /// Stage an attachment, replacing any previously staged one.
    ///
    /// Ignored outside `Composing`. Never touches the active media
    /// resource; that only changes when a response arrives.
    pub fn attach(&self, attachment: Attachment) {
        let mut state = self.lock();
        if state.mode != SessionMode::Composing {
            tracing::debug!(mode = %state.mode, "Ignoring attachment outside Composing");
            return;
        }
        tracing::info!(file_name = %attachment.file_name, "Attachment staged");
        state.draft.attachment = Some(attachment);
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Submit the current draft.
    ///
    /// An empty (or whitespace-only) question is rejected without a state
    /// change or request. A call while a submission is in flight, or while
    /// reviewing, is silently dropped and reported as `Ignored`. On a
    /// failed request the draft is preserved and the session returns to
    /// `Composing`.
    pub async fn submit(&self) -> Result<SubmitOutcome, SessionError> {
        let (question, attachment) = {
            let mut state = self.lock();
            if state.mode != SessionMode::Composing {
                tracing::debug!(mode = %state.mode, "Submit ignored");
                return Ok(SubmitOutcome::Ignored);
            }
            if state.draft.question.trim().is_empty() {
                return Err(SessionError::EmptyQuestion);
            }
            state.mode = SessionMode::Submitting;
            (state.draft.question.clone(), state.draft.attachment.clone())
        };

        tracing::info!(
            session_id = %self.id,
            has_attachment = attachment.is_some(),
            "Submitting question"
        );

        match self
            .client
            .submit_question(&question, attachment.as_ref())
            .await
        {
            Ok(payload) => {
                self.apply_response(question, payload);
                Ok(SubmitOutcome::Answered)
            }
            Err(e) => {
                let mut state = self.lock();
                state.mode = SessionMode::Composing;
                tracing::warn!(session_id = %self.id, error = %e, "Submission failed");
                Err(SessionError::Backend(e))
            }
        }
    }

    /// Apply a successful response: append the turn, swap the timestamp
    /// index, replace or drop the media resource, clear the draft.
    fn apply_response(&self, question: String, payload: AnswerPayload) {
        let resource = resource_from_payload(&payload);
        let mut state = self.lock();

        let dropped = state.timestamps.replace(&payload.timestamps);
        if dropped > 0 {
            tracing::debug!(dropped, "Some timestamps were dropped during ingestion");
        }
        state.log.append(Turn {
            you: question,
            bot: payload.answer,
            summary: payload.summarize,
        });
        state.draft = Draft::default();
        state.mode = SessionMode::Reviewing;
        drop(state);

        match resource {
            Some(resource) => {
                self.media.set_resource(resource);
            }
            None => self.media.clear(),
        }
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Start a fresh session: ask the backend to clear its transcription
    /// state, then clear everything local and return to `Composing`.
    ///
    /// The backend call is best-effort cleanup; its failure is logged and
    /// never blocks the local reset. Safe to invoke from any mode.
    pub async fn reset(&self) {
        if let Err(e) = self.client.reset_session().await {
            tracing::warn!(
                session_id = %self.id,
                error = %e,
                "Server-side reset failed; clearing local state anyway"
            );
        }

        let mut state = self.lock();
        state.draft = Draft::default();
        state.log.clear();
        state.timestamps.clear();
        state.mode = SessionMode::Composing;
        drop(state);

        self.media.clear();
        tracing::info!(session_id = %self.id, "Session reset");
    }

    // =========================================================================
    // Media passthrough
    // =========================================================================

    /// Report that the playback engine finished loading metadata for the
    /// assignment identified by `token`.
    pub fn media_loaded(&self, token: ResourceToken) {
        self.media.on_loaded(token);
    }

    /// Report a load failure for the assignment identified by `token`.
    pub fn media_load_error(&self, token: ResourceToken) {
        self.media.on_load_error(token);
    }

    /// Jump playback to `seconds`.
    pub fn seek(&self, seconds: f64) -> Result<(), SessionError> {
        self.media.seek(seconds)?;
        Ok(())
    }

    /// Jump playback to the timestamp at `index` in the current index.
    pub fn seek_moment(&self, index: usize) -> Result<(), SessionError> {
        let start = {
            let state = self.lock();
            state
                .timestamps
                .entries()
                .get(index)
                .map(|entry| entry.start_seconds)
                .ok_or(SessionError::MomentOutOfRange(index))?
        };
        self.seek(start)
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    pub fn mode(&self) -> SessionMode {
        self.lock().mode
    }

    pub fn draft_question(&self) -> String {
        self.lock().draft.question.clone()
    }

    pub fn attachment_name(&self) -> Option<String> {
        self.lock()
            .draft
            .attachment
            .as_ref()
            .map(|a| a.file_name.clone())
    }

    pub fn turns(&self) -> Vec<Turn> {
        self.lock().log.all().to_vec()
    }

    pub fn timestamps(&self) -> Vec<TimestampEntry> {
        self.lock().timestamps.entries().to_vec()
    }

    pub fn media_resource(&self) -> Option<MediaResource> {
        self.media.resource()
    }

    pub fn media_ready(&self) -> bool {
        self.media.ready()
    }

    /// Token of the current media assignment, for wiring load signals.
    pub fn media_token(&self) -> ResourceToken {
        self.media.current_token()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().expect("session state poisoned")
    }
}

/// Derive the playable resource a response carries, if any.
///
/// Video wins when the backend flags both kinds. Flags without a URL
/// violate the backend contract; the resource is dropped with a warning
/// rather than assigned half-formed.
fn resource_from_payload(payload: &AnswerPayload) -> Option<MediaResource> {
    let kind = if payload.is_video {
        MediaKind::Video
    } else if payload.is_audio {
        MediaKind::Audio
    } else {
        return None;
    };
    match payload.file_url.as_deref() {
        Some(url) => Some(MediaResource::new(url, kind)),
        None => {
            tracing::warn!("Response flagged playable media but carried no file URL");
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
