//! Backend collaborator abstraction.
//!
//! The session state machine never talks HTTP directly; it drives whatever
//! implements `BackendClient`. The real transport lives in `scrub-client`;
//! tests use the scripted `MockBackendClient`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use scrub_core::types::{AnswerPayload, Attachment};

use crate::error::BackendError;

/// Service that answers questions and clears server-side session state.
///
/// Object safe so the session can hold `Arc<dyn BackendClient>`.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Submit a question with an optional media attachment.
    ///
    /// Any `file_url` in the returned payload is already resolved to an
    /// absolute URL by the implementation.
    async fn submit_question(
        &self,
        question: &str,
        attachment: Option<&Attachment>,
    ) -> Result<AnswerPayload, BackendError>;

    /// Clear server-side transcription state. Best-effort cleanup; callers
    /// treat failure as non-blocking.
    async fn reset_session(&self) -> Result<(), BackendError>;
}

/// Scripted backend client for testing.
///
/// Pops queued responses in order; once the queue is exhausted it echoes
/// the question back in a minimal payload. Counts calls so tests can
/// assert how many requests were actually issued, and can hold
/// submissions open to exercise in-flight behavior.
#[derive(Debug, Default)]
pub struct MockBackendClient {
    responses: Mutex<VecDeque<Result<AnswerPayload, BackendError>>>,
    submit_calls: AtomicUsize,
    reset_calls: AtomicUsize,
    fail_reset: AtomicBool,
    hold_submissions: AtomicBool,
    release: tokio::sync::Notify,
}

impl MockBackendClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn push_ok(&self, payload: AnswerPayload) {
        self.responses
            .lock()
            .expect("mock responses poisoned")
            .push_back(Ok(payload));
    }

    /// Queue a failed response.
    pub fn push_err(&self, err: BackendError) {
        self.responses
            .lock()
            .expect("mock responses poisoned")
            .push_back(Err(err));
    }

    /// Make `reset_session` fail.
    pub fn fail_reset(&self, fail: bool) {
        self.fail_reset.store(fail, Ordering::SeqCst);
    }

    /// Hold every submission open until `release_submission` is called.
    pub fn hold_submissions(&self, hold: bool) {
        self.hold_submissions.store(hold, Ordering::SeqCst);
    }

    /// Release one held submission.
    pub fn release_submission(&self) {
        self.release.notify_one();
    }

    /// How many times `submit_question` was called.
    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    /// How many times `reset_session` was called.
    pub fn reset_calls(&self) -> usize {
        self.reset_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendClient for MockBackendClient {
    async fn submit_question(
        &self,
        question: &str,
        _attachment: Option<&Attachment>,
    ) -> Result<AnswerPayload, BackendError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.hold_submissions.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        let scripted = self
            .responses
            .lock()
            .expect("mock responses poisoned")
            .pop_front();
        match scripted {
            Some(result) => result,
            None => Ok(AnswerPayload {
                answer: format!("mock answer to: {question}"),
                ..AnswerPayload::default()
            }),
        }
    }

    async fn reset_session(&self) -> Result<(), BackendError> {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reset.load(Ordering::SeqCst) {
            Err(BackendError::Status(500))
        } else {
            Ok(())
        }
    }
}
