//! HTTP implementation of the backend collaborator.
//!
//! Talks to the question-answering service over multipart/JSON:
//! - `POST {origin}/chat/file_summarize/` with text part `question` and
//!   optional file part `file`;
//! - `POST {origin}/chat/delete_transcription/` to clear server-side
//!   transcription state.
//!
//! Relative `file_url` values in responses are resolved against the
//! configured origin before the payload is handed to the session.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;

use scrub_core::config::BackendConfig;
use scrub_core::types::{AnswerPayload, Attachment};
use scrub_session::{BackendClient, BackendError};

/// `reqwest`-backed implementation of `BackendClient`.
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    http: reqwest::Client,
    origin: String,
}

impl HttpBackendClient {
    /// Build a client against the origin selected by `config`.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BackendError::Request(e.to_string()))?;
        Ok(Self {
            http,
            origin: config.origin().trim_end_matches('/').to_string(),
        })
    }

    /// Origin this client resolves relative URLs against.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    /// Resolve a possibly relative media URL against the origin.
    fn resolve_file_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.origin, url)
        } else {
            format!("{}/{}", self.origin, url)
        }
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn submit_question(
        &self,
        question: &str,
        attachment: Option<&Attachment>,
    ) -> Result<AnswerPayload, BackendError> {
        let mut form = multipart::Form::new().text("question", question.to_string());
        if let Some(attachment) = attachment {
            let bytes = tokio::fs::read(&attachment.path)
                .await
                .map_err(|e| BackendError::Attachment(e.to_string()))?;
            tracing::debug!(
                file_name = %attachment.file_name,
                bytes = bytes.len(),
                "Uploading attachment"
            );
            let part = multipart::Part::bytes(bytes).file_name(attachment.file_name.clone());
            form = form.part("file", part);
        }

        let response = self
            .http
            .post(self.endpoint("/chat/file_summarize/"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let mut payload: AnswerPayload = response
            .json()
            .await
            .map_err(|e| BackendError::Malformed(e.to_string()))?;
        if let Some(url) = payload.file_url.take() {
            payload.file_url = Some(self.resolve_file_url(&url));
        }
        Ok(payload)
    }

    async fn reset_session(&self) -> Result<(), BackendError> {
        let response = self
            .http
            .post(self.endpoint("/chat/delete_transcription/"))
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }
        tracing::debug!("Server-side transcription state cleared");
        Ok(())
    }
}
