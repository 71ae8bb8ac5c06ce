use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// The kind of playable media attached to a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// A video resource (seekable, with a video track).
    Video,
    /// An audio-only resource.
    Audio,
}

// =============================================================================
// Conversation types
// =============================================================================

/// One completed question/answer exchange.
///
/// Immutable once appended to the conversation log; the only way a turn
/// disappears is a full session reset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// The question as submitted by the user.
    pub you: String,
    /// The backend's answer text.
    pub bot: String,
    /// Optional summary of the attached media, when one was produced.
    pub summary: Option<String>,
}

/// A file staged for upload alongside a question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// Local path the file contents are read from at submit time.
    pub path: PathBuf,
    /// Display name sent to the backend as the upload file name.
    pub file_name: String,
}

impl Attachment {
    /// Create an attachment from a local path, deriving the display name
    /// from the final path component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "attachment".to_string());
        Self { path, file_name }
    }
}

// =============================================================================
// Wire types
// =============================================================================

/// A raw timestamp entry as it arrives from the backend.
///
/// The backend is loose about the `start_time` type: it may be a JSON
/// number or a string holding one. Validation to a finite value happens
/// at ingestion, not here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawTimestamp {
    pub start_time: RawTime,
    pub text: String,
}

/// A start time that may be encoded as a number or a string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTime {
    Number(f64),
    Text(String),
}

/// The backend's response to a submitted question.
///
/// Field names mirror the wire contract of `/chat/file_summarize/`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerPayload {
    /// Answer text for the submitted question.
    #[serde(default)]
    pub answer: String,
    /// Optional media summary.
    #[serde(default)]
    pub summarize: Option<String>,
    /// URL of the processed media file, possibly relative to the backend
    /// origin.
    #[serde(default)]
    pub file_url: Option<String>,
    /// Whether the processed file is a video.
    #[serde(default)]
    pub is_video: bool,
    /// Whether the processed file is audio-only.
    #[serde(default)]
    pub is_audio: bool,
    /// Navigable moments within the media, in server order.
    #[serde(default)]
    pub timestamps: Vec<RawTimestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_serde_snake_case() {
        assert_eq!(serde_json::to_string(&MediaKind::Video).unwrap(), "\"video\"");
        assert_eq!(serde_json::to_string(&MediaKind::Audio).unwrap(), "\"audio\"");
    }

    #[test]
    fn test_attachment_from_path_derives_name() {
        let att = Attachment::from_path("/tmp/uploads/lecture.mp4");
        assert_eq!(att.file_name, "lecture.mp4");
    }

    #[test]
    fn test_attachment_from_bare_root_falls_back() {
        let att = Attachment::from_path("/");
        assert_eq!(att.file_name, "attachment");
    }

    #[test]
    fn test_answer_payload_full_deserialization() {
        let json = r#"{
            "answer": "The lecture covers ownership.",
            "summarize": "A Rust lecture.",
            "file_url": "/media/lecture.mp4",
            "is_video": true,
            "is_audio": false,
            "timestamps": [
                {"start_time": 12.5, "text": "intro"},
                {"start_time": "99.25", "text": "borrowing"}
            ]
        }"#;
        let payload: AnswerPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.answer, "The lecture covers ownership.");
        assert_eq!(payload.summarize.as_deref(), Some("A Rust lecture."));
        assert_eq!(payload.file_url.as_deref(), Some("/media/lecture.mp4"));
        assert!(payload.is_video);
        assert!(!payload.is_audio);
        assert_eq!(payload.timestamps.len(), 2);
        assert_eq!(payload.timestamps[0].start_time, RawTime::Number(12.5));
        assert_eq!(
            payload.timestamps[1].start_time,
            RawTime::Text("99.25".to_string())
        );
    }

    #[test]
    fn test_answer_payload_minimal_deserialization() {
        // The backend omits every field it has nothing to say about.
        let payload: AnswerPayload = serde_json::from_str(r#"{"answer": "hi"}"#).unwrap();
        assert_eq!(payload.answer, "hi");
        assert!(payload.summarize.is_none());
        assert!(payload.file_url.is_none());
        assert!(!payload.is_video);
        assert!(!payload.is_audio);
        assert!(payload.timestamps.is_empty());
    }

    #[test]
    fn test_turn_serde_roundtrip() {
        let turn = Turn {
            you: "what is this about?".to_string(),
            bot: "a talk on lifetimes".to_string(),
            summary: None,
        };
        let json = serde_json::to_string(&turn).unwrap();
        let back: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, turn);
    }
}
