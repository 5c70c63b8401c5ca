//! Internal domain models for clip identification.
//!
//! These types are OUR types - they don't change when the AcoustID API changes.
//! The lookup response gets reduced into these types by the normalizer.

use serde::Serialize;

/// Fingerprint produced by fpcalc for a single clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintResult {
    /// Duration of the audio in seconds (rounded, required by AcoustID)
    pub duration_secs: u32,
    /// The fingerprint string (Chromaprint format), never empty
    pub fingerprint: String,
    /// The `FILE` value fpcalc reported
    pub source_label: String,
}

/// Normalized list of candidate recordings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchList {
    pub status: String,
    pub matches: Vec<Match>,
}

impl MatchList {
    pub fn ok(matches: Vec<Match>) -> Self {
        Self {
            status: "ok".to_string(),
            matches,
        }
    }
}

/// A single candidate identification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// AcoustID track identifier
    pub id: String,
    /// Confidence rounded to 2 decimals
    pub score: f64,
    pub recording: MatchedRecording,
}

/// Minimal recording metadata returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedRecording {
    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Duration in whole seconds
    pub duration: u32,
}

/// Queue health snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: String,
    pub queue_length: usize,
}

/// Errors that can occur while identifying a clip
#[derive(Debug, Clone, thiserror::Error)]
pub enum IdentifyError {
    /// Missing or malformed input (no file, no URL)
    #[error("{0}")]
    Validation(String),

    #[error("Failed to download: {status} {status_text}")]
    Download { status: u16, status_text: String },

    #[error("fpcalc failed: {0}")]
    Extraction(String),

    /// fpcalc ran cleanly but printed no FINGERPRINT line
    #[error("No fingerprint generated")]
    NoFingerprint,

    #[error("AcoustID API error: {status} {status_text}")]
    Api { status: u16, status_text: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Queue error: {0}")]
    Queue(#[from] super::queue::QueueError),
}

impl IdentifyError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }
}

impl From<std::io::Error> for IdentifyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<reqwest::Error> for IdentifyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
