use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::encoder::MediaType;
use crate::sink::PreviewView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderPhase {
    Idle,
    Recording,
    /// Stop requested, waiting for the encoder to finalize
    Stopping,
}

impl RecorderPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecorderPhase::Idle => "idle",
            RecorderPhase::Recording => "recording",
            RecorderPhase::Stopping => "stopping",
        }
    }
}

/// Published description of the current artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactInfo {
    pub id: Uuid,
    pub url: String,
    pub media_type: MediaType,
    pub size_bytes: usize,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of a recorder session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub phase: RecorderPhase,

    /// Generation of the current or last recording (0 before the first one)
    pub recording_id: u64,

    /// Open capture stream, if any
    pub stream_id: Option<Uuid>,

    /// Fragments buffered for the recording in progress
    pub buffered_fragments: usize,
    pub buffered_bytes: usize,

    pub artifact: Option<ArtifactInfo>,

    /// Bindings of the preview surface
    pub preview: PreviewView,

    /// User-facing message of the last failed start
    pub last_error: Option<String>,

    /// When the current or last recording started
    pub started_at: Option<DateTime<Utc>>,
}

impl SessionStatus {
    pub fn is_recording(&self) -> bool {
        self.phase == RecorderPhase::Recording
    }

    pub fn artifact_url(&self) -> Option<&str> {
        self.artifact.as_ref().map(|a| a.url.as_str())
    }
}
