use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::capture::CaptureConstraints;
use crate::encoder::MediaType;

/// Configuration for a recorder session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Media type requested from the encoder
    /// Default: video/webm
    pub media_type: MediaType,

    /// Tracks requested from the capture device
    /// Default: video + audio
    pub constraints: CaptureConstraints,

    /// How long to wait for the encoder to finalize after stop.
    /// `None` waits indefinitely.
    pub finalize_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            media_type: MediaType::default(),
            constraints: CaptureConstraints::default(),
            finalize_timeout: None,
        }
    }
}
