use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::DeviceAccessError;

/// Capabilities requested from a capture device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConstraints {
    pub video: bool,
    pub audio: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            video: true,
            audio: true,
        }
    }
}

/// Kind of media carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Audio,
    Video,
}

/// A single live device track.
///
/// Clones share the same underlying state, so stopping any clone stops the track.
#[derive(Debug, Clone)]
pub struct MediaTrack {
    id: Uuid,
    kind: TrackKind,
    label: String,
    live: Arc<AtomicBool>,
}

impl MediaTrack {
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            label: label.into(),
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Release the track. Returns `true` only for the call that actually stopped it.
    pub fn stop(&self) -> bool {
        let was_live = self.live.swap(false, Ordering::SeqCst);
        if was_live {
            debug!("Stopped {:?} track {} ({})", self.kind, self.id, self.label);
        }
        was_live
    }
}

/// Live handle to the tracks of one acquisition.
///
/// Releasing consumes the stream; an unreleased stream stops its tracks on drop.
#[derive(Debug)]
pub struct CaptureStream {
    id: Uuid,
    tracks: Vec<MediaTrack>,
}

impl CaptureStream {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tracks,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    pub fn has_kind(&self, kind: TrackKind) -> bool {
        self.tracks.iter().any(|t| t.kind() == kind)
    }

    /// True once every track has ended, whoever stopped it
    pub fn is_ended(&self) -> bool {
        self.tracks.iter().all(|t| !t.is_live())
    }

    /// Stop every track and give up the stream.
    ///
    /// Returns the number of tracks this call stopped.
    pub fn stop(mut self) -> usize {
        self.stop_tracks()
    }

    fn stop_tracks(&mut self) -> usize {
        self.tracks.iter().filter(|t| t.stop()).count()
    }
}

impl Drop for CaptureStream {
    fn drop(&mut self) {
        let stopped = self.stop_tracks();
        if stopped > 0 {
            debug!("Released {} track(s) of dropped stream {}", stopped, self.id);
        }
    }
}

/// Capture device trait
///
/// Implementations:
/// - Synthetic: generated test-pattern device (default backend, tests)
#[async_trait::async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Request a live stream satisfying the constraints
    async fn acquire(
        &self,
        constraints: CaptureConstraints,
    ) -> Result<CaptureStream, DeviceAccessError>;

    /// Get device name for logging
    fn name(&self) -> &str;
}
