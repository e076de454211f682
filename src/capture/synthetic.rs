use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

use super::device::{CaptureConstraints, CaptureDevice, CaptureStream, MediaTrack, TrackKind};
use crate::error::DeviceAccessError;

/// Test-pattern capture device.
///
/// Produces one video and/or one audio track per acquisition. Can be configured
/// to refuse access, which is how the permission-denied path is exercised.
#[derive(Debug, Default)]
pub struct SyntheticDevice {
    deny_access: bool,
    acquisitions: AtomicUsize,
}

impl SyntheticDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device that refuses every request, like a user clicking "Block"
    pub fn denying() -> Self {
        Self {
            deny_access: true,
            acquisitions: AtomicUsize::new(0),
        }
    }

    /// Number of streams handed out so far
    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CaptureDevice for SyntheticDevice {
    async fn acquire(
        &self,
        constraints: CaptureConstraints,
    ) -> Result<CaptureStream, DeviceAccessError> {
        if self.deny_access {
            warn!("Synthetic device configured to deny access");
            return Err(DeviceAccessError::PermissionDenied);
        }

        if !constraints.video && !constraints.audio {
            return Err(DeviceAccessError::NoMatchingDevice(
                "at least one of audio or video must be requested".to_string(),
            ));
        }

        let mut tracks = Vec::with_capacity(2);
        if constraints.video {
            tracks.push(MediaTrack::new(TrackKind::Video, "Synthetic Camera"));
        }
        if constraints.audio {
            tracks.push(MediaTrack::new(TrackKind::Audio, "Synthetic Microphone"));
        }

        let stream = CaptureStream::new(tracks);
        self.acquisitions.fetch_add(1, Ordering::SeqCst);

        info!(
            "Acquired synthetic stream {} ({} tracks)",
            stream.id(),
            stream.tracks().len()
        );

        Ok(stream)
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}
