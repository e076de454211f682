use bytes::Bytes;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::backend::{EncoderEvents, EncoderFactory, EncoderState, MediaEncoder, MediaType};
use crate::capture::{CaptureStream, MediaTrack};
use crate::error::RecorderError;

const SUPPORTED_TYPES: &[&str] = &["video/webm", "video/mp4", "audio/webm"];

const WEBM_MAGIC: &[u8] = &[0x1A, 0x45, 0xDF, 0xA3];
const MP4_MAGIC: &[u8] = &[0x00, 0x00, 0x00, 0x18, b'f', b't', b'y', b'p'];

/// Settings for the synthetic encoder
#[derive(Debug, Clone)]
pub struct SyntheticEncoderConfig {
    /// Size of each emitted fragment in bytes
    pub fragment_bytes: usize,
    /// Interval between fragments
    pub timeslice: Duration,
}

impl Default for SyntheticEncoderConfig {
    fn default() -> Self {
        Self {
            fragment_bytes: 4096,
            timeslice: Duration::from_millis(250),
        }
    }
}

pub struct SyntheticEncoderFactory {
    config: SyntheticEncoderConfig,
}

impl SyntheticEncoderFactory {
    pub fn new(config: SyntheticEncoderConfig) -> Self {
        Self { config }
    }

    pub fn supports(media_type: &MediaType) -> bool {
        SUPPORTED_TYPES.contains(&media_type.essence().as_str())
    }
}

impl EncoderFactory for SyntheticEncoderFactory {
    fn create(
        &self,
        stream: &CaptureStream,
        media_type: &MediaType,
        events: EncoderEvents,
    ) -> Result<Box<dyn MediaEncoder>, RecorderError> {
        if !Self::supports(media_type) {
            return Err(RecorderError::UnsupportedMediaType(media_type.to_string()));
        }

        Ok(Box::new(SyntheticEncoder {
            tracks: stream.tracks().to_vec(),
            media_type: media_type.clone(),
            config: self.config.clone(),
            events: Some(events),
            active: Arc::new(AtomicBool::new(false)),
            finalize_tx: None,
            task: None,
        }))
    }
}

/// Encoder that emits a container header then deterministic filler fragments
pub struct SyntheticEncoder {
    tracks: Vec<MediaTrack>,
    media_type: MediaType,
    config: SyntheticEncoderConfig,
    events: Option<EncoderEvents>,
    /// Cleared by the task when it finalizes on its own
    active: Arc<AtomicBool>,
    finalize_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SyntheticEncoder {
    fn header(media_type: &MediaType) -> Bytes {
        match media_type.essence().as_str() {
            "video/mp4" => Bytes::from_static(MP4_MAGIC),
            _ => Bytes::from_static(WEBM_MAGIC),
        }
    }

    fn filler(sequence: u64, len: usize) -> Bytes {
        Bytes::from(vec![(sequence % 251) as u8; len])
    }
}

impl MediaEncoder for SyntheticEncoder {
    fn start(&mut self) {
        let Some(events) = self.events.take() else {
            debug!("Synthetic encoder already started");
            return;
        };

        events.fragment(Self::header(&self.media_type));

        let (finalize_tx, mut finalize_rx) = oneshot::channel();
        let tracks = self.tracks.clone();
        let config = self.config.clone();
        let generation = events.generation();
        let active = Arc::clone(&self.active);
        active.store(true, Ordering::SeqCst);

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + config.timeslice, config.timeslice);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut sequence = 0u64;

            loop {
                tokio::select! {
                    requested = &mut finalize_rx => {
                        if requested.is_ok() {
                            sequence += 1;
                            events.fragment(Self::filler(sequence, config.fragment_bytes / 2));
                            events.finalized();
                        }
                        break;
                    }
                    _ = ticker.tick() => {
                        if tracks.iter().all(|t| !t.is_live()) {
                            info!("All tracks ended, finalizing recording {}", generation);
                            active.store(false, Ordering::SeqCst);
                            events.finalized();
                            break;
                        }
                        sequence += 1;
                        if !events.fragment(Self::filler(sequence, config.fragment_bytes)) {
                            break;
                        }
                    }
                }
            }

            debug!("Synthetic encoder task for recording {} finished", generation);
        });

        self.finalize_tx = Some(finalize_tx);
        self.task = Some(task);
    }

    fn request_finalize(&mut self) {
        if let Some(tx) = self.finalize_tx.take() {
            let _ = tx.send(());
        }
        self.active.store(false, Ordering::SeqCst);
    }

    fn state(&self) -> EncoderState {
        if self.active.load(Ordering::SeqCst) {
            EncoderState::Recording
        } else {
            EncoderState::Inactive
        }
    }
}

impl Drop for SyntheticEncoder {
    fn drop(&mut self) {
        // Once finalize was requested the task must be allowed to flush
        if self.finalize_tx.is_some() {
            if let Some(task) = self.task.take() {
                task.abort();
            }
        }
    }
}
