use super::config::SessionConfig;
use super::state::{ArtifactInfo, RecorderPhase, SessionStatus};
use crate::artifact::{ArtifactHandle, ArtifactStore, ChunkBuffer};
use crate::capture::{CaptureDevice, CaptureStream};
use crate::encoder::{
    EncoderEvent, EncoderEventKind, EncoderEvents, EncoderFactory, EncoderState, MediaEncoder,
};
use crate::error::RecorderError;
use crate::sink::PreviewSink;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// A recorder session: owns the capture stream, encoder, fragment buffer and
/// the currently published artifact handle.
///
/// Encoder callbacks arrive as [`EncoderEvent`]s on the receiver returned by
/// [`RecorderSession::new`] and must be fed back through
/// [`RecorderSession::handle_event`] in arrival order.
pub struct RecorderSession {
    /// Session configuration
    config: SessionConfig,

    device: Arc<dyn CaptureDevice>,
    encoders: Arc<dyn EncoderFactory>,
    sink: Arc<dyn PreviewSink>,
    artifacts: ArtifactStore,

    /// Handed (stamped with a generation) to every encoder this session creates
    events_tx: mpsc::UnboundedSender<EncoderEvent>,

    phase: RecorderPhase,
    stream: Option<CaptureStream>,
    encoder: Option<Box<dyn MediaEncoder>>,
    buffer: ChunkBuffer,

    /// Handle of the last finished recording, revoked when superseded
    artifact: Option<ArtifactHandle>,

    /// Incremented per recording; events from older encoders are ignored
    generation: u64,

    started_at: Option<DateTime<Utc>>,
    stop_requested_at: Option<Instant>,
    last_error: Option<String>,
}

impl RecorderSession {
    /// Create an idle session and the receiver its encoder events arrive on
    pub fn new(
        config: SessionConfig,
        device: Arc<dyn CaptureDevice>,
        encoders: Arc<dyn EncoderFactory>,
        sink: Arc<dyn PreviewSink>,
        artifacts: ArtifactStore,
    ) -> (Self, mpsc::UnboundedReceiver<EncoderEvent>) {
        info!(
            "Creating recorder session (device: {}, media type: {})",
            device.name(),
            config.media_type
        );

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let session = Self {
            config,
            device,
            encoders,
            sink,
            artifacts,
            events_tx,
            phase: RecorderPhase::Idle,
            stream: None,
            encoder: None,
            buffer: ChunkBuffer::new(),
            artifact: None,
            generation: 0,
            started_at: None,
            stop_requested_at: None,
            last_error: None,
        };

        (session, events_rx)
    }

    pub fn phase(&self) -> RecorderPhase {
        self.phase
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Currently published artifact handle
    pub fn artifact(&self) -> Option<ArtifactHandle> {
        self.artifact
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn has_open_stream(&self) -> bool {
        self.stream.is_some()
    }

    pub fn buffered_fragments(&self) -> usize {
        self.buffer.len()
    }

    /// Start a new recording.
    ///
    /// No-op while a recording is active or stopping. On failure the session
    /// stays idle and the user-facing message is kept as `last_error`.
    pub async fn start(&mut self) -> Result<RecorderPhase, RecorderError> {
        if self.phase != RecorderPhase::Idle {
            warn!("Start requested while {}, ignoring", self.phase.as_str());
            return Ok(self.phase);
        }

        info!("Starting recording");

        // Previous recording goes away before anything new is published
        if let Some(handle) = self.artifact.take() {
            self.artifacts.revoke(&handle);
        }
        self.sink.clear();
        self.buffer.clear();
        self.release_stream();

        let stream = match self.device.acquire(self.config.constraints).await {
            Ok(stream) => stream,
            Err(e) => {
                error!("Failed to acquire capture stream: {}", e);
                let err = RecorderError::from(e);
                self.last_error = Some(err.user_message());
                return Err(err);
            }
        };

        self.sink.attach_live_source(&stream);

        self.generation += 1;
        let events = EncoderEvents::new(self.generation, self.events_tx.clone());
        let mut encoder = match self
            .encoders
            .create(&stream, &self.config.media_type, events)
        {
            Ok(encoder) => encoder,
            Err(e) => {
                error!("Failed to create encoder: {}", e);
                self.sink.clear();
                stream.stop();
                self.last_error = Some(e.user_message());
                return Err(e);
            }
        };

        encoder.start();

        info!(
            "Recording {} started on stream {} ({} tracks)",
            self.generation,
            stream.id(),
            stream.tracks().len()
        );

        self.stream = Some(stream);
        self.encoder = Some(encoder);
        self.started_at = Some(Utc::now());
        self.stop_requested_at = None;
        self.last_error = None;
        self.phase = RecorderPhase::Recording;

        Ok(self.phase)
    }

    /// Ask the encoder to finalize. Returns `false` (no-op) unless recording.
    ///
    /// The artifact is built when the matching `Finalized` event arrives.
    pub fn stop(&mut self) -> bool {
        if self.phase != RecorderPhase::Recording {
            debug!("Stop requested while {}, ignoring", self.phase.as_str());
            return false;
        }

        info!("Stopping recording {}", self.generation);

        match self.encoder.as_mut() {
            Some(encoder) if encoder.state() == EncoderState::Recording => {
                encoder.request_finalize();
            }
            // Already finalizing on its own; its Finalized event completes the stop
            _ => debug!("Encoder already inactive, waiting for it to finalize"),
        }
        self.stop_requested_at = Some(Instant::now());
        self.phase = RecorderPhase::Stopping;

        true
    }

    /// Apply one encoder event. Returns the new handle when the event
    /// completed a recording.
    pub fn handle_event(&mut self, event: EncoderEvent) -> Option<ArtifactHandle> {
        if event.generation != self.generation {
            debug!(
                "Ignoring event from recording {} (current: {})",
                event.generation, self.generation
            );
            return None;
        }

        match event.kind {
            EncoderEventKind::Fragment(data) => {
                match self.phase {
                    RecorderPhase::Recording | RecorderPhase::Stopping => {
                        if !self.buffer.append(data) {
                            debug!("Dropped empty fragment");
                        }
                    }
                    RecorderPhase::Idle => {
                        debug!("Ignoring fragment of {} bytes while idle", data.len());
                    }
                }
                None
            }
            EncoderEventKind::Finalized => match self.phase {
                RecorderPhase::Stopping => Some(self.finish()),
                RecorderPhase::Recording => {
                    warn!("Encoder finalized on its own, completing recording");
                    Some(self.finish())
                }
                RecorderPhase::Idle => None,
            },
        }
    }

    /// When the finalize wait gives up, if a timeout is configured and a stop is pending
    pub fn finalize_deadline(&self) -> Option<Instant> {
        if self.phase != RecorderPhase::Stopping {
            return None;
        }
        let timeout = self.config.finalize_timeout?;
        self.stop_requested_at.map(|at| at + timeout)
    }

    /// Complete a pending stop from whatever was buffered
    pub fn expire_finalize(&mut self) -> Option<ArtifactHandle> {
        if self.phase != RecorderPhase::Stopping {
            return None;
        }
        warn!(
            "Encoder did not finalize recording {} in time, building artifact from {} buffered fragments",
            self.generation,
            self.buffer.len()
        );
        Some(self.finish())
    }

    /// Release everything the session holds. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if self.encoder.take().is_some() {
            debug!("Discarded active encoder");
        }
        if let Some(stream) = self.stream.take() {
            let stopped = stream.stop();
            info!("Teardown stopped {} track(s)", stopped);
        }
        if let Some(handle) = self.artifact.take() {
            self.artifacts.revoke(&handle);
        }
        self.buffer.clear();
        self.sink.clear();
        self.stop_requested_at = None;
        self.phase = RecorderPhase::Idle;
    }

    pub fn status(&self) -> SessionStatus {
        let artifact = self.artifact.and_then(|handle| {
            self.artifacts.resolve(&handle).map(|artifact| ArtifactInfo {
                id: artifact.id,
                url: handle.url(),
                media_type: artifact.media_type.clone(),
                size_bytes: artifact.data.len(),
                created_at: artifact.created_at,
            })
        });

        SessionStatus {
            phase: self.phase,
            recording_id: self.generation,
            stream_id: self.stream.as_ref().map(CaptureStream::id),
            buffered_fragments: self.buffer.len(),
            buffered_bytes: self.buffer.total_bytes(),
            artifact,
            preview: self.sink.view(),
            last_error: self.last_error.clone(),
            started_at: self.started_at,
        }
    }

    /// Release the stream, drain the buffer into a new artifact and publish it
    fn finish(&mut self) -> ArtifactHandle {
        self.encoder = None;
        self.release_stream();

        let fragments = self.buffer.drain();
        if let Some(previous) = self.artifact.take() {
            self.artifacts.revoke(&previous);
        }
        let handle = self
            .artifacts
            .create(fragments, self.config.media_type.clone());

        self.sink.clear();
        self.sink.attach_playback_source(&handle);

        self.artifact = Some(handle);
        self.stop_requested_at = None;
        self.phase = RecorderPhase::Idle;

        info!("Recording {} available at {}", self.generation, handle.url());

        handle
    }

    fn release_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            let id = stream.id();
            let stopped = stream.stop();
            debug!("Released stream {} ({} track(s) stopped)", id, stopped);
        }
    }
}

impl Drop for RecorderSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
