// Shared test doubles for recorder tests
//
// - TrackingDevice: synthetic device that keeps a clone of every track it hands out
// - ScriptedEncoders: encoder factory whose events are emitted by the test itself

#![allow(dead_code)]

use clip_recorder::{
    ArtifactStore, CaptureConstraints, CaptureDevice, CaptureStream, DeviceAccessError,
    EncoderEvent, EncoderEvents, EncoderFactory, EncoderState, MediaEncoder, MediaTrack,
    MediaType, RecorderError, RecorderSession, SessionConfig, SinkState, SyntheticDevice,
};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

pub struct TrackingDevice {
    inner: SyntheticDevice,
    tracks: Mutex<Vec<MediaTrack>>,
}

impl TrackingDevice {
    pub fn new() -> Self {
        Self {
            inner: SyntheticDevice::new(),
            tracks: Mutex::new(Vec::new()),
        }
    }

    pub fn denying() -> Self {
        Self {
            inner: SyntheticDevice::denying(),
            tracks: Mutex::new(Vec::new()),
        }
    }

    pub fn acquisitions(&self) -> usize {
        self.inner.acquisitions()
    }

    /// Every track handed out so far, in acquisition order
    pub fn tracks(&self) -> Vec<MediaTrack> {
        self.tracks.lock().unwrap().clone()
    }

    pub fn live_tracks(&self) -> usize {
        self.tracks().iter().filter(|t| t.is_live()).count()
    }
}

#[async_trait::async_trait]
impl CaptureDevice for TrackingDevice {
    async fn acquire(
        &self,
        constraints: CaptureConstraints,
    ) -> Result<CaptureStream, DeviceAccessError> {
        let stream = self.inner.acquire(constraints).await?;
        self.tracks
            .lock()
            .unwrap()
            .extend(stream.tracks().iter().cloned());
        Ok(stream)
    }

    fn name(&self) -> &str {
        "tracking"
    }
}

#[derive(Default)]
struct ScriptedState {
    events: Vec<EncoderEvents>,
    finalize_requests: usize,
    /// Latest encoder finished without being asked
    ended: bool,
}

/// Encoder factory whose encoders never emit anything on their own
#[derive(Clone, Default)]
pub struct ScriptedEncoders {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedEncoders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Event sender of the most recently created encoder
    pub fn latest(&self) -> EncoderEvents {
        self.state
            .lock()
            .unwrap()
            .events
            .last()
            .cloned()
            .expect("no encoder created yet")
    }

    pub fn created(&self) -> usize {
        self.state.lock().unwrap().events.len()
    }

    pub fn finalize_requests(&self) -> usize {
        self.state.lock().unwrap().finalize_requests
    }

    /// Latest encoder finalizes on its own, as when its tracks end
    pub fn end_latest(&self) {
        self.state.lock().unwrap().ended = true;
        self.latest().finalized();
    }
}

impl EncoderFactory for ScriptedEncoders {
    fn create(
        &self,
        _stream: &CaptureStream,
        _media_type: &MediaType,
        events: EncoderEvents,
    ) -> Result<Box<dyn MediaEncoder>, RecorderError> {
        let mut state = self.state.lock().unwrap();
        state.events.push(events);
        state.ended = false;
        drop(state);
        Ok(Box::new(ScriptedEncoder {
            state: Arc::clone(&self.state),
            encoder_state: EncoderState::Inactive,
        }))
    }
}

struct ScriptedEncoder {
    state: Arc<Mutex<ScriptedState>>,
    encoder_state: EncoderState,
}

impl MediaEncoder for ScriptedEncoder {
    fn start(&mut self) {
        self.encoder_state = EncoderState::Recording;
    }

    fn request_finalize(&mut self) {
        self.state.lock().unwrap().finalize_requests += 1;
        self.encoder_state = EncoderState::Inactive;
    }

    fn state(&self) -> EncoderState {
        if self.state.lock().unwrap().ended {
            EncoderState::Inactive
        } else {
            self.encoder_state
        }
    }
}

/// Session wired to test doubles
pub struct Harness {
    pub session: RecorderSession,
    pub events: mpsc::UnboundedReceiver<EncoderEvent>,
    pub device: Arc<TrackingDevice>,
    pub encoders: ScriptedEncoders,
    pub sink: SinkState,
    pub artifacts: ArtifactStore,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(TrackingDevice::new(), SessionConfig::default())
    }

    pub fn with(device: TrackingDevice, config: SessionConfig) -> Self {
        let device = Arc::new(device);
        let encoders = ScriptedEncoders::new();
        let sink = SinkState::new();
        let artifacts = ArtifactStore::new();

        let (session, events) = RecorderSession::new(
            config,
            device.clone(),
            Arc::new(encoders.clone()),
            Arc::new(sink.clone()),
            artifacts.clone(),
        );

        Self {
            session,
            events,
            device,
            encoders,
            sink,
            artifacts,
        }
    }

    /// Deliver every queued encoder event to the session, in order
    pub fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.session.handle_event(event);
        }
    }
}
