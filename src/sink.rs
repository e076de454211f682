use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use uuid::Uuid;

use crate::artifact::ArtifactHandle;
use crate::capture::CaptureStream;

/// On-screen surface the session binds streams and artifacts to
pub trait PreviewSink: Send + Sync {
    fn attach_live_source(&self, stream: &CaptureStream);

    fn attach_playback_source(&self, handle: &ArtifactHandle);

    /// Detach whatever is currently shown
    fn clear(&self);

    /// What the surface is bound to right now
    fn view(&self) -> PreviewView;
}

/// What a surface currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreviewView {
    pub live_stream: Option<Uuid>,
    pub playback_url: Option<String>,
}

/// Sink that remembers its bindings so the status view can render them
#[derive(Debug, Clone, Default)]
pub struct SinkState {
    view: Arc<Mutex<PreviewView>>,
}

impl SinkState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PreviewView {
        self.view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, f: impl FnOnce(&mut PreviewView)) {
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut view);
    }
}

impl PreviewSink for SinkState {
    fn attach_live_source(&self, stream: &CaptureStream) {
        debug!("Preview bound to live stream {}", stream.id());
        self.update(|view| view.live_stream = Some(stream.id()));
    }

    fn attach_playback_source(&self, handle: &ArtifactHandle) {
        debug!("Preview bound to artifact {}", handle.url());
        self.update(|view| view.playback_url = Some(handle.url()));
    }

    fn clear(&self) {
        self.update(|view| *view = PreviewView::default());
    }

    fn view(&self) -> PreviewView {
        self.snapshot()
    }
}
