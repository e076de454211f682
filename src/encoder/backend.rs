use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

use crate::capture::CaptureStream;
use crate::error::RecorderError;

/// Container/codec identifier, e.g. `video/webm` or `video/webm;codecs=vp8,opus`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaType(String);

impl MediaType {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Type/subtype without parameters, lowercased
    pub fn essence(&self) -> String {
        self.0
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}

impl Default for MediaType {
    fn default() -> Self {
        Self("video/webm".to_string())
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encoder lifecycle as seen by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderState {
    Inactive,
    Recording,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEventKind {
    /// One encoded fragment (may be empty)
    Fragment(Bytes),
    /// Encoder finished; no fragments follow for this generation
    Finalized,
}

/// Message delivered to the session's transition handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderEvent {
    /// Recording this event belongs to
    pub generation: u64,
    pub kind: EncoderEventKind,
}

/// Sending half handed to an encoder, stamped with its recording generation
#[derive(Debug, Clone)]
pub struct EncoderEvents {
    generation: u64,
    tx: mpsc::UnboundedSender<EncoderEvent>,
}

impl EncoderEvents {
    pub(crate) fn new(generation: u64, tx: mpsc::UnboundedSender<EncoderEvent>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Emit a fragment. Returns `false` once the session is gone.
    pub fn fragment(&self, data: impl Into<Bytes>) -> bool {
        self.send(EncoderEventKind::Fragment(data.into()))
    }

    /// Signal completion. Returns `false` once the session is gone.
    pub fn finalized(&self) -> bool {
        self.send(EncoderEventKind::Finalized)
    }

    fn send(&self, kind: EncoderEventKind) -> bool {
        self.tx
            .send(EncoderEvent {
                generation: self.generation,
                kind,
            })
            .is_ok()
    }
}

/// Encoder session wrapping one capture stream
pub trait MediaEncoder: Send {
    /// Begin emitting fragments
    fn start(&mut self);

    /// Ask the encoder to flush; it emits its last fragments followed by `Finalized`
    fn request_finalize(&mut self);

    fn state(&self) -> EncoderState;
}

/// Creates an encoder for each recording
pub trait EncoderFactory: Send + Sync {
    fn create(
        &self,
        stream: &CaptureStream,
        media_type: &MediaType,
        events: EncoderEvents,
    ) -> Result<Box<dyn MediaEncoder>, RecorderError>;
}
