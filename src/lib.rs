pub mod artifact;
pub mod capture;
pub mod config;
pub mod encoder;
pub mod error;
pub mod http;
pub mod session;
pub mod sink;

pub use artifact::{ArtifactHandle, ArtifactStore, ChunkBuffer, PlaybackArtifact};
pub use capture::{
    CaptureConstraints, CaptureDevice, CaptureStream, MediaTrack, SyntheticDevice, TrackKind,
};
pub use config::Config;
pub use encoder::{
    EncoderEvent, EncoderEventKind, EncoderEvents, EncoderFactory, EncoderState, MediaEncoder,
    MediaType, SyntheticEncoderConfig, SyntheticEncoderFactory,
};
pub use error::{DeviceAccessError, RecorderError};
pub use http::{create_router, AppState};
pub use session::{RecorderPhase, RecorderSession, SessionConfig, SessionHandle, SessionStatus};
pub use sink::{PreviewSink, PreviewView, SinkState};
