pub mod device;
pub mod synthetic;

pub use device::{CaptureConstraints, CaptureDevice, CaptureStream, MediaTrack, TrackKind};
pub use synthetic::SyntheticDevice;
