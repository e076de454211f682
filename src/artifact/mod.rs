//! Fragment accumulation and playback artifacts
//!
//! - `ChunkBuffer`: ordered fragments of the recording in progress
//! - `ArtifactStore`: finalized recordings addressable by handle/URL

mod buffer;
mod store;

pub use buffer::ChunkBuffer;
pub use store::{ArtifactHandle, ArtifactStore, PlaybackArtifact};
