//! Recorder session management
//!
//! This module provides the `RecorderSession` state machine that manages:
//! - Capture stream acquisition and release
//! - Encoder lifecycle and fragment buffering
//! - Artifact publication and revocation
//!
//! and the runner task that serializes commands and encoder events through it.

mod config;
pub mod runner;
mod session;
mod state;

pub use config::SessionConfig;
pub use runner::{spawn, SessionCommand, SessionHandle};
pub use session::RecorderSession;
pub use state::{ArtifactInfo, RecorderPhase, SessionStatus};
