//! HTTP surface for the recorder
//!
//! This module serves the recorder page and the API behind it:
//! - GET / - Recorder page
//! - POST /recorder/start - Start a recording
//! - POST /recorder/stop - Stop the recording
//! - POST /recorder/teardown - Release device and artifact
//! - GET /recorder/status - Query session status
//! - GET /artifacts/:id - Recorded clip
//! - GET /health - Health check

mod handlers;
mod page;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
