use crate::artifact::ArtifactStore;
use crate::session::SessionHandle;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Front end of the recorder session
    pub session: SessionHandle,

    /// Artifacts reachable through `/artifacts/:id`
    pub artifacts: ArtifactStore,
}

impl AppState {
    pub fn new(session: SessionHandle, artifacts: ArtifactStore) -> Self {
        Self { session, artifacts }
    }
}
