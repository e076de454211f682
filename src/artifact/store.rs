use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::encoder::MediaType;

/// Finalized, immutable recording
#[derive(Debug)]
pub struct PlaybackArtifact {
    pub id: Uuid,
    pub media_type: MediaType,
    pub data: Bytes,
    pub created_at: DateTime<Utc>,
}

/// Dereferenceable reference to an artifact held in an [`ArtifactStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactHandle {
    id: Uuid,
}

impl ArtifactHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// URL under which the HTTP surface serves the artifact
    pub fn url(&self) -> String {
        format!("/artifacts/{}", self.id)
    }
}

/// Registry of live artifact handles.
///
/// Clones share the same registry, so the session and HTTP handlers see the
/// same handles.
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    artifacts: Arc<RwLock<HashMap<Uuid, Arc<PlaybackArtifact>>>>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate fragments in order into a new artifact and register it
    pub fn create(&self, fragments: Vec<Bytes>, media_type: MediaType) -> ArtifactHandle {
        let total: usize = fragments.iter().map(Bytes::len).sum();
        let mut data = BytesMut::with_capacity(total);
        for fragment in &fragments {
            data.extend_from_slice(fragment);
        }

        let artifact = PlaybackArtifact {
            id: Uuid::new_v4(),
            media_type,
            data: data.freeze(),
            created_at: Utc::now(),
        };
        let handle = ArtifactHandle { id: artifact.id };

        info!(
            "Created artifact {} ({} fragments, {} bytes, {})",
            artifact.id,
            fragments.len(),
            total,
            artifact.media_type
        );

        self.artifacts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.id, Arc::new(artifact));

        handle
    }

    /// Invalidate a handle. Returns `false` if it was already revoked.
    pub fn revoke(&self, handle: &ArtifactHandle) -> bool {
        let removed = self
            .artifacts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle.id)
            .is_some();
        if removed {
            debug!("Revoked artifact {}", handle.id);
        }
        removed
    }

    pub fn resolve(&self, handle: &ArtifactHandle) -> Option<Arc<PlaybackArtifact>> {
        self.get(handle.id)
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<PlaybackArtifact>> {
        self.artifacts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn is_live(&self, handle: &ArtifactHandle) -> bool {
        self.get(handle.id).is_some()
    }

    /// Number of handles not yet revoked
    pub fn live_count(&self) -> usize {
        self.artifacts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
