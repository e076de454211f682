use super::page::INDEX_HTML;
use super::state::AppState;
use crate::error::{DeviceAccessError, RecorderError};
use crate::session::SessionStatus;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Message meant to be shown to the user as-is
    pub message: String,
}

fn error_response(err: &RecorderError) -> Response {
    let status = match err {
        RecorderError::DeviceAccess(DeviceAccessError::PermissionDenied) => StatusCode::FORBIDDEN,
        RecorderError::DeviceAccess(DeviceAccessError::NoMatchingDevice(_)) => {
            StatusCode::NOT_FOUND
        }
        RecorderError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        RecorderError::SessionClosed => StatusCode::SERVICE_UNAVAILABLE,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            message: err.user_message(),
        }),
    )
        .into_response()
}

fn status_response(result: Result<SessionStatus, RecorderError>) -> Response {
    match result {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => error_response(&e),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
/// Recorder page
pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

/// POST /recorder/start
/// Acquire the device and start recording
pub async fn start_recording(State(state): State<AppState>) -> Response {
    info!("Start requested over HTTP");

    let result = state.session.start().await;
    if let Err(e) = &result {
        error!("Failed to start recording: {}", e);
    }
    status_response(result)
}

/// POST /recorder/stop
/// Request finalize; the artifact shows up in the status once built
pub async fn stop_recording(State(state): State<AppState>) -> Response {
    info!("Stop requested over HTTP");
    status_response(state.session.stop().await)
}

/// POST /recorder/teardown
/// Release the device and revoke the current artifact
pub async fn teardown(State(state): State<AppState>) -> Response {
    status_response(state.session.teardown().await)
}

/// GET /recorder/status
pub async fn get_status(State(state): State<AppState>) -> Response {
    status_response(state.session.status().await)
}

/// GET /artifacts/:id
/// Recorded clip bytes, until the handle is revoked
pub async fn get_artifact(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.artifacts.get(id) {
        Some(artifact) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, artifact.media_type.to_string())],
            artifact.data.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Artifact {} not found", id),
                message: "This recording is no longer available.".to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
