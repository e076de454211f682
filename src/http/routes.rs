use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        // Health check
        .route("/health", get(handlers::health_check))
        // Recorder control
        .route("/recorder/start", post(handlers::start_recording))
        .route("/recorder/stop", post(handlers::stop_recording))
        .route("/recorder/teardown", post(handlers::teardown))
        .route("/recorder/status", get(handlers::get_status))
        // Playback
        .route("/artifacts/:id", get(handlers::get_artifact))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
