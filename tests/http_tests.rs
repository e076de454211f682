// Tests for the HTTP surface
//
// The router is driven in-process with tower's oneshot; no socket is bound.

mod common;

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use clip_recorder::{
    create_router, session, AppState, ArtifactStore, RecorderPhase, RecorderSession,
    SessionConfig, SessionHandle, SinkState, SyntheticEncoderConfig, SyntheticEncoderFactory,
};
use common::TrackingDevice;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tower::ServiceExt;

fn app(device: TrackingDevice) -> (Router, SessionHandle) {
    let artifacts = ArtifactStore::new();
    let (recorder, events) = RecorderSession::new(
        SessionConfig::default(),
        Arc::new(device),
        Arc::new(SyntheticEncoderFactory::new(SyntheticEncoderConfig {
            fragment_bytes: 32,
            timeslice: Duration::from_millis(10),
        })),
        Arc::new(SinkState::new()),
        artifacts.clone(),
    );
    let (handle, _task) = session::spawn(recorder, events);
    (create_router(AppState::new(handle.clone(), artifacts)), handle)
}

async fn send(app: &Router, method: &str, uri: &str) -> Result<(StatusCode, Vec<u8>)> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, body.to_vec()))
}

async fn send_json(app: &Router, method: &str, uri: &str) -> Result<(StatusCode, Value)> {
    let (status, body) = send(app, method, uri).await?;
    Ok((status, serde_json::from_slice(&body)?))
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let (app, _handle) = app(TrackingDevice::new());

    let (status, body) = send(&app, "GET", "/health").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
    Ok(())
}

#[tokio::test]
async fn test_index_serves_recorder_page() -> Result<()> {
    let (app, _handle) = app(TrackingDevice::new());

    let (status, body) = send(&app, "GET", "/").await?;
    let page = String::from_utf8(body)?;

    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("<h1>Video Recorder</h1>"));
    assert!(page.contains("Start Recording"));
    assert!(page.contains("Stop Recording"));
    Ok(())
}

#[tokio::test]
async fn test_start_stop_and_fetch_artifact() -> Result<()> {
    let (app, handle) = app(TrackingDevice::new());

    let (status, body) = send_json(&app, "POST", "/recorder/start").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "recording");
    assert_eq!(body["preview"]["live_stream"], body["stream_id"]);
    assert!(body["preview"]["live_stream"].is_string());

    tokio::time::sleep(Duration::from_millis(40)).await;

    let (status, body) = send_json(&app, "POST", "/recorder/stop").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "stopping");

    let mut rx = handle.subscribe();
    timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.phase == RecorderPhase::Idle && s.artifact.is_some()),
    )
    .await??;

    let (_, body) = send_json(&app, "GET", "/recorder/status").await?;
    let url = body["artifact"]["url"]
        .as_str()
        .expect("status should carry the artifact url")
        .to_string();
    assert_eq!(body["artifact"]["media_type"], "video/webm");
    assert_eq!(body["preview"]["playback_url"], url.as_str());
    assert!(body["preview"]["live_stream"].is_null());

    let request = Request::builder().uri(&url).body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "video/webm");
    let data = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(data.len() as u64, body["artifact"]["size_bytes"].as_u64().unwrap());

    // Teardown revokes the handle
    let (status, body) = send_json(&app, "POST", "/recorder/teardown").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["artifact"].is_null());

    let (status, _) = send(&app, "GET", &url).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_start_denied_returns_user_message() -> Result<()> {
    let (app, _handle) = app(TrackingDevice::denying());

    let (status, body) = send_json(&app, "POST", "/recorder/start").await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "Failed to start recording. Please ensure you have granted camera and microphone permissions."
    );

    let (_, body) = send_json(&app, "GET", "/recorder/status").await?;
    assert_eq!(body["phase"], "idle");
    assert!(body["stream_id"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_stop_while_idle_is_ok_and_unchanged() -> Result<()> {
    let (app, _handle) = app(TrackingDevice::new());

    let (status, body) = send_json(&app, "POST", "/recorder/stop").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "idle");
    assert!(body["artifact"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_unknown_artifact_is_not_found() -> Result<()> {
    let (app, _handle) = app(TrackingDevice::new());

    let uri = format!("/artifacts/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, "GET", &uri).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
