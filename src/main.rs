use anyhow::{Context, Result};
use clap::Parser;
use clip_recorder::{
    create_router, session, AppState, ArtifactStore, Config, RecorderSession, SinkState,
    SyntheticDevice, SyntheticEncoderFactory,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clip-recorder")]
#[command(about = "Record a camera/microphone clip and play it back")]
struct Args {
    /// Config file (extension optional, missing file uses defaults)
    #[arg(short, long, default_value = "config/clip-recorder")]
    config: String,

    /// Address to bind, overrides service.http.bind
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on, overrides service.http.port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let device = if cfg.device.deny_access {
        warn!("Capture device will deny access (device.deny_access = true)");
        SyntheticDevice::denying()
    } else {
        SyntheticDevice::new()
    };
    let encoders = SyntheticEncoderFactory::new(cfg.encoder());
    let artifacts = ArtifactStore::new();

    let (recorder, events) = RecorderSession::new(
        cfg.session(),
        Arc::new(device),
        Arc::new(encoders),
        Arc::new(SinkState::new()),
        artifacts.clone(),
    );
    let (handle, _runner) = session::spawn(recorder, events);

    let app = create_router(AppState::new(handle.clone(), artifacts));

    let bind = args.bind.unwrap_or(cfg.service.http.bind);
    let port = args.port.unwrap_or(cfg.service.http.port);
    let listener = TcpListener::bind((bind.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", bind, port))?;

    info!("Recorder page at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await
        .context("HTTP server failed")?;

    if let Err(e) = handle.teardown().await {
        warn!("Teardown on shutdown failed: {}", e);
    }

    Ok(())
}
