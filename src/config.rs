use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::capture::CaptureConstraints;
use crate::encoder::{MediaType, SyntheticEncoderConfig};
use crate::session::SessionConfig;

/// Prefix for environment overrides, e.g. `CLIP_RECORDER__SERVICE__HTTP__PORT=9000`
pub const ENV_PREFIX: &str = "CLIP_RECORDER";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub recorder: RecorderConfig,
    pub device: DeviceConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct RecorderConfig {
    pub media_type: String,
    pub video: bool,
    pub audio: bool,
    /// 0 waits for the encoder indefinitely
    pub finalize_timeout_ms: u64,
}

/// Settings of the synthetic capture backend
#[derive(Debug, Deserialize)]
pub struct DeviceConfig {
    pub deny_access: bool,
    pub fragment_bytes: usize,
    pub timeslice_ms: u64,
}

impl Config {
    /// Load from `path` (extension optional, file optional), then environment
    pub fn load(path: &str) -> Result<Self> {
        let settings = Self::defaults()?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .with_context(|| format!("Failed to load config from {}", path))?;

        settings
            .try_deserialize()
            .context("Invalid recorder configuration")
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(config::Config::builder()
            .set_default("service.name", "clip-recorder")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 8787)?
            .set_default("recorder.media_type", "video/webm")?
            .set_default("recorder.video", true)?
            .set_default("recorder.audio", true)?
            .set_default("recorder.finalize_timeout_ms", 0)?
            .set_default("device.deny_access", false)?
            .set_default("device.fragment_bytes", 4096)?
            .set_default("device.timeslice_ms", 250)?)
    }

    pub fn session(&self) -> SessionConfig {
        let timeout_ms = self.recorder.finalize_timeout_ms;
        SessionConfig {
            media_type: MediaType::new(self.recorder.media_type.clone()),
            constraints: CaptureConstraints {
                video: self.recorder.video,
                audio: self.recorder.audio,
            },
            finalize_timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
        }
    }

    pub fn encoder(&self) -> SyntheticEncoderConfig {
        SyntheticEncoderConfig {
            fragment_bytes: self.device.fragment_bytes,
            timeslice: Duration::from_millis(self.device.timeslice_ms.max(1)),
        }
    }
}
