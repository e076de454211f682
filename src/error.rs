use thiserror::Error;

/// Failure to obtain a capture stream from a device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceAccessError {
    /// The user or platform refused access to the camera/microphone
    #[error("permission to access the capture device was denied")]
    PermissionDenied,

    /// No device can satisfy the requested constraints
    #[error("no capture device matches the requested constraints: {0}")]
    NoMatchingDevice(String),
}

/// Errors surfaced by the recorder session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecorderError {
    #[error(transparent)]
    DeviceAccess(#[from] DeviceAccessError),

    #[error("media type {0} is not supported by the encoder")]
    UnsupportedMediaType(String),

    #[error("recorder session is no longer running")]
    SessionClosed,
}

impl RecorderError {
    /// Message shown to the user when starting a recording fails.
    pub fn user_message(&self) -> String {
        match self {
            RecorderError::DeviceAccess(_) => "Failed to start recording. Please ensure you have granted camera and microphone permissions.".to_string(),
            RecorderError::UnsupportedMediaType(media_type) => {
                format!("Failed to start recording. The {} format is not supported.", media_type)
            }
            RecorderError::SessionClosed => "The recorder is shutting down.".to_string(),
        }
    }
}
