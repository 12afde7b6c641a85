//! # Error Types
//!
//! Custom error types for Hub Sensors using `thiserror`.

use thiserror::Error;

/// Main error type for Hub Sensors
#[derive(Debug, Error)]
pub enum HubSensorError {
    /// Capability not available on this hub generation
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Inbound frame too short for the bytes its mode reads
    #[error("Frame too short for mode 0x{mode:02X}: need {needed} bytes, got {actual}")]
    FrameTooShort {
        mode: u8,
        needed: usize,
        actual: usize,
    },

    /// Event name not present in the device's mode map
    #[error("Unknown event '{event}' for {variant}")]
    UnknownEvent { variant: String, event: String },

    /// No device attached on the given port
    #[error("No device attached on port {0}")]
    UnknownDevice(u8),

    /// Outbound subscribe/write failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Event log serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Hub Sensors
pub type Result<T> = std::result::Result<T, HubSensorError>;
