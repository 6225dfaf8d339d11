//! Error types for the relay
//!
//! Per-record failures never abort batch processing; the taxonomy exists so
//! the driver can tell skip-and-continue conditions apart from startup-time
//! configuration faults.

use thiserror::Error;

/// Relay errors
#[derive(Error, Debug)]
pub enum RelayError {
    /// Record payload is not a valid instance of the binary encoding.
    /// Per-record: the driver logs it and continues with the next payload.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Transport envelope could not be expanded (bad base64, truncated frame)
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// Configuration error. Startup-time, never per-record.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error (batch file loading in the CLI)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Envelope batch deserialization error
    #[error("batch parse error: {0}")]
    BatchParse(#[from] serde_json::Error),
}

impl RelayError {
    /// Create a new malformed payload error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }

    /// Create a new invalid envelope error
    pub fn envelope(msg: impl Into<String>) -> Self {
        Self::InvalidEnvelope(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;
