//! Error type definitions
//!
//! Defines the main error types used throughout the guest gateway.

use thiserror::Error;

/// Main error type for the guest gateway
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Browser driver errors (launch, navigation, CDP transport)
    #[error("Browser error: {message}")]
    Browser { message: String },

    /// Media relay errors (target validation, disallowed schemes)
    #[error("Relay error: {0}")]
    Relay(String),

    /// Upstream media origin answered with a non-success status
    #[error("Upstream returned status {status}")]
    UpstreamStatus { status: u16 },

    /// Relay target URL errors
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a browser driver error
    pub fn browser(message: impl Into<String>) -> Self {
        Self::Browser {
            message: message.into(),
        }
    }

    /// Create a relay error
    pub fn relay(msg: impl Into<String>) -> Self {
        Self::Relay(msg.into())
    }

    /// Create an upstream status error
    pub fn upstream_status(status: u16) -> Self {
        Self::UpstreamStatus { status }
    }
}
