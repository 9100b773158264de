//! Response type definitions
//!
//! JSON response shapes served by the gateway's endpoints.

use serde::{Deserialize, Serialize};

/// Response for the guest cookie endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestCookiesResponse {
    /// Whether a usable cookie string is present
    pub success: bool,

    /// The composite cookie header string (empty on failure)
    pub data: String,
}

impl GuestCookiesResponse {
    /// Create a new guest cookies response
    pub fn new(success: bool, data: impl Into<String>) -> Self {
        Self {
            success,
            data: data.into(),
        }
    }
}

/// Uniform failure object returned by the relay endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayErrorResponse {
    /// Always `false`
    pub success: bool,

    /// Human-readable failure message
    pub msg: String,
}

impl RelayErrorResponse {
    /// Create a new relay failure response
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            msg: msg.into(),
        }
    }
}

/// Ping response for health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    /// Server uptime in seconds
    pub server_uptime: u64,

    /// Server version
    pub version: String,
}

impl PingResponse {
    /// Create a new ping response
    pub fn new(server_uptime: u64, version: impl Into<String>) -> Self {
        Self {
            server_uptime,
            version: version.into(),
        }
    }
}
