//! Request type definitions
//!
//! Query parameters accepted by the gateway's endpoints.

use serde::Deserialize;

/// Query parameters for the media relay endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct RelayQuery {
    /// Original media URL on the protected origin
    pub url: String,
}
