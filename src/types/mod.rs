//! Type definitions for the guest gateway
//!
//! This module contains the main data structures used for requests, responses
//! and the credential value objects shared across components.

pub mod internal;
pub mod request;
pub mod response;

pub use internal::{CredentialBundle, CredentialSet};
pub use request::RelayQuery;
pub use response::{GuestCookiesResponse, PingResponse, RelayErrorResponse};
