//! Xiaohongshu Guest Gateway
//!
//! A small HTTP service that fronts the Xiaohongshu web platform for scraping
//! clients. It solves the two problems such clients cannot solve on their own:
//!
//! - **Guest credential acquisition**: the platform only issues the session
//!   identifiers a client needs after executing its own page scripts, so the
//!   gateway drives a disposable headless Chromium to the origin, harvests the
//!   resulting cookies, and serves them from a single-slot TTL cache.
//! - **Media relay**: the platform's CDN rejects direct browser requests, so
//!   the gateway re-issues image and video fetches with the expected identity
//!   headers, preserving byte-range semantics for seekable playback.
//!
//! # Operation Modes
//!
//! - **HTTP Server Mode**: an always-running REST service exposing the cached
//!   guest cookies and the media relay endpoints.
//! - **Script Mode**: a command-line tool for one-time cookie harvesting,
//!   including an interactive headful variant for manual login flows.
//!
//! # Usage
//!
//! ## HTTP Server Mode
//!
//! ```bash
//! xhs-gateway-server --port 10000 --host 0.0.0.0
//! ```
//!
//! ## Script Mode
//!
//! ```bash
//! xhs-gateway-harvest --save cookies.json
//! ```
//!
//! # Examples
//!
//! ```rust
//! use xhs_guest_gateway::{CredentialCache, Settings};
//! use xhs_guest_gateway::credentials::ChromiumHarvester;
//! use std::sync::Arc;
//!
//! let settings = Settings::default();
//! let harvester = Arc::new(ChromiumHarvester::new(settings.harvest.clone()));
//! let cache = CredentialCache::new(&settings, harvester);
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod relay;
pub mod server;
pub mod types;
pub mod utils;

pub use config::Settings;
pub use credentials::{CookieHarvester, CredentialAcquirer, CredentialCache};
pub use error::{Error, Result};
pub use relay::MediaRelay;
pub use types::{CredentialBundle, CredentialSet, GuestCookiesResponse, RelayErrorResponse};
