//! # Guest Credential Subsystem
//!
//! This module provides the core credential functionality for the guest
//! gateway: harvesting anonymous session cookies with a disposable browser,
//! retrying with a bounded attempt budget, caching the last result for a TTL
//! window, and snapshotting credential sets to disk.
//!
//! ## Architecture
//!
//! - [`harvester`] drives one Chromium session per attempt and extracts the
//!   cookies the origin's own scripts produce. The [`CookieHarvester`] trait
//!   is the seam tests use to substitute a scripted harvester.
//! - [`acquirer`] wraps the harvester with retry, cooldown and required-key
//!   validation, classifying each attempt into an explicit outcome.
//! - [`cache`] is the single slot every credential request reads; a refresh
//!   stores its result (success or failure) with a fresh expiry.
//! - [`store`] imports/exports credential snapshots independently of the
//!   live harvest cycle.
//!
//! Harvest attempts run sequentially and block for the full navigation,
//! settle and cooldown time; callers on a latency budget go through the
//! cache, never the acquirer directly.

pub mod acquirer;
pub mod cache;
pub mod harvester;
pub mod store;

pub use acquirer::{AttemptOutcome, CredentialAcquirer};
pub use cache::{Clock, CredentialCache, SystemClock};
pub use harvester::{ChromiumHarvester, CookieHarvester};
