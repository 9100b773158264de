//! Single-slot credential cache
//!
//! Holds the last acquired credential bundle for a fixed TTL window so that
//! serving a credential request almost never means launching a browser. The
//! slot is an explicit struct with an injected clock, constructed once per
//! process and shared by reference.

use crate::config::Settings;
use crate::credentials::acquirer::CredentialAcquirer;
use crate::credentials::harvester::CookieHarvester;
use crate::types::CredentialBundle;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Time source for expiry decisions; injected so TTL behavior is testable
/// without real waiting.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source used in production
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The one cache slot: last bundle plus its absolute expiry.
/// `expires_at == None` means the slot was never populated.
#[derive(Debug, Default)]
struct CacheSlot {
    bundle: CredentialBundle,
    expires_at: Option<DateTime<Utc>>,
}

impl CacheSlot {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now < expires_at)
    }
}

/// Process-wide cache over the retry controller.
///
/// The slot lock is held across a refresh, so concurrent callers hitting an
/// empty or stale window wait for the in-flight harvest and then read its
/// result: at most one browser launch per TTL window under any interleaving.
pub struct CredentialCache {
    acquirer: CredentialAcquirer,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slot: Mutex<CacheSlot>,
}

impl fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCache")
            .field("acquirer", &self.acquirer)
            .field("ttl", &self.ttl)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl CredentialCache {
    /// Create a cache over the given harvester using the wall clock
    pub fn new(settings: &Settings, harvester: Arc<dyn CookieHarvester>) -> Self {
        Self::with_clock(settings, harvester, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit time source
    pub fn with_clock(
        settings: &Settings,
        harvester: Arc<dyn CookieHarvester>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            acquirer: CredentialAcquirer::new(&settings.harvest, harvester),
            ttl: Duration::seconds(settings.cache.ttl_seconds as i64),
            clock,
            slot: Mutex::new(CacheSlot::default()),
        }
    }

    /// Return the cached bundle, harvesting only when the slot is empty or
    /// stale.
    ///
    /// A failed harvest is cached with a fresh expiry too: a failing origin
    /// should not be re-harvested by every request in the window, so the
    /// failure is served until the TTL elapses or a forced refresh clears it.
    pub async fn get_or_refresh(&self) -> CredentialBundle {
        let mut slot = self.slot.lock().await;

        if slot.is_fresh(self.clock.now()) {
            tracing::debug!("guest cookies still fresh, serving cached value");
            return slot.bundle.clone();
        }

        self.refresh_slot(&mut slot).await
    }

    /// Clear the slot and harvest unconditionally, regardless of freshness
    pub async fn force_refresh(&self) -> CredentialBundle {
        tracing::info!("forced refresh requested, clearing cached cookies");
        let mut slot = self.slot.lock().await;
        *slot = CacheSlot::default();
        self.refresh_slot(&mut slot).await
    }

    /// Install a bundle (e.g. a persisted snapshot) with a fresh expiry,
    /// bypassing the harvester entirely
    pub async fn seed(&self, bundle: CredentialBundle) {
        let mut slot = self.slot.lock().await;
        slot.expires_at = Some(self.clock.now() + self.ttl);
        slot.bundle = bundle;
        tracing::info!("credential cache seeded");
    }

    async fn refresh_slot(&self, slot: &mut CacheSlot) -> CredentialBundle {
        let bundle = self.acquirer.acquire().await;

        slot.bundle = bundle.clone();
        slot.expires_at = Some(self.clock.now() + self.ttl);

        if bundle.success {
            tracing::info!("credential cache refreshed ({} cookies)", bundle.cookies.len());
        } else {
            tracing::warn!("harvest failed; caching empty result for the TTL window");
        }

        bundle
    }
}
