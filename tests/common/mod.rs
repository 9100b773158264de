//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

/// Test helper functions
pub mod helpers {
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use xhs_guest_gateway::credentials::{CookieHarvester, CredentialCache};
    use xhs_guest_gateway::types::CredentialSet;
    use xhs_guest_gateway::{Result, Settings};

    /// Harvester stub that returns a fixed cookie set and counts invocations
    #[derive(Debug, Default)]
    pub struct StubHarvester {
        calls: AtomicUsize,
    }

    impl StubHarvester {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CookieHarvester for StubHarvester {
        async fn harvest(&self, _settle: Duration, _headless: bool) -> Result<CredentialSet> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut set = CredentialSet::new();
            set.insert("webId", "integration-web-id");
            set.insert("xsecappid", "xhs-pc-web");
            Ok(set)
        }
    }

    /// Settings tuned for tests: no settle time, no cooldown, one attempt
    pub fn test_settings() -> Settings {
        let mut settings = Settings::default();
        settings.harvest.settle_seconds = 0;
        settings.harvest.retry_cooldown_seconds = 0;
        settings.harvest.max_attempts = 1;
        settings
    }

    /// Build an application router over a stub harvester
    pub fn test_app(harvester: Arc<StubHarvester>) -> axum::Router {
        let settings = test_settings();
        let cache = Arc::new(CredentialCache::new(&settings, harvester));
        xhs_guest_gateway::server::app::create_app(settings, cache).unwrap()
    }
}
