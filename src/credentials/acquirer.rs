//! Harvest validation and retry control
//!
//! Wraps a [`CookieHarvester`] with a bounded attempt budget. Each attempt is
//! classified into an explicit [`AttemptOutcome`] so the retry policy is a
//! small state machine rather than an imperative try/except loop.

use crate::config::settings::HarvestSettings;
use crate::credentials::harvester::CookieHarvester;
use crate::types::{CredentialBundle, CredentialSet};
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a single harvest attempt.
///
/// Created per attempt and discarded once the controller decides retry vs.
/// stop; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The browser produced a non-empty cookie set
    Harvested(CredentialSet),
    /// The browser session completed but the cookie jar was empty
    EmptyCookies,
    /// The browser driver failed (launch, navigation, crash); absorbed here
    DriverError(String),
}

/// Drives harvest attempts until one yields cookies or the budget runs out.
pub struct CredentialAcquirer {
    harvester: Arc<dyn CookieHarvester>,
    max_attempts: u32,
    settle: Duration,
    cooldown: Duration,
    headless: bool,
    required_cookies: Vec<String>,
}

impl std::fmt::Debug for CredentialAcquirer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialAcquirer")
            .field("max_attempts", &self.max_attempts)
            .field("settle", &self.settle)
            .field("cooldown", &self.cooldown)
            .field("headless", &self.headless)
            .field("required_cookies", &self.required_cookies)
            .finish_non_exhaustive()
    }
}

impl CredentialAcquirer {
    /// Create a new acquirer over the given harvester
    pub fn new(settings: &HarvestSettings, harvester: Arc<dyn CookieHarvester>) -> Self {
        Self {
            harvester,
            max_attempts: settings.max_attempts,
            settle: settings.settle(),
            cooldown: settings.retry_cooldown(),
            headless: settings.headless,
            required_cookies: settings.required_cookies.clone(),
        }
    }

    /// Acquire a credential set, retrying up to the configured attempt budget.
    ///
    /// A non-empty cookie set is accepted immediately even when required
    /// identifier keys are missing: the platform sometimes omits
    /// non-essential identifiers without invalidating the session, and
    /// retrying on that alone would trade availability for nothing this
    /// controller can verify. Only a fully empty harvest (or a driver
    /// failure) counts as a failed attempt.
    ///
    /// Attempts run sequentially; this call blocks for the full sum of
    /// navigation, settle and cooldown time, which can reach tens of seconds
    /// across retries.
    pub async fn acquire(&self) -> CredentialBundle {
        for attempt in 1..=self.max_attempts {
            tracing::info!("harvest attempt {}/{}", attempt, self.max_attempts);

            match self.run_attempt().await {
                AttemptOutcome::Harvested(cookies) => {
                    let missing = cookies.missing_keys(&self.required_cookies);
                    if !missing.is_empty() {
                        tracing::warn!(
                            "credential set is missing required keys: {:?}",
                            missing
                        );
                    }
                    tracing::info!(
                        "harvest succeeded with {} cookies on attempt {}",
                        cookies.len(),
                        attempt
                    );
                    return CredentialBundle::from_cookies(cookies);
                }
                AttemptOutcome::EmptyCookies => {
                    tracing::warn!("attempt {} produced no cookies", attempt);
                }
                AttemptOutcome::DriverError(message) => {
                    tracing::warn!("attempt {} failed: {}", attempt, message);
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.cooldown).await;
            }
        }

        tracing::error!("all {} harvest attempts exhausted", self.max_attempts);
        CredentialBundle::empty()
    }

    /// Run one attempt and classify its result; driver errors never escape.
    async fn run_attempt(&self) -> AttemptOutcome {
        match self.harvester.harvest(self.settle, self.headless).await {
            Ok(cookies) if cookies.is_empty() => AttemptOutcome::EmptyCookies,
            Ok(cookies) => AttemptOutcome::Harvested(cookies),
            Err(e) => AttemptOutcome::DriverError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted harvester: plays back a fixed sequence of outcomes and counts
    /// how many times it was invoked.
    struct ScriptedHarvester {
        script: Vec<Result<Vec<(&'static str, &'static str)>, &'static str>>,
        calls: AtomicUsize,
    }

    impl ScriptedHarvester {
        fn new(
            script: Vec<Result<Vec<(&'static str, &'static str)>, &'static str>>,
        ) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CookieHarvester for ScriptedHarvester {
        async fn harvest(
            &self,
            _settle: Duration,
            _headless: bool,
        ) -> crate::Result<CredentialSet> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self.script.get(index).or_else(|| self.script.last());
            match step {
                Some(Ok(pairs)) => Ok(pairs
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.to_string()))
                    .collect()),
                Some(Err(message)) => Err(Error::browser(*message)),
                None => Ok(CredentialSet::new()),
            }
        }
    }

    fn acquirer_over(harvester: Arc<ScriptedHarvester>, max_attempts: u32) -> CredentialAcquirer {
        let mut settings = HarvestSettings::default();
        settings.max_attempts = max_attempts;
        settings.settle_seconds = 0;
        CredentialAcquirer::new(&settings, harvester)
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_bound_on_always_empty_harvester() {
        let harvester = Arc::new(ScriptedHarvester::new(vec![Ok(vec![])]));
        let acquirer = acquirer_over(harvester.clone(), 4);

        let bundle = acquirer.acquire().await;

        assert!(!bundle.success);
        assert_eq!(bundle.cookie_header, "");
        assert_eq!(harvester.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_short_circuits() {
        let harvester = Arc::new(ScriptedHarvester::new(vec![Ok(vec![
            ("webId", "abc"),
            ("xsecappid", "xhs-pc-web"),
        ])]));
        let acquirer = acquirer_over(harvester.clone(), 3);

        let bundle = acquirer.acquire().await;

        assert!(bundle.success);
        assert_eq!(bundle.cookie_header, "webId=abc; xsecappid=xhs-pc-web");
        assert_eq!(harvester.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lenient_acceptance_of_incomplete_set() {
        // Missing both required keys entirely; still a first-attempt success.
        let harvester = Arc::new(ScriptedHarvester::new(vec![Ok(vec![(
            "abRequestId",
            "xyz",
        )])]));
        let acquirer = acquirer_over(harvester.clone(), 3);

        let bundle = acquirer.acquire().await;

        assert!(bundle.success);
        assert_eq!(bundle.cookie_header, "abRequestId=xyz");
        assert_eq!(harvester.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_errors_absorbed_then_recovered() {
        let harvester = Arc::new(ScriptedHarvester::new(vec![
            Err("chromium crashed"),
            Err("navigation timed out"),
            Ok(vec![("webId", "late")]),
        ]));
        let acquirer = acquirer_over(harvester.clone(), 3);

        let bundle = acquirer.acquire().await;

        assert!(bundle.success);
        assert_eq!(bundle.cookie_header, "webId=late");
        assert_eq!(harvester.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_errors_exhaust_budget() {
        let harvester = Arc::new(ScriptedHarvester::new(vec![Err("no browser binary")]));
        let acquirer = acquirer_over(harvester.clone(), 2);

        let bundle = acquirer.acquire().await;

        assert!(!bundle.success);
        assert!(bundle.cookies.is_empty());
        assert_eq!(harvester.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_budget() {
        let harvester = Arc::new(ScriptedHarvester::new(vec![Ok(vec![])]));
        let acquirer = acquirer_over(harvester.clone(), 1);

        let bundle = acquirer.acquire().await;

        assert!(!bundle.success);
        assert_eq!(harvester.calls(), 1);
    }
}
