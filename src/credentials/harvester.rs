//! Browser cookie harvesting
//!
//! Drives a disposable Chromium instance to the platform origin and reads the
//! cookies its scripts set. The goal identifiers are produced client-side, so
//! there is nothing to extract from the initial response body; the harvester
//! navigates, lets the page settle, and then drains the cookie jar.

use crate::config::settings::HarvestSettings;
use crate::error::{Error, Result};
use crate::types::CredentialSet;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio::task::JoinHandle;

/// Chromium hardening flags carried over from the container deployments this
/// service runs in.
const BROWSER_FLAGS: [&str; 7] = [
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--no-first-run",
    "--no-zygote",
    "--disable-gpu",
];

/// Bound on the best-effort structural readiness probe.
const READINESS_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// A source of guest credential sets.
///
/// The production implementation launches a browser; tests substitute a
/// scripted implementation so retry and cache behavior can be exercised
/// without Chromium.
#[async_trait]
pub trait CookieHarvester: Send + Sync {
    /// Perform one end-to-end harvest.
    ///
    /// Returns an empty set when the browser session produced no cookies;
    /// driver failures (launch, navigation, CDP transport) surface as errors.
    async fn harvest(&self, settle: Duration, headless: bool) -> Result<CredentialSet>;
}

/// Harvests guest cookies by driving a disposable Chromium via CDP.
#[derive(Debug, Clone)]
pub struct ChromiumHarvester {
    settings: HarvestSettings,
}

impl ChromiumHarvester {
    /// Create a new harvester with the given harvest configuration
    pub fn new(settings: HarvestSettings) -> Self {
        Self { settings }
    }

    fn browser_config(&self, headless: bool) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .window_size(self.settings.viewport_width, self.settings.viewport_height)
            .request_timeout(self.settings.navigation_timeout())
            .arg(format!("--user-agent={}", self.settings.user_agent))
            .args(BROWSER_FLAGS);

        if !headless {
            builder = builder.with_head();
        }

        builder.build().map_err(Error::browser)
    }

    async fn launch(&self, headless: bool) -> Result<(Browser, JoinHandle<()>)> {
        let config = self.browser_config(headless)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::browser(format!("failed to launch Chromium: {e}")))?;

        // The handler stream must be polled for the CDP connection to make
        // progress; it ends when the browser goes away.
        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok((browser, events))
    }

    /// Close the browser whether or not extraction succeeded, so no Chromium
    /// process outlives its attempt.
    async fn teardown(mut browser: Browser, events: JoinHandle<()>) {
        if let Err(e) = browser.close().await {
            tracing::debug!("browser close reported: {}", e);
        }
        if let Err(e) = browser.wait().await {
            tracing::debug!("browser wait reported: {}", e);
        }
        events.abort();
    }

    async fn open_origin(&self, browser: &Browser) -> Result<Page> {
        let page = browser
            .new_page(self.settings.origin_url.as_str())
            .await
            .map_err(|e| Error::browser(format!("navigation failed: {e}")))?;

        if let Err(e) = page.wait_for_navigation().await {
            // Cookies are often set before the load event settles; keep going.
            tracing::warn!("navigation wait reported: {}", e);
        }

        Ok(page)
    }

    async fn drain_cookie_jar(&self, page: &Page) -> Result<CredentialSet> {
        let cookies = page
            .get_cookies()
            .await
            .map_err(|e| Error::browser(format!("cookie read failed: {e}")))?;

        Ok(cookies
            .into_iter()
            .map(|cookie| (cookie.name, cookie.value))
            .collect())
    }

    /// Interactive harvest: opens a visible browser and optionally suspends
    /// until the operator presses Enter (e.g. after completing a login flow).
    ///
    /// This is the human-in-the-loop escape hatch for the script-mode binary;
    /// the automated path never calls it, and it carries no timeout.
    pub async fn harvest_interactive(&self, manual_wait: bool) -> Result<CredentialSet> {
        tracing::info!("opening visible browser at {}", self.settings.origin_url);
        let (browser, events) = self.launch(false).await?;

        let outcome = async {
            let page = self.open_origin(&browser).await?;

            if manual_wait {
                tracing::info!("complete any manual steps in the browser, then press Enter");
                let mut line = String::new();
                let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());
                stdin.read_line(&mut line).await?;
            } else {
                tokio::time::sleep(self.settings.settle()).await;
            }

            self.drain_cookie_jar(&page).await
        }
        .await;

        Self::teardown(browser, events).await;
        outcome
    }
}

#[async_trait]
impl CookieHarvester for ChromiumHarvester {
    async fn harvest(&self, settle: Duration, headless: bool) -> Result<CredentialSet> {
        tracing::info!("navigating to {}", self.settings.origin_url);
        let (browser, events) = self.launch(headless).await?;

        let outcome = async {
            let page = self.open_origin(&browser).await?;

            tracing::debug!("letting the page settle for {:?}", settle);
            tokio::time::sleep(settle).await;

            // Best-effort readiness signal; the cookies may already be in the
            // jar even when the probe times out, so its failure never fails
            // the harvest.
            match tokio::time::timeout(READINESS_PROBE_TIMEOUT, page.find_element("body")).await {
                Ok(Ok(_)) => tracing::debug!("page structure present"),
                Ok(Err(e)) => tracing::warn!("readiness probe failed: {}", e),
                Err(_) => tracing::warn!("readiness probe timed out"),
            }

            let cookies = self.drain_cookie_jar(&page).await?;
            tracing::info!("harvested {} cookies", cookies.len());
            Ok(cookies)
        }
        .await;

        Self::teardown(browser, events).await;
        outcome
    }
}
