//! Script mode binary for one-time cookie harvesting
//!
//! Performs a single guest cookie harvest and outputs the result to stdout.
//! This mode is used to seed the server's credential snapshot or to debug the
//! browser handshake without running the HTTP service.
//!
//! # Usage
//!
//! ```bash
//! xhs-gateway-harvest --save cookies.json
//! ```
//!
//! # Output
//!
//! Outputs a JSON object containing the harvested cookies:
//! ```json
//! {
//!   "success": true,
//!   "cookieHeader": "webId=...; xsecappid=...",
//!   "cookies": { "webId": "...", "xsecappid": "..." }
//! }
//! ```
//!
//! Logging goes to stderr so stdout stays machine-readable.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xhs_guest_gateway::Settings;
use xhs_guest_gateway::credentials::{
    ChromiumHarvester, CredentialAcquirer, store,
};
use xhs_guest_gateway::types::CredentialBundle;

/// One-shot guest cookie harvester
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "xhs-gateway-harvest")]
struct Cli {
    /// Save the harvested cookies to this JSON file
    #[arg(short, long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// Maximum harvest attempts
    #[arg(short, long, value_name = "ATTEMPTS")]
    attempts: Option<u32>,

    /// Run with a visible browser window
    #[arg(long)]
    headful: bool,

    /// Open a visible browser and wait for Enter before reading cookies
    /// (e.g. to complete a login flow by hand)
    #[arg(short, long)]
    interactive: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging to stderr only; stdout carries the JSON result
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut settings = Settings::from_env().unwrap_or_else(|e| {
        warn!("Failed to load settings from environment: {}. Using defaults.", e);
        Settings::default()
    });
    if let Some(attempts) = cli.attempts {
        settings.harvest.max_attempts = attempts;
    }
    if cli.headful || cli.interactive {
        settings.harvest.headless = false;
    }
    settings.validate()?;

    debug!(
        "starting harvest: origin={}, attempts={}, interactive={}",
        settings.harvest.origin_url, settings.harvest.max_attempts, cli.interactive
    );

    let harvester = ChromiumHarvester::new(settings.harvest.clone());

    let bundle = if cli.interactive {
        // The interactive path bypasses the retry controller: it has a human
        // in the loop and no timeout.
        match harvester.harvest_interactive(true).await {
            Ok(cookies) => CredentialBundle::from_cookies(cookies),
            Err(e) => {
                warn!("interactive harvest failed: {}", e);
                CredentialBundle::empty()
            }
        }
    } else {
        let acquirer = CredentialAcquirer::new(&settings.harvest, Arc::new(harvester));
        acquirer.acquire().await
    };

    // Snapshot target: explicit --save, then the configured store, then the
    // default location under the user cache directory.
    let snapshot_path = cli
        .save
        .clone()
        .or_else(|| settings.cache.store_path.clone())
        .or_else(Settings::default_store_path);

    if bundle.success && let Some(path) = snapshot_path {
        if let Err(e) = store::save(&bundle.cookies, &path) {
            warn!("failed to save cookies to {}: {}", path.display(), e);
        }
    }

    let output = serde_json::json!({
        "success": bundle.success,
        "cookieHeader": bundle.cookie_header,
        "cookies": bundle.cookies,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    if !bundle.success {
        std::process::exit(1);
    }
    Ok(())
}
