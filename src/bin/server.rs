//! HTTP server binary for the guest gateway
//!
//! Starts an HTTP server exposing the cached guest cookies and the media
//! relay endpoints. This is the recommended mode for production deployments.
//!
//! # Usage
//!
//! ```bash
//! xhs-gateway-server --port 10000 --host 0.0.0.0
//! ```
//!
//! # API Endpoints
//!
//! - `GET /guestcookies`: Cached guest cookie fetch
//! - `GET /guestcookies/refresh`: Forced re-harvest
//! - `GET /proxy/image`: Still-image relay
//! - `GET /proxy/video`: Range-aware streaming relay
//! - `GET /ping`: Health check endpoint

use clap::Parser;
use std::sync::Arc;

use xhs_guest_gateway::credentials::{ChromiumHarvester, CredentialCache, store};

/// HTTP server for the Xiaohongshu guest gateway
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "10000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "::")]
    host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    // Load configuration
    let settings = match xhs_guest_gateway::Settings::from_env() {
        Ok(mut settings) => {
            // Override with CLI arguments
            settings.server.host = cli.host.clone();
            settings.server.port = cli.port;
            settings
        }
        Err(e) => {
            tracing::warn!(
                "Failed to load settings from environment: {}. Using defaults.",
                e
            );
            let mut settings = xhs_guest_gateway::Settings::default();
            settings.server.host = cli.host.clone();
            settings.server.port = cli.port;
            settings
        }
    };
    settings.validate()?;

    tracing::info!(
        "Starting guest gateway v{}",
        xhs_guest_gateway::utils::version::get_version()
    );

    // Build the credential cache over the browser harvester
    let harvester = Arc::new(ChromiumHarvester::new(settings.harvest.clone()));
    let cache = Arc::new(CredentialCache::new(&settings, harvester));

    // Seed the cache from a snapshot when one is configured and present
    if let Some(path) = &settings.cache.store_path {
        let bundle = store::load(path);
        if bundle.success {
            tracing::info!("seeding credential cache from {}", path.display());
            cache.seed(bundle).await;
        }
    }

    // Create the Axum application
    let app = xhs_guest_gateway::server::app::create_app(settings.clone(), cache)?;

    // Parse address and attempt IPv6/IPv4 fallback
    let addr = parse_and_bind_address(&cli.host, cli.port).await?;

    tracing::info!(
        "Guest gateway v{} listening on {}",
        xhs_guest_gateway::utils::version::get_version(),
        addr
    );

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse host string and attempt to bind to the address
///
/// - First try to bind to IPv6 (::)
/// - If that fails, fall back to IPv4 (0.0.0.0)
pub async fn parse_and_bind_address(host: &str, port: u16) -> anyhow::Result<std::net::SocketAddr> {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

    // Try to parse as IP address first
    if let Ok(ip) = host.parse::<IpAddr>() {
        let addr = SocketAddr::new(ip, port);
        tracing::debug!("Parsed address: {}", addr);
        return Ok(addr);
    }

    // Handle special cases like "::" for IPv6 any
    match host {
        "::" => {
            let addr = SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port);
            tracing::debug!("Using IPv6 any address: {}", addr);

            // Test if we can bind to IPv6
            match tokio::net::TcpListener::bind(addr).await {
                Ok(_) => {
                    tracing::info!("Successfully bound to IPv6 address {}", addr);
                    Ok(addr)
                }
                Err(e) => {
                    tracing::warn!(
                        "Could not listen on [::]:{} (Caused by {}), falling back to 0.0.0.0",
                        port,
                        e
                    );
                    let fallback_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
                    tracing::info!("Using IPv4 fallback address: {}", fallback_addr);
                    Ok(fallback_addr)
                }
            }
        }
        "0.0.0.0" => {
            let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
            tracing::info!("Using IPv4 any address: {}", addr);
            Ok(addr)
        }
        _ => {
            anyhow::bail!(
                "Invalid host address: {}. Use '::' for IPv6 or '0.0.0.0' for IPv4",
                host
            );
        }
    }
}
