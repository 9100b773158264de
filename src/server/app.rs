//! Axum application setup
//!
//! Creates and configures the Axum application with routes and middleware.

use crate::{config::Settings, credentials::CredentialCache, relay::MediaRelay};
use axum::{Router, routing::get};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Credential cache fronting the browser harvester
    pub cache: Arc<CredentialCache>,
    /// Media relay for the proxy endpoints
    pub relay: Arc<MediaRelay>,
    /// Application settings
    pub settings: Arc<Settings>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

/// Create the main Axum application with routes and middleware.
///
/// The credential cache is built by the caller (it owns the harvester and may
/// have been seeded from a snapshot); the relay client is constructed here.
/// The permissive CORS layer lets `<img>`/`<video>` elements on other origins
/// consume the relay endpoints directly.
pub fn create_app(settings: Settings, cache: Arc<CredentialCache>) -> crate::Result<Router> {
    let relay = Arc::new(MediaRelay::new(&settings.relay)?);

    let state = AppState {
        cache,
        relay,
        settings: Arc::new(settings),
        start_time: std::time::Instant::now(),
    };

    Ok(Router::new()
        .route("/guestcookies", get(super::handlers::get_guest_cookies))
        .route(
            "/guestcookies/refresh",
            get(super::handlers::refresh_guest_cookies),
        )
        .route("/proxy/image", get(super::handlers::proxy_image))
        .route("/proxy/video", get(super::handlers::proxy_video))
        .route("/ping", get(super::handlers::ping))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state))
}
