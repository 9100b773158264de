//! HTTP request handlers
//!
//! Implementation of the gateway's HTTP endpoints. Every failure is absorbed
//! here and answered as a structured JSON object; nothing on these paths can
//! take the process down.

use crate::{
    server::app::AppState,
    types::{GuestCookiesResponse, PingResponse, RelayQuery, RelayErrorResponse},
    utils::version,
};
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Json, Response};
use axum_macros::debug_handler;
use futures::TryStreamExt;

/// Cached guest cookie fetch
///
/// GET /guestcookies
///
/// Serves the cached credential string, harvesting only when the cache slot
/// is empty or past its TTL. A fresh slot answers in microseconds; a refresh
/// blocks for the full browser session.
pub async fn get_guest_cookies(State(state): State<AppState>) -> Json<GuestCookiesResponse> {
    tracing::debug!("guest cookie request");
    let bundle = state.cache.get_or_refresh().await;
    Json(GuestCookiesResponse::new(bundle.success, bundle.cookie_header))
}

/// Forced re-harvest
///
/// GET /guestcookies/refresh
///
/// Clears the cache slot and harvests immediately, regardless of freshness.
pub async fn refresh_guest_cookies(
    State(state): State<AppState>,
) -> Json<GuestCookiesResponse> {
    tracing::info!("forced guest cookie refresh");
    let bundle = state.cache.force_refresh().await;
    Json(GuestCookiesResponse::new(bundle.success, bundle.cookie_header))
}

/// Still-image relay
///
/// GET /proxy/image?url=...
///
/// Fetches the image with spoofed identity headers and returns the raw body.
/// Upstream refusal or transport failure answers the uniform failure object;
/// partial bytes never reach the client.
pub async fn proxy_image(
    State(state): State<AppState>,
    Query(query): Query<RelayQuery>,
) -> Response {
    match state.relay.fetch_image(&query.url).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, HeaderValue::from_static("image/jpeg"))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!("image relay failed for {}: {}", query.url, e);
            Json(RelayErrorResponse::new("Proxy failed")).into_response()
        }
    }
}

/// Streaming media relay with byte-range support
///
/// GET /proxy/video?url=... (optional client `Range` header)
///
/// Forwards the client's range to the origin and pipes the response through
/// chunk by chunk. Answers 206 only when the client asked for a range and the
/// origin honored it. An upstream failure during streaming, after the headers
/// have been sent, can only truncate the body; the status is already on the
/// wire by then.
#[debug_handler]
pub async fn proxy_video(
    State(state): State<AppState>,
    Query(query): Query<RelayQuery>,
    headers: HeaderMap,
) -> Response {
    let client_range = headers.get(header::RANGE).cloned();

    match state.relay.stream(&query.url, client_range).await {
        Ok(relayed) => {
            let status = relayed.status;

            let mut response_headers = HeaderMap::new();
            response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("video/mp4"));
            response_headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
            if let Some(content_length) = relayed.content_length.clone() {
                response_headers.insert(header::CONTENT_LENGTH, content_length);
            }
            if let Some(content_range) = relayed.content_range.clone() {
                response_headers.insert(header::CONTENT_RANGE, content_range);
            }

            let body = Body::from_stream(
                relayed.into_byte_stream().map_err(std::io::Error::other),
            );

            (status, response_headers, body).into_response()
        }
        Err(e) => {
            tracing::warn!("video relay failed for {}: {}", query.url, e);
            Json(RelayErrorResponse::new(format!("Video proxy failed: {e}"))).into_response()
        }
    }
}

/// Ping endpoint for health checks
///
/// GET /ping
///
/// Returns server status and uptime information.
pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    let response = PingResponse::new(uptime, version::get_version());

    tracing::debug!(
        "Ping response: uptime={}s, version={}",
        uptime,
        version::get_version()
    );
    Json(response)
}
