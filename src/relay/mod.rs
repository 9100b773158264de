//! Range-aware media relay
//!
//! The platform's CDN answers 403 to requests that do not look like they came
//! from its own web frontend. The relay re-issues media fetches with the
//! expected identification and referrer headers and pipes the response back,
//! preserving byte-range semantics so video elements can seek.
//!
//! Both operations are stateless per call: the only resource held is the open
//! upstream connection, released when the returned body is dropped or fully
//! consumed.

use crate::config::settings::RelaySettings;
use crate::error::{Error, Result};
use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};
use futures::Stream;
use std::time::Duration;
use url::Url;

/// A relayed streaming response: the mapped status, the range headers worth
/// forwarding verbatim, and the still-open upstream body.
#[derive(Debug)]
pub struct RelayedStream {
    /// Status to answer the client with (200, or 206 when the client asked
    /// for a range and the origin honored it)
    pub status: StatusCode,
    /// Upstream `Content-Length`, forwarded verbatim when present
    pub content_length: Option<HeaderValue>,
    /// Upstream `Content-Range`, forwarded verbatim when present
    pub content_range: Option<HeaderValue>,
    upstream: reqwest::Response,
}

impl RelayedStream {
    /// Consume the relayed response into its lazy chunk stream.
    ///
    /// The stream is finite, forward-only and non-restartable; memory use is
    /// bounded by the chunk size regardless of media size.
    pub fn into_byte_stream(self) -> impl Stream<Item = reqwest::Result<Bytes>> {
        self.upstream.bytes_stream()
    }
}

/// Relays media fetches to the protected origin with spoofed identity headers.
#[derive(Debug, Clone)]
pub struct MediaRelay {
    client: reqwest::Client,
    referer: String,
    user_agent: String,
    image_timeout: Duration,
}

impl MediaRelay {
    /// Create a relay with the given settings.
    ///
    /// The shared client carries a connect timeout only: a whole-request
    /// timeout would cut long-lived video streams off mid-play. The bounded
    /// still-image timeout is applied per request instead.
    pub fn new(settings: &RelaySettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout())
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            client,
            referer: settings.referer.clone(),
            user_agent: settings.user_agent.clone(),
            image_timeout: settings.image_timeout(),
        })
    }

    fn validate_target(url: &str) -> Result<Url> {
        let target = Url::parse(url)?;
        match target.scheme() {
            "http" | "https" => Ok(target),
            other => Err(Error::relay(format!(
                "only http/https URLs are relayed, got {other}"
            ))),
        }
    }

    async fn send(
        &self,
        target: Url,
        range: Option<HeaderValue>,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response> {
        let mut request = self
            .client
            .get(target)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::REFERER, self.referer.as_str());

        if let Some(range) = range {
            request = request.header(reqwest::header::RANGE, range);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        Ok(request.send().await?)
    }

    /// Fetch a still image and return its body whole.
    ///
    /// Any non-200 upstream status or transport error is a uniform failure;
    /// no partial bytes ever reach the caller.
    pub async fn fetch_image(&self, url: &str) -> Result<Bytes> {
        let target = Self::validate_target(url)?;
        let response = self
            .send(target, None, Some(self.image_timeout))
            .await?;

        if response.status() != StatusCode::OK {
            return Err(Error::upstream_status(response.status().as_u16()));
        }

        Ok(response.bytes().await?)
    }

    /// Open a streaming fetch, forwarding the client's `Range` header verbatim.
    ///
    /// Status mapping: 206 is answered only when the client sent a range AND
    /// the origin honored it with 206 of its own. An origin that ignores the
    /// range (plain 200) is surfaced as 200, never silently upgraded.
    ///
    /// Once the returned stream is handed to a client, a mid-stream upstream
    /// failure can only truncate the body; the response headers are already
    /// on the wire at that point and cannot be rewritten.
    pub async fn stream(
        &self,
        url: &str,
        client_range: Option<HeaderValue>,
    ) -> Result<RelayedStream> {
        let target = Self::validate_target(url)?;
        let has_client_range = client_range.is_some();

        let response = self.send(target, client_range, None).await?;

        let upstream_status = response.status();
        if upstream_status != StatusCode::OK && upstream_status != StatusCode::PARTIAL_CONTENT {
            return Err(Error::upstream_status(upstream_status.as_u16()));
        }

        let status = if has_client_range && upstream_status == StatusCode::PARTIAL_CONTENT {
            StatusCode::PARTIAL_CONTENT
        } else {
            StatusCode::OK
        };

        tracing::debug!(
            "relaying stream: upstream {} mapped to {}",
            upstream_status,
            status
        );

        Ok(RelayedStream {
            status,
            content_length: response.headers().get(reqwest::header::CONTENT_LENGTH).cloned(),
            content_range: response.headers().get(reqwest::header::CONTENT_RANGE).cloned(),
            upstream: response,
        })
    }
}
