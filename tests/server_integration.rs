//! HTTP surface integration tests
//!
//! Exercises the full router: credential endpoints over a stub harvester and
//! relay endpoints against a mocked upstream origin.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::helpers::{StubHarvester, test_app};
use tower::ServiceExt;
use wiremock::matchers::{header as upstream_header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xhs_guest_gateway::types::{GuestCookiesResponse, PingResponse, RelayErrorResponse};

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn guestcookies_serves_harvested_string() {
    let harvester = StubHarvester::new();
    let app = test_app(harvester.clone());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/guestcookies")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed: GuestCookiesResponse = body_json(response).await;
    assert!(parsed.success);
    assert_eq!(parsed.data, "webId=integration-web-id; xsecappid=xhs-pc-web");
}

#[tokio::test]
async fn guestcookies_second_request_hits_the_cache() {
    let harvester = StubHarvester::new();
    let app = test_app(harvester.clone());

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/guestcookies")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(harvester.calls(), 1);
}

#[tokio::test]
async fn guestcookies_refresh_always_reharvests() {
    let harvester = StubHarvester::new();
    let app = test_app(harvester.clone());

    let first = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/guestcookies")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let refreshed = app
        .oneshot(
            Request::builder()
                .uri("/guestcookies/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(refreshed.status(), StatusCode::OK);

    let parsed: GuestCookiesResponse = body_json(refreshed).await;
    assert!(parsed.success);
    assert_eq!(harvester.calls(), 2);
}

#[tokio::test]
async fn proxy_image_pipes_upstream_bytes() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img.jpg"))
        .and(upstream_header("referer", "https://www.xiaohongshu.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fakejpeg".to_vec()))
        .mount(&upstream)
        .await;

    let app = test_app(StubHarvester::new());
    let uri = format!("/proxy/image?url={}/img.jpg", upstream.uri());

    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/jpeg"
    );
    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], b"fakejpeg");
}

#[tokio::test]
async fn proxy_image_upstream_refusal_yields_uniform_failure() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img.jpg"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&upstream)
        .await;

    let app = test_app(StubHarvester::new());
    let uri = format!("/proxy/image?url={}/img.jpg", upstream.uri());

    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed: RelayErrorResponse = body_json(response).await;
    assert!(!parsed.success);
    assert_eq!(parsed.msg, "Proxy failed");
}

#[tokio::test]
async fn proxy_video_preserves_partial_content() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/video.mp4"))
        .and(upstream_header("range", "bytes=100-199"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("content-range", "bytes 100-199/1000")
                .insert_header("content-length", "100")
                .set_body_bytes(vec![7u8; 100]),
        )
        .mount(&upstream)
        .await;

    let app = test_app(StubHarvester::new());
    let uri = format!("/proxy/video?url={}/video.mp4", upstream.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::RANGE, "bytes=100-199")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers().get(header::CONTENT_RANGE).unwrap(),
        "bytes 100-199/1000"
    );
    assert_eq!(
        response.headers().get(header::ACCEPT_RANGES).unwrap(),
        "bytes"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mp4"
    );

    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(bytes.len(), 100);
}

#[tokio::test]
async fn proxy_video_ignored_range_falls_back_to_200() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/video.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9u8; 32]))
        .mount(&upstream)
        .await;

    let app = test_app(StubHarvester::new());
    let uri = format!("/proxy/video?url={}/video.mp4", upstream.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::RANGE, "bytes=0-15")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::CONTENT_RANGE).is_none());
}

#[tokio::test]
async fn proxy_video_upstream_refusal_yields_uniform_failure() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/video.mp4"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&upstream)
        .await;

    let app = test_app(StubHarvester::new());
    let uri = format!("/proxy/video?url={}/video.mp4", upstream.uri());

    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let parsed: RelayErrorResponse = body_json(response).await;
    assert!(!parsed.success);
    assert!(parsed.msg.starts_with("Video proxy failed"));
}

#[tokio::test]
async fn ping_reports_version() {
    let app = test_app(StubHarvester::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed: PingResponse = body_json(response).await;
    assert_eq!(parsed.version, env!("CARGO_PKG_VERSION"));
}
