use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use bytes::Bytes;
use futures_util::{StreamExt, stream};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt; // for `oneshot`

use transformbox::api::router;
use transformbox::api::state::AppState;
use transformbox::config::Config;
use transformbox::fetch::{ObjectFetcher, OriginResponse, Result as FetchResult};
use transformbox::pipeline::GetObjectHandler;
use transformbox::request::{DefaultRequestValidator, ReconciledHeaders};
use transformbox::transform::UppercaseTransformer;

/// Origin stand-in serving one fixed object
struct FixedOrigin {
    status: StatusCode,
    body: &'static str,
}

#[async_trait]
impl ObjectFetcher for FixedOrigin {
    async fn fetch(&self, _url: &str, _headers: &ReconciledHeaders) -> FetchResult<OriginResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "text/plain".parse().unwrap());
        headers.insert(header::ETAG, "\"abc\"".parse().unwrap());
        headers.insert("x-amz-meta-owner", "team-a".parse().unwrap());
        headers.insert("x-amz-request-id", "origin-1".parse().unwrap());
        Ok(OriginResponse::buffered(self.status, headers, self.body))
    }
}

fn test_config(max_event_bytes: u64) -> Config {
    let config_toml = format!(
        r#"
[server]
bind_addr = "127.0.0.1:0"
max_event_bytes = {max_event_bytes}

[transform]
transformer = "uppercase"
"#
    );

    toml::from_str(&config_toml).expect("Failed to parse test config")
}

fn build_app(origin: FixedOrigin, max_event_bytes: u64) -> Router {
    let handler = GetObjectHandler::new(
        Arc::new(DefaultRequestValidator),
        Arc::new(origin),
        Arc::new(UppercaseTransformer::default()),
    );
    router(AppState::new(test_config(max_event_bytes), handler))
}

fn ok_origin() -> FixedOrigin {
    FixedOrigin {
        status: StatusCode::OK,
        body: "hello world",
    }
}

fn event(user_url: &str, headers: Value) -> Value {
    json!({
        "xAmzRequestId": "req-1",
        "getObjectContext": {
            "inputS3Url": "https://bucket.s3.amazonaws.com/hello.txt?X-Amz-SignedHeaders=host&X-Amz-Signature=abc",
            "outputRoute": "io-use1-001",
            "outputToken": "opaque-token"
        },
        "configuration": {
            "accessPointArn": "arn:aws:s3-object-lambda:us-east-1:123456789012:accesspoint/example",
            "supportingAccessPointArn": "arn:aws:s3:us-east-1:123456789012:accesspoint/supporting",
            "payload": ""
        },
        "userRequest": { "url": user_url, "headers": headers },
        "userIdentity": { "type": "IAMUser" },
        "protocolVersion": "1.00"
    })
}

fn invoke_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/invoke")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn read_body(response: axum::response::Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

#[tokio::test]
async fn test_invoke_success() {
    let app = build_app(ok_origin(), 1024 * 1024);

    let response = app
        .oneshot(invoke_request(&event(
            "https://ap.example.com/hello.txt",
            json!({ "Host": "ap.example.com" }),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(headers["x-amz-request-route"], "io-use1-001");
    assert_eq!(headers["x-amz-request-token"], "opaque-token");
    assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
    assert_eq!(headers[header::ETAG], "\"abc\"");
    assert_eq!(headers["x-amz-meta-owner"], "team-a");
    assert!(headers.get("x-amz-request-id").is_none());
    assert_eq!(headers["x-amz-meta-body-checksum-algorithm"], "SHA256");
    assert_eq!(
        headers["x-amz-meta-body-checksum-digest"].to_str().unwrap().len(),
        64
    );

    assert_eq!(&read_body(response).await[..], b"HELLO WORLD");
}

#[tokio::test]
async fn test_invoke_range_applies_to_transformed_bytes() {
    let app = build_app(ok_origin(), 1024 * 1024);

    let response = app
        .oneshot(invoke_request(&event(
            "https://ap.example.com/hello.txt",
            json!({ "Range": "bytes=-5" }),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&read_body(response).await[..], b"WORLD");
}

#[tokio::test]
async fn test_invoke_validation_failure_is_forwarded() {
    let app = build_app(ok_origin(), 1024 * 1024);

    let response = app
        .oneshot(invoke_request(&event(
            "https://ap.example.com/hello.txt?partNumber=1",
            json!({ "Range": "bytes=0-1" }),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["x-amz-fwd-error-code"], "InvalidRequest");
    assert_eq!(response.headers()["x-amz-request-token"], "opaque-token");

    let body = String::from_utf8(read_body(response).await.to_vec()).unwrap();
    assert!(body.contains("<Code>InvalidRequest</Code>"));
}

#[tokio::test]
async fn test_invoke_invalid_range() {
    let app = build_app(ok_origin(), 1024 * 1024);

    let response = app
        .oneshot(invoke_request(&event(
            "https://ap.example.com/hello.txt",
            json!({ "Range": "bytes=100-200" }),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(response.headers()["x-amz-fwd-error-code"], "InvalidRange");
}

#[tokio::test]
async fn test_invoke_origin_error_is_forwarded() {
    let app = build_app(
        FixedOrigin {
            status: StatusCode::FORBIDDEN,
            body: "<Error><Code>AccessDenied</Code></Error>",
        },
        1024 * 1024,
    );

    let response = app
        .oneshot(invoke_request(&event(
            "https://ap.example.com/hello.txt",
            json!({}),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(response.headers()["x-amz-request-route"], "io-use1-001");
    assert_eq!(
        &read_body(response).await[..],
        b"<Error><Code>AccessDenied</Code></Error>"
    );
}

#[tokio::test]
async fn test_invoke_rejects_wrong_content_type() {
    let app = build_app(ok_origin(), 1024 * 1024);

    let request = Request::builder()
        .method("POST")
        .uri("/invoke")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(body["code"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn test_invoke_rejects_malformed_event() {
    let app = build_app(ok_origin(), 1024 * 1024);

    let response = app
        .oneshot(invoke_request(&json!({ "userRequest": {} })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(body["code"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn test_invoke_rejects_oversized_event() {
    let app = build_app(ok_origin(), 64);

    let response = app
        .oneshot(invoke_request(&event(
            "https://ap.example.com/hello.txt",
            json!({}),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_invoke_stops_reading_oversized_stream() {
    let app = build_app(ok_origin(), 64);

    // 50 MB offered in 1 KiB chunks, produced only when polled
    let pulled = Arc::new(AtomicUsize::new(0));
    let counter = pulled.clone();
    let chunks = stream::iter(0..50_000).map(move |_| {
        counter.fetch_add(1024, Ordering::Relaxed);
        Ok::<_, std::io::Error>(Bytes::from(vec![b' '; 1024]))
    });

    let request = Request::builder()
        .method("POST")
        .uri("/invoke")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from_stream(chunks))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let pulled = pulled.load(Ordering::Relaxed);
    assert!(pulled <= 2 * 1024, "read {pulled} bytes past a 64 byte limit");
}

#[tokio::test]
async fn test_health() {
    let app = build_app(ok_origin(), 1024 * 1024);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&read_body(response).await[..], b"ok");
}

#[tokio::test]
async fn test_metrics_count_outcomes() {
    let app = build_app(ok_origin(), 1024 * 1024);

    let success = event("https://ap.example.com/hello.txt", json!({}));
    let invalid = event(
        "https://ap.example.com/hello.txt?partNumber=1",
        json!({ "Range": "bytes=0-1" }),
    );

    for body in [&success, &success, &invalid] {
        let response = app.clone().oneshot(invoke_request(body)).await.unwrap();
        read_body(response).await;
    }

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot: Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(snapshot["invocations"], 3);
    assert_eq!(snapshot["successes"], 2);
    assert_eq!(snapshot["invalid_requests"], 1);
    assert_eq!(snapshot["origin_errors"], 0);
}
