//! Integration tests for the HTTP service

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use mockito::{Matcher, Server};
use scrubber::adapters::language::{EntitySource, StaticEntitySource};
use scrubber::config::{secret_string, RetryConfig, ScrubberConfig};
use scrubber::core::ScrubService;
use scrubber::domain::{Result, ScrubError};
use scrubber::masking::{Detection, Entity, MaskingConfig, MaskingEngine, OffsetUnit};
use scrubber::server::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct FailingSource;

#[async_trait]
impl EntitySource for FailingSource {
    async fn detect(&self, _text: &str, _language: Option<&str>) -> Result<Detection> {
        Err(ScrubError::UpstreamDetection {
            status: Some(401),
            message: "Access denied".to_string(),
            details: Some(json!({"code": "401"})),
        })
    }

    fn offset_unit(&self) -> OffsetUnit {
        OffsetUnit::Utf16CodeUnit
    }
}

fn router_with(source: Arc<dyn EntitySource>) -> Router {
    let engine = MaskingEngine::new(MaskingConfig::default(), OffsetUnit::Utf16CodeUnit).unwrap();
    let service = ScrubService::new(engine, source, Duration::from_secs(5)).unwrap();
    build_router(Arc::new(AppState::new(service)))
}

fn phone_router() -> Router {
    router_with(Arc::new(StaticEntitySource::new(
        vec![Entity::new("PhoneNumber", 5, 10).with_confidence(0.8)],
        OffsetUnit::Utf16CodeUnit,
    )))
}

fn sanitize_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/sanitize")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_sanitize_pseudo() {
    let body = json!({"text": "Call 0601020304 now", "policy": "pseudo"}).to_string();
    let (status, body) = send(phone_router(), sanitize_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anonymized"], "Call [PhoneNumber] now");
    assert_eq!(body["spans"], json!([{"start": 5, "end": 18}]));
    assert_eq!(
        body["entities"],
        json!([{"category": "PhoneNumber", "offset": 5, "length": 10, "confidenceScore": 0.8}])
    );
}

#[tokio::test]
async fn test_sanitize_defaults_to_redact() {
    let body = json!({"text": "Call 0601020304 now"}).to_string();
    let (status, body) = send(phone_router(), sanitize_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anonymized"], "Call *** now");
    assert_eq!(body["spans"], json!([{"start": 5, "end": 8}]));
}

#[tokio::test]
async fn test_sanitize_rejects_blank_text() {
    for text in ["", "   \n\t"] {
        let body = json!({"text": text}).to_string();
        let (status, body) = send(phone_router(), sanitize_request(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing or empty 'text'.");
    }
}

#[tokio::test]
async fn test_sanitize_rejects_unknown_policy() {
    let body = json!({"text": "Call 0601020304 now", "policy": "scramble"}).to_string();
    let (status, body) = send(phone_router(), sanitize_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("scramble"));
}

#[tokio::test]
async fn test_sanitize_rejects_malformed_json() {
    let (status, body) = send(phone_router(), sanitize_request("{not json".to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("'text'"));
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let router = router_with(Arc::new(FailingSource));
    let body = json!({"text": "Call 0601020304 now"}).to_string();
    let (status, body) = send(router, sanitize_request(body)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Language service error");
    assert_eq!(body["status"], 401);
    assert_eq!(body["details"]["code"], "401");
    assert!(!body.to_string().contains("0601020304"));
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(phone_router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let request = Request::builder()
        .uri("/api/unknown")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(phone_router(), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_end_to_end_with_language_service() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/text/analytics/v3.1/entities/recognition/pii")
        .match_query(Matcher::UrlEncoded(
            "stringIndexType".into(),
            "Utf16CodeUnit".into(),
        ))
        .match_header("Ocp-Apim-Subscription-Key", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "documents": [{
                    "id": "1",
                    "redactedText": "👋 ***, call **********",
                    "entities": [
                        {"text": "Bob", "category": "Person", "offset": 3, "length": 3, "confidenceScore": 0.97},
                        {"text": "0601020304", "category": "PhoneNumber", "offset": 13, "length": 10, "confidenceScore": 0.8}
                    ],
                    "warnings": []
                }],
                "errors": [],
                "modelVersion": "2021-01-15"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut config = ScrubberConfig::default();
    config.language.endpoint = server.url();
    config.language.key = Some(secret_string("test-key".to_string()));
    config.language.retry = RetryConfig {
        max_retries: 0,
        ..Default::default()
    };

    let service = ScrubService::from_config(&config).unwrap();
    let router = build_router(Arc::new(AppState::new(service)));

    let body = json!({"text": "👋 Bob, call 0601020304", "policy": "pseudo"}).to_string();
    let (status, body) = send(router, sanitize_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anonymized"], "👋 [Person], call [PhoneNumber]");
    assert_eq!(
        body["spans"],
        json!([{"start": 3, "end": 11}, {"start": 18, "end": 31}])
    );
    mock.assert_async().await;
}

fn language_router(endpoint: String) -> Router {
    let mut config = ScrubberConfig::default();
    config.language.endpoint = endpoint;
    config.language.key = Some(secret_string("test-key".to_string()));
    config.language.retry = RetryConfig {
        max_retries: 0,
        ..Default::default()
    };

    let service = ScrubService::from_config(&config).unwrap();
    build_router(Arc::new(AppState::new(service)))
}

#[tokio::test]
async fn test_unreadable_upstream_entity_is_skipped() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/text/analytics/v3.1/entities/recognition/pii")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "documents": [{
                    "id": "1",
                    "entities": [
                        {"category": "PhoneNumber", "offset": 5, "length": 10},
                        {"category": "Person", "offset": 0}
                    ],
                    "warnings": []
                }],
                "errors": []
            })
            .to_string(),
        )
        .create_async()
        .await;

    let body = json!({"text": "Call 0601020304 now", "policy": "pseudo"}).to_string();
    let (status, body) = send(language_router(server.url()), sanitize_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anonymized"], "Call [PhoneNumber] now");
    assert_eq!(body["spans"], json!([{"start": 5, "end": 18}]));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_language_service_is_bad_gateway() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let body = json!({"text": "Call 0601020304 now"}).to_string();
    let (status, body) = send(language_router(endpoint), sanitize_request(body)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Language service error");
    assert_eq!(body["details"]["kind"], "connection");
    assert!(body.get("status").is_none());
    assert!(!body.to_string().contains("0601020304"));
}
