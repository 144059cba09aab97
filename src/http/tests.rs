//! Tests for HTTP module

use super::*;
use crate::config::{HttpConfig, SourceConfig};
use crate::error::Error;
use crate::pagination::PageFetcher;
use crate::types::BackoffType;
use serde_json::json;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quick_http() -> HttpConfig {
    HttpConfig {
        max_retries: 2,
        initial_backoff_ms: 1,
        max_backoff_ms: 5,
        ..HttpConfig::default()
    }
}

fn source_for(server: &MockServer) -> SourceConfig {
    let mut source = SourceConfig::new(server.uri());
    source.path = "/articles".to_string();
    source.http = quick_http();
    source
}

// ============================================================================
// Client Config Tests
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("infinite-pager/"));
}

#[test]
fn test_http_client_config_from_http_config() {
    let http = HttpConfig {
        timeout_ms: 1500,
        max_retries: 5,
        backoff: BackoffType::Linear,
        requests_per_second: Some(4),
        ..HttpConfig::default()
    };

    let config = HttpClientConfig::from(&http);
    assert_eq!(config.timeout, Duration::from_millis(1500));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(4, 4)));

    let client = HttpClient::with_config(config).unwrap();
    assert!(client.has_rate_limiter());
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("page", "2")
        .header("X-Request-Id", "req-1");

    assert_eq!(config.query.get("page"), Some(&"2".to_string()));
    assert_eq!(config.headers.get("X-Request-Id"), Some(&"req-1".to_string()));
}

#[test_case(BackoffType::Constant, 3 => 100 ; "constant")]
#[test_case(BackoffType::Linear, 2 => 300 ; "linear")]
#[test_case(BackoffType::Exponential, 3 => 800 ; "exponential")]
#[test_case(BackoffType::Exponential, 20 => 1000 ; "capped")]
fn test_calculate_backoff(backoff_type: BackoffType, attempt: u32) -> u128 {
    let client = HttpClient::with_config(HttpClientConfig {
        backoff_type,
        initial_backoff: Duration::from_millis(100),
        max_backoff: Duration::from_secs(1),
        ..HttpClientConfig::default()
    })
    .unwrap();

    client.calculate_backoff(attempt).as_millis()
}

// ============================================================================
// Client Request Tests
// ============================================================================

#[tokio::test]
async fn test_get_json_with_query_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("q", "rust"))
        .and(header("X-Api-Key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 42})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let data: serde_json::Value = client
        .get_json_with_config(
            &format!("{}/api/search", mock_server.uri()),
            RequestConfig::new()
                .query("q", "rust")
                .header("X-Api-Key", "secret"),
        )
        .await
        .unwrap();

    assert_eq!(data["value"], 42);
}

#[tokio::test]
async fn test_retries_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(HttpClientConfig::from(&quick_http())).unwrap();
    let response = client
        .get_with_config(&format!("{}/flaky", mock_server.uri()), RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(HttpClientConfig::from(&quick_http())).unwrap();
    let err = client
        .get_with_config(&format!("{}/missing", mock_server.uri()), RequestConfig::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, ref body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "not here");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_errors_exhaust_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(HttpClientConfig::from(&quick_http())).unwrap();
    let err = client
        .get_with_config(&format!("{}/down", mock_server.uri()), RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}

// ============================================================================
// Page Source Tests
// ============================================================================

#[tokio::test]
async fn test_page_source_sends_page_and_size_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "5"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 6}, {"id": 7}])))
        .mount(&mock_server)
        .await;

    let mut source = source_for(&mock_server);
    source.page_size_param = Some("per_page".to_string());
    source.query.insert("lang".to_string(), "en".to_string());

    let pages = HttpPageSource::new(&source, 5).unwrap();
    let records = pages.fetch_page(2).await.unwrap();

    assert_eq!(records, vec![json!({"id": 6}), json!({"id": 7})]);
    assert_eq!(pages.last_total_pages(), None);
}

#[tokio::test]
async fn test_page_source_extracts_records_and_total_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles"))
        .and(query_param("p", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"items": [{"id": 1}]},
            "meta": {"total_pages": 9}
        })))
        .mount(&mock_server)
        .await;

    let mut source = source_for(&mock_server);
    source.page_param = "p".to_string();
    source.records_path = "$.data.items".to_string();
    source.total_pages_path = Some("meta.total_pages".to_string());

    let pages = HttpPageSource::new(&source, 20).unwrap();
    let records = pages.fetch_page(1).await.unwrap();

    assert_eq!(records, vec![json!({"id": 1})]);
    assert_eq!(pages.last_total_pages(), Some(9));
}

#[tokio::test]
async fn test_page_source_non_array_records_fail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "nope"})))
        .mount(&mock_server)
        .await;

    let mut source = source_for(&mock_server);
    source.records_path = "data".to_string();

    let pages = HttpPageSource::new(&source, 20).unwrap();
    let err = pages.fetch_page(1).await.unwrap_err();

    assert!(matches!(err, Error::RecordExtraction { .. }));
    assert!(err.to_string().contains("expected an array, found a string"));
}

#[test]
fn test_page_source_rejects_invalid_url() {
    let source = SourceConfig::new("not a url");
    assert!(HttpPageSource::new(&source, 20).is_err());
}

// ============================================================================
// Extraction Tests
// ============================================================================

#[test_case("" ; "empty path")]
#[test_case("$" ; "root marker")]
fn test_extract_path_root(path: &str) {
    let body = json!([1, 2]);
    assert_eq!(extract_path(&body, path), Some(&body));
}

#[test]
fn test_extract_path_nested() {
    let body = json!({"a": {"b": {"c": 3}}});
    assert_eq!(extract_path(&body, "a.b.c"), Some(&json!(3)));
    assert_eq!(extract_path(&body, "$.a.b"), Some(&json!({"c": 3})));
    assert_eq!(extract_path(&body, "a.x"), None);
    assert_eq!(extract_path(&body, "a.b.c.d"), None);
}

#[test]
fn test_extract_records_null_is_empty() {
    let body = json!({"data": null});
    assert!(extract_records(&body, "data").unwrap().is_empty());
}

#[test]
fn test_extract_records_missing_path() {
    let body = json!({"data": []});
    let err = extract_records(&body, "items").unwrap_err();
    assert!(err.to_string().contains("path not found"));
}

#[test_case(json!({"total": 4}) => Some(4) ; "number")]
#[test_case(json!({"total": " 7 "}) => Some(7) ; "numeric string")]
#[test_case(json!({"total": 0}) => None ; "zero")]
#[test_case(json!({"total": -2}) => None ; "negative")]
#[test_case(json!({"total": "many"}) => None ; "garbage")]
#[test_case(json!({}) => None ; "missing")]
fn test_extract_page_count(body: serde_json::Value) -> Option<u32> {
    extract_page_count(&body, "total")
}
