// tests/insight_http.rs

mod common;

use axum::http::StatusCode;
use common::{MockReply, TEST_KEY, dead_endpoint, spawn_mock};
use connfinder::insight::build_prompt;
use connfinder::{FinderError, InsightRequester, InsightSettings, MetricsRecord};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn record() -> MetricsRecord {
    MetricsRecord {
        color: "#FF5733".to_string(),
        ping_ms: 19.25,
        download_bps: 101000000.5,
        upload_bps: 49500000.0,
    }
}

fn requester(url: &str) -> InsightRequester {
    InsightRequester::from_settings(&InsightSettings::new(TEST_KEY).with_endpoint(url)).unwrap()
}

#[tokio::test]
async fn test_trims_completion_text() -> Result<(), FinderError> {
    let server = spawn_mock(MockReply::ok(r#"{"choices":[{"text":" hello world "}]}"#)).await;

    let insight = requester(&server.url).request(&record()).await?;

    assert_eq!(insight, "hello world");
    assert_eq!(server.hits(), 1);
    let seen = server.seen();
    assert_eq!(seen[0]["max_tokens"], 100);
    assert_eq!(seen[0]["prompt"], build_prompt(&record()));
    Ok(())
}

#[tokio::test]
async fn test_missing_choices_is_malformed() {
    let server = spawn_mock(MockReply::ok(r#"{"id":"cmpl-1","object":"text_completion"}"#)).await;

    let err = requester(&server.url).request(&record()).await;

    assert!(matches!(err, Err(FinderError::MalformedResponse { .. })), "got {:?}", err);
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = spawn_mock(MockReply::ok("<html>gateway</html>")).await;
    let err = requester(&server.url).request(&record()).await;
    assert!(matches!(err, Err(FinderError::MalformedResponse { .. })), "got {:?}", err);
}

#[tokio::test]
async fn test_server_error_is_http_status() {
    let server = spawn_mock(MockReply::status(StatusCode::SERVICE_UNAVAILABLE, "overloaded")).await;

    match requester(&server.url).request(&record()).await {
        Err(FinderError::HttpStatus { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded");
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
    // Single attempt, no retry
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_wrong_credential_is_rejected_by_endpoint() {
    let server = spawn_mock(MockReply::ok(r#"{"choices":[{"text":"never"}]}"#)).await;
    let requester =
        InsightRequester::from_settings(&InsightSettings::new("wrong-key").with_endpoint(server.url.clone())).unwrap();

    let err = requester.request(&record()).await;
    assert!(matches!(err, Err(FinderError::HttpStatus { status: 401, .. })), "got {:?}", err);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    let url = dead_endpoint().await;
    let err = requester(&url).request(&record()).await;
    assert!(matches!(err, Err(FinderError::Network { .. })), "got {:?}", err);
}

#[tokio::test]
async fn test_slow_endpoint_times_out_as_network_error() {
    let server = spawn_mock(MockReply::ok(r#"{"choices":[{"text":"late"}]}"#).delayed(Duration::from_secs(5))).await;
    let mut settings = InsightSettings::new(TEST_KEY).with_endpoint(server.url.clone());
    settings.timeout = Duration::from_millis(200);

    let err = InsightRequester::from_settings(&settings).unwrap().request(&record()).await;
    assert!(matches!(err, Err(FinderError::Network { .. })), "got {:?}", err);
}
