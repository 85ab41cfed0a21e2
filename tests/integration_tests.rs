// Integration tests: HTTP endpoints

mod common;

use axum_test::TestServer;
use axum::http::StatusCode;
use common::StubClient;
use docker_stats_agent::collector::Collector;
use docker_stats_agent::routes;
use std::sync::Arc;

fn test_server(client: StubClient) -> TestServer {
    TestServer::new(routes::app(Arc::new(client)))
}

#[tokio::test]
async fn test_health_ok_when_ping_succeeds() {
    let server = test_server(StubClient::default());
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_health_500_with_error_text_when_ping_fails() {
    let server = test_server(StubClient {
        ping_error: Some("connection refused".into()),
        ..Default::default()
    });
    let response = server.get("/health").expect_failure().await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().contains("connection refused"));
}

#[tokio::test]
async fn test_version_endpoint() {
    let server = test_server(StubClient::default());
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("docker-stats-agent")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_unknown_route_404() {
    let server = test_server(StubClient::default());
    let response = server.get("/metrics").expect_failure().await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_unaffected_by_list_failure() {
    let client = Arc::new(StubClient {
        list_error: Some("daemon busy".into()),
        ..Default::default()
    });
    let collector = Collector::new(client.clone(), None);
    let handles = collector.run_cycle().await;
    assert!(handles.is_empty());

    let server = TestServer::new(routes::app(client.clone()));
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}
