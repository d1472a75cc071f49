mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_shorten_returns_full_short_url() {
    let server = common::spawn_server();

    let response = server
        .post("/shorten")
        .json(&json!({ "original": "https://example.com/some/page" }))
        .await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["original"], "https://example.com/some/page");

    let shortened = body["shortened"].as_str().unwrap();
    assert!(shortened.starts_with(common::BASE_URL));

    let identifier = shortened.rsplit('/').next().unwrap();
    assert_eq!(identifier.len(), 8);
    assert!(identifier.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_redirect_points_at_original() {
    let server = common::spawn_server();
    let identifier = common::shorten(&server, "https://example.com/landing").await;

    let response = server.get(&format!("/{identifier}")).await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "https://example.com/landing"
    );
}

#[tokio::test]
async fn test_shorten_accepts_ttl_in_seconds() {
    let server = common::spawn_server();

    let response = server
        .post("/shorten")
        .json(&json!({ "original": "https://example.com", "ttl": 3600 }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_shorten_rejects_empty_url() {
    let server = common::spawn_server();

    let response = server.post("/shorten").json(&json!({ "original": "" })).await;

    response.assert_status_bad_request();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["code"], 400);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_shorten_rejects_unsupported_scheme() {
    let server = common::spawn_server();

    let response = server
        .post("/shorten")
        .json(&json!({ "original": "ftp://example.com/file" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_redirect_unknown_identifier_is_not_found() {
    let server = common::spawn_server();

    let response = server.get("/does-not-exist").await;

    response.assert_status_not_found();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_health_reports_ok() {
    let server = common::spawn_server();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["store"]["status"], "ok");
    assert_eq!(body["checks"]["access_queue"]["status"], "ok");
}
