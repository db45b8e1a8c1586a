//! Route tests driving the full router with mock downstream servers

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{Duration, Utc};
use common::models::ReminderInput;
use common::{Config, WebhookConfig};
use github::GithubClient;
use hmac::{Hmac, Mac};
use line::LineClient;
use serde_json::json;
use serial_test::serial;
use sha2::Sha256;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::app;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

const SECRET: &str = "test-secret";

fn sign_body(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::run_migrations(&pool).await.unwrap();
    pool
}

fn test_config(allowed_user: Option<&str>) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        sweep_interval_secs: 0,
        webhook: WebhookConfig::new(
            Some(SECRET.to_string()),
            Some("channel-token".to_string()),
            allowed_user.map(str::to_string),
        )
        .unwrap(),
    }
}

async fn test_state(
    allowed_user: Option<&str>,
    line_url: String,
    github_url: String,
) -> (Arc<AppState>, SqlitePool) {
    let pool = test_pool().await;
    let state = AppState::with_clients(
        test_config(allowed_user),
        pool.clone(),
        LineClient::with_base_url("channel-token".to_string(), line_url),
        GithubClient::with_base_url(github_url),
    );
    (Arc::new(state), pool)
}

fn text_message_body(text: &str, user_id: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "destination": "xxx",
        "events": [{
            "type": "message",
            "replyToken": "rtoken",
            "source": {"type": "user", "userId": user_id},
            "message": {"id": "m1", "type": "text", "text": text},
        }],
    }))
    .unwrap()
}

fn webhook_request(uri: &str, body: Vec<u8>, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("x-line-signature", signature);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn response_json(resp: axum::http::Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), 65536).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_returns_json() {
    let (state, _pool) = test_state(
        None,
        "http://unused.invalid".to_string(),
        "http://unused.invalid".to_string(),
    )
    .await;

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let resp = app(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = response_json(resp).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "line-bots");
}

#[tokio::test]
async fn test_reminder_webhook_registers_group() {
    let line_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/reply"))
        .and(body_partial_json(json!({"replyToken": "rtoken"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&line_server)
        .await;

    let (state, pool) = test_state(
        None,
        line_server.uri(),
        "http://unused.invalid".to_string(),
    )
    .await;

    let body = text_message_body("buy milk", "U123");
    let signature = sign_body(SECRET, &body);
    let resp = app(state)
        .oneshot(webhook_request("/webhook/reminder", body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(response_json(resp).await["ok"], true);

    let rows = db::reminders::list_by_user(&pool, "U123").await.unwrap();
    assert_eq!(rows.len(), 5);
}

#[tokio::test]
async fn test_invalid_signature_is_rejected_before_dispatch() {
    let line_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&line_server)
        .await;

    let (state, pool) = test_state(
        None,
        line_server.uri(),
        "http://unused.invalid".to_string(),
    )
    .await;

    let body = text_message_body("buy milk", "U123");
    let bad_signature = sign_body("wrong-secret", &body);
    let resp = app(state)
        .oneshot(webhook_request(
            "/webhook/reminder",
            body,
            Some(bad_signature),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response_json(resp).await["message"], "Invalid signature");
    assert!(db::reminders::list_by_user(&pool, "U123")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_missing_signature_header_is_unauthorized() {
    let (state, _pool) = test_state(
        None,
        "http://unused.invalid".to_string(),
        "http://unused.invalid".to_string(),
    )
    .await;

    let body = text_message_body("buy milk", "U123");
    let resp = app(state)
        .oneshot(webhook_request("/webhook/reminder", body, None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_event_list_is_a_bad_request() {
    let (state, _pool) = test_state(
        None,
        "http://unused.invalid".to_string(),
        "http://unused.invalid".to_string(),
    )
    .await;

    let body = serde_json::to_vec(&json!({"destination": "xxx", "events": []})).unwrap();
    let signature = sign_body(SECRET, &body);
    let resp = app(state)
        .oneshot(webhook_request("/webhook/reminder", body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response_json(resp).await["message"],
        "No events in webhook request"
    );
}

#[tokio::test]
async fn test_validation_errors_are_reported_per_field() {
    let line_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&line_server)
        .await;

    let (state, _pool) = test_state(
        None,
        line_server.uri(),
        "http://unused.invalid".to_string(),
    )
    .await;

    let body = text_message_body("   ", "U123");
    let signature = sign_body(SECRET, &body);
    let resp = app(state)
        .oneshot(webhook_request("/webhook/reminder", body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = response_json(resp).await;
    assert_eq!(json["message"], "Invalid message event data");
    assert_eq!(
        json["errors"],
        json!(["message is required and cannot be empty"])
    );
}

#[tokio::test]
async fn test_unauthorized_user_gets_403() {
    let line_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/reply"))
        .and(body_partial_json(json!({
            "messages": [{"type": "text", "text": "Unauthorized user."}],
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&line_server)
        .await;

    let (state, _pool) = test_state(
        Some("U-owner"),
        line_server.uri(),
        "http://unused.invalid".to_string(),
    )
    .await;

    let body = text_message_body("buy milk", "U-intruder");
    let signature = sign_body(SECRET, &body);
    let resp = app(state)
        .oneshot(webhook_request("/webhook/reminder", body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(response_json(resp).await["message"], "Unauthorized user");
}

#[tokio::test]
#[serial]
async fn test_memo_webhook_commits_to_github() {
    let github_server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path_regex(
            r"^/repos/owner/repo/contents/memos%2F\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2}\.md$",
        ))
        .and(body_partial_json(json!({
            "content": BASE64.encode("buy milk".as_bytes()),
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&github_server)
        .await;

    let line_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/reply"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&line_server)
        .await;

    std::env::set_var("GITHUB_TOKEN", "t");
    std::env::set_var("GITHUB_REPO_OWNER", "owner");
    std::env::set_var("GITHUB_REPO_NAME", "repo");
    std::env::set_var("GITHUB_PUSH_DIRECTORY_PATH", "memos");

    let (state, _pool) = test_state(None, line_server.uri(), github_server.uri()).await;

    let body = text_message_body("buy milk", "U123");
    let signature = sign_body(SECRET, &body);
    let resp = app(state)
        .oneshot(webhook_request("/webhook/memo", body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_memo_webhook_rejects_non_text_events() {
    let github_server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&github_server)
        .await;

    let (state, _pool) = test_state(
        None,
        "http://unused.invalid".to_string(),
        github_server.uri(),
    )
    .await;

    let body = serde_json::to_vec(&json!({
        "destination": "xxx",
        "events": [{
            "type": "message",
            "replyToken": "rtoken",
            "source": {"type": "user", "userId": "U123"},
            "message": {"id": "m1", "type": "sticker"},
        }],
    }))
    .unwrap();
    let signature = sign_body(SECRET, &body);
    let resp = app(state)
        .oneshot(webhook_request("/webhook/memo", body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response_json(resp).await["message"],
        "Unsupported event type: message"
    );
}

#[tokio::test]
async fn test_webhook_rejects_get_requests() {
    let (state, _pool) = test_state(
        None,
        "http://unused.invalid".to_string(),
        "http://unused.invalid".to_string(),
    )
    .await;

    let req = Request::builder()
        .method("GET")
        .uri("/webhook/reminder")
        .body(Body::empty())
        .unwrap();

    let resp = app(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_sweep_trigger_delivers_due_reminders() {
    let line_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/push"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&line_server)
        .await;

    let (state, pool) = test_state(
        None,
        line_server.uri(),
        "http://unused.invalid".to_string(),
    )
    .await;

    let due = ReminderInput {
        message: "buy milk".to_string(),
        execution_time: Utc::now() - Duration::minutes(1),
        group_id: Some("g1".to_string()),
        interval_label: Some("in 5 minutes".to_string()),
    };
    db::reminders::insert(&pool, "U123", &due).await.unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/api/sweep")
        .body(Body::empty())
        .unwrap();

    let resp = app(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = response_json(resp).await;
    assert_eq!(json["due"], 1);
    assert_eq!(json["sent"], 1);
    assert_eq!(json["failed"], 0);

    assert!(db::reminders::list_by_user(&pool, "U123")
        .await
        .unwrap()
        .is_empty());
}
