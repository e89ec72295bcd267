#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::Utc;
use railplan_notify::{NotificationChannel, NotifyError, OutgoingMessage};
use railplan_server::app;
use railplan_server::config::{DatabaseConfig, ServerConfig};
use railplan_server::state::AppState;
use railplan_storage::RailStore;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Records every message instead of talking to an SMTP relay.
#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<(String, OutgoingMessage)>>,
    pub fail_with: Option<String>,
}

#[async_trait]
impl NotificationChannel for FakeMailer {
    async fn send(&self, recipient: &str, message: &OutgoingMessage) -> railplan_notify::Result<()> {
        if let Some(reason) = &self.fail_with {
            return Err(NotifyError::InvalidConfig(reason.clone()));
        }
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((recipient.to_string(), message.clone()));
        Ok(())
    }

    fn channel_type(&self) -> &str {
        "fake"
    }
}

pub struct TestContext {
    pub temp_dir: TempDir,
    pub state: AppState,
    pub app: axum::Router,
    pub mailer: Arc<FakeMailer>,
}

pub async fn build_test_context() -> Result<TestContext> {
    build_test_context_with(FakeMailer::default(), "fr").await
}

pub async fn build_test_context_with(mailer: FakeMailer, locale: &str) -> Result<TestContext> {
    let temp_dir = tempfile::tempdir()?;
    let data_dir = temp_dir.path().to_string_lossy().to_string();
    let config = ServerConfig {
        locale: locale.to_string(),
        seed_sample_data: false,
        database: DatabaseConfig {
            url: None,
            data_dir: data_dir.clone(),
        },
        ..Default::default()
    };
    let store = RailStore::new(&config.database.connection_url(), temp_dir.path()).await?;

    let mailer = Arc::new(mailer);
    let state = AppState {
        store: Arc::new(store),
        mailer: Some(mailer.clone() as Arc<dyn NotificationChannel>),
        start_time: Utc::now(),
        config: Arc::new(config),
    };
    let app = app::build_http_app(state.clone());

    Ok(TestContext {
        temp_dir,
        state,
        app,
        mailer,
    })
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    (status, headers, bytes.to_vec())
}

fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).to_string()))
    }
}

fn trace_header(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get("x-trace-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value, Option<String>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.unwrap_or(Value::Null).to_string()))
        .expect("request should build");
    let (status, headers, bytes) = send(app, req).await;
    (status, decode_body(&bytes), trace_header(&headers))
}

pub async fn request_no_body(
    app: &axum::Router,
    method: &str,
    uri: &str,
) -> (StatusCode, Value, Option<String>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    let (status, headers, bytes) = send(app, req).await;
    (status, decode_body(&bytes), trace_header(&headers))
}

/// Sends a text body with an optional content type.
pub async fn request_text(
    app: &axum::Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Value, Option<String>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("Content-Type", ct);
    }
    let req = builder.body(Body::from(body)).expect("request should build");
    let (status, headers, bytes) = send(app, req).await;
    (status, decode_body(&bytes), trace_header(&headers))
}

/// Raw response for non-JSON endpoints (CSV download, HTML page).
pub async fn request_raw(
    app: &axum::Router,
    uri: &str,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, req).await
}

pub fn assert_ok_envelope(json: &Value) {
    assert_eq!(json["err_code"], 0);
    assert!(json["err_msg"].is_string());
    assert!(json.get("trace_id").is_some());
}

pub fn assert_err_envelope(json: &Value, err_code: i32) {
    assert_eq!(json["err_code"], err_code);
    assert!(json["err_msg"].is_string());
    assert!(json.get("trace_id").is_some());
    assert!(json.get("data").is_some());
    assert!(json["data"].is_null());
}

pub fn decode_data<T: DeserializeOwned>(json: &Value) -> T {
    serde_json::from_value(json["data"].clone()).expect("data should decode")
}

pub fn train_body(rail: u8, cargo: &str, tonnage: i64, depart: &str, arrivee: &str) -> Value {
    json!({
        "rail": rail,
        "cargo": cargo,
        "tonnage": tonnage,
        "client": "Coopérative Beauce",
        "depart": depart,
        "arrivee": arrivee,
    })
}

/// Create a train and return its `data` payload.
pub async fn create_train(app: &axum::Router, body: Value) -> Value {
    let (status, json, _) = request_json(app, "POST", "/api/trains", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {json}");
    assert_ok_envelope(&json);
    json["data"].clone()
}
