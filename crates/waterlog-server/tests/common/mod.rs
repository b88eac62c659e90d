#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;
use waterlog_ai::{AiError, TextGenerator};
use waterlog_server::app;
use waterlog_server::config::ServerConfig;
use waterlog_server::state::AppState;
use waterlog_storage::WaterStore;

pub const TEST_ACCOUNT: &str = "00000000-0000-0000-0000-000000000000";

/// Test double for the text provider: counts calls, captures the last
/// prompt, and never touches the network.
pub struct CountingGenerator {
    pub calls: AtomicUsize,
    pub last_prompt: Mutex<Option<String>>,
    pub response: String,
    pub fail: bool,
}

impl CountingGenerator {
    pub fn new(response: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            response: response.to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("")
        }
    }
}

#[async_trait]
impl TextGenerator for CountingGenerator {
    fn provider(&self) -> &str {
        "test"
    }

    fn model_name(&self) -> &str {
        "test-model"
    }

    async fn complete(&self, prompt: &str) -> waterlog_ai::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        if self.fail {
            return Err(AiError::Api {
                service: "test".to_string(),
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(self.response.clone())
    }
}

pub struct TestContext {
    pub state: AppState,
    pub app: axum::Router,
    pub generator: Arc<CountingGenerator>,
}

pub async fn build_test_context() -> Result<TestContext> {
    build_test_context_with(Arc::new(CountingGenerator::new(
        "drink steadily, you are doing well",
    )))
    .await
}

pub async fn build_test_context_with(generator: Arc<CountingGenerator>) -> Result<TestContext> {
    waterlog_common::id::init(1, 1);

    let store = Arc::new(WaterStore::new("sqlite::memory:").await?);
    let (events, _rx) = waterlog_server::events::channel();

    let config = ServerConfig {
        locale: "en".to_string(),
        utc_offset: "+09:00".to_string(),
        ..ServerConfig::default()
    };
    let tz_offset = config.tz_offset()?;

    let state = AppState {
        store,
        generator: generator.clone(),
        events,
        config: Arc::new(config),
        tz_offset,
        start_time: Utc::now(),
    };

    let app = app::build_http_app(state.clone());

    Ok(TestContext {
        state,
        app,
        generator,
    })
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

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");

    decode_response(resp).await
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

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");

    decode_response(resp).await
}

async fn decode_response(
    resp: axum::response::Response,
) -> (StatusCode, Value, Option<String>) {
    let status = resp.status();
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json, trace_id)
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
