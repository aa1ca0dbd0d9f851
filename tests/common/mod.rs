//! Shared helpers for integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use campus_api::api::{build_router, AppState};
use campus_api::config::AppConfig;
use campus_api::infrastructure::http::RestClient;
use campus_api::infrastructure::repositories::{InMemoryStudentRepository, InMemoryUserRepository};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower::util::ServiceExt; // for oneshot

/// Test application plus handles on its in-memory stores
pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
}

/// Configuration with the upstream pointed at `upstream_base`
pub fn test_config(upstream_base: &str, extra: &[(&str, &str)]) -> AppConfig {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("UPSTREAM_BASE_URL".to_string(), upstream_base.to_string());
    vars.insert("API_SECRET_KEY".to_string(), "test-token".to_string());
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }

    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test config")
}

/// Setup test application over in-memory repositories
pub fn setup_app(config: AppConfig) -> TestApp {
    let users = Arc::new(InMemoryUserRepository::new());
    let rest = RestClient::new(&config.upstream.api_secret_key).expect("rest client");
    let state = AppState::new(
        Arc::new(InMemoryStudentRepository::new()),
        users.clone(),
        rest,
        config,
    );

    TestApp {
        router: build_router(state),
        users,
    }
}

/// App whose upstream is unreachable; for tests that never call out
pub fn setup_offline_app() -> TestApp {
    setup_app(test_config("http://127.0.0.1:9", &[]))
}

/// Sends a request and returns status plus parsed JSON body, or the raw text as a JSON string
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    });

    (status, json)
}
