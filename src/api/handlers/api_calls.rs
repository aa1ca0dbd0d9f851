use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::api_call::{ApiCallResult, HttpMethod};
use crate::infrastructure::http::RequestOptions;

/// Response shape shared by every outbound-call endpoint
///
/// Upstream and transport failures answer 502 with the normalized result.
pub type ApiCallResponse = (StatusCode, Json<ApiCallResult>);

fn respond(result: ApiCallResult) -> ApiCallResponse {
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(result))
}

fn sample_post() -> Value {
    json!({
        "title": "Sample Title",
        "body": "This is a sample post body.",
        "userId": 1,
    })
}

fn sample_update() -> Value {
    json!({
        "title": "Updated Title",
        "body": "This is the updated post body.",
    })
}

/// Body of the generic proxy endpoint
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub method: String,
    /// Path relative to the configured upstream base URL
    pub path: String,
    pub payload: Option<Value>,
    #[serde(default)]
    pub use_headers: bool,
}

/// Fetch the configured user
///
/// GET /api-call
pub async fn fetch_user(State(state): State<AppState>) -> ApiCallResponse {
    let url = &state.config.upstream.user_url;
    respond(state.rest.send(HttpMethod::Get, url, None, &RequestOptions::default()).await)
}

/// Create a post; the request body replaces the sample payload when given
///
/// POST /api-call
pub async fn create_post(
    State(state): State<AppState>,
    payload: Option<Json<Value>>,
) -> ApiCallResponse {
    let payload = payload.map(|Json(v)| v).unwrap_or_else(sample_post);
    let url = &state.config.upstream.posts_url;
    respond(
        state
            .rest
            .send(HttpMethod::Post, url, Some(&payload), &RequestOptions::default())
            .await,
    )
}

/// Update a post
///
/// PUT /api-call/:id
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Option<Json<Value>>,
) -> ApiCallResponse {
    let payload = payload.map(|Json(v)| v).unwrap_or_else(sample_update);
    let url = state.config.upstream.post_url(id);
    respond(
        state
            .rest
            .send(HttpMethod::Put, &url, Some(&payload), &RequestOptions::default())
            .await,
    )
}

/// Delete a post
///
/// DELETE /api-call/:id
pub async fn delete_post(State(state): State<AppState>, Path(id): Path<i64>) -> ApiCallResponse {
    let url = state.config.upstream.post_url(id);
    respond(
        state
            .rest
            .send(HttpMethod::Delete, &url, None, &RequestOptions::default())
            .await,
    )
}

/// GET /api-call/with-headers
pub async fn fetch_user_with_headers(State(state): State<AppState>) -> ApiCallResponse {
    let url = &state.config.upstream.user_url;
    let options = RequestOptions::with_default_headers();
    respond(state.rest.send(HttpMethod::Get, url, None, &options).await)
}

/// GET /api-call/with-cookies
pub async fn fetch_user_with_cookies(State(state): State<AppState>) -> ApiCallResponse {
    let upstream = &state.config.upstream;
    let options = RequestOptions::default().cookies(upstream.cookies.clone());
    respond(state.rest.send(HttpMethod::Get, &upstream.user_url, None, &options).await)
}

/// GET /api-call/with-basic-auth
pub async fn fetch_user_with_basic_auth(State(state): State<AppState>) -> ApiCallResponse {
    let upstream = &state.config.upstream;
    let options = RequestOptions::default().basic_auth(
        upstream.basic_auth_user.clone(),
        Some(upstream.basic_auth_password.clone()),
    );
    respond(state.rest.send(HttpMethod::Get, &upstream.user_url, None, &options).await)
}

/// GET /api-call/with-timeout
pub async fn fetch_user_with_timeout(State(state): State<AppState>) -> ApiCallResponse {
    let upstream = &state.config.upstream;
    let options = RequestOptions::default().timeout(upstream.timeout);
    respond(state.rest.send(HttpMethod::Get, &upstream.user_url, None, &options).await)
}

/// GET /api-call/with-proxy
pub async fn fetch_user_with_proxy(
    State(state): State<AppState>,
) -> Result<ApiCallResponse, ApiError> {
    let upstream = &state.config.upstream;
    let client = state.rest.with_proxy(&upstream.proxy)?;
    Ok(respond(
        client
            .send(HttpMethod::Get, &upstream.user_url, None, &RequestOptions::default())
            .await,
    ))
}

/// Generic call against the upstream base URL
///
/// POST /api-call/send
pub async fn send(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<ApiCallResponse, ApiError> {
    let url = state.config.upstream.resolve(&req.path);
    let result = state
        .rest
        .send_request(&req.method, &url, req.payload.as_ref(), req.use_headers)
        .await?;

    Ok(respond(result))
}
