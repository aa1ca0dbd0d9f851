use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE};
use reqwest::{Client, Method, Proxy, Response};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::domain::api_call::{ApiCallResult, HttpMethod, InvalidMethod};

/// Errors raised before a request is sent
///
/// Failures of the call itself are never errors; they are normalized into
/// an [`ApiCallResult`].
#[derive(Debug, Error)]
pub enum RestError {
    #[error(transparent)]
    InvalidMethod(#[from] InvalidMethod),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Per-call options layered on top of the client
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Attach JSON content headers and the bearer token
    pub use_default_headers: bool,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
    /// Username and optional password
    pub basic_auth: Option<(String, Option<String>)>,
    /// Total request timeout
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn with_default_headers() -> Self {
        Self {
            use_default_headers: true,
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn cookies(mut self, cookies: Vec<(String, String)>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.basic_auth = Some((username.into(), password));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Outbound REST helper with uniform result normalization
///
/// No retries: every failure is terminal for the current call and is logged
/// at error level.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    default_headers: HeaderMap,
}

impl RestClient {
    /// Creates a client whose default headers carry `bearer_token`
    ///
    /// Proxy environment variables are ignored; use [`RestClient::with_proxy`].
    pub fn new(bearer_token: &str) -> Result<Self, RestError> {
        let client = Client::builder().no_proxy().build()?;
        Self::from_client(client, bearer_token)
    }

    /// Wraps an already configured reqwest client
    pub fn from_client(client: Client, bearer_token: &str) -> Result<Self, RestError> {
        Ok(Self {
            client,
            default_headers: default_headers(bearer_token)?,
        })
    }

    /// Sibling client routing every call through `proxy_url`
    pub fn with_proxy(&self, proxy_url: &str) -> Result<Self, RestError> {
        let client = Client::builder().proxy(Proxy::all(proxy_url)?).build()?;

        Ok(Self {
            client,
            default_headers: self.default_headers.clone(),
        })
    }

    /// Sends a request named by its method string
    ///
    /// Unsupported methods fail with [`RestError::InvalidMethod`] before any
    /// network I/O. `payload` is sent as JSON for POST and PUT only.
    pub async fn send_request(
        &self,
        method: &str,
        url: &str,
        payload: Option<&Value>,
        use_headers: bool,
    ) -> Result<ApiCallResult, RestError> {
        let method: HttpMethod = method.parse()?;
        let options = RequestOptions {
            use_default_headers: use_headers,
            ..RequestOptions::default()
        };

        Ok(self.send(method, url, payload, &options).await)
    }

    /// Sends a request and normalizes the outcome
    pub async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<&Value>,
        options: &RequestOptions,
    ) -> ApiCallResult {
        let mut request = self.client.request(to_reqwest(method), url);

        if options.use_default_headers {
            request = request.headers(self.default_headers.clone());
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !options.cookies.is_empty() {
            request = request.header(COOKIE, cookie_header(&options.cookies));
        }
        if let Some((username, password)) = &options.basic_auth {
            request = request.basic_auth(username, password.as_ref());
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }
        if method.carries_body() {
            if let Some(payload) = payload {
                request = request.json(payload);
            }
        }

        tracing::debug!(%method, url, "Sending API request");

        match request.send().await {
            Ok(response) => normalize(url, response).await,
            Err(e) => {
                tracing::error!(url, message = %e, "Exception during API call");
                ApiCallResult::transport_failure()
            }
        }
    }
}

async fn normalize(url: &str, response: Response) -> ApiCallResult {
    let status = response.status();

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(url, message = %e, "Exception during API call");
            return ApiCallResult::transport_failure();
        }
    };

    if status.is_success() {
        let data = serde_json::from_str(&body).unwrap_or(Value::Null);
        return ApiCallResult::succeeded(status.as_u16(), data);
    }

    tracing::error!(url, status = status.as_u16(), response = %body, "API call failed");
    ApiCallResult::upstream_failure(status.as_u16())
}

fn to_reqwest(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn default_headers(bearer_token: &str) -> Result<HeaderMap, RestError> {
    let authorization = HeaderValue::from_str(&format!("Bearer {}", bearer_token))
        .map_err(|e| RestError::InvalidHeader(e.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(AUTHORIZATION, authorization);
    Ok(headers)
}

fn cookie_header(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}
