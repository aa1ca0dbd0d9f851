use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Message returned when the upstream answered with a non-2xx status
pub const UPSTREAM_FAILURE_MESSAGE: &str = "API call failed. Please check the logs for details.";

/// Message returned when no response was received at all
pub const TRANSPORT_FAILURE_MESSAGE: &str = "An error occurred while communicating with the API.";

/// HTTP methods supported by the outbound helper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// Raised when a method name is not one of GET, POST, PUT or DELETE
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid HTTP method: {0}")]
pub struct InvalidMethod(pub String);

impl HttpMethod {
    /// Whether the payload is sent as a JSON body
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = InvalidMethod;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(InvalidMethod(s.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized outcome of one outbound call
///
/// # Invariants
/// - `success == true` implies `status` is a 2xx code and `message` is `None`
/// - `success == false` implies `data` is `None`
/// - `status` is `None` only for transport failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCallResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ApiCallResult {
    /// 2xx response; `data` is the parsed body or `null`
    pub fn succeeded(status: u16, data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            status: Some(status),
        }
    }

    /// Non-2xx response with the upstream status preserved
    pub fn upstream_failure(status: u16) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(UPSTREAM_FAILURE_MESSAGE.to_string()),
            status: Some(status),
        }
    }

    /// Timeout, DNS failure, refused connection or unreadable body
    pub fn transport_failure() -> Self {
        Self {
            success: false,
            data: None,
            message: Some(TRANSPORT_FAILURE_MESSAGE.to_string()),
            status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_supported_methods_case_insensitively() {
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("Put".parse::<HttpMethod>().unwrap(), HttpMethod::Put);
        assert_eq!("delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
    }

    #[test]
    fn rejects_unsupported_methods() {
        let err = "PATCH".parse::<HttpMethod>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid HTTP method: PATCH");
        assert!("".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn only_post_and_put_carry_body() {
        assert!(HttpMethod::Post.carries_body());
        assert!(HttpMethod::Put.carries_body());
        assert!(!HttpMethod::Get.carries_body());
        assert!(!HttpMethod::Delete.carries_body());
    }

    #[test]
    fn success_serializes_without_message() {
        let value = serde_json::to_value(ApiCallResult::succeeded(200, json!({"id": 1}))).unwrap();
        assert_eq!(value, json!({"success": true, "data": {"id": 1}, "status": 200}));
    }

    #[test]
    fn transport_failure_has_no_status() {
        let value = serde_json::to_value(ApiCallResult::transport_failure()).unwrap();
        assert_eq!(
            value,
            json!({"success": false, "message": TRANSPORT_FAILURE_MESSAGE})
        );
    }

    #[test]
    fn upstream_failure_keeps_status() {
        let result = ApiCallResult::upstream_failure(404);
        assert!(!result.success);
        assert_eq!(result.status, Some(404));
        assert_eq!(result.message.as_deref(), Some(UPSTREAM_FAILURE_MESSAGE));
    }
}
