use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::repositories::RepositoryError;
use crate::domain::student::StudentError;
use crate::domain::validation::{unique_message, ValidationErrors};
use crate::infrastructure::http::RestError;

/// Message attached to every validation failure
pub const VALIDATION_MESSAGE: &str = "The given data was invalid.";

/// API error type with HTTP status code and message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Field-level messages for 422 responses
    pub errors: Option<ValidationErrors>,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 403 Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 422 Unprocessable Entity error carrying field messages
    pub fn unprocessable(errors: ValidationErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: VALIDATION_MESSAGE.to_string(),
            errors: Some(errors),
        }
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.errors {
            Some(errors) => json!({
                "error": self.message,
                "errors": errors,
            }),
            None => json!({
                "error": self.message
            }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::unprocessable(errors)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(what) => Self::not_found(format!("Not found: {}", what)),
            RepositoryError::DuplicateEmail(_) => {
                let mut errors = ValidationErrors::new();
                errors.add("email", unique_message("email"));
                Self::unprocessable(errors)
            }
            other => {
                tracing::error!(error = %other, "Repository failure");
                Self::internal_server_error("Database error")
            }
        }
    }
}

impl From<StudentError> for ApiError {
    fn from(error: StudentError) -> Self {
        match error {
            StudentError::Validation(errors) => Self::unprocessable(errors),
            StudentError::NotFound(_) => Self::not_found("Student not found."),
            StudentError::Repository(e) => e.into(),
        }
    }
}

impl From<RestError> for ApiError {
    fn from(error: RestError) -> Self {
        match error {
            RestError::InvalidMethod(e) => Self::bad_request(e.to_string()),
            other => {
                tracing::error!(error = %other, "Outbound client setup failed");
                Self::internal_server_error("An internal server error occurred.")
            }
        }
    }
}
