use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::auth::password::hash_password;
use crate::domain::repositories::user_repository::User;
use crate::domain::user::{Email, UserSubmission};
use crate::domain::validation::{trim_strings, unique_message, ValidationErrors};

/// Stored user without credentials
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub gender: String,
    pub age: i32,
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.into(),
            skills: user.skills,
            gender: user.gender,
            age: user.age,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserCreated {
    pub data: UserResponse,
}

/// Validate and store a user form submission
///
/// POST /add_user
pub async fn add_user(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<UserCreated>), ApiError> {
    let payload = trim_strings(&payload);
    let mut errors = match UserSubmission::rules().validate(&payload) {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };

    if !errors.has("email") {
        if let Some(email) = payload
            .get("email")
            .and_then(Value::as_str)
            .and_then(|e| Email::new(e).ok())
        {
            if state.users.find_by_email(&email).await?.is_some() {
                errors.add("email", unique_message("email"));
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors.into());
    }

    let submission = UserSubmission::from_validated(&payload).map_err(ApiError::bad_request)?;

    let password = submission.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| ApiError::internal_server_error(format!("Failed to hash password: {}", e)))?;

    let user = User {
        id: Uuid::new_v4(),
        name: submission.name,
        email: submission.email,
        password_hash,
        skills: submission.skills,
        gender: submission.gender,
        age: submission.age,
        role: submission.role,
    };

    state.users.create(user.clone()).await?;
    tracing::info!(user_id = %user.id, "User data received");

    Ok((
        StatusCode::CREATED,
        Json(UserCreated {
            data: UserResponse::from(user),
        }),
    ))
}

/// List every row of the users table
///
/// GET /query
pub async fn query(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Static demo profile
///
/// GET /user
pub async fn demo_user() -> Json<Value> {
    Json(json!({
        "name": "John Doe",
        "age": 30,
        "email": "johndoe@example.com",
        "address": "123 Main Street",
    }))
}
