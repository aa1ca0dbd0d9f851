use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::student::Student;

/// Query string for the search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
}

/// Student as returned by the API
#[derive(Debug, Serialize)]
pub struct StudentResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub course: Option<String>,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name,
            email: student.email.into(),
            phone: student.phone,
            address: student.address,
            course: student.course,
        }
    }
}

/// Search results echo the keyword that produced them
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub keyword: Option<String>,
    pub students: Vec<StudentResponse>,
}

/// Envelope for write operations
#[derive(Debug, Serialize)]
pub struct StudentMessage {
    pub message: &'static str,
    pub student: StudentResponse,
}

/// List all students
///
/// GET /students
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    let students = state.students.list().await?;
    Ok(Json(students.into_iter().map(StudentResponse::from).collect()))
}

/// Search students by name
///
/// GET /students/search?keyword=
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let students = state.students.search(query.keyword.as_deref()).await?;

    Ok(Json(SearchResponse {
        keyword: query.keyword,
        students: students.into_iter().map(StudentResponse::from).collect(),
    }))
}

/// Create a student
///
/// POST /students
pub async fn store(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<StudentMessage>), ApiError> {
    let student = state.students.create(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(StudentMessage {
            message: "Student added successfully.",
            student: student.into(),
        }),
    ))
}

/// Get a student by ID
///
/// GET /students/:id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = state.students.get(id).await?;
    Ok(Json(student.into()))
}

/// Update a student
///
/// PUT /students/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Result<Json<StudentMessage>, ApiError> {
    let student = state.students.update(id, &payload).await?;

    Ok(Json(StudentMessage {
        message: "Student updated successfully.",
        student: student.into(),
    }))
}

/// Delete a student
///
/// DELETE /students/:id
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.students.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
