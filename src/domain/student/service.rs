use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use super::{Student, StudentInput};
use crate::domain::repositories::{RepositoryError, StudentRepository};
use crate::domain::user::value_objects::Email;
use crate::domain::validation::{trim_strings, unique_message, ValidationErrors};

/// Errors surfaced by student operations
#[derive(Debug, Error)]
pub enum StudentError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Student not found: {0}")]
    NotFound(i64),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for StudentError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::DuplicateEmail(_) => {
                let mut errors = ValidationErrors::new();
                errors.add("email", unique_message("email"));
                StudentError::Validation(errors)
            }
            other => StudentError::Repository(other),
        }
    }
}

pub type StudentResult<T> = Result<T, StudentError>;

/// Student use cases over an injected repository
#[derive(Clone)]
pub struct StudentService {
    repository: Arc<dyn StudentRepository>,
}

impl StudentService {
    pub fn new(repository: Arc<dyn StudentRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> StudentResult<Vec<Student>> {
        Ok(self.repository.list().await?)
    }

    /// Missing or blank keywords match every student
    pub async fn search(&self, keyword: Option<&str>) -> StudentResult<Vec<Student>> {
        let keyword = keyword.map(str::trim).unwrap_or_default();
        Ok(self.repository.search_by_name(keyword).await?)
    }

    pub async fn get(&self, id: i64) -> StudentResult<Student> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(StudentError::NotFound(id))
    }

    pub async fn create(&self, payload: &Value) -> StudentResult<Student> {
        let input = self.validate(payload, None).await?;
        let student = self.repository.create(input).await?;

        tracing::info!(student_id = student.id, "Student added");
        Ok(student)
    }

    pub async fn update(&self, id: i64, payload: &Value) -> StudentResult<Student> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(StudentError::NotFound(id));
        }

        let input = self.validate(payload, Some(id)).await?;
        let student = self.repository.update(id, input).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => StudentError::NotFound(id),
            other => other.into(),
        })?;

        tracing::info!(student_id = id, "Student updated");
        Ok(student)
    }

    pub async fn delete(&self, id: i64) -> StudentResult<()> {
        self.repository.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => StudentError::NotFound(id),
            other => other.into(),
        })?;

        tracing::info!(student_id = id, "Student deleted");
        Ok(())
    }

    /// Trims the payload, runs the rule set, then the uniqueness check on email
    ///
    /// `ignore_id` excludes the student being updated from the uniqueness check.
    async fn validate(&self, payload: &Value, ignore_id: Option<i64>) -> StudentResult<StudentInput> {
        let payload = &trim_strings(payload);
        let mut errors = match StudentInput::rules().validate(payload) {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if !errors.has("email") {
            if let Some(email) = payload.get("email").and_then(Value::as_str) {
                let taken = match Email::new(email) {
                    Ok(email) => self
                        .repository
                        .find_by_email(&email)
                        .await?
                        .is_some_and(|existing| Some(existing.id) != ignore_id),
                    Err(_) => false,
                };
                if taken {
                    errors.add("email", unique_message("email"));
                }
            }
        }

        if !errors.is_empty() {
            return Err(StudentError::Validation(errors));
        }

        StudentInput::from_validated(payload).map_err(|message| {
            let mut errors = ValidationErrors::new();
            errors.add("payload", message);
            StudentError::Validation(errors)
        })
    }
}
