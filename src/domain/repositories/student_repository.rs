use async_trait::async_trait;

use super::errors::RepositoryResult;
use crate::domain::student::{Student, StudentInput};
use crate::domain::user::value_objects::Email;

/// Repository trait for the students table
///
/// Implementations must reject a second row with the same email by returning
/// [`RepositoryError::DuplicateEmail`](super::RepositoryError::DuplicateEmail).
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// All students ordered by id
    async fn list(&self) -> RepositoryResult<Vec<Student>>;

    /// Find a student by id
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Student>>;

    /// Find a student by email address
    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<Student>>;

    /// Case-insensitive substring match on name, ordered by id
    async fn search_by_name(&self, keyword: &str) -> RepositoryResult<Vec<Student>>;

    /// Insert a new student and return the stored row
    async fn create(&self, input: StudentInput) -> RepositoryResult<Student>;

    /// Replace all attributes of an existing student
    async fn update(&self, id: i64, input: StudentInput) -> RepositoryResult<Student>;

    /// Delete a student by id
    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}
