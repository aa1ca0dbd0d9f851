use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use super::errors::RepositoryResult;
use crate::domain::user::value_objects::Email;

/// User data for persistence
///
/// Simple struct for the form submission demo
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub skills: Vec<String>,
    pub gender: String,
    pub age: i32,
    pub role: String,
}

/// Repository trait for the users table
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: User) -> RepositoryResult<Uuid>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;

    /// All users ordered by name
    async fn list(&self) -> RepositoryResult<Vec<User>>;
}
