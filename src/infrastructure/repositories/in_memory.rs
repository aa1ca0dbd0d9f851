//! In-memory repositories
//!
//! Used by the test suites and by `STORE=memory` for running without a
//! database. They enforce the same email uniqueness as the SQL schema.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::repositories::user_repository::{User, UserRepository};
use crate::domain::repositories::{RepositoryError, RepositoryResult, StudentRepository};
use crate::domain::student::{Student, StudentInput};
use crate::domain::user::value_objects::Email;

#[derive(Default)]
struct StudentTable {
    last_id: i64,
    rows: BTreeMap<i64, Student>,
}

impl StudentTable {
    fn email_taken(&self, email: &Email, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|s| &s.email == email && Some(s.id) != except)
    }
}

/// Student repository backed by a `BTreeMap`, ids start at 1
#[derive(Default)]
pub struct InMemoryStudentRepository {
    table: RwLock<StudentTable>,
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn list(&self) -> RepositoryResult<Vec<Student>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Student>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<Student>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|s| &s.email == email).cloned())
    }

    async fn search_by_name(&self, keyword: &str) -> RepositoryResult<Vec<Student>> {
        let needle = keyword.to_lowercase();
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn create(&self, input: StudentInput) -> RepositoryResult<Student> {
        let mut table = self.table.write().await;
        if table.email_taken(&input.email, None) {
            return Err(RepositoryError::DuplicateEmail(input.email.to_string()));
        }

        table.last_id += 1;
        let student = Student {
            id: table.last_id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            course: input.course,
        };
        table.rows.insert(student.id, student.clone());

        Ok(student)
    }

    async fn update(&self, id: i64, input: StudentInput) -> RepositoryResult<Student> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Err(RepositoryError::NotFound(format!("student {}", id)));
        }
        if table.email_taken(&input.email, Some(id)) {
            return Err(RepositoryError::DuplicateEmail(input.email.to_string()));
        }

        let student = Student {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            course: input.course,
        };
        table.rows.insert(id, student.clone());

        Ok(student)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        match self.table.write().await.rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound(format!("student {}", id))),
        }
    }
}

/// User repository backed by a `BTreeMap` keyed by id
#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: RwLock<BTreeMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> RepositoryResult<Uuid> {
        let mut rows = self.rows.write().await;
        if rows.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::DuplicateEmail(user.email.to_string()));
        }

        let id = user.id;
        rows.insert(id, user);
        Ok(id)
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        let rows = self.rows.read().await;
        Ok(rows.values().find(|u| &u.email == email).cloned())
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        let mut users: Vec<User> = self.rows.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, email: &str) -> StudentInput {
        StudentInput {
            name: name.to_string(),
            email: Email::new(email).unwrap(),
            phone: None,
            address: None,
            course: None,
        }
    }

    #[tokio::test]
    async fn ids_increase_and_survive_deletes() {
        let repo = InMemoryStudentRepository::new();
        let first = repo.create(input("Ana", "ana@example.com")).await.unwrap();
        repo.delete(first.id).await.unwrap();
        let second = repo.create(input("Ben", "ben@example.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = InMemoryStudentRepository::new();
        repo.create(input("Ana", "ana@example.com")).await.unwrap();

        let result = repo.create(input("Another Ana", "ana@example.com")).await;
        assert!(matches!(result, Err(RepositoryError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn update_keeps_own_email() {
        let repo = InMemoryStudentRepository::new();
        let ana = repo.create(input("Ana", "ana@example.com")).await.unwrap();

        let updated = repo
            .update(ana.id, input("Ana Maria", "ana@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Ana Maria");
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let repo = InMemoryStudentRepository::new();
        repo.create(input("Ana Lopez", "ana@example.com")).await.unwrap();
        repo.create(input("Ben Ortiz", "ben@example.com")).await.unwrap();

        let found = repo.search_by_name("LOP").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ana Lopez");

        assert_eq!(repo.search_by_name("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let repo = InMemoryStudentRepository::new();
        assert!(matches!(repo.delete(9).await, Err(RepositoryError::NotFound(_))));
    }
}
