use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::repositories::{RepositoryError, RepositoryResult, StudentRepository};
use crate::domain::student::{Student, StudentInput};
use crate::domain::user::value_objects::Email;

/// PostgreSQL implementation of StudentRepository
///
/// Relies on the `students_email_key` unique constraint for write-time
/// email uniqueness.
pub struct PostgresStudentRepository {
    pool: PgPool,
}

impl PostgresStudentRepository {
    /// Creates a new PostgresStudentRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct StudentRow {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    course: Option<String>,
}

impl TryFrom<StudentRow> for Student {
    type Error = RepositoryError;

    fn try_from(r: StudentRow) -> Result<Self, Self::Error> {
        let email = Email::new(r.email)
            .map_err(|e| RepositoryError::CorruptRow(format!("student {}: {}", r.id, e)))?;

        Ok(Student {
            id: r.id,
            name: r.name,
            email,
            phone: r.phone,
            address: r.address,
            course: r.course,
        })
    }
}

fn into_students(rows: Vec<StudentRow>) -> RepositoryResult<Vec<Student>> {
    rows.into_iter().map(Student::try_from).collect()
}

/// Maps a unique violation to `DuplicateEmail`
fn map_write_error(error: sqlx::Error, email: &Email) -> RepositoryError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::DuplicateEmail(email.to_string())
        }
        _ => RepositoryError::Database(error),
    }
}

/// Escapes LIKE wildcards so the keyword matches literally
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl StudentRepository for PostgresStudentRepository {
    async fn list(&self) -> RepositoryResult<Vec<Student>> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, name, email, phone, address, course
            FROM students
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        into_students(rows)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Student>> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, name, email, phone, address, course
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Student::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<Student>> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, name, email, phone, address, course
            FROM students
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Student::try_from).transpose()
    }

    async fn search_by_name(&self, keyword: &str) -> RepositoryResult<Vec<Student>> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, name, email, phone, address, course
            FROM students
            WHERE name ILIKE $1
            ORDER BY id
            "#,
        )
        .bind(like_pattern(keyword))
        .fetch_all(&self.pool)
        .await?;

        into_students(rows)
    }

    async fn create(&self, input: StudentInput) -> RepositoryResult<Student> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            INSERT INTO students (name, email, phone, address, course)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, phone, address, course
            "#,
        )
        .bind(&input.name)
        .bind(input.email.as_str())
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.course)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &input.email))?;

        Student::try_from(row)
    }

    async fn update(&self, id: i64, input: StudentInput) -> RepositoryResult<Student> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            UPDATE students
            SET name = $2, email = $3, phone = $4, address = $5, course = $6
            WHERE id = $1
            RETURNING id, name, email, phone, address, course
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.email.as_str())
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.course)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &input.email))?
        .ok_or_else(|| RepositoryError::NotFound(format!("student {}", id)))?;

        Student::try_from(row)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM students WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("student {}", id)));
        }

        Ok(())
    }
}
