use thiserror::Error;

/// Errors that can occur while reading or writing persisted rows
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Email already in use: {0}")]
    DuplicateEmail(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
