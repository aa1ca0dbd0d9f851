// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory;
pub mod postgres_student_repository;
pub mod postgres_user_repository;

pub use in_memory::{InMemoryStudentRepository, InMemoryUserRepository};
pub use postgres_student_repository::PostgresStudentRepository;
pub use postgres_user_repository::PostgresUserRepository;
