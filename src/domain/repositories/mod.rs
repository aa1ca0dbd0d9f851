// Repository interfaces (ports)
// Implemented by adapters in the infrastructure layer

pub mod errors;
pub mod student_repository;
pub mod user_repository;

pub use errors::{RepositoryError, RepositoryResult};
pub use student_repository::StudentRepository;
pub use user_repository::UserRepository;
