// Domain layer module exports
// Domain is independent of transport concerns

pub mod api_call;
pub mod repositories;
pub mod student;
pub mod user;
pub mod validation;
