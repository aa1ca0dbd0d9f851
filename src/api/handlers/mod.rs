// HTTP handlers grouped by resource

pub mod api_calls;
pub mod health;
pub mod students;
pub mod users;
