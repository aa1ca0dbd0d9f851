// Infrastructure layer module
// Contains database adapters and the outbound HTTP client

pub mod http;
pub mod repositories;
