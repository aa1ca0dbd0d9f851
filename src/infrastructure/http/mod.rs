// Outbound HTTP adapters

pub mod rest_client;

pub use rest_client::{RequestOptions, RestClient, RestError};
