//! Campus API Library
//!
//! Student records CRUD, request gating middleware, a user form with
//! declarative validation, and a normalizing outbound REST helper.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
