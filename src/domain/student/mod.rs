// Student domain module
// Contains the student entity, its rule set and the CRUD service

#![allow(clippy::module_inception)]

pub mod service;
pub mod student;

pub use service::{StudentError, StudentResult, StudentService};
pub use student::{Student, StudentInput};
