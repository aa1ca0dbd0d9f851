use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::repositories::{StudentRepository, UserRepository};
use crate::domain::student::StudentService;
use crate::infrastructure::http::RestClient;

/// Shared state handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub students: StudentService,
    pub users: Arc<dyn UserRepository>,
    pub rest: RestClient,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        students: Arc<dyn StudentRepository>,
        users: Arc<dyn UserRepository>,
        rest: RestClient,
        config: AppConfig,
    ) -> Self {
        Self {
            students: StudentService::new(students),
            users,
            rest,
            config: Arc::new(config),
        }
    }
}
