use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use campus_api::api::{build_router, AppState};
use campus_api::config::{AppConfig, StoreKind};
use campus_api::domain::repositories::{StudentRepository, UserRepository};
use campus_api::infrastructure::http::RestClient;
use campus_api::infrastructure::repositories::{
    InMemoryStudentRepository, InMemoryUserRepository, PostgresStudentRepository,
    PostgresUserRepository,
};
use campus_api::telemetry;

type Repositories = (Arc<dyn StudentRepository>, Arc<dyn UserRepository>);

async fn connect_repositories(config: &AppConfig) -> Result<Repositories, Box<dyn std::error::Error>> {
    match config.database.store {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store, data is lost on shutdown");
            Ok((
                Arc::new(InMemoryStudentRepository::new()),
                Arc::new(InMemoryUserRepository::new()),
            ))
        }
        StoreKind::Postgres => {
            // Connect to database
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Database connected and migrated");

            Ok((
                Arc::new(PostgresStudentRepository::new(pool.clone())),
                Arc::new(PostgresUserRepository::new(pool)),
            ))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    telemetry::init_tracing();

    let config = AppConfig::from_env()?;
    let (students, users) = connect_repositories(&config).await?;
    let rest = RestClient::new(&config.upstream.api_secret_key)?;

    let addr = config.bind_addr;
    let app = build_router(AppState::new(students, users, rest, config));

    // Start server
    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
