use axum::{
    handler::Handler,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{api_calls, health, students, users};
use crate::api::middleware::{access, route_params::log_route_params};
use crate::api::state::AppState;

/// Builds the full application router
pub fn build_router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Student routes
        .nest("/students", student_routes())
        // User form and query demo
        .route("/user", get(users::demo_user))
        .route("/add_user", post(users::add_user))
        .route("/query", get(users::query))
        // Outbound API calls
        .nest("/api-call", api_call_routes())
        // Gated page; age runs before country
        .route(
            "/restricted",
            get(access::restricted)
                .route_layer(middleware::from_fn_with_state(state.clone(), access::country_check))
                .route_layer(middleware::from_fn_with_state(state.clone(), access::age_check)),
        )
        .fallback(health::fallback)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}

fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(students::index).post(students::store))
        .route("/search", get(students::search))
        .route(
            "/:id",
            get(students::show.layer(middleware::from_fn(log_route_params)))
                .put(students::update)
                .delete(students::destroy),
        )
}

fn api_call_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api_calls::fetch_user).post(api_calls::create_post))
        .route("/send", post(api_calls::send))
        .route("/with-headers", get(api_calls::fetch_user_with_headers))
        .route("/with-cookies", get(api_calls::fetch_user_with_cookies))
        .route("/with-basic-auth", get(api_calls::fetch_user_with_basic_auth))
        .route("/with-timeout", get(api_calls::fetch_user_with_timeout))
        .route("/with-proxy", get(api_calls::fetch_user_with_proxy))
        .route("/:id", put(api_calls::update_post).delete(api_calls::delete_post))
}
