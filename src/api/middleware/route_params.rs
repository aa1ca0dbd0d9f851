use axum::{
    extract::{RawPathParams, Request},
    middleware::Next,
    response::Response,
};

/// Records the matched route's path parameters before the handler runs
pub async fn log_route_params(params: RawPathParams, request: Request, next: Next) -> Response {
    for (name, value) in &params {
        tracing::info!(param = name, value, "Route parameter");
    }

    next.run(request).await
}
