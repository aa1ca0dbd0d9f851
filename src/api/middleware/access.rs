use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;

use crate::api::state::AppState;
use crate::config::AccessPolicy;

pub const AGE_DENIED: &str = "Access denied. Age restriction applies.";
pub const COUNTRY_DENIED: &str = "Access denied. Country restriction applies.";

/// Reason an access gate short-circuited the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    Age,
    Country,
}

impl Denial {
    fn message(&self) -> &'static str {
        match self {
            Denial::Age => AGE_DENIED,
            Denial::Country => COUNTRY_DENIED,
        }
    }
}

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "error",
            "message": self.message(),
        }));

        (StatusCode::FORBIDDEN, body).into_response()
    }
}

/// Missing or non-numeric ages are denied
pub fn check_age(age: Option<&str>, policy: &AccessPolicy) -> Result<(), Denial> {
    match age.and_then(|a| a.trim().parse::<f64>().ok()) {
        Some(age) if age >= policy.min_age => Ok(()),
        _ => Err(Denial::Age),
    }
}

/// Exact, case-sensitive match against the allowed country
pub fn check_country(country: Option<&str>, policy: &AccessPolicy) -> Result<(), Denial> {
    match country {
        Some(country) if country == policy.allowed_country => Ok(()),
        _ => Err(Denial::Country),
    }
}

/// Rejects requests whose `age` query parameter is below the minimum
pub async fn age_check(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    if let Err(denial) = check_age(params.get("age").map(String::as_str), &state.config.access) {
        tracing::info!(path = %request.uri().path(), "Age check rejected request");
        return denial.into_response();
    }

    next.run(request).await
}

/// Rejects requests whose `country` query parameter is not the allowed one
pub async fn country_check(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    if let Err(denial) = check_country(params.get("country").map(String::as_str), &state.config.access) {
        tracing::info!(path = %request.uri().path(), "Country check rejected request");
        return denial.into_response();
    }

    next.run(request).await
}

/// Page behind both gates
///
/// GET /restricted
pub async fn restricted() -> &'static str {
    "Welcome to the restricted page."
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AccessPolicy {
        AccessPolicy::default()
    }

    #[test]
    fn adult_passes_age_check() {
        assert_eq!(check_age(Some("18"), &policy()), Ok(()));
        assert_eq!(check_age(Some("42.5"), &policy()), Ok(()));
    }

    #[test]
    fn minor_missing_or_garbage_age_is_denied() {
        assert_eq!(check_age(Some("17"), &policy()), Err(Denial::Age));
        assert_eq!(check_age(None, &policy()), Err(Denial::Age));
        assert_eq!(check_age(Some("eighteen"), &policy()), Err(Denial::Age));
    }

    #[test]
    fn country_must_match_exactly() {
        assert_eq!(check_country(Some("india"), &policy()), Ok(()));
        assert_eq!(check_country(Some("India"), &policy()), Err(Denial::Country));
        assert_eq!(check_country(None, &policy()), Err(Denial::Country));
    }

    #[test]
    fn custom_policy_is_respected() {
        let policy = AccessPolicy {
            min_age: 21.0,
            allowed_country: "nepal".to_string(),
        };
        assert_eq!(check_age(Some("20"), &policy), Err(Denial::Age));
        assert_eq!(check_country(Some("nepal"), &policy), Ok(()));
    }
}
