//! Bearer-secret middleware for the cron endpoints.

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

/// Path prefix of routes that require the cron secret.
pub const CRON_PREFIX: &str = "/api/cron/";

/// The shared secret expected from the scheduler.
///
/// With no secret configured every cron request is refused.
#[derive(Default)]
pub struct CronAuth {
    secret: Option<String>,
}

impl CronAuth {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// Checks a presented token in constant time.
    pub fn verify(&self, token: &str) -> bool {
        match &self.secret {
            Some(secret) => secret.as_bytes().ct_eq(token.as_bytes()).into(),
            None => false,
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn extract_bearer(auth_header: Option<&str>) -> Option<&str> {
    auth_header?.strip_prefix("Bearer ")
}

/// Rejects cron requests that do not carry the configured secret.
///
/// Every other path passes through untouched.
pub async fn cron_auth_middleware(
    State(auth): State<Arc<CronAuth>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !request.uri().path().starts_with(CRON_PREFIX) {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    match extract_bearer(auth_header) {
        Some(token) if auth.verify(token) => next.run(request).await,
        _ => {
            tracing::warn!(path = %request.uri().path(), "Rejected cron request");
            unauthorized_response("Unauthorized")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": message,
            "code": 401
        })),
    )
        .into_response()
}
