use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use hivedash_core::AppError;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::HttpAppError;
use crate::middleware::request_id::RequestId;

/// Shared secret every admin request must present as a bearer token.
#[derive(Clone)]
pub struct AdminAuthState {
    pub admin_api_key: String,
}

impl std::fmt::Debug for AdminAuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuthState").finish_non_exhaustive()
    }
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

pub async fn admin_auth_middleware(
    State(auth_state): State<Arc<AdminAuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    let Some(token) = bearer_token(&request) else {
        tracing::warn!(path = %path, request_id = %request_id, "Admin request without bearer token");
        return HttpAppError(AppError::Unauthorized(
            "Missing or invalid authorization header".to_string(),
        ))
        .into_response();
    };

    if !secure_compare(token, &auth_state.admin_api_key) {
        tracing::warn!(path = %path, request_id = %request_id, "Admin request with invalid API key");
        return HttpAppError(AppError::Unauthorized("Invalid admin API key".to_string()))
            .into_response();
    }

    next.run(request).await
}
