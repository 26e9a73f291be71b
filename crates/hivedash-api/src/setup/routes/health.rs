//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use hivedash_core::ErrorMetadata;
use std::sync::Arc;
use std::time::Duration;

const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health/live", get(liveness_check))
        .route("/health/ready", get(readiness_check))
}

/// Liveness probe - process is running.
async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "alive" })))
}

/// Readiness probe - the upload store answers a ping. The identity provider is not
/// required because user metrics degrade on their own.
async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status_code, database) =
        match tokio::time::timeout(READINESS_TIMEOUT, state.analytics.ping()).await {
            Ok(Ok(())) => (StatusCode::OK, "ready".to_string()),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Document store readiness check failed");
                (StatusCode::SERVICE_UNAVAILABLE, format!("not_ready: {}", e.client_message()))
            }
            Err(_) => {
                tracing::error!("Document store readiness check timed out");
                (StatusCode::SERVICE_UNAVAILABLE, "timeout".to_string())
            }
        };

    let status = if status_code == StatusCode::OK {
        "ready"
    } else {
        "not_ready"
    };

    (
        status_code,
        Json(serde_json::json!({ "status": status, "database": database })),
    )
}
