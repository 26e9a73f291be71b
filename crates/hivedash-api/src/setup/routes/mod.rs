//! Route configuration and setup.
//!
//! Health probes are public; everything under `/api/admin` requires the admin bearer token.

mod health;

use crate::api_doc::ApiDoc;
use crate::auth::middleware::{admin_auth_middleware, AdminAuthState};
use crate::constants::{ADMIN_PREFIX, OPENAPI_PATH};
use crate::handlers::{analytics, uploads};
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use hivedash_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AdminAuthState {
        admin_api_key: config.admin_api_key().to_string(),
    });

    let protected = admin_routes().layer(axum::middleware::from_fn_with_state(
        auth_state,
        admin_auth_middleware,
    ));

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = health::routes()
        .nest(ADMIN_PREFIX, protected)
        .merge(RapiDoc::with_openapi(OPENAPI_PATH, ApiDoc::openapi()).path("/docs"))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analytics", get(analytics::get_dashboard_analytics))
        .route("/analytics/uploads", get(analytics::get_upload_analytics))
        .route("/analytics/users", get(analytics::get_user_analytics))
        .route("/stats", get(analytics::get_upload_stats))
        .route("/uploads/recent", get(uploads::get_recent_uploads))
        .route("/users/{user_id}/uploads", get(uploads::get_user_uploads))
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
