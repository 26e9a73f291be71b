pub mod fixtures;

use axum_test::TestServer;
use hivedash_api::setup::routes::setup_routes;
use hivedash_api::{AnalyticsSettings, AppState};
use hivedash_core::{BaseConfig, Config, DashboardConfig};
use hivedash_db::UploadRepositoryTrait;
use hivedash_services::{AnalyticsService, UserDirectory};
use std::sync::Arc;

pub const ADMIN_KEY: &str = "test-admin-key-0123456789abcdef0123";

pub fn test_config() -> Config {
    Config(Box::new(DashboardConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
        },
        mongodb_uri: "mongodb://localhost:27017".to_string(),
        mongodb_database: "hivedash_test".to_string(),
        uploads_collection: "uploads".to_string(),
        db_timeout_seconds: 5,
        clerk_secret_key: Some("sk_test_123".to_string()),
        clerk_api_url: "http://127.0.0.1:9".to_string(),
        identity_page_size: 200,
        identity_timeout_secs: 5,
        admin_api_key: ADMIN_KEY.to_string(),
        default_trend_days: 7,
        max_trend_days: 90,
        recent_uploads_limit: 10,
        active_user_window_days: 30,
    }))
}

/// Router wired exactly like production, over in-memory doubles.
pub fn setup_test_server(
    uploads: impl UploadRepositoryTrait + 'static,
    users: impl UserDirectory + 'static,
) -> TestServer {
    let config = test_config();
    let state = Arc::new(AppState {
        analytics: AnalyticsService::new(Arc::new(uploads), Arc::new(users))
            .with_active_window_days(config.active_user_window_days()),
        settings: AnalyticsSettings::from_config(&config),
    });
    let app = setup_routes(&config, state).expect("Failed to build router");
    TestServer::new(app.into_make_service()).expect("Failed to create test server")
}

pub fn bearer() -> String {
    format!("Bearer {}", ADMIN_KEY)
}
