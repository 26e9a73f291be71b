//! Service wiring

use crate::state::{AnalyticsSettings, AppState};
use anyhow::Result;
use hivedash_core::Config;
use hivedash_db::{create_upload_repository, UploadRepositoryTrait};
use hivedash_services::{AnalyticsService, ClerkDirectory};
use mongodb::Database;
use std::sync::Arc;

pub fn initialize_services(config: &Config, database: Database) -> Result<Arc<AppState>> {
    let uploads: Arc<dyn UploadRepositoryTrait> =
        Arc::from(create_upload_repository(config, database));
    let users = Arc::new(ClerkDirectory::from_config(config)?);

    let analytics = AnalyticsService::new(uploads, users)
        .with_active_window_days(config.active_user_window_days());

    tracing::info!(
        identity_provider = %config.clerk_api_url(),
        identity_configured = config.clerk_secret_key().is_some(),
        "Analytics services initialized"
    );

    Ok(Arc::new(AppState {
        analytics,
        settings: AnalyticsSettings::from_config(config),
    }))
}
