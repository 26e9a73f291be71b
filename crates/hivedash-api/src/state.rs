//! Application state shared by every handler.

use hivedash_core::Config;
use hivedash_services::AnalyticsService;

/// Request-level analytics settings resolved from configuration.
#[derive(Clone, Debug)]
pub struct AnalyticsSettings {
    pub default_trend_days: u32,
    pub max_trend_days: u32,
    pub recent_uploads_limit: u32,
}

impl AnalyticsSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_trend_days: config.default_trend_days(),
            max_trend_days: config.max_trend_days(),
            recent_uploads_limit: config.recent_uploads_limit(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub analytics: AnalyticsService,
    pub settings: AnalyticsSettings,
}
