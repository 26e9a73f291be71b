//! Configuration module
//!
//! This module provides configuration structures for the API server, including
//! document store, identity provider, authentication and analytics settings.

use std::env;

// Common constants
const SERVER_PORT: u16 = 5000;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const IDENTITY_PAGE_SIZE: u32 = 200;
const IDENTITY_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TREND_DAYS: u32 = 7;
const MAX_TREND_DAYS: u32 = 90;
const RECENT_UPLOADS_LIMIT: u32 = 10;
const ACTIVE_USER_WINDOW_DAYS: u32 = 30;
const MIN_ADMIN_API_KEY_LEN: usize = 32;

/// Base configuration shared by every binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

/// Admin dashboard configuration
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub base: BaseConfig,
    // Document store
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub uploads_collection: String,
    pub db_timeout_seconds: u64,
    // Identity provider
    pub clerk_secret_key: Option<String>,
    pub clerk_api_url: String,
    pub identity_page_size: u32,
    pub identity_timeout_secs: u64,
    // Admin authentication
    pub admin_api_key: String,
    // Analytics
    pub default_trend_days: u32,
    pub max_trend_days: u32,
    pub recent_uploads_limit: u32,
    pub active_user_window_days: u32,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<DashboardConfig>);

impl Config {
    fn as_dashboard(&self) -> &DashboardConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.as_dashboard().base.environment)
    }

    /// Read settings from the environment. Call [`Config::validate`] once logging is up.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = DashboardConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_dashboard().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_dashboard().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_dashboard().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_dashboard().base.environment
    }

    pub fn mongodb_uri(&self) -> &str {
        &self.as_dashboard().mongodb_uri
    }

    pub fn mongodb_database(&self) -> &str {
        &self.as_dashboard().mongodb_database
    }

    pub fn uploads_collection(&self) -> &str {
        &self.as_dashboard().uploads_collection
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_dashboard().db_timeout_seconds
    }

    pub fn clerk_secret_key(&self) -> Option<&str> {
        self.as_dashboard().clerk_secret_key.as_deref()
    }

    pub fn clerk_api_url(&self) -> &str {
        &self.as_dashboard().clerk_api_url
    }

    pub fn identity_page_size(&self) -> u32 {
        self.as_dashboard().identity_page_size
    }

    pub fn identity_timeout_secs(&self) -> u64 {
        self.as_dashboard().identity_timeout_secs
    }

    pub fn admin_api_key(&self) -> &str {
        &self.as_dashboard().admin_api_key
    }

    pub fn default_trend_days(&self) -> u32 {
        self.as_dashboard().default_trend_days
    }

    pub fn max_trend_days(&self) -> u32 {
        self.as_dashboard().max_trend_days
    }

    pub fn recent_uploads_limit(&self) -> u32 {
        self.as_dashboard().recent_uploads_limit
    }

    pub fn active_user_window_days(&self) -> u32 {
        self.as_dashboard().active_user_window_days
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
        };

        let config = DashboardConfig {
            base,
            mongodb_uri: env::var("MONGODB_URI")
                .map_err(|_| anyhow::anyhow!("MONGODB_URI must be set"))?,
            mongodb_database: env::var("MONGODB_DATABASE")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "hivedash".to_string()),
            uploads_collection: env::var("UPLOADS_COLLECTION")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "uploads".to_string()),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            clerk_secret_key: env::var("CLERK_SECRET_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            clerk_api_url: env::var("CLERK_API_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "https://api.clerk.com/v1".to_string()),
            identity_page_size: env::var("IDENTITY_PAGE_SIZE")
                .unwrap_or_else(|_| IDENTITY_PAGE_SIZE.to_string())
                .parse()
                .unwrap_or(IDENTITY_PAGE_SIZE),
            identity_timeout_secs: env::var("IDENTITY_TIMEOUT_SECS")
                .unwrap_or_else(|_| IDENTITY_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(IDENTITY_TIMEOUT_SECS),
            admin_api_key: env::var("ADMIN_API_KEY")
                .map_err(|_| anyhow::anyhow!("ADMIN_API_KEY must be set for authentication"))?,
            default_trend_days: env::var("ANALYTICS_DEFAULT_TREND_DAYS")
                .unwrap_or_else(|_| DEFAULT_TREND_DAYS.to_string())
                .parse()
                .unwrap_or(DEFAULT_TREND_DAYS),
            max_trend_days: env::var("ANALYTICS_MAX_TREND_DAYS")
                .unwrap_or_else(|_| MAX_TREND_DAYS.to_string())
                .parse()
                .unwrap_or(MAX_TREND_DAYS),
            recent_uploads_limit: env::var("RECENT_UPLOADS_LIMIT")
                .unwrap_or_else(|_| RECENT_UPLOADS_LIMIT.to_string())
                .parse()
                .unwrap_or(RECENT_UPLOADS_LIMIT),
            active_user_window_days: env::var("ACTIVE_USER_WINDOW_DAYS")
                .unwrap_or_else(|_| ACTIVE_USER_WINDOW_DAYS.to_string())
                .parse()
                .unwrap_or(ACTIVE_USER_WINDOW_DAYS),
        };

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.admin_api_key.len() < MIN_ADMIN_API_KEY_LEN {
            return Err(anyhow::anyhow!(
                "ADMIN_API_KEY must be at least {} characters long",
                MIN_ADMIN_API_KEY_LEN
            ));
        }

        if !self.mongodb_uri.starts_with("mongodb://")
            && !self.mongodb_uri.starts_with("mongodb+srv://")
        {
            return Err(anyhow::anyhow!(
                "MONGODB_URI must be a valid MongoDB connection string"
            ));
        }

        if self.identity_page_size == 0 {
            return Err(anyhow::anyhow!("IDENTITY_PAGE_SIZE must be greater than 0"));
        }

        if self.default_trend_days == 0 || self.max_trend_days == 0 {
            return Err(anyhow::anyhow!(
                "ANALYTICS_DEFAULT_TREND_DAYS and ANALYTICS_MAX_TREND_DAYS must be greater than 0"
            ));
        }

        if self.default_trend_days > self.max_trend_days {
            return Err(anyhow::anyhow!(
                "ANALYTICS_DEFAULT_TREND_DAYS ({}) exceeds ANALYTICS_MAX_TREND_DAYS ({})",
                self.default_trend_days,
                self.max_trend_days
            ));
        }

        if self.clerk_secret_key.is_none() {
            tracing::warn!("CLERK_SECRET_KEY is not set; user analytics will be unavailable");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> DashboardConfig {
        DashboardConfig {
            base: BaseConfig {
                server_port: 5000,
                cors_origins: vec!["http://localhost:5173".to_string()],
                environment: "development".to_string(),
            },
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_database: "hivedash".to_string(),
            uploads_collection: "uploads".to_string(),
            db_timeout_seconds: 30,
            clerk_secret_key: Some("sk_test_123".to_string()),
            clerk_api_url: "https://api.clerk.com/v1".to_string(),
            identity_page_size: 200,
            identity_timeout_secs: 30,
            admin_api_key: "a".repeat(32),
            default_trend_days: 7,
            max_trend_days: 90,
            recent_uploads_limit: 10,
            active_user_window_days: 30,
        }
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_admin_key() {
        let mut config = sample_config();
        config.admin_api_key = "short".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ADMIN_API_KEY"));
    }

    #[test]
    fn test_validate_rejects_non_mongodb_uri() {
        let mut config = sample_config();
        config.mongodb_uri = "postgresql://localhost/db".to_string();
        assert!(config.validate().is_err());

        config.mongodb_uri = "mongodb+srv://cluster.example.net".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_trend_days_bounds() {
        let mut config = sample_config();
        config.default_trend_days = 120;
        assert!(config.validate().is_err());

        config.default_trend_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_clerk_key_is_not_fatal_at_startup() {
        let mut config = sample_config();
        config.clerk_secret_key = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_env_does_not_validate() {
        temp_env::with_vars(
            [
                ("ENVIRONMENT", None),
                ("APP_ENV", None),
                ("CORS_ORIGINS", None),
                ("PORT", None),
                ("MONGODB_URI", Some("mongodb://localhost:27017")),
                ("ADMIN_API_KEY", Some("short")),
                ("CLERK_SECRET_KEY", None),
            ],
            || {
                let config = DashboardConfig::from_env().unwrap();
                assert_eq!(config.admin_api_key, "short");
                assert!(config.clerk_secret_key.is_none());
                assert!(config.validate().is_err());
            },
        );
    }

    #[test]
    fn test_is_production() {
        let mut config = sample_config();
        config.base.environment = "PROD".to_string();
        assert!(Config(Box::new(config)).is_production());
    }
}
