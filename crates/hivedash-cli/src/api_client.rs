use anyhow::{Context, Result};
use hivedash_core::models::DashboardAnalytics;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the admin API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Create client from environment: HIVEDASH_API_URL (or API_URL), HIVEDASH_API_KEY (or ADMIN_API_KEY).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = std::env::var("HIVEDASH_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| "http://localhost:5000".to_string());

        let api_key = std::env::var("HIVEDASH_API_KEY")
            .or_else(|_| std::env::var("ADMIN_API_KEY"))
            .context("Missing API key. Set HIVEDASH_API_KEY or ADMIN_API_KEY")?;

        Self::new(base_url, api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url).bearer_auth(&self.api_key);

        if !query.is_empty() {
            request = request.query(query);
        }

        tracing::debug!(url = %url, "Sending request");
        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        response
            .json()
            .await
            .context("Failed to parse response as JSON")
    }

    /// Combined dashboard analytics. `days` falls back to the server default when `None`.
    pub async fn get_dashboard(&self, days: Option<u32>) -> Result<DashboardAnalytics> {
        let query: Vec<(&str, String)> = days
            .map(|days| vec![("days", days.to_string())])
            .unwrap_or_default();
        self.get("/api/admin/analytics", &query).await
    }
}
