use hivedash_core::models::ExternalUserRecord;
use hivedash_core::{AppError, Config};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use super::{UserDirectory, UserFilter};

/// Newest accounts first, so pages are stable while paging by offset.
const ORDER_BY: &str = "-created_at";

/// Upper bound on pages fetched by one listing.
const MAX_PAGES: u32 = 10_000;

#[derive(Debug, Deserialize)]
struct TotalCount {
    total_count: i64,
}

/// Paginated client for the Clerk backend API.
pub struct ClerkDirectory {
    http_client: Client,
    base_url: String,
    secret_key: Option<String>,
    page_size: u32,
}

impl Debug for ClerkDirectory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ClerkDirectory")
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .field("has_secret_key", &self.secret_key.is_some())
            .finish()
    }
}

impl ClerkDirectory {
    pub fn new(
        base_url: impl Into<String>,
        secret_key: Option<String>,
        page_size: u32,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http_client = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::Internal(format!("Failed to create HTTP client for identity provider: {}", e))
        })?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.filter(|key| !key.trim().is_empty()),
            page_size: page_size.max(1),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.clerk_api_url(),
            config.clerk_secret_key().map(str::to_string),
            config.identity_page_size(),
            Duration::from_secs(config.identity_timeout_secs()),
        )
    }

    fn secret_key(&self) -> Result<&str, AppError> {
        self.secret_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("CLERK_SECRET_KEY is not set".to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        secret_key: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(secret_key)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                AppError::IdentityProvider(format!("Request to {} failed: {}", path, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::IdentityProviderStatus {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(|e| {
            AppError::DataShape(format!("Unexpected response from {}: {}", path, e))
        })
    }
}

#[async_trait::async_trait]
impl UserDirectory for ClerkDirectory {
    #[tracing::instrument(skip(self), fields(page_size = self.page_size))]
    async fn list_users(&self, filter: UserFilter) -> Result<Vec<ExternalUserRecord>, AppError> {
        let secret_key = self.secret_key()?;
        let (filter_param, cutoff) = filter.query_param();

        let mut users = Vec::new();
        let mut seen = HashSet::new();
        let mut offset: u64 = 0;
        let mut pages = 0u32;

        loop {
            let query = [
                ("limit", self.page_size.to_string()),
                ("offset", offset.to_string()),
                ("order_by", ORDER_BY.to_string()),
                (filter_param, cutoff.to_string()),
            ];
            let page: Vec<ExternalUserRecord> = self.get_json(secret_key, "/users", &query).await?;
            pages += 1;

            if page.is_empty() {
                break;
            }

            let oldest_created_at = page.last().map(|user| user.created_at);
            for user in page {
                if seen.insert(user.id.clone()) {
                    users.push(user);
                } else {
                    tracing::debug!(user_id = %user.id, offset, "Skipping user repeated across pages");
                }
            }

            offset += u64::from(self.page_size);

            // Pages are ordered by creation time, so once the oldest record predates the
            // cutoff no later page can match a created-after filter.
            if let (UserFilter::CreatedAfter(cutoff), Some(oldest)) = (filter, oldest_created_at) {
                if oldest < cutoff {
                    break;
                }
            }

            if pages >= MAX_PAGES {
                tracing::warn!(
                    pages,
                    users = users.len(),
                    "Stopped paging identity provider at page limit"
                );
                break;
            }
        }

        tracing::debug!(users = users.len(), pages, "Fetched users from identity provider");
        Ok(users)
    }

    #[tracing::instrument(skip(self))]
    async fn count_users(&self) -> Result<i64, AppError> {
        let secret_key = self.secret_key()?;
        let count: TotalCount = self.get_json(secret_key, "/users/count", &[]).await?;
        Ok(count.total_count)
    }

    #[tracing::instrument(skip(self, ids), fields(ids = ids.len()))]
    async fn users_by_id(&self, ids: &[String]) -> Result<Vec<ExternalUserRecord>, AppError> {
        let secret_key = self.secret_key()?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: Vec<(&str, String)> =
            ids.iter().map(|id| ("user_id", id.clone())).collect();
        query.push(("limit", ids.len().to_string()));

        match self
            .get_json::<Vec<ExternalUserRecord>>(secret_key, "/users", &query)
            .await
        {
            Err(AppError::IdentityProviderStatus { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                Ok(Vec::new())
            }
            other => other,
        }
    }
}
