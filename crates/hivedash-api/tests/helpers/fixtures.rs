//! In-memory stand-ins for the upload store and the identity provider.

use chrono::{DateTime, Duration, Utc};
use hivedash_core::analytics::CalendarWindow;
use hivedash_core::models::{EmailAddress, ExternalUserRecord, UploadFacets, UploadRecord};
use hivedash_core::AppError;
use hivedash_db::{UploadFilter, UploadRepositoryTrait};
use hivedash_services::{UserDirectory, UserFilter};
use std::collections::HashMap;

/// Upload store backed by a vector. `down` makes every call fail like an unreachable store.
#[derive(Default)]
pub struct InMemoryUploads {
    pub records: Vec<UploadRecord>,
    pub down: bool,
}

impl InMemoryUploads {
    pub fn with_records(records: Vec<UploadRecord>) -> Self {
        Self {
            records,
            down: false,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            records: Vec::new(),
            down: true,
        }
    }

    fn check(&self) -> Result<(), AppError> {
        if self.down {
            return Err(AppError::Database("server selection timeout".to_string()));
        }
        Ok(())
    }

    fn newest_first(&self) -> Vec<UploadRecord> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }
}

#[async_trait::async_trait]
impl UploadRepositoryTrait for InMemoryUploads {
    async fn aggregate_facets(&self, window: &CalendarWindow) -> Result<UploadFacets, AppError> {
        self.check()?;
        let mut facets = UploadFacets::default();
        for record in &self.records {
            facets.total += 1;
            if let Some(sentiment) = record.sentiment.as_deref().filter(|s| !s.is_empty()) {
                *facets.sentiments.entry(sentiment.to_string()).or_default() += 1;
            }
            if let Some(filetype) = &record.filetype {
                *facets.content_types.entry(filetype.clone()).or_default() += 1;
            }
            if record.has_voice_note() {
                facets.voice_notes += 1;
            }
            if record.created_at >= window.start_of_this_month {
                facets.this_month += 1;
            } else if record.created_at >= window.start_of_last_month {
                facets.last_month += 1;
            }
            if record.created_at >= window.trend_start_utc() {
                *facets.daily.entry(record.created_at.date_naive()).or_default() += 1;
            }
        }
        Ok(facets)
    }

    async fn count_uploads(&self, filter: UploadFilter) -> Result<i64, AppError> {
        self.check()?;
        let count = self
            .records
            .iter()
            .filter(|record| match &filter {
                UploadFilter::All => true,
                UploadFilter::WithVoiceNote => record.has_voice_note(),
                UploadFilter::CreatedSince(since) => {
                    record.created_at.timestamp_millis() >= since.timestamp_millis()
                }
            })
            .count();
        Ok(count as i64)
    }

    async fn recent_uploads(&self, limit: i64) -> Result<Vec<UploadRecord>, AppError> {
        self.check()?;
        Ok(self.newest_first().into_iter().take(limit as usize).collect())
    }

    async fn uploads_by_user(&self, user_id: &str) -> Result<Vec<UploadRecord>, AppError> {
        self.check()?;
        Ok(self
            .newest_first()
            .into_iter()
            .filter(|record| record.user_id == user_id)
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }
}

/// Identity provider answering from a fixed user list.
#[derive(Default)]
pub struct StaticDirectory {
    pub users: Vec<ExternalUserRecord>,
    /// Simulates a deployment without `CLERK_SECRET_KEY`.
    pub unconfigured: bool,
    /// Lookups by id fail while listing still works.
    pub lookups_fail: bool,
}

impl StaticDirectory {
    pub fn with_users(users: Vec<ExternalUserRecord>) -> Self {
        Self {
            users,
            ..Default::default()
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            unconfigured: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), AppError> {
        if self.unconfigured {
            return Err(AppError::Configuration(
                "CLERK_SECRET_KEY is not set".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserDirectory for StaticDirectory {
    async fn list_users(&self, filter: UserFilter) -> Result<Vec<ExternalUserRecord>, AppError> {
        self.check()?;
        Ok(self
            .users
            .iter()
            .filter(|user| match filter {
                UserFilter::CreatedAfter(cutoff) => user.created_at >= cutoff,
                UserFilter::LastSignInAfter(cutoff) => user.last_sign_in_at.unwrap_or(0) >= cutoff,
            })
            .cloned()
            .collect())
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        self.check()?;
        Ok(self.users.len() as i64)
    }

    async fn users_by_id(&self, ids: &[String]) -> Result<Vec<ExternalUserRecord>, AppError> {
        self.check()?;
        if self.lookups_fail {
            return Err(AppError::IdentityProviderStatus {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(self
            .users
            .iter()
            .filter(|user| ids.contains(&user.id))
            .cloned()
            .collect())
    }
}

pub fn upload(id: &str, user_id: &str, created_at: DateTime<Utc>) -> UploadRecord {
    UploadRecord {
        id: id.to_string(),
        user_id: user_id.to_string(),
        filename: format!("{}.jpg", id),
        filetype: Some("image".to_string()),
        title: format!("Upload {}", id),
        description: String::new(),
        created_at,
        audio_filename: None,
        sentiment: Some("positive".to_string()),
    }
}

pub fn voice_upload(id: &str, user_id: &str, created_at: DateTime<Utc>) -> UploadRecord {
    UploadRecord {
        audio_filename: Some(format!("{}.wav", id)),
        sentiment: Some("negative".to_string()),
        ..upload(id, user_id, created_at)
    }
}

pub fn user(id: &str, first_name: &str, created_at: DateTime<Utc>) -> ExternalUserRecord {
    ExternalUserRecord {
        id: id.to_string(),
        created_at: created_at.timestamp_millis(),
        last_sign_in_at: Some(created_at.timestamp_millis()),
        first_name: Some(first_name.to_string()),
        last_name: None,
        username: None,
        email_addresses: vec![EmailAddress {
            email_address: format!("{}@example.com", id),
        }],
    }
}

/// A handful of uploads spread over the last few days, relative to now.
pub fn recent_uploads() -> Vec<UploadRecord> {
    let now = Utc::now();
    vec![
        upload("up_1", "user_ada", now - Duration::minutes(5)),
        voice_upload("up_2", "user_ada", now - Duration::hours(2)),
        upload("up_3", "user_grace", now - Duration::days(2)),
        upload("up_4", "user_ghost", now - Duration::days(3)),
    ]
}

pub fn known_users() -> Vec<ExternalUserRecord> {
    let now = Utc::now();
    vec![
        user("user_ada", "Ada", now - Duration::days(1)),
        user("user_grace", "Grace", now - Duration::days(4)),
    ]
}

/// Count of trend points keyed by date, for assertions on dense series.
pub fn counts_by_date(trend: &serde_json::Value, field: &str) -> HashMap<String, i64> {
    trend
        .as_array()
        .map(|points| {
            points
                .iter()
                .map(|point| {
                    (
                        point["date"].as_str().unwrap_or_default().to_string(),
                        point[field]["total"].as_i64().unwrap_or_default(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}
