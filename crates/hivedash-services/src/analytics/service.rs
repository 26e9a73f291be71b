use chrono::{DateTime, Duration, Utc};
use hivedash_core::analytics::{
    build_upload_analytics, build_user_analytics, CalendarWindow, DEFAULT_ACTIVE_WINDOW_DAYS,
};
use hivedash_core::models::{
    DashboardAnalytics, ExternalUserRecord, RecentUpload, UnavailableMetric, UploadAnalytics,
    UploadRecord, UploadStats, UserAnalytics, UNKNOWN_USER_LABEL,
};
use hivedash_core::{AppError, MetricOutcome, OutcomeExt};
use hivedash_db::{UploadFilter, UploadRepositoryTrait};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::identity::{UserDirectory, UserFilter};

pub const UPLOADS_METRIC: &str = "uploads";
pub const USERS_METRIC: &str = "users";
pub const UPLOAD_STATS_METRIC: &str = "upload_stats";

/// Dashboard analytics over the upload store and the identity provider.
///
/// Each metric degrades on its own: a failing source yields
/// [`MetricOutcome::Unavailable`] for the metrics that depend on it.
#[derive(Clone)]
pub struct AnalyticsService {
    uploads: Arc<dyn UploadRepositoryTrait>,
    users: Arc<dyn UserDirectory>,
    active_window_days: u32,
}

impl AnalyticsService {
    pub fn new(uploads: Arc<dyn UploadRepositoryTrait>, users: Arc<dyn UserDirectory>) -> Self {
        Self {
            uploads,
            users,
            active_window_days: DEFAULT_ACTIVE_WINDOW_DAYS,
        }
    }

    pub fn with_active_window_days(mut self, days: u32) -> Self {
        self.active_window_days = days;
        self
    }

    /// Calendar window for a request made at `now`.
    pub fn window(&self, now: DateTime<Utc>, trend_days: u32) -> Result<CalendarWindow, AppError> {
        CalendarWindow::with_active_window(now, trend_days, self.active_window_days)
    }

    pub async fn upload_analytics(&self, window: &CalendarWindow) -> MetricOutcome<UploadAnalytics> {
        self.try_upload_analytics(window)
            .await
            .into_outcome(UPLOADS_METRIC)
    }

    pub async fn user_analytics(&self, window: &CalendarWindow) -> MetricOutcome<UserAnalytics> {
        self.try_user_analytics(window)
            .await
            .into_outcome(USERS_METRIC)
    }

    /// Both analytics sides, with degraded metrics listed in `unavailable`.
    pub async fn dashboard(&self, window: &CalendarWindow) -> DashboardAnalytics {
        let (uploads, users) =
            tokio::join!(self.upload_analytics(window), self.user_analytics(window));

        let mut unavailable = Vec::new();
        if let Some(reason) = uploads.reason() {
            unavailable.push(UnavailableMetric {
                metric: UPLOADS_METRIC.to_string(),
                reason: reason.to_string(),
            });
        }
        if let Some(reason) = users.reason() {
            unavailable.push(UnavailableMetric {
                metric: USERS_METRIC.to_string(),
                reason: reason.to_string(),
            });
        }

        let (upload_stats, recent_upload_trends) = match uploads.into_option() {
            Some(analytics) => (Some(analytics.summary), analytics.trend),
            None => (None, Vec::new()),
        };
        let (user_stats, recent_user_trends) = match users.into_option() {
            Some(analytics) => (Some(analytics.summary), analytics.trend),
            None => (None, Vec::new()),
        };

        DashboardAnalytics {
            upload_stats,
            user_stats,
            recent_upload_trends,
            recent_user_trends,
            unavailable,
        }
    }

    /// Landing-page counters. `now` anchors the trailing 24 hours.
    pub async fn upload_stats(&self, now: DateTime<Utc>) -> MetricOutcome<UploadStats> {
        self.try_upload_stats(now)
            .await
            .into_outcome(UPLOAD_STATS_METRIC)
    }

    /// Newest uploads annotated with the uploader's display name.
    ///
    /// Names are resolved with one batched lookup. When the lookup fails, or a user
    /// is missing from its response, the upload is labelled [`UNKNOWN_USER_LABEL`].
    /// A store failure yields an empty list.
    pub async fn recent_uploads(&self, limit: u32) -> Result<Vec<RecentUpload>, AppError> {
        let records = match self.uploads.recent_uploads(i64::from(limit)).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, limit, "Failed to load recent uploads");
                return Ok(Vec::new());
            }
        };
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<String> = {
            let mut seen = HashSet::new();
            records
                .iter()
                .filter(|record| !record.user_id.is_empty())
                .filter(|record| seen.insert(record.user_id.as_str()))
                .map(|record| record.user_id.clone())
                .collect()
        };

        let names = self.display_names(&user_ids).await;

        Ok(records
            .into_iter()
            .map(|record| {
                let user = names
                    .get(&record.user_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_USER_LABEL.to_string());
                RecentUpload {
                    id: record.id,
                    title: record.title,
                    user,
                    user_id: record.user_id,
                    timestamp: record.created_at,
                    description: record.description,
                    filename: record.filename,
                    audio_filename: record.audio_filename.unwrap_or_default(),
                    sentiment: record.sentiment.unwrap_or_default(),
                }
            })
            .collect())
    }

    pub async fn uploads_by_user(&self, user_id: &str) -> Result<Vec<UploadRecord>, AppError> {
        if user_id.trim().is_empty() {
            return Err(AppError::InvalidInput("user_id must not be empty".to_string()));
        }
        self.uploads.uploads_by_user(user_id).await
    }

    /// Readiness of the upload store.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.uploads.ping().await
    }

    async fn try_upload_analytics(
        &self,
        window: &CalendarWindow,
    ) -> Result<UploadAnalytics, AppError> {
        let facets = self.uploads.aggregate_facets(window).await?;
        Ok(build_upload_analytics(window, &facets))
    }

    async fn try_user_analytics(&self, window: &CalendarWindow) -> Result<UserAnalytics, AppError> {
        let cutoff = window.lookback_cutoff().timestamp_millis();
        let (created, signed_in) = tokio::try_join!(
            self.users.list_users(UserFilter::CreatedAfter(cutoff)),
            self.users.list_users(UserFilter::LastSignInAfter(cutoff)),
        )?;
        let users = merge_users(created, signed_in);

        let total_users = match self.users.count_users().await {
            Ok(total) => total,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    fetched = users.len(),
                    "User count unavailable, falling back to fetched users"
                );
                users.len() as i64
            }
        };

        tracing::debug!(users = users.len(), total_users, "Building user analytics");
        Ok(build_user_analytics(window, &users, total_users))
    }

    async fn try_upload_stats(&self, now: DateTime<Utc>) -> Result<UploadStats, AppError> {
        let since = now - Duration::hours(24);
        let (total, voice_notes, last_24h) = tokio::try_join!(
            self.uploads.count_uploads(UploadFilter::All),
            self.uploads.count_uploads(UploadFilter::WithVoiceNote),
            self.uploads.count_uploads(UploadFilter::CreatedSince(since)),
        )?;
        Ok(UploadStats::new(total, voice_notes, last_24h))
    }

    async fn display_names(&self, user_ids: &[String]) -> HashMap<String, String> {
        if user_ids.is_empty() {
            return HashMap::new();
        }

        match self.users.users_by_id(user_ids).await {
            Ok(users) => users
                .into_iter()
                .filter_map(|user| user.display_name().map(|name| (user.id, name)))
                .collect(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    users = user_ids.len(),
                    "Uploader lookup failed, using placeholder names"
                );
                HashMap::new()
            }
        }
    }
}

fn merge_users(
    created: Vec<ExternalUserRecord>,
    signed_in: Vec<ExternalUserRecord>,
) -> Vec<ExternalUserRecord> {
    let mut seen = HashSet::new();
    created
        .into_iter()
        .chain(signed_in)
        .filter(|user| seen.insert(user.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use hivedash_core::models::UploadFacets;
    use std::sync::Mutex;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn millis(m: u32, d: u32) -> i64 {
        Utc.with_ymd_and_hms(2024, m, d, 8, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn upload(id: &str, user_id: &str) -> UploadRecord {
        UploadRecord {
            id: id.to_string(),
            user_id: user_id.to_string(),
            filename: format!("{}.jpg", id),
            filetype: Some("image".to_string()),
            title: format!("Upload {}", id),
            description: String::new(),
            created_at: now(),
            audio_filename: None,
            sentiment: Some("positive".to_string()),
        }
    }

    fn user(id: &str, first_name: Option<&str>, created_at: i64, last_sign_in_at: Option<i64>) -> ExternalUserRecord {
        ExternalUserRecord {
            id: id.to_string(),
            created_at,
            last_sign_in_at,
            first_name: first_name.map(str::to_string),
            last_name: None,
            username: None,
            email_addresses: Vec::new(),
        }
    }

    #[derive(Default)]
    struct FakeUploads {
        facets: Option<UploadFacets>,
        records: Vec<UploadRecord>,
        records_unreachable: bool,
    }

    #[async_trait::async_trait]
    impl UploadRepositoryTrait for FakeUploads {
        async fn aggregate_facets(&self, _window: &CalendarWindow) -> Result<UploadFacets, AppError> {
            self.facets
                .clone()
                .ok_or_else(|| AppError::Database("connection refused".to_string()))
        }

        async fn count_uploads(&self, filter: UploadFilter) -> Result<i64, AppError> {
            Ok(match filter {
                UploadFilter::All => 10,
                UploadFilter::WithVoiceNote => 3,
                UploadFilter::CreatedSince(_) => 2,
            })
        }

        async fn recent_uploads(&self, limit: i64) -> Result<Vec<UploadRecord>, AppError> {
            if self.records_unreachable {
                return Err(AppError::Database("connection refused".to_string()));
            }
            Ok(self.records.iter().take(limit as usize).cloned().collect())
        }

        async fn uploads_by_user(&self, user_id: &str) -> Result<Vec<UploadRecord>, AppError> {
            Ok(self
                .records
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn ping(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeDirectory {
        created: Vec<ExternalUserRecord>,
        signed_in: Vec<ExternalUserRecord>,
        total: Option<i64>,
        fail_lookups: bool,
        missing_key: bool,
        lookups: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl UserDirectory for FakeDirectory {
        async fn list_users(&self, filter: UserFilter) -> Result<Vec<ExternalUserRecord>, AppError> {
            if self.missing_key {
                return Err(AppError::Configuration("CLERK_SECRET_KEY is not set".to_string()));
            }
            Ok(match filter {
                UserFilter::CreatedAfter(_) => self.created.clone(),
                UserFilter::LastSignInAfter(_) => self.signed_in.clone(),
            })
        }

        async fn count_users(&self) -> Result<i64, AppError> {
            self.total
                .ok_or_else(|| AppError::IdentityProvider("timeout".to_string()))
        }

        async fn users_by_id(&self, ids: &[String]) -> Result<Vec<ExternalUserRecord>, AppError> {
            self.lookups.lock().unwrap().push(ids.to_vec());
            if self.fail_lookups {
                return Err(AppError::IdentityProviderStatus {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(self
                .created
                .iter()
                .filter(|u| ids.contains(&u.id))
                .cloned()
                .collect())
        }
    }

    fn service(uploads: FakeUploads, directory: Arc<FakeDirectory>) -> AnalyticsService {
        AnalyticsService::new(Arc::new(uploads), directory)
    }

    #[tokio::test]
    async fn test_dashboard_with_both_sources_available() {
        let uploads = FakeUploads {
            facets: Some(UploadFacets {
                total: 3,
                this_month: 3,
                daily: HashMap::from([(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), 3)]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let directory = Arc::new(FakeDirectory {
            created: vec![user("a", None, millis(3, 14), Some(millis(3, 15)))],
            total: Some(40),
            ..Default::default()
        });
        let service = service(uploads, directory);
        let window = service.window(now(), 7).unwrap();

        let dashboard = service.dashboard(&window).await;
        assert!(dashboard.unavailable.is_empty());
        assert_eq!(dashboard.upload_stats.as_ref().map(|s| s.total), Some(3));
        assert_eq!(dashboard.user_stats.as_ref().map(|s| s.users.total), Some(40));
        assert_eq!(dashboard.recent_upload_trends.len(), 7);
        assert_eq!(dashboard.recent_upload_trends[6].uploads.total, 3);
        assert_eq!(dashboard.recent_user_trends.len(), 7);
    }

    #[tokio::test]
    async fn test_missing_credential_degrades_only_user_metrics() {
        let uploads = FakeUploads {
            facets: Some(UploadFacets::default()),
            ..Default::default()
        };
        let directory = Arc::new(FakeDirectory {
            missing_key: true,
            ..Default::default()
        });
        let service = service(uploads, directory);
        let window = service.window(now(), 7).unwrap();

        let dashboard = service.dashboard(&window).await;
        assert!(dashboard.user_stats.is_none());
        assert!(dashboard.recent_user_trends.is_empty());
        assert!(dashboard.upload_stats.is_some());
        assert_eq!(dashboard.unavailable.len(), 1);
        assert_eq!(dashboard.unavailable[0].metric, USERS_METRIC);
    }

    #[tokio::test]
    async fn test_store_failure_degrades_upload_metrics() {
        let service = service(FakeUploads::default(), Arc::new(FakeDirectory::default()));
        let window = service.window(now(), 7).unwrap();

        let outcome = service.upload_analytics(&window).await;
        assert!(!outcome.is_available());
        assert_eq!(outcome.reason(), Some("Failed to access the upload store"));
    }

    #[tokio::test]
    async fn test_user_total_falls_back_to_fetched_count() {
        let directory = Arc::new(FakeDirectory {
            created: vec![
                user("a", None, millis(3, 2), None),
                user("b", None, millis(3, 3), None),
            ],
            // "b" also appears in the sign-in listing and must only count once.
            signed_in: vec![
                user("b", None, millis(3, 3), Some(millis(3, 10))),
                user("c", None, millis(1, 5), Some(millis(3, 11))),
            ],
            total: None,
            ..Default::default()
        });
        let service = service(FakeUploads::default(), directory);
        let window = service.window(now(), 7).unwrap();

        let analytics = service.user_analytics(&window).await.into_option().unwrap();
        assert_eq!(analytics.summary.users.total, 3);
        assert_eq!(analytics.summary.users.increase, 100.0);
    }

    #[tokio::test]
    async fn test_upload_stats() {
        let service = service(FakeUploads::default(), Arc::new(FakeDirectory::default()));
        let stats = service.upload_stats(now()).await.into_option().unwrap();
        assert_eq!(stats, UploadStats::new(10, 3, 2));
        assert_eq!(stats.total_media, 13);
    }

    #[tokio::test]
    async fn test_recent_uploads_resolve_names_with_one_lookup() {
        let uploads = FakeUploads {
            records: vec![upload("1", "u1"), upload("2", "u2"), upload("3", "u1")],
            ..Default::default()
        };
        let directory = Arc::new(FakeDirectory {
            created: vec![user("u1", Some("Ada"), 0, None)],
            ..Default::default()
        });
        let service = service(uploads, directory.clone());

        let recent = service.recent_uploads(10).await.unwrap();
        let names: Vec<_> = recent.iter().map(|r| r.user.as_str()).collect();
        assert_eq!(names, vec!["Ada", UNKNOWN_USER_LABEL, "Ada"]);

        let lookups = directory.lookups.lock().unwrap();
        assert_eq!(lookups.len(), 1);
        assert_eq!(lookups[0], vec!["u1".to_string(), "u2".to_string()]);
    }

    #[tokio::test]
    async fn test_recent_uploads_survive_lookup_failure() {
        let uploads = FakeUploads {
            records: vec![upload("1", "u1"), upload("2", "u2")],
            ..Default::default()
        };
        let directory = Arc::new(FakeDirectory {
            created: vec![user("u1", Some("Ada"), 0, None)],
            fail_lookups: true,
            ..Default::default()
        });
        let service = service(uploads, directory);

        let recent = service.recent_uploads(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent.iter().all(|r| r.user == UNKNOWN_USER_LABEL));
        assert_eq!(recent[0].sentiment, "positive");
        assert_eq!(recent[0].audio_filename, "");
    }

    #[tokio::test]
    async fn test_recent_uploads_store_failure_yields_empty_list() {
        let uploads = FakeUploads {
            records: vec![upload("1", "u1")],
            records_unreachable: true,
            ..Default::default()
        };
        let directory = Arc::new(FakeDirectory::default());
        let service = service(uploads, directory.clone());

        let recent = service.recent_uploads(10).await.unwrap();
        assert!(recent.is_empty());
        assert!(directory.lookups.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_uploads_by_user_rejects_blank_id() {
        let service = service(FakeUploads::default(), Arc::new(FakeDirectory::default()));
        let err = service.uploads_by_user("  ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
