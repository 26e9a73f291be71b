use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Label attached to month-over-month summaries.
pub const MONTHLY_TIMEFRAME: &str = "This month";

/// A count and its percentage change against the previous period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MetricDelta {
    pub total: i64,
    pub increase: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SentimentBreakdown {
    pub positive: i64,
    pub negative: i64,
    pub neutral: i64,
    pub custom: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContentBreakdown {
    pub images: i64,
    pub documents: i64,
    pub others: i64,
}

/// Upload-side dashboard summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub total: i64,
    pub breakdown: ContentBreakdown,
    pub voice_notes: i64,
    pub increase: f64,
    pub timeframe: String,
    pub sentiment_analysis: SentimentBreakdown,
}

impl UploadSummary {
    /// Summary of an empty upload collection.
    pub fn empty() -> Self {
        Self {
            total: 0,
            breakdown: ContentBreakdown::default(),
            voice_notes: 0,
            increase: 0.0,
            timeframe: MONTHLY_TIMEFRAME.to_string(),
            sentiment_analysis: SentimentBreakdown::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadTrendPoint {
    pub date: NaiveDate,
    pub uploads: MetricDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadAnalytics {
    pub summary: UploadSummary,
    pub trend: Vec<UploadTrendPoint>,
}

/// User-side dashboard summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub users: MetricDelta,
    pub active_users: MetricDelta,
    pub timeframe: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserTrendPoint {
    pub date: NaiveDate,
    pub users: MetricDelta,
    pub active_users: MetricDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserAnalytics {
    pub summary: UserSummary,
    pub trend: Vec<UserTrendPoint>,
}

/// A metric that could not be computed for this response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UnavailableMetric {
    pub metric: String,
    pub reason: String,
}

/// Combined payload rendered by the admin analytics page.
///
/// Unavailable summaries are `null` and unavailable trends are empty; each
/// degraded metric is named in `unavailable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalytics {
    pub upload_stats: Option<UploadSummary>,
    pub user_stats: Option<UserSummary>,
    pub recent_upload_trends: Vec<UploadTrendPoint>,
    pub recent_user_trends: Vec<UserTrendPoint>,
    #[serde(default)]
    pub unavailable: Vec<UnavailableMetric>,
}
