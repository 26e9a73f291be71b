//! OpenAPI documentation served at [`OPENAPI_PATH`](crate::constants::OPENAPI_PATH).

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use hivedash_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hivedash Admin API",
        version = "0.1.0",
        description = "Admin analytics for the media-sharing backend: upload and user summaries, daily trends, and recent activity. Every /api/admin route expects `Authorization: Bearer <ADMIN_API_KEY>`."
    ),
    paths(
        handlers::analytics::get_dashboard_analytics,
        handlers::analytics::get_upload_analytics,
        handlers::analytics::get_user_analytics,
        handlers::analytics::get_upload_stats,
        handlers::uploads::get_recent_uploads,
        handlers::uploads::get_user_uploads,
    ),
    components(
        schemas(
            models::DashboardAnalytics,
            models::UploadAnalytics,
            models::UploadSummary,
            models::UploadTrendPoint,
            models::UserAnalytics,
            models::UserSummary,
            models::UserTrendPoint,
            models::MetricDelta,
            models::SentimentBreakdown,
            models::ContentBreakdown,
            models::UnavailableMetric,
            models::UploadStats,
            models::RecentUpload,
            models::UploadRecord,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "analytics", description = "Dashboard summaries and daily trends"),
        (name = "uploads", description = "Recent and per-user uploads")
    )
)]
pub struct ApiDoc;
