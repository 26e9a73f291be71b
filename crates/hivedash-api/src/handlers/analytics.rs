use crate::error::HttpAppError;
use crate::state::{AnalyticsSettings, AppState};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use hivedash_core::models::{DashboardAnalytics, UploadAnalytics, UploadStats, UserAnalytics};
use hivedash_core::{AppError, MetricOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TrendQuery {
    /// Trend window in days; defaults to the configured window
    pub days: Option<i64>,
}

impl TrendQuery {
    fn resolve(&self, settings: &AnalyticsSettings) -> Result<u32, AppError> {
        let days = match self.days {
            None => return Ok(settings.default_trend_days),
            Some(days) => days,
        };
        u32::try_from(days)
            .ok()
            .filter(|days| (1..=settings.max_trend_days).contains(days))
            .ok_or_else(|| window_error(settings))
    }
}

fn window_error(settings: &AnalyticsSettings) -> AppError {
    AppError::InvalidInput(format!(
        "days must be between 1 and {}",
        settings.max_trend_days
    ))
}

/// Unparseable query strings get the same 400 as out-of-range windows.
fn trend_days(
    query: Result<Query<TrendQuery>, QueryRejection>,
    settings: &AnalyticsSettings,
) -> Result<u32, AppError> {
    match query {
        Ok(Query(query)) => query.resolve(settings),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected trend query");
            Err(window_error(settings))
        }
    }
}

/// Envelope for a single metric that may be unavailable.
#[derive(Debug, Serialize, ToSchema)]
pub struct MetricResponse<T> {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub data: Option<T>,
}

impl<T> From<MetricOutcome<T>> for MetricResponse<T> {
    fn from(outcome: MetricOutcome<T>) -> Self {
        match outcome {
            MetricOutcome::Available(data) => MetricResponse {
                available: true,
                reason: None,
                data: Some(data),
            },
            MetricOutcome::Unavailable { reason } => MetricResponse {
                available: false,
                reason: Some(reason),
                data: None,
            },
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics",
    tag = "analytics",
    params(TrendQuery),
    responses(
        (status = 200, description = "Combined dashboard analytics", body = DashboardAnalytics),
        (status = 400, description = "Invalid trend window", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid admin API key", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_dashboard_analytics(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TrendQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let days = trend_days(query, &state.settings)?;
    let window = state.analytics.window(Utc::now(), days)?;
    let dashboard = state.analytics.dashboard(&window).await;
    Ok(Json(dashboard))
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics/uploads",
    tag = "analytics",
    params(TrendQuery),
    responses(
        (status = 200, description = "Upload summary and daily trend", body = MetricResponse<UploadAnalytics>),
        (status = 400, description = "Invalid trend window", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_upload_analytics(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TrendQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let days = trend_days(query, &state.settings)?;
    let window = state.analytics.window(Utc::now(), days)?;
    let outcome = state.analytics.upload_analytics(&window).await;
    Ok(Json(MetricResponse::from(outcome)))
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics/users",
    tag = "analytics",
    params(TrendQuery),
    responses(
        (status = 200, description = "User summary and daily trend", body = MetricResponse<UserAnalytics>),
        (status = 400, description = "Invalid trend window", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user_analytics(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TrendQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let days = trend_days(query, &state.settings)?;
    let window = state.analytics.window(Utc::now(), days)?;
    let outcome = state.analytics.user_analytics(&window).await;
    Ok(Json(MetricResponse::from(outcome)))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "analytics",
    responses(
        (status = 200, description = "Upload counters", body = MetricResponse<UploadStats>)
    )
)]
pub async fn get_upload_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let outcome = state.analytics.upload_stats(Utc::now()).await;
    Json(MetricResponse::from(outcome))
}
