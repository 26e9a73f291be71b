use crate::constants::MAX_RECENT_UPLOADS;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use hivedash_core::models::{RecentUpload, UploadRecord};
use hivedash_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RecentUploadsQuery {
    /// Number of uploads to return (1-100)
    pub limit: Option<u32>,
}

fn resolve_limit(requested: Option<u32>, default: u32) -> Result<u32, AppError> {
    match requested {
        Some(0) => Err(AppError::InvalidInput("limit must be at least 1".to_string())),
        Some(limit) => Ok(limit.min(MAX_RECENT_UPLOADS)),
        None => Ok(default.clamp(1, MAX_RECENT_UPLOADS)),
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/uploads/recent",
    tag = "uploads",
    params(RecentUploadsQuery),
    responses(
        (status = 200, description = "Newest uploads with uploader names", body = Vec<RecentUpload>),
        (status = 400, description = "Invalid limit", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_recent_uploads(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentUploadsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let limit = resolve_limit(query.limit, state.settings.recent_uploads_limit)?;
    let uploads = state.analytics.recent_uploads(limit).await?;
    Ok(Json(uploads))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{user_id}/uploads",
    tag = "uploads",
    params(
        ("user_id" = String, Path, description = "Identity provider user id")
    ),
    responses(
        (status = 200, description = "The user's uploads, newest first", body = Vec<UploadRecord>),
        (status = 500, description = "Upload store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user_uploads(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let uploads = state.analytics.uploads_by_user(&user_id).await?;
    Ok(Json(uploads))
}
