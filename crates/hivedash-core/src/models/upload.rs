use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// A single uploaded media item as stored in the upload collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadRecord {
    pub id: String,
    pub user_id: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filetype: Option<String>,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
}

impl UploadRecord {
    pub fn has_voice_note(&self) -> bool {
        self.audio_filename.is_some()
    }
}

/// Classified sentiment of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Custom(String),
}

impl Sentiment {
    /// Parse a stored sentiment label. Empty labels carry no sentiment.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "" => None,
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            other => Some(Sentiment::Custom(other.to_string())),
        }
    }
}

/// Coarse content category used by the dashboard breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentCategory {
    Image,
    Document,
    Other,
}

impl ContentCategory {
    /// Map a stored `filetype` (either a short kind or a MIME type) to its category.
    pub fn from_filetype(filetype: &str) -> Self {
        let filetype = filetype.trim().to_lowercase();
        if filetype == "image" || filetype.starts_with("image/") {
            ContentCategory::Image
        } else if filetype == "document"
            || filetype == "pdf"
            || filetype.starts_with("application/")
            || filetype.starts_with("text/")
        {
            ContentCategory::Document
        } else {
            ContentCategory::Other
        }
    }
}

/// Raw counts produced by the single multi-facet aggregation over the upload collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadFacets {
    /// Per-sentiment counts keyed by the raw label. Null and empty labels are excluded.
    pub sentiments: HashMap<String, i64>,
    /// Per-filetype counts keyed by the raw value.
    pub content_types: HashMap<String, i64>,
    pub voice_notes: i64,
    pub total: i64,
    pub this_month: i64,
    pub last_month: i64,
    /// Sparse per-day counts for days at or after the trend start (UTC).
    pub daily: HashMap<NaiveDate, i64>,
}

/// Upload counters shown on the admin landing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadStats {
    pub total_images: i64,
    pub total_voice_notes: i64,
    pub total_media: i64,
    pub uploads_last24h: i64,
}

impl UploadStats {
    pub fn new(total_images: i64, total_voice_notes: i64, uploads_last24h: i64) -> Self {
        Self {
            total_images,
            total_voice_notes,
            total_media: total_images + total_voice_notes,
            uploads_last24h,
        }
    }
}

/// Recent upload annotated with the uploader's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecentUpload {
    pub id: String,
    pub title: String,
    pub user: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub filename: String,
    pub audio_filename: String,
    pub sentiment: String,
}
