use chrono::{DateTime, Utc};
use hivedash_core::models::UploadRecord;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Upload as stored in the collection.
///
/// Older documents may lack optional fields, so everything except `created_at`
/// falls back to a default when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub filetype: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: mongodb::bson::DateTime,
    #[serde(default)]
    pub audio_filename: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
}

impl From<UploadDocument> for UploadRecord {
    fn from(doc: UploadDocument) -> Self {
        let created_at = DateTime::<Utc>::from_timestamp_millis(doc.created_at.timestamp_millis())
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        UploadRecord {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: doc.user_id,
            filename: doc.filename,
            filetype: doc.filetype,
            title: doc.title,
            description: doc.description,
            created_at,
            audio_filename: doc.audio_filename,
            sentiment: doc.sentiment,
        }
    }
}

pub(crate) fn to_bson_datetime(at: DateTime<Utc>) -> mongodb::bson::DateTime {
    mongodb::bson::DateTime::from_millis(at.timestamp_millis())
}
