//! Upload aggregation pipeline
//!
//! Every count the upload dashboard needs comes from one `$facet` stage so the
//! collection is scanned once per request.

use chrono::{DateTime, NaiveDate, Utc};
use hivedash_core::analytics::CalendarWindow;
use hivedash_core::models::UploadFacets;
use hivedash_core::AppError;
use mongodb::bson::{doc, Bson, Document};
use std::collections::HashMap;

use super::document::to_bson_datetime;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Filters for plain counts over the upload collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFilter {
    All,
    WithVoiceNote,
    CreatedSince(DateTime<Utc>),
}

impl UploadFilter {
    pub fn to_document(self) -> Document {
        match self {
            UploadFilter::All => doc! {},
            UploadFilter::WithVoiceNote => doc! { "audio_filename": { "$exists": true, "$ne": null } },
            UploadFilter::CreatedSince(since) => {
                doc! { "created_at": { "$gte": to_bson_datetime(since) } }
            }
        }
    }
}

/// Build the single-stage `$facet` pipeline for `window`.
pub fn upload_facets_pipeline(window: &CalendarWindow) -> Vec<Document> {
    let start_of_this_month = to_bson_datetime(window.start_of_this_month);
    let start_of_last_month = to_bson_datetime(window.start_of_last_month);
    let trend_start = to_bson_datetime(window.trend_start_utc());

    vec![doc! {
        "$facet": {
            "sentiments": [
                { "$match": { "sentiment": { "$nin": [null, ""] } } },
                { "$group": { "_id": "$sentiment", "count": { "$sum": 1 } } },
            ],
            "content_types": [
                { "$group": { "_id": "$filetype", "count": { "$sum": 1 } } },
            ],
            "voice_notes": [
                { "$match": { "audio_filename": { "$ne": null } } },
                { "$count": "count" },
            ],
            "total": [
                { "$count": "count" },
            ],
            "this_month": [
                { "$match": { "created_at": { "$gte": start_of_this_month } } },
                { "$count": "count" },
            ],
            "last_month": [
                { "$match": { "created_at": {
                    "$gte": start_of_last_month,
                    "$lt": start_of_this_month,
                } } },
                { "$count": "count" },
            ],
            "daily": [
                { "$match": { "created_at": { "$gte": trend_start } } },
                { "$group": {
                    "_id": { "$dateToString": {
                        "format": DAY_FORMAT,
                        "date": "$created_at",
                        "timezone": "UTC",
                    } },
                    "count": { "$sum": 1 },
                } },
                { "$sort": { "_id": 1 } },
            ],
        }
    }]
}

/// Decode the single document produced by [`upload_facets_pipeline`].
///
/// Group keys that are not strings (a `null` filetype, for instance) are skipped,
/// as are day keys that fail to parse.
pub fn decode_upload_facets(result: &Document) -> Result<UploadFacets, AppError> {
    Ok(UploadFacets {
        sentiments: grouped_counts(result, "sentiments")?,
        content_types: grouped_counts(result, "content_types")?,
        voice_notes: single_count(result, "voice_notes")?,
        total: single_count(result, "total")?,
        this_month: single_count(result, "this_month")?,
        last_month: single_count(result, "last_month")?,
        daily: daily_counts(result)?,
    })
}

fn facet<'a>(result: &'a Document, name: &str) -> Result<&'a Vec<Bson>, AppError> {
    result
        .get_array(name)
        .map_err(|e| AppError::DataShape(format!("facet '{}' missing or malformed: {}", name, e)))
}

fn entries<'a>(
    result: &'a Document,
    name: &'a str,
) -> Result<impl Iterator<Item = Result<&'a Document, AppError>>, AppError> {
    Ok(facet(result, name)?.iter().map(move |entry| {
        entry.as_document().ok_or_else(|| {
            AppError::DataShape(format!("facet '{}' contains a non-document entry", name))
        })
    }))
}

fn count_field(entry: &Document, name: &str) -> Result<i64, AppError> {
    entry
        .get("count")
        .and_then(bson_to_i64)
        .ok_or_else(|| AppError::DataShape(format!("facet '{}' entry has no numeric count", name)))
}

fn single_count(result: &Document, name: &str) -> Result<i64, AppError> {
    // `$count` emits nothing when no document matched.
    match entries(result, name)?.next() {
        Some(entry) => count_field(entry?, name),
        None => Ok(0),
    }
}

fn grouped_counts(result: &Document, name: &str) -> Result<HashMap<String, i64>, AppError> {
    let mut counts = HashMap::new();
    for entry in entries(result, name)? {
        let entry = entry?;
        let count = count_field(entry, name)?;
        if let Some(Bson::String(key)) = entry.get("_id") {
            *counts.entry(key.clone()).or_insert(0) += count;
        }
    }
    Ok(counts)
}

fn daily_counts(result: &Document) -> Result<HashMap<NaiveDate, i64>, AppError> {
    let mut counts = HashMap::new();
    for (key, count) in grouped_counts(result, "daily")? {
        match NaiveDate::parse_from_str(&key, DAY_FORMAT) {
            Ok(date) => {
                counts.insert(date, count);
            }
            Err(e) => {
                tracing::warn!(day = %key, error = %e, "Skipping unparseable daily bucket");
            }
        }
    }
    Ok(counts)
}

/// Counts come back as Int32 or Int64 depending on magnitude, and as Double
/// from some proxies.
fn bson_to_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        Bson::Double(v) if v.is_finite() => Some(*v as i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> CalendarWindow {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        CalendarWindow::compute(now, 7).unwrap()
    }

    #[test]
    fn test_pipeline_is_a_single_facet_stage() {
        let pipeline = upload_facets_pipeline(&window());
        assert_eq!(pipeline.len(), 1);

        let facet = pipeline[0].get_document("$facet").unwrap();
        let names: Vec<_> = facet.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "sentiments",
                "content_types",
                "voice_notes",
                "total",
                "this_month",
                "last_month",
                "daily"
            ]
        );
    }

    #[test]
    fn test_pipeline_uses_window_boundaries() {
        let window = window();
        let pipeline = upload_facets_pipeline(&window);
        let facet = pipeline[0].get_document("$facet").unwrap();

        let last_month = facet.get_array("last_month").unwrap()[0]
            .as_document()
            .unwrap()
            .get_document("$match")
            .unwrap()
            .get_document("created_at")
            .unwrap();
        assert_eq!(
            last_month.get_datetime("$gte").unwrap().timestamp_millis(),
            window.start_of_last_month.timestamp_millis()
        );
        assert_eq!(
            last_month.get_datetime("$lt").unwrap().timestamp_millis(),
            window.start_of_this_month.timestamp_millis()
        );

        let daily_match = facet.get_array("daily").unwrap()[0]
            .as_document()
            .unwrap()
            .get_document("$match")
            .unwrap()
            .get_document("created_at")
            .unwrap();
        assert_eq!(
            daily_match.get_datetime("$gte").unwrap().timestamp_millis(),
            window.trend_start_utc().timestamp_millis()
        );
    }

    #[test]
    fn test_decode_full_result() {
        let result = doc! {
            "sentiments": [
                { "_id": "positive", "count": 2 },
                { "_id": "excited", "count": 1_i64 },
            ],
            "content_types": [
                { "_id": "image", "count": 3 },
                { "_id": null, "count": 1 },
            ],
            "voice_notes": [ { "count": 1 } ],
            "total": [ { "count": 4 } ],
            "this_month": [ { "count": 3.0 } ],
            "last_month": [],
            "daily": [
                { "_id": "2024-03-13", "count": 1 },
                { "_id": "2024-03-15", "count": 2 },
            ],
        };

        let facets = decode_upload_facets(&result).unwrap();
        assert_eq!(facets.total, 4);
        assert_eq!(facets.voice_notes, 1);
        assert_eq!(facets.this_month, 3);
        assert_eq!(facets.last_month, 0);
        assert_eq!(facets.sentiments.get("positive"), Some(&2));
        assert_eq!(facets.sentiments.get("excited"), Some(&1));
        assert_eq!(facets.content_types.len(), 1);
        assert_eq!(
            facets.daily.get(&NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()),
            Some(&2)
        );
    }

    #[test]
    fn test_decode_empty_collection() {
        let result = doc! {
            "sentiments": [],
            "content_types": [],
            "voice_notes": [],
            "total": [],
            "this_month": [],
            "last_month": [],
            "daily": [],
        };
        assert_eq!(decode_upload_facets(&result).unwrap(), UploadFacets::default());
    }

    #[test]
    fn test_decode_rejects_missing_facet() {
        let result = doc! { "sentiments": [] };
        let err = decode_upload_facets(&result).unwrap_err();
        assert!(matches!(err, AppError::DataShape(_)));
    }

    #[test]
    fn test_decode_skips_bad_day_keys() {
        let result = doc! {
            "sentiments": [],
            "content_types": [],
            "voice_notes": [],
            "total": [ { "count": 1 } ],
            "this_month": [],
            "last_month": [],
            "daily": [ { "_id": "not-a-day", "count": 1 } ],
        };
        assert!(decode_upload_facets(&result).unwrap().daily.is_empty());
    }

    #[test]
    fn test_filters() {
        assert_eq!(UploadFilter::All.to_document(), doc! {});
        assert!(UploadFilter::WithVoiceNote
            .to_document()
            .contains_key("audio_filename"));

        let since = Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap();
        let filter = UploadFilter::CreatedSince(since).to_document();
        assert_eq!(
            filter
                .get_document("created_at")
                .unwrap()
                .get_datetime("$gte")
                .unwrap()
                .timestamp_millis(),
            since.timestamp_millis()
        );
    }
}
