use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};

use super::delta::percent_increase;
use super::trend::normalize_daily_trend;
use super::window::CalendarWindow;
use crate::models::{
    ContentBreakdown, ContentCategory, ExternalUserRecord, MetricDelta, Sentiment,
    SentimentBreakdown, UploadAnalytics, UploadFacets, UploadSummary, UploadTrendPoint,
    UserAnalytics, UserSummary, UserTrendPoint, MONTHLY_TIMEFRAME,
};

/// Fold the aggregated upload facets into the dashboard summary.
pub fn build_upload_summary(facets: &UploadFacets) -> UploadSummary {
    if facets.total == 0 {
        return UploadSummary::empty();
    }

    UploadSummary {
        total: facets.total,
        breakdown: content_breakdown(facets.total, &facets.content_types),
        voice_notes: facets.voice_notes,
        increase: percent_increase(facets.this_month, facets.last_month),
        timeframe: MONTHLY_TIMEFRAME.to_string(),
        sentiment_analysis: sentiment_breakdown(&facets.sentiments),
    }
}

pub fn build_upload_trend(window: &CalendarWindow, facets: &UploadFacets) -> Vec<UploadTrendPoint> {
    normalize_daily_trend(window.trend_start, window.trend_days, &facets.daily)
        .into_iter()
        .map(|point| UploadTrendPoint {
            date: point.date,
            uploads: point.delta,
        })
        .collect()
}

pub fn build_upload_analytics(window: &CalendarWindow, facets: &UploadFacets) -> UploadAnalytics {
    UploadAnalytics {
        summary: build_upload_summary(facets),
        trend: build_upload_trend(window, facets),
    }
}

/// Sentiment buckets from raw label counts. `custom` absorbs every non-empty label
/// outside the known set.
pub fn sentiment_breakdown(counts: &HashMap<String, i64>) -> SentimentBreakdown {
    let mut breakdown = SentimentBreakdown::default();
    for (label, count) in counts {
        match Sentiment::from_label(label) {
            Some(Sentiment::Positive) => breakdown.positive += count,
            Some(Sentiment::Neutral) => breakdown.neutral += count,
            Some(Sentiment::Negative) => breakdown.negative += count,
            Some(Sentiment::Custom(_)) => breakdown.custom += count,
            None => {}
        }
    }
    breakdown
}

/// Content buckets from raw filetype counts. Anything not classified as an image or
/// document, including records without a filetype, lands in `others`.
pub fn content_breakdown(total: i64, counts: &HashMap<String, i64>) -> ContentBreakdown {
    let mut images = 0;
    let mut documents = 0;
    for (filetype, count) in counts {
        match ContentCategory::from_filetype(filetype) {
            ContentCategory::Image => images += count,
            ContentCategory::Document => documents += count,
            ContentCategory::Other => {}
        }
    }

    ContentBreakdown {
        images,
        documents,
        others: (total - images - documents).max(0),
    }
}

/// Month-over-month and trailing-window counters derived from user records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserBuckets {
    pub new_this_month: i64,
    pub new_last_month: i64,
    pub active_recent: i64,
    pub active_this_month: i64,
    pub active_last_month: i64,
    pub new_daily: HashMap<NaiveDate, i64>,
    pub active_daily: HashMap<NaiveDate, i64>,
}

impl UserBuckets {
    /// Partition `users` against `window`. Duplicate ids are counted once.
    pub fn collect(window: &CalendarWindow, users: &[ExternalUserRecord]) -> Self {
        let mut buckets = UserBuckets::default();
        let mut seen = HashSet::new();
        let trend_end = window.today;

        for user in users {
            if !seen.insert(user.id.as_str()) {
                continue;
            }

            let created_at = user.created_at_utc();
            let last_sign_in = user.last_sign_in_utc();

            match month_of(window, created_at) {
                Some(Month::This) => buckets.new_this_month += 1,
                Some(Month::Last) => buckets.new_last_month += 1,
                None => {}
            }

            if last_sign_in >= window.active_threshold {
                buckets.active_recent += 1;
            }
            match month_of(window, last_sign_in) {
                Some(Month::This) => buckets.active_this_month += 1,
                Some(Month::Last) => buckets.active_last_month += 1,
                None => {}
            }

            let created_day = created_at.date_naive();
            if created_day >= window.trend_start && created_day <= trend_end {
                *buckets.new_daily.entry(created_day).or_insert(0) += 1;
            }
            let sign_in_day = last_sign_in.date_naive();
            if sign_in_day >= window.trend_start && sign_in_day <= trend_end {
                *buckets.active_daily.entry(sign_in_day).or_insert(0) += 1;
            }
        }

        buckets
    }
}

enum Month {
    This,
    Last,
}

fn month_of(window: &CalendarWindow, at: DateTime<Utc>) -> Option<Month> {
    if at >= window.start_of_this_month {
        Some(Month::This)
    } else if at >= window.start_of_last_month {
        Some(Month::Last)
    } else {
        None
    }
}

/// User-side summary. `total_users` is the provider-wide count; the increase
/// compares new sign-ups this month with last month.
pub fn build_user_summary(buckets: &UserBuckets, total_users: i64) -> UserSummary {
    UserSummary {
        users: MetricDelta {
            total: total_users,
            increase: percent_increase(buckets.new_this_month, buckets.new_last_month),
        },
        active_users: MetricDelta {
            total: buckets.active_recent,
            increase: percent_increase(buckets.active_this_month, buckets.active_last_month),
        },
        timeframe: MONTHLY_TIMEFRAME.to_string(),
    }
}

pub fn build_user_trend(window: &CalendarWindow, buckets: &UserBuckets) -> Vec<UserTrendPoint> {
    let new_users = normalize_daily_trend(window.trend_start, window.trend_days, &buckets.new_daily);
    let active_users =
        normalize_daily_trend(window.trend_start, window.trend_days, &buckets.active_daily);

    new_users
        .into_iter()
        .zip(active_users)
        .map(|(new, active)| UserTrendPoint {
            date: new.date,
            users: new.delta,
            active_users: active.delta,
        })
        .collect()
}

pub fn build_user_analytics(
    window: &CalendarWindow,
    users: &[ExternalUserRecord],
    total_users: i64,
) -> UserAnalytics {
    let buckets = UserBuckets::collect(window, users);
    UserAnalytics {
        summary: build_user_summary(&buckets, total_users),
        trend: build_user_trend(window, &buckets),
    }
}
