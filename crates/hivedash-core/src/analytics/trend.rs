use chrono::NaiveDate;
use std::collections::HashMap;

use super::delta::percent_increase;
use crate::models::MetricDelta;

/// One day of a dense trend series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub delta: MetricDelta,
}

/// Expand sparse per-day counts into `days` consecutive points starting at `start`.
///
/// Days without an entry count as zero. Each point's `increase` compares against the
/// previous day in the series; the first day compares against zero.
pub fn normalize_daily_trend(
    start: NaiveDate,
    days: u32,
    counts: &HashMap<NaiveDate, i64>,
) -> Vec<DailyPoint> {
    let mut previous = 0;
    start
        .iter_days()
        .take(days as usize)
        .map(|date| {
            let total = counts.get(&date).copied().unwrap_or(0);
            let point = DailyPoint {
                date,
                delta: MetricDelta {
                    total,
                    increase: percent_increase(total, previous),
                },
            };
            previous = total;
            point
        })
        .collect()
}
