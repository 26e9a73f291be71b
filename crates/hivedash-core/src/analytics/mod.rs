//! Pure analytics computations: calendar boundaries, percentage deltas, dense
//! daily trends and the summary builders fed by the store and identity provider.

mod delta;
mod summary;
mod trend;
mod window;

pub use delta::percent_increase;
pub use summary::{
    build_upload_analytics, build_upload_summary, build_upload_trend, build_user_analytics,
    build_user_summary, build_user_trend, content_breakdown, sentiment_breakdown, UserBuckets,
};
pub use trend::{normalize_daily_trend, DailyPoint};
pub use window::{CalendarWindow, DEFAULT_ACTIVE_WINDOW_DAYS};
