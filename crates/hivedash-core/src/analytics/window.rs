use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::AppError;

/// Users who signed in within this many days count as active.
pub const DEFAULT_ACTIVE_WINDOW_DAYS: u32 = 30;

/// Calendar boundaries shared by one analytics request, all in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWindow {
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
    pub start_of_this_month: DateTime<Utc>,
    pub start_of_last_month: DateTime<Utc>,
    /// First day of the dense trend series: `today - (trend_days - 1)`.
    pub trend_start: NaiveDate,
    pub trend_days: u32,
    /// Sign-ins at or after this instant count toward active users.
    pub active_threshold: DateTime<Utc>,
}

impl CalendarWindow {
    pub fn compute(now: DateTime<Utc>, trend_days: u32) -> Result<Self, AppError> {
        Self::with_active_window(now, trend_days, DEFAULT_ACTIVE_WINDOW_DAYS)
    }

    pub fn with_active_window(
        now: DateTime<Utc>,
        trend_days: u32,
        active_window_days: u32,
    ) -> Result<Self, AppError> {
        if trend_days == 0 {
            return Err(AppError::InvalidInput(
                "trend window must cover at least one day".to_string(),
            ));
        }

        let today = now.date_naive();
        let first_of_month = today
            .with_day(1)
            .ok_or_else(|| AppError::Internal(format!("no first day for {}", today)))?;
        let first_of_last_month = first_of_month
            .checked_sub_months(Months::new(1))
            .ok_or_else(|| AppError::InvalidInput(format!("date out of range: {}", today)))?;
        let trend_start = today
            .checked_sub_days(Days::new(u64::from(trend_days - 1)))
            .ok_or_else(|| {
                AppError::InvalidInput(format!("trend window of {} days is out of range", trend_days))
            })?;
        let active_threshold = now
            .checked_sub_days(Days::new(u64::from(active_window_days)))
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "active window of {} days is out of range",
                    active_window_days
                ))
            })?;

        Ok(Self {
            now,
            today,
            start_of_this_month: midnight_utc(first_of_month),
            start_of_last_month: midnight_utc(first_of_last_month),
            trend_start,
            trend_days,
            active_threshold,
        })
    }

    pub fn trend_start_utc(&self) -> DateTime<Utc> {
        midnight_utc(self.trend_start)
    }

    /// Earliest instant any user metric of this window depends on.
    pub fn lookback_cutoff(&self) -> DateTime<Utc> {
        self.start_of_last_month
            .min(self.trend_start_utc())
            .min(self.active_threshold)
    }
}

pub(crate) fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
