pub mod analytics;
pub mod uploads;
