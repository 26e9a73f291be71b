//! Hivedash Core Library
//!
//! This crate provides the domain models, error types, configuration and the pure
//! analytics computations shared by every hivedash component.

pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod outcome;

// Re-export commonly used types
pub use analytics::{percent_increase, CalendarWindow};
pub use config::{BaseConfig, Config, DashboardConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use outcome::{MetricOutcome, OutcomeExt};
