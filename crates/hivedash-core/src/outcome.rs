//! Degradable metric results
//!
//! A dashboard metric either computed successfully or is reported as unavailable
//! with a client-safe reason. Failures are logged once, where the outcome is built,
//! so callers can render zeros or `null` without losing the diagnostic.

use serde::{Serialize, Serializer};

use crate::error::{AppError, ErrorMetadata, LogLevel};

#[derive(Debug, Clone, PartialEq)]
pub enum MetricOutcome<T> {
    Available(T),
    Unavailable { reason: String },
}

impl<T> MetricOutcome<T> {
    /// Convert a fallible metric computation, logging the failure at the error's level.
    pub fn from_result(metric: &str, result: Result<T, AppError>) -> Self {
        match result {
            Ok(value) => MetricOutcome::Available(value),
            Err(err) => {
                let detail = err.detailed_message();
                match err.log_level() {
                    LogLevel::Error => tracing::error!(
                        metric = %metric,
                        error_code = err.error_code(),
                        error = %detail,
                        "Metric unavailable"
                    ),
                    LogLevel::Warn => tracing::warn!(
                        metric = %metric,
                        error_code = err.error_code(),
                        error = %detail,
                        "Metric unavailable"
                    ),
                    LogLevel::Debug => tracing::debug!(
                        metric = %metric,
                        error_code = err.error_code(),
                        error = %detail,
                        "Metric unavailable"
                    ),
                }
                MetricOutcome::Unavailable {
                    reason: err.client_message(),
                }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, MetricOutcome::Available(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            MetricOutcome::Available(_) => None,
            MetricOutcome::Unavailable { reason } => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MetricOutcome<U> {
        match self {
            MetricOutcome::Available(value) => MetricOutcome::Available(f(value)),
            MetricOutcome::Unavailable { reason } => MetricOutcome::Unavailable { reason },
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            MetricOutcome::Available(value) => Some(value),
            MetricOutcome::Unavailable { .. } => None,
        }
    }

    /// The value, or `default` when unavailable.
    pub fn unwrap_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }
}

impl<T: Serialize> Serialize for MetricOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricOutcome::Available(value) => value.serialize(serializer),
            MetricOutcome::Unavailable { .. } => serializer.serialize_none(),
        }
    }
}

/// Extension trait for turning a metric `Result` into a `MetricOutcome`
pub trait OutcomeExt<T> {
    fn into_outcome(self, metric: &str) -> MetricOutcome<T>;
}

impl<T> OutcomeExt<T> for Result<T, AppError> {
    fn into_outcome(self, metric: &str) -> MetricOutcome<T> {
        MetricOutcome::from_result(metric, self)
    }
}
