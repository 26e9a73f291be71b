//! Analytics service
//!
//! This module combines the upload store and the identity provider into the
//! dashboard metrics.

pub use service::{AnalyticsService, UPLOADS_METRIC, UPLOAD_STATS_METRIC, USERS_METRIC};

mod service;
