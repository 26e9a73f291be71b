//! Hivedash Services Layer
//!
//! This crate is the business service layer: the identity-provider client and the
//! analytics orchestration that combines it with the upload store. Keep thin HTTP
//! handling in hivedash-api.

pub mod analytics;
pub mod identity;

pub use analytics::AnalyticsService;
pub use identity::{ClerkDirectory, UserDirectory, UserFilter};
