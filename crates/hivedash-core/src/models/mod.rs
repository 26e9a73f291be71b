//! Data models for the application
//!
//! Upload records as stored, identity-provider user records, and the
//! derived analytics payloads served to the admin dashboard.

mod analytics;
mod identity;
mod upload;

// Re-export all models for convenient imports
pub use analytics::*;
pub use identity::*;
pub use upload::*;
