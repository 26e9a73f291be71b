//! API constants

/// Prefix of every admin dashboard route
pub const ADMIN_PREFIX: &str = "/api/admin";

/// Upper bound for `GET /api/admin/uploads/recent?limit=`
pub const MAX_RECENT_UPLOADS: u32 = 100;

/// Path of the served OpenAPI document
pub const OPENAPI_PATH: &str = "/api/openapi.json";
