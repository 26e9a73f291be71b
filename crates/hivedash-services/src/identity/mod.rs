//! Identity provider access
//!
//! User records live with an external provider. `UserDirectory` is the seam the
//! analytics service depends on; `ClerkDirectory` pages through the provider's
//! REST API.

mod clerk;

pub use clerk::ClerkDirectory;

use hivedash_core::models::ExternalUserRecord;
use hivedash_core::AppError;

/// Time-based filter applied by the provider when listing users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFilter {
    /// Users created at or after the cutoff (epoch milliseconds).
    CreatedAfter(i64),
    /// Users whose last sign-in is at or after the cutoff (epoch milliseconds).
    LastSignInAfter(i64),
}

impl UserFilter {
    pub fn query_param(&self) -> (&'static str, i64) {
        match *self {
            UserFilter::CreatedAfter(cutoff) => ("created_at_after", cutoff),
            UserFilter::LastSignInAfter(cutoff) => ("last_sign_in_at_after", cutoff),
        }
    }
}

#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Every user matching `filter`, each id at most once.
    async fn list_users(&self, filter: UserFilter) -> Result<Vec<ExternalUserRecord>, AppError>;

    /// Total number of users known to the provider.
    async fn count_users(&self) -> Result<i64, AppError>;

    /// Look up the given ids in one request. Unknown ids are simply absent.
    async fn users_by_id(&self, ids: &[String]) -> Result<Vec<ExternalUserRecord>, AppError>;
}
