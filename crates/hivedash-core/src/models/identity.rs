use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder label used when an uploader cannot be resolved.
pub const UNKNOWN_USER_LABEL: &str = "Unknown User";

/// User record as returned by the identity provider's `/users` endpoint.
///
/// Timestamps are epoch milliseconds. A missing or zero `last_sign_in_at`
/// means the user never signed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalUserRecord {
    pub id: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub last_sign_in_at: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

impl ExternalUserRecord {
    pub fn created_at_utc(&self) -> DateTime<Utc> {
        millis_to_utc(self.created_at)
    }

    /// Last sign-in time; absent values collapse to the epoch.
    pub fn last_sign_in_utc(&self) -> DateTime<Utc> {
        millis_to_utc(self.last_sign_in_at.unwrap_or(0))
    }

    /// Human-readable name: full name, then username, then first email address.
    pub fn display_name(&self) -> Option<String> {
        let full_name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full_name.is_empty() {
            return Some(full_name);
        }

        self.username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.email_addresses
                    .first()
                    .map(|email| email.email_address.clone())
            })
    }
}

/// Convert epoch milliseconds to UTC, clamping unrepresentable values to the epoch.
pub fn millis_to_utc(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
