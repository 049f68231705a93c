use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A captured email address together with the moment it was first seen.
///
/// `email` is always stored in normalized form and acts as the unique key.
/// `timestamp` is written once on first capture and never refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub email: String,
    pub timestamp: String,
}

impl Lead {
    /// Create a lead for an already-normalized email, stamped with the current time
    pub fn new(email: impl Into<String>) -> Self {
        Self::captured_at(email, Utc::now())
    }

    pub fn captured_at(email: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            email: email.into(),
            timestamp: format_timestamp(at),
        }
    }
}

/// ISO-8601 in UTC with millisecond precision and a `Z` suffix,
/// e.g. `2024-05-01T12:34:56.789Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
