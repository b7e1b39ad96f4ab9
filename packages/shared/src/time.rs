//! Time helpers.

use chrono::{DateTime, SecondsFormat, Utc};

/// Current time as an RFC 3339 / ISO-8601 UTC string with millisecond precision.
///
/// Example: `2024-01-01T00:00:00.123Z`
pub fn now_rfc3339() -> String {
    format_rfc3339(Utc::now())
}

/// Format a UTC instant as RFC 3339 with millisecond precision and a `Z` suffix.
pub fn format_rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
