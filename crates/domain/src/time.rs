//! Time and timestamp helpers.

use chrono::{DateTime, SecondsFormat, Utc};

/// UTC timestamp attached to state values.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Render a timestamp the way it is persisted (RFC 3339, millisecond precision).
#[must_use]
pub fn to_storage(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a persisted timestamp.
///
/// # Errors
///
/// Returns [`chrono::ParseError`] if `raw` is not RFC 3339.
pub fn from_storage(raw: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|ts| ts.to_utc())
}
