//! Timestamp encoding shared by the storage layer and file naming.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Compact stamp used in generated file names (`20260119_143005`).
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Encode a timestamp for storage: RFC 3339, UTC, microsecond precision.
///
/// Fixed width keeps lexical and chronological order identical.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode a stored timestamp.
///
/// # Errors
///
/// Returns the chrono parse error if `raw` is not RFC 3339.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}

/// Render `ts` with [`FILE_STAMP_FORMAT`].
#[must_use]
pub fn file_stamp(ts: DateTime<Utc>) -> String {
    ts.format(FILE_STAMP_FORMAT).to_string()
}

/// Parse a [`FILE_STAMP_FORMAT`] stamp back into a UTC timestamp.
#[must_use]
pub fn parse_file_stamp(stamp: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(stamp, FILE_STAMP_FORMAT)
        .ok()
        .map(|dt| Utc.from_utc_datetime(&dt))
}
