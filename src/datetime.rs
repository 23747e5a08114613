//! Date/time helpers for SOOON.
//!
//! Timestamps are stored by SQLite as UTC strings (`YYYY-MM-DD HH:MM:SS`).
//! The API returns them as RFC3339, except error bodies which carry a short
//! local-time stamp.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Format used for the `timestamp` field of API error bodies.
pub const ERROR_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format a UTC datetime in the given timezone.
///
/// Unknown timezone names fall back to UTC.
pub fn format_utc_datetime(dt: &DateTime<Utc>, timezone: &str, format: &str) -> String {
    match timezone.parse::<Tz>() {
        Ok(tz) => dt.with_timezone(&tz).format(format).to_string(),
        Err(_) => dt.format(format).to_string(),
    }
}

/// Current time in the given timezone, formatted for error bodies.
pub fn error_timestamp(timezone: &str) -> String {
    format_utc_datetime(&Utc::now(), timezone, ERROR_TIMESTAMP_FORMAT)
}

/// Convert an SQLite datetime string (UTC) to RFC3339.
pub fn to_rfc3339(datetime_str: &str) -> String {
    if datetime_str.contains('T') {
        return datetime_str.to_string();
    }
    format!("{}Z", datetime_str.replace(' ', "T"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_utc_datetime_seoul() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let result = format_utc_datetime(&dt, "Asia/Seoul", ERROR_TIMESTAMP_FORMAT);
        assert_eq!(result, "2024-01-15 19:30");
    }

    #[test]
    fn test_format_utc_datetime_invalid_timezone() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let result = format_utc_datetime(&dt, "Invalid/Zone", ERROR_TIMESTAMP_FORMAT);
        assert_eq!(result, "2024-01-15 10:30");
    }

    #[test]
    fn test_error_timestamp_shape() {
        let ts = error_timestamp("UTC");
        assert_eq!(ts.len(), "2024-01-15 10:30".len());
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
    }

    #[test]
    fn test_to_rfc3339() {
        assert_eq!(to_rfc3339("2024-12-31 23:59:59"), "2024-12-31T23:59:59Z");
        assert_eq!(to_rfc3339("2024-12-31T23:59:59Z"), "2024-12-31T23:59:59Z");
    }
}
