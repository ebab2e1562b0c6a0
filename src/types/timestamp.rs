use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::errors::FieldError;
use crate::types::is_null;

const DATE_TIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M"
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Permissive timestamp parser.
///
/// Offsets are accepted but not normalized: `2025-01-01T03:00:00+05:00` keeps hour 3.
/// Date-only values resolve to midnight.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, FieldError> {
    if is_null(value) {
        return Err(FieldError::Null);
    }

    let value = value.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Ok(with_offset.naive_local());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }

    DATE_FORMATS.iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| FieldError::InvalidTimestamp(value.to_string()))
}

/// Renders a timestamp the way it is written to partition files.
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(OUTPUT_FORMAT).to_string()
}
