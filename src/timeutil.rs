//! Date and window arithmetic for forecast requests
//!
//! Requests name a calendar date and an hour of day; everything downstream
//! works on timezone-aware UTC timestamps. Responses re-express timestamps
//! in the fixed display offset of this deployment.

use crate::error::{Result, ServiceError};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

/// Display offset of this deployment, east of UTC
pub const DISPLAY_OFFSET_HOURS: i32 = 6;

/// Combine a `YYYY-MM-DD` date string and an hour of day into a UTC
/// timestamp at minute/second/nanosecond zero.
pub fn to_utc_timestamp(date: &str, hour: u32) -> Result<DateTime<Utc>> {
    let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| ServiceError::InvalidDateFormat(date.to_string()))?;
    if hour > 23 {
        return Err(ServiceError::InvalidHour(hour));
    }
    let naive = parsed
        .and_hms_opt(hour, 0, 0)
        .ok_or(ServiceError::InvalidHour(hour))?;

    Ok(Utc.from_utc_datetime(&naive))
}

/// The timestamp immediately preceding the given (date, hour): one hour
/// earlier, rolling over to the previous day's hour 23 when hour is 0.
pub fn previous_boundary(date: &str, hour: u32) -> Result<DateTime<Utc>> {
    if hour > 23 {
        return Err(ServiceError::InvalidHour(hour));
    }

    Ok(to_utc_timestamp(date, hour)? - Duration::hours(1))
}

/// Re-express a UTC timestamp in the fixed display offset.
pub fn with_display_offset(timestamp: DateTime<Utc>) -> DateTime<FixedOffset> {
    // Statically valid: DISPLAY_OFFSET_HOURS is well inside +-24h.
    let offset = FixedOffset::east_opt(DISPLAY_OFFSET_HOURS * 3600).unwrap();
    timestamp.with_timezone(&offset)
}
