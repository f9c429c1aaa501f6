//! Label formatting for the provider's ISO-8601 local-time strings.
//!
//! All labels are deterministic for a given timestamp; the locale is fixed
//! to English, matching the `language=en` sent with every geocode request.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Header label, e.g. "Friday, August 7". Falls back to the raw string for
/// anything unparseable.
pub fn long_date(iso_date: &str) -> String {
    match NaiveDate::parse_from_str(date_prefix(iso_date), DATE_FORMAT) {
        Ok(date) => date.format("%A, %B %-d").to_string(),
        Err(_) => iso_date.to_string(),
    }
}

/// Day-picker label, e.g. "Fri"
pub fn short_day(iso_date: &str) -> String {
    match NaiveDate::parse_from_str(date_prefix(iso_date), DATE_FORMAT) {
        Ok(date) => date.format("%a").to_string(),
        Err(_) => iso_date.to_string(),
    }
}

/// Hourly-list label, e.g. "14:00"
pub fn hour_label(iso_datetime: &str) -> String {
    match NaiveDateTime::parse_from_str(iso_datetime, DATETIME_FORMAT) {
        Ok(ts) => ts.format("%H:%M").to_string(),
        Err(_) => iso_datetime.to_string(),
    }
}

/// The date part of an ISO-8601 timestamp ("2026-08-07T14:00" -> "2026-08-07").
/// An hourly entry belongs to a day when this prefix equals the day's date.
pub fn date_prefix(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}
