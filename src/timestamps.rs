//! Timestamps

use jiff::{Timestamp, civil::DateTime, fmt::rfc2822, tz::TimeZone};

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 instants, RFC 2822 dates (the backend's default JSON
/// encoding) and bare civil date-times, which are taken as-is.
pub fn parse(raw: &str) -> Option<DateTime> {
    let raw = raw.trim();

    if let Ok(timestamp) = raw.parse::<Timestamp>() {
        return Some(timestamp.to_zoned(TimeZone::UTC).datetime());
    }

    if let Ok(zoned) = rfc2822::parse(raw) {
        return Some(zoned.datetime());
    }

    raw.parse::<DateTime>().ok()
}

/// Render a backend timestamp as `YYYY-MM-DD HH:MM`, falling back to the raw text.
pub fn display(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => parse(raw).map_or_else(
            || raw.to_string(),
            |datetime| datetime.strftime("%Y-%m-%d %H:%M").to_string(),
        ),
        None => "-".to_string(),
    }
}
