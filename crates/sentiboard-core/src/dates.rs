//! Date interpretation for `created_at` values.
//!
//! Two input shapes are accepted:
//!
//! - Relative: `"<n> <day|week|month|year>[s] ago"`, measured back from a
//!   reference instant. Days and weeks subtract calendar days; months and
//!   years subtract calendar months, clamping to the last day of a shorter
//!   month (31 March minus one month is 28/29 February).
//! - Absolute: RFC 3339, RFC 2822, and a list of common date and date-time
//!   layouts. Layouts without an offset are read as UTC.
//!
//! Anything else yields `None`, which callers treat as "no usable date".

use std::sync::LazyLock;

use chrono::{
    DateTime, Days, FixedOffset, Months, NaiveDate, NaiveDateTime, SecondsFormat, Utc,
};
use regex::Regex;

static RELATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s+(day|week|month|year)s?\s+ago").expect("relative date pattern")
});

/// Layouts carrying their own UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Date-time layouts without an offset.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts; midnight UTC is assumed.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%b %d %Y",
];

/// Interpret `value` relative to the current instant.
pub fn interpret(value: &str) -> Option<DateTime<FixedOffset>> {
    interpret_at(value, Utc::now())
}

/// Interpret `value`, resolving relative expressions against `now`.
pub fn interpret_at(value: &str, now: DateTime<Utc>) -> Option<DateTime<FixedOffset>> {
    if value.contains("ago")
        && let Some(caps) = RELATIVE.captures(value)
    {
        let amount: u32 = caps[1].parse().ok()?;
        let resolved = match &caps[2] {
            "day" => now.checked_sub_days(Days::new(amount.into())),
            "week" => now.checked_sub_days(Days::new(u64::from(amount) * 7)),
            "month" => now.checked_sub_months(Months::new(amount)),
            "year" => now.checked_sub_months(Months::new(amount.checked_mul(12)?)),
            _ => None,
        };
        return resolved.map(|dt| dt.fixed_offset());
    }

    parse_absolute(value)
}

/// Render a timestamp the way records store it: RFC 3339, millisecond
/// precision, `Z` for UTC.
pub fn format_timestamp(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_absolute(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt);
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|naive| naive.and_utc().fixed_offset());
        }
    }

    // A bare four-digit year means 1 January of that year.
    if value.len() == 4
        && value.bytes().all(|b| b.is_ascii_digit())
        && let Ok(year) = value.parse::<i32>()
    {
        return NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc().fixed_offset());
    }

    None
}
