//! Human-readable sizes and times for front ends

use chrono::{DateTime, Utc};

const SIZE_UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Format a byte count with 1024-based units, e.g. `1.5 KB`.
///
/// Trailing zeros after the decimal point are dropped.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{value:.decimals$}");
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };

    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

const TIME_UNITS: &[(&str, i64)] = &[
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

/// Describe `timestamp` relative to `now`: "in 3 days", "2 hours ago",
/// "tomorrow". The largest unit with a rounded magnitude of at least one
/// is used.
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_seconds = ((timestamp - now).num_milliseconds() as f64 / 1000.0).floor();

    for &(unit, seconds) in TIME_UNITS {
        // Round half up, matching how the figures are shown elsewhere
        let interval = (diff_seconds / seconds as f64 + 0.5).floor() as i64;
        if interval.abs() >= 1 {
            return phrase(interval, unit);
        }
    }

    if diff_seconds > 0.0 {
        "in a few seconds".to_string()
    } else {
        "a few seconds ago".to_string()
    }
}

fn phrase(interval: i64, unit: &str) -> String {
    match (interval, unit) {
        (1, "day") => return "tomorrow".to_string(),
        (-1, "day") => return "yesterday".to_string(),
        (1, "week" | "month" | "year") => return format!("next {unit}"),
        (-1, "week" | "month" | "year") => return format!("last {unit}"),
        _ => {}
    }

    let count = interval.abs();
    let plural = if count == 1 { "" } else { "s" };
    if interval > 0 {
        format!("in {count} {unit}{plural}")
    } else {
        format!("{count} {unit}{plural} ago")
    }
}
