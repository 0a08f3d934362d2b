//! Human-readable relative time for reminder labels ("in 5 minutes").

use chrono::{DateTime, TimeZone};

/// Describes `target` relative to `now`.
///
/// Future instants read `in …`, past ones `… ago`. Buckets round the way
/// list UIs usually do: seconds collapse to "a few seconds", 45 minutes and
/// up becomes "an hour", and so on up to years.
pub fn relative_label<Tz1: TimeZone, Tz2: TimeZone>(
    now: &DateTime<Tz1>,
    target: &DateTime<Tz2>,
) -> String {
    let delta = target.timestamp() - now.timestamp();
    let phrase = duration_phrase(delta.unsigned_abs());
    if delta >= 0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn duration_phrase(seconds: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    let round = |value: u64, unit: u64| (value + unit / 2) / unit;

    match seconds {
        s if s < 45 => "a few seconds".to_string(),
        s if s < 90 => "a minute".to_string(),
        s if s < 45 * MINUTE => format!("{} minutes", round(s, MINUTE)),
        s if s < 90 * MINUTE => "an hour".to_string(),
        s if s < 22 * HOUR => format!("{} hours", round(s, HOUR)),
        s if s < 36 * HOUR => "a day".to_string(),
        s if s < 26 * DAY => format!("{} days", round(s, DAY)),
        s if s < 45 * DAY => "a month".to_string(),
        s if s < 320 * DAY => format!("{} months", round(s, 30 * DAY).max(2)),
        s if s < 548 * DAY => "a year".to_string(),
        s => format!("{} years", round(s, 365 * DAY).max(2)),
    }
}
