//! Time helpers shared by aggregation, filtering and export.
//!
//! The timezone is always an explicit parameter; nothing here reads the
//! ambient system timezone.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone};

/// First instant of `date` in `tz`.
///
/// DST fall-back midnights resolve to the earlier instant. A
/// spring-forward gap at midnight falls back to 01:00, which always
/// exists.
pub fn midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let start = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&start) {
        LocalResult::Single(instant) | LocalResult::Ambiguous(instant, _) => instant,
        LocalResult::None => {
            let one_am = date.and_time(NaiveTime::from_hms_opt(1, 0, 0).unwrap());
            match tz.from_local_datetime(&one_am) {
                LocalResult::Single(instant) | LocalResult::Ambiguous(instant, _) => instant,
                LocalResult::None => tz.from_utc_datetime(&start),
            }
        }
    }
}

/// First instant of the calendar day containing `now`, in its timezone.
pub fn day_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    midnight(now.date_naive(), &now.timezone())
}

/// Renders a millisecond duration as `HH:MM:SS` (seconds floored).
///
/// Hours are not wrapped at 24; negative durations render as `00:00:00`.
#[must_use]
pub fn format_hms(duration_ms: i64) -> String {
    let total_seconds = duration_ms.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Renders a millisecond duration compactly for terminal display.
#[must_use]
pub fn format_compact(duration_ms: i64) -> String {
    let total_seconds = duration_ms.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else if minutes >= 1 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
