//! Totals and averages over recorded entries.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::types::{Entry, TimerState, WorkspaceId};

/// Summary statistics over an arbitrary entry set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub total_ms: i64,
    pub average_ms: i64,
}

/// Total time worked today across all workspaces, in milliseconds.
///
/// Sums every entry whose start falls on the current calendar day in
/// `now`'s timezone, plus the live elapsed time of the running timer if
/// one is active — the live portion is included even when that interval
/// started before today. Read-only; tolerates zero entries and no active
/// timer.
pub fn total_today<'a, Tz: TimeZone>(
    entries: impl IntoIterator<Item = &'a Entry>,
    timers: &BTreeMap<WorkspaceId, TimerState>,
    active: Option<WorkspaceId>,
    now: &DateTime<Tz>,
) -> i64 {
    let today = now.date_naive();
    let tz = now.timezone();
    let mut total: i64 = entries
        .into_iter()
        .filter(|entry| entry.start_time.with_timezone(&tz).date_naive() == today)
        .map(|entry| entry.duration_ms)
        .sum();

    if let Some(id) = active {
        if let Some(timer) = timers.get(&id) {
            if timer.is_running() {
                total += timer.elapsed_ms(now.with_timezone(&Utc));
            }
        }
    }

    total
}

/// Count, total and average duration of `entries`.
///
/// The average is integer milliseconds (floored); an empty set summarizes
/// to zeros.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn summarize(entries: &[Entry]) -> Summary {
    let count = entries.len();
    let total_ms: i64 = entries.iter().map(|entry| entry.duration_ms).sum();
    let average_ms = if count == 0 { 0 } else { total_ms / count as i64 };
    Summary {
        count,
        total_ms,
        average_ms,
    }
}
