//! Workspace and date-window predicates over the entry history.

use chrono::{DateTime, Months, NaiveDate, TimeZone, Utc};

use crate::clock::midnight;
use crate::types::{Entry, WorkspaceId};

/// Which workspaces a records query covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkspaceScope {
    /// Every workspace passes.
    #[default]
    All,

    /// Only entries of this workspace pass.
    Only(WorkspaceId),
}

/// Local-midnight-anchored date windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateScope {
    /// No date bound.
    #[default]
    All,

    /// Start of the current calendar day onwards.
    Today,

    /// Seven days before the start of the current day onwards.
    Week,

    /// One calendar month before the start of the current day onwards.
    ///
    /// Month arithmetic, not a fixed 30 days: subtracting a month from a
    /// date with no equivalent day clamps to the target month's last day
    /// (Mar 31 minus one month is Feb 28, or Feb 29 in a leap year).
    Month,
}

/// Transient filter state applied to the full entry history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordsFilter {
    pub workspace: WorkspaceScope,
    pub date: DateScope,
}

impl RecordsFilter {
    /// The identity filter: every entry passes.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            workspace: WorkspaceScope::All,
            date: DateScope::All,
        }
    }
}

/// Applies `filter` to `entries`, preserving their order.
///
/// Pure and non-destructive: the input is untouched and a new vector is
/// returned. Applying the same filter to its own output returns it
/// unchanged, and [`RecordsFilter::all`] is the identity.
pub fn apply<Tz: TimeZone>(
    entries: &[Entry],
    filter: RecordsFilter,
    now: &DateTime<Tz>,
) -> Vec<Entry> {
    let cutoff = date_cutoff(filter.date, now);
    entries
        .iter()
        .filter(|entry| match filter.workspace {
            WorkspaceScope::All => true,
            WorkspaceScope::Only(id) => entry.workspace_id == id,
        })
        .filter(|entry| cutoff.is_none_or(|cutoff| entry.start_time >= cutoff))
        .cloned()
        .collect()
}

/// Inclusive lower bound on entry start times, or `None` for no bound.
fn date_cutoff<Tz: TimeZone>(scope: DateScope, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
    let today = now.date_naive();
    let anchor = match scope {
        DateScope::All => return None,
        DateScope::Today => today,
        DateScope::Week => today - chrono::Duration::days(7),
        DateScope::Month => today
            .checked_sub_months(Months::new(1))
            .unwrap_or(NaiveDate::MIN),
    };
    Some(midnight(anchor, &now.timezone()).with_timezone(&Utc))
}
