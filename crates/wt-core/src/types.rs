//! Core type definitions with validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Workspace ids are dense positive integers starting at 1.
    #[error("workspace id must be at least 1")]
    ZeroWorkspaceId,

    /// The provided value could not be parsed as an id.
    #[error("invalid {field}: {value}")]
    InvalidId { field: &'static str, value: String },
}

/// Identifier of a workspace slot.
///
/// Ids are dense and start at 1 with no gaps; the valid range is always
/// `[1, workspace_count]`. Zero is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct WorkspaceId(u32);

impl WorkspaceId {
    /// Creates a workspace id after validation.
    pub const fn new(id: u32) -> Result<Self, ValidationError> {
        if id == 0 {
            return Err(ValidationError::ZeroWorkspaceId);
        }
        Ok(Self(id))
    }

    /// Returns the numeric id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for WorkspaceId {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkspaceId> for u32 {
    fn from(id: WorkspaceId) -> Self {
        id.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for WorkspaceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.parse::<u32>().map_err(|_| ValidationError::InvalidId {
            field: "workspace id",
            value: s.to_string(),
        })?;
        Self::new(raw)
    }
}

/// Iterates the dense visible id range `[1, count]`.
pub fn visible_ids(count: u32) -> impl Iterator<Item = WorkspaceId> {
    (1..=count).map(WorkspaceId)
}

/// Identifier of a persisted entry, assigned by the store on creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntryId(i64);

impl EntryId {
    /// Wraps a store-assigned row id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the numeric id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntryId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self).map_err(|_| ValidationError::InvalidId {
            field: "entry id",
            value: s.to_string(),
        })
    }
}

/// One of the independent time-tracking buckets.
///
/// Workspaces are created when the count grows past their id (or lazily
/// when missing from storage) and never deleted; shrinking the count only
/// hides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
}

impl Workspace {
    /// Creates a workspace carrying the default name for its id.
    #[must_use]
    pub fn with_default_name(id: WorkspaceId) -> Self {
        Self {
            name: default_workspace_name(id),
            id,
        }
    }
}

/// The name a workspace falls back to when none is set.
#[must_use]
pub fn default_workspace_name(id: WorkspaceId) -> String {
    format!("Workspace {id}")
}

/// Description given to entries that carry no text.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Trims a description, falling back to [`DEFAULT_DESCRIPTION`] when the
/// trimmed result is empty.
#[must_use]
pub fn normalize_description(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEFAULT_DESCRIPTION.to_string()
    } else {
        trimmed.to_string()
    }
}

/// A persisted, completed work interval.
///
/// `duration_ms` is derived once when the timer stops and is never
/// recomputed; `start_time <= end_time` always holds. The description is
/// the only field that may change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub workspace_id: WorkspaceId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: i64,
    pub description: String,
}

/// Live timer state for one workspace.
///
/// At most one workspace across the whole system is running at any
/// instant; the engine enforces that rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerState {
    /// Instant the running interval began, if the timer is running.
    pub started_at: Option<DateTime<Utc>>,

    /// Time banked from previous start/stop cycles that has not yet been
    /// flushed into an entry. Reset to zero when a stop flushes.
    pub banked_ms: i64,
}

impl TimerState {
    /// Effective elapsed time at `now`, in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> i64 {
        match self.started_at {
            Some(started_at) => self.banked_ms + (now - started_at).num_milliseconds(),
            None => self.banked_ms,
        }
    }

    /// Whether the timer is currently running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
}
