//! Live timer state persisted between CLI invocations.
//!
//! The engine models a live in-process timer, but a CLI process exits
//! between user actions. The adapter therefore snapshots the running
//! timer and any banked durations to a small JSON file next to the
//! database and restores it on the next invocation. Writes are atomic
//! (temp file then rename).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wt_core::tracker::TimerSnapshot;
use wt_core::types::WorkspaceId;

/// On-disk shape of the timer snapshot.
///
/// At most one running timer is representable, mirroring the engine's
/// single-active-timer rule.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeState {
    /// The running timer, if any.
    pub active: Option<ActiveTimer>,

    /// Banked milliseconds per workspace not yet flushed to an entry.
    #[serde(default)]
    pub banked_ms: BTreeMap<WorkspaceId, i64>,
}

/// The single running timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTimer {
    pub workspace: WorkspaceId,
    pub started_at: DateTime<Utc>,
}

impl RuntimeState {
    /// Builds the on-disk shape from an engine snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: TimerSnapshot) -> Self {
        Self {
            active: snapshot
                .active
                .map(|(workspace, started_at)| ActiveTimer {
                    workspace,
                    started_at,
                }),
            banked_ms: snapshot.banked_ms,
        }
    }

    /// Converts into the engine snapshot shape.
    #[must_use]
    pub fn into_snapshot(self) -> TimerSnapshot {
        TimerSnapshot {
            active: self
                .active
                .map(|timer| (timer.workspace, timer.started_at)),
            banked_ms: self.banked_ms,
        }
    }
}

/// Path of the state file belonging to a database.
///
/// Kept next to the database so switching databases keeps their timer
/// states separate.
#[must_use]
pub fn state_path(database_path: &Path) -> PathBuf {
    database_path.with_extension("state.json")
}

/// Loads the snapshot, falling back to empty state on a missing or
/// unreadable file.
#[must_use]
pub fn load(path: &Path) -> RuntimeState {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "corrupted timer state file, resetting"
            );
            RuntimeState::default()
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => RuntimeState::default(),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to read timer state file, resetting"
            );
            RuntimeState::default()
        }
    }
}

/// Saves the snapshot atomically (write temp file, rename over).
pub fn save(path: &Path, state: &RuntimeState) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let content =
        serde_json::to_string_pretty(state).context("failed to serialize timer state")?;
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, &content)
        .with_context(|| format!("failed to write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;

    fn ws(id: u32) -> WorkspaceId {
        WorkspaceId::new(id).unwrap()
    }

    #[test]
    fn state_path_sits_next_to_the_database() {
        let path = state_path(Path::new("/data/wt/wt.db"));
        assert_eq!(path, Path::new("/data/wt/wt.state.json"));
    }

    #[test]
    fn missing_file_loads_as_empty_state() {
        let temp = TempDir::new().unwrap();
        let state = load(&temp.path().join("absent.state.json"));
        assert_eq!(state, RuntimeState::default());
    }

    #[test]
    fn corrupted_file_resets_to_empty_state() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("wt.state.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(load(&path), RuntimeState::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("wt.state.json");
        let state = RuntimeState {
            active: Some(ActiveTimer {
                workspace: ws(2),
                started_at: Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
            }),
            banked_ms: BTreeMap::from([(ws(1), 5_000)]),
        };

        save(&path, &state).unwrap();
        assert_eq!(load(&path), state);
        // No temp file is left behind.
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn snapshot_conversion_round_trips() {
        let snapshot = TimerSnapshot {
            active: Some((ws(3), Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap())),
            banked_ms: BTreeMap::from([(ws(2), 1_500)]),
        };
        let state = RuntimeState::from_snapshot(snapshot.clone());
        assert_eq!(state.into_snapshot(), snapshot);
    }
}
