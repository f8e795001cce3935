//! The timer/workspace state engine.
//!
//! [`Tracker`] owns every piece of mutable state: the workspace set, one
//! timer per workspace, the in-memory entry view, and the active-workspace
//! pointer. All mutation is routed through its methods; there are no
//! ambient globals. Mutating operations persist through the
//! [`EntryStore`] first and only touch the in-memory view once the write
//! succeeded, so a storage failure leaves the engine exactly as it was.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::store::{EntryStore, NewEntry, StoreError};
use crate::types::{
    Entry, EntryId, TimerState, Workspace, WorkspaceId, default_workspace_name,
    normalize_description, visible_ids,
};

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A storage call failed; the attempted action did not take effect.
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// Workspace counts below 1 are rejected before any mutation.
    #[error("workspace count must be at least 1, got {0}")]
    InvalidWorkspaceCount(u32),

    /// The workspace id is outside the visible range `[1, count]`.
    #[error("no such workspace: {0}")]
    UnknownWorkspace(WorkspaceId),
}

/// Live timer state exported for the presentation adapter.
///
/// Holds at most one running timer, so the single-active-timer rule
/// cannot be violated by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerSnapshot {
    /// The running timer, if any: which workspace and since when.
    pub active: Option<(WorkspaceId, DateTime<Utc>)>,

    /// Banked milliseconds per workspace not yet flushed to an entry.
    pub banked_ms: BTreeMap<WorkspaceId, i64>,
}

/// The state engine owning workspaces, timers, and the entry view.
pub struct Tracker<S> {
    store: S,
    count: u32,
    workspaces: BTreeMap<WorkspaceId, Workspace>,
    timers: BTreeMap<WorkspaceId, TimerState>,
    // Newest-first per workspace, mirroring the store's ordering.
    entries: BTreeMap<WorkspaceId, Vec<Entry>>,
    active: Option<WorkspaceId>,
}

impl<S: EntryStore> Tracker<S> {
    /// Loads the engine from storage.
    ///
    /// When no workspace count has been persisted yet, `fallback_count`
    /// is applied and persisted. Workspaces the persisted count promises
    /// but storage does not know are created lazily with default names.
    pub fn load(mut store: S, fallback_count: u32) -> Result<Self, EngineError> {
        if fallback_count == 0 {
            return Err(EngineError::InvalidWorkspaceCount(fallback_count));
        }
        let count = match store.workspace_count()? {
            Some(count) if count >= 1 => count,
            _ => {
                store.set_workspace_count(fallback_count)?;
                fallback_count
            }
        };

        let mut workspaces = BTreeMap::new();
        for workspace in store.list_workspaces()? {
            workspaces.insert(workspace.id, workspace);
        }
        for id in visible_ids(count) {
            if !workspaces.contains_key(&id) {
                let workspace = Workspace::with_default_name(id);
                store.upsert_workspace(&workspace)?;
                workspaces.insert(id, workspace);
            }
        }

        let mut entries: BTreeMap<WorkspaceId, Vec<Entry>> = BTreeMap::new();
        for entry in store.list_entries(None)? {
            entries.entry(entry.workspace_id).or_default().push(entry);
        }
        let mut timers = BTreeMap::new();
        for id in workspaces.keys().copied() {
            timers.insert(id, TimerState::default());
            entries.entry(id).or_default();
        }

        Ok(Self {
            store,
            count,
            workspaces,
            timers,
            entries,
            active: None,
        })
    }

    /// Restores live timer state from an adapter snapshot.
    ///
    /// Ids the engine does not know are ignored; a fresh database does not
    /// inherit a stale snapshot's timers.
    pub fn restore(&mut self, snapshot: TimerSnapshot) {
        for (id, banked_ms) in snapshot.banked_ms {
            if let Some(timer) = self.timers.get_mut(&id) {
                timer.banked_ms = banked_ms.max(0);
            }
        }
        if let Some((id, started_at)) = snapshot.active {
            if let Some(timer) = self.timers.get_mut(&id) {
                timer.started_at = Some(started_at);
                self.active = Some(id);
            }
        }
    }

    /// Exports live timer state for the presentation adapter to persist.
    #[must_use]
    pub fn timer_snapshot(&self) -> TimerSnapshot {
        let banked_ms = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.banked_ms != 0)
            .map(|(id, timer)| (*id, timer.banked_ms))
            .collect();
        let active = self.active.and_then(|id| {
            self.timers
                .get(&id)
                .and_then(|timer| timer.started_at)
                .map(|started_at| (id, started_at))
        });
        TimerSnapshot { active, banked_ms }
    }

    /// Starts timing a workspace.
    ///
    /// A running timer on another workspace is flushed to an entry first;
    /// that entry is returned. Starting the already-active workspace is a
    /// no-op.
    pub fn start(
        &mut self,
        workspace_id: WorkspaceId,
        now: DateTime<Utc>,
    ) -> Result<Option<Entry>, EngineError> {
        self.ensure_visible(workspace_id)?;
        if self.active == Some(workspace_id) {
            return Ok(None);
        }
        let flushed = match self.active {
            Some(previous) => self.stop(previous, "", now)?,
            None => None,
        };
        self.timers.entry(workspace_id).or_default().started_at = Some(now);
        self.active = Some(workspace_id);
        tracing::debug!(workspace = workspace_id.get(), "timer started");
        Ok(flushed)
    }

    /// Stops a workspace's timer and flushes the interval to an entry.
    ///
    /// Returns `None` without touching anything when the timer is not
    /// running. The entry is durably created before any state changes; a
    /// storage failure leaves the timer running.
    pub fn stop(
        &mut self,
        workspace_id: WorkspaceId,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Entry>, EngineError> {
        self.ensure_visible(workspace_id)?;
        let Some(timer) = self.timers.get(&workspace_id).copied() else {
            return Ok(None);
        };
        let Some(started_at) = timer.started_at else {
            return Ok(None);
        };

        let duration_ms = timer.banked_ms + (now - started_at).num_milliseconds();
        let draft = NewEntry {
            workspace_id,
            start_time: started_at,
            end_time: now,
            duration_ms,
            description: normalize_description(description),
        };
        let id = self.store.create_entry(&draft)?;
        let entry = Entry {
            id,
            workspace_id,
            start_time: draft.start_time,
            end_time: draft.end_time,
            duration_ms: draft.duration_ms,
            description: draft.description,
        };

        let timer = self.timers.entry(workspace_id).or_default();
        timer.started_at = None;
        timer.banked_ms = 0;
        if self.active == Some(workspace_id) {
            self.active = None;
        }
        self.entries
            .entry(workspace_id)
            .or_default()
            .insert(0, entry.clone());
        tracing::debug!(workspace = workspace_id.get(), duration_ms, "timer flushed");
        Ok(Some(entry))
    }

    /// Effective elapsed time for a workspace at `now`, in milliseconds.
    ///
    /// Pure read; safe to call at arbitrary frequency.
    #[must_use]
    pub fn current_elapsed(&self, workspace_id: WorkspaceId, now: DateTime<Utc>) -> i64 {
        self.timers
            .get(&workspace_id)
            .map_or(0, |timer| timer.elapsed_ms(now))
    }

    /// Applies a new workspace count.
    ///
    /// A running timer is flushed first so no interval is lost; the
    /// flushed entry, if any, is returned. Ids above the new count stay in
    /// storage and in memory — they are only hidden, so shrinking is
    /// reversible without data loss.
    pub fn set_workspace_count(
        &mut self,
        new_count: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<Entry>, EngineError> {
        if new_count == 0 {
            return Err(EngineError::InvalidWorkspaceCount(new_count));
        }
        let flushed = match self.active {
            Some(active) => self.stop(active, "", now)?,
            None => None,
        };

        let mut created = Vec::new();
        for id in visible_ids(new_count) {
            if !self.workspaces.contains_key(&id) {
                let workspace = Workspace::with_default_name(id);
                self.store.upsert_workspace(&workspace)?;
                created.push(workspace);
            }
        }
        self.store.set_workspace_count(new_count)?;

        for workspace in created {
            let id = workspace.id;
            self.workspaces.insert(id, workspace);
            self.timers.insert(id, TimerState::default());
            self.entries.entry(id).or_default();
        }
        self.count = new_count;
        tracing::debug!(count = new_count, "workspace count changed");
        Ok(flushed)
    }

    /// Renames a workspace and returns the applied name.
    ///
    /// Names are trimmed; a blank name resets to the default.
    pub fn rename_workspace(
        &mut self,
        workspace_id: WorkspaceId,
        name: &str,
    ) -> Result<String, EngineError> {
        self.ensure_visible(workspace_id)?;
        let trimmed = name.trim();
        let name = if trimmed.is_empty() {
            default_workspace_name(workspace_id)
        } else {
            trimmed.to_string()
        };
        let workspace = Workspace {
            id: workspace_id,
            name: name.clone(),
        };
        self.store.upsert_workspace(&workspace)?;
        self.workspaces.insert(workspace_id, workspace);
        Ok(name)
    }

    /// Replaces an entry's description, normalizing blank input.
    pub fn edit_description(
        &mut self,
        entry_id: EntryId,
        description: &str,
    ) -> Result<(), EngineError> {
        let description = normalize_description(description);
        self.store.update_entry_description(entry_id, &description)?;
        for entries in self.entries.values_mut() {
            if let Some(entry) = entries.iter_mut().find(|entry| entry.id == entry_id) {
                entry.description = description;
                return Ok(());
            }
        }
        Ok(())
    }

    /// Deletes a single entry.
    pub fn delete_entry(&mut self, entry_id: EntryId) -> Result<(), EngineError> {
        self.store.delete_entry(entry_id)?;
        for entries in self.entries.values_mut() {
            entries.retain(|entry| entry.id != entry_id);
        }
        Ok(())
    }

    /// Deletes every entry across all workspaces.
    pub fn clear_entries(&mut self) -> Result<(), EngineError> {
        self.store.delete_all_entries()?;
        for entries in self.entries.values_mut() {
            entries.clear();
        }
        Ok(())
    }

    /// Number of visible workspaces.
    #[must_use]
    pub const fn workspace_count(&self) -> u32 {
        self.count
    }

    /// The workspace currently accumulating time, if any.
    #[must_use]
    pub const fn active_workspace(&self) -> Option<WorkspaceId> {
        self.active
    }

    /// Visible workspaces in id order.
    pub fn workspaces(&self) -> impl Iterator<Item = &Workspace> {
        let count = self.count;
        self.workspaces
            .values()
            .filter(move |workspace| workspace.id.get() <= count)
    }

    /// A visible workspace by id.
    #[must_use]
    pub fn workspace(&self, id: WorkspaceId) -> Option<&Workspace> {
        if id.get() <= self.count {
            self.workspaces.get(&id)
        } else {
            None
        }
    }

    /// Entries of one workspace, newest first.
    #[must_use]
    pub fn entries(&self, id: WorkspaceId) -> &[Entry] {
        self.entries.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Every visible entry, newest start time first.
    #[must_use]
    pub fn all_entries(&self) -> Vec<Entry> {
        let mut all: Vec<Entry> = self
            .workspaces()
            .flat_map(|workspace| self.entries(workspace.id).iter().cloned())
            .collect();
        all.sort_by(|a, b| {
            b.start_time
                .cmp(&a.start_time)
                .then_with(|| b.id.cmp(&a.id))
        });
        all
    }

    /// Pairs each visible workspace with its entry list.
    #[must_use]
    pub fn workspace_entries(&self) -> Vec<(&Workspace, &[Entry])> {
        self.workspaces()
            .map(|workspace| (workspace, self.entries(workspace.id)))
            .collect()
    }

    /// Per-workspace live timer states.
    #[must_use]
    pub const fn timers(&self) -> &BTreeMap<WorkspaceId, TimerState> {
        &self.timers
    }

    fn ensure_visible(&self, id: WorkspaceId) -> Result<(), EngineError> {
        if id.get() <= self.count {
            Ok(())
        } else {
            Err(EngineError::UnknownWorkspace(id))
        }
    }
}
