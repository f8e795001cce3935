//! Storage contract consumed by the engine.
//!
//! The engine never talks to a database directly; it depends on this
//! narrow trait and treats every failure as fatal to the action that
//! issued the call.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{Entry, EntryId, Workspace, WorkspaceId};

/// A storage failure.
///
/// When a store call fails the initiating action is abandoned: the engine
/// leaves its state exactly as it was before the call and surfaces this
/// error to the caller. Retries, if any, belong to the storage backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("storage error: {message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    /// Wraps a backend failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A completed interval ready to be persisted.
///
/// The store assigns the entry id on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub workspace_id: WorkspaceId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: i64,
    pub description: String,
}

/// Durable CRUD for entries and workspace metadata.
pub trait EntryStore {
    /// Returns the persisted workspace count, if one has been set.
    fn workspace_count(&self) -> Result<Option<u32>, StoreError>;

    /// Persists the workspace count.
    fn set_workspace_count(&mut self, count: u32) -> Result<(), StoreError>;

    /// Lists all known workspaces in id order.
    fn list_workspaces(&self) -> Result<Vec<Workspace>, StoreError>;

    /// Creates a workspace or updates its name.
    fn upsert_workspace(&mut self, workspace: &Workspace) -> Result<(), StoreError>;

    /// Lists entries, newest start time first. `None` covers every
    /// workspace.
    fn list_entries(&self, workspace: Option<WorkspaceId>) -> Result<Vec<Entry>, StoreError>;

    /// Persists a completed interval and returns its assigned id.
    fn create_entry(&mut self, entry: &NewEntry) -> Result<EntryId, StoreError>;

    /// Replaces an entry's description.
    fn update_entry_description(
        &mut self,
        id: EntryId,
        description: &str,
    ) -> Result<(), StoreError>;

    /// Deletes a single entry.
    fn delete_entry(&mut self, id: EntryId) -> Result<(), StoreError>;

    /// Deletes every entry across all workspaces.
    fn delete_all_entries(&mut self) -> Result<(), StoreError>;
}
