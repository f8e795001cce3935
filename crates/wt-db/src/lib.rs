//! SQLite storage layer for the workspace time tracker.
//!
//! Implements the [`EntryStore`] contract with `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send`
//! but not `Sync`: an instance can be moved between threads but not shared
//! without external synchronization.
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in ISO 8601 format with millisecond
//! precision (e.g. `2024-01-15T10:30:00.000Z`), always UTC. This keeps
//! lexicographic ordering equal to chronological ordering and the stored
//! values human-readable.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use wt_core::store::{EntryStore, NewEntry, StoreError};
use wt_core::types::{Entry, EntryId, Workspace, WorkspaceId};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to parse a persisted entry timestamp.
    #[error("invalid timestamp for entry {entry_id}: {timestamp}")]
    TimestampParse {
        entry_id: i64,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The persisted workspace count is not a number.
    #[error("invalid persisted workspace count: {value}")]
    InvalidCount { value: String },

    /// A persisted workspace id is outside the valid range.
    #[error("invalid persisted workspace id: {value}")]
    InvalidWorkspaceId { value: i64 },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

// Raw entry row before timestamp parsing.
struct RawEntry {
    id: i64,
    workspace_id: i64,
    start_time: String,
    end_time: String,
    duration_ms: i64,
    description: String,
}

const ENTRY_COLUMNS: &str = "id, workspace_id, start_time, end_time, duration_ms, description";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// Idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS config (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS workspaces (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            );

            -- Entries table: completed work intervals
            -- start_time/end_time: ISO 8601 UTC (e.g. '2024-01-15T10:30:00.000Z')
            CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                workspace_id INTEGER NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                duration_ms INTEGER NOT NULL,
                description TEXT NOT NULL,
                FOREIGN KEY (workspace_id) REFERENCES workspaces(id)
            );

            CREATE INDEX IF NOT EXISTS idx_entries_workspace ON entries(workspace_id);
            CREATE INDEX IF NOT EXISTS idx_entries_start ON entries(start_time);
            ",
        )?;
        Ok(())
    }

    /// Returns the persisted workspace count, if one has been set.
    pub fn workspace_count(&self) -> Result<Option<u32>, DbError> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM config WHERE key = 'workspace_count'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        match value {
            Some(value) => {
                let count = value
                    .parse::<u32>()
                    .map_err(|_| DbError::InvalidCount {
                        value: value.clone(),
                    })?;
                Ok(Some(count))
            }
            None => Ok(None),
        }
    }

    /// Persists the workspace count.
    pub fn set_workspace_count(&mut self, count: u32) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO config (key, value) VALUES ('workspace_count', ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
            [count.to_string()],
        )?;
        Ok(())
    }

    /// Lists all workspaces ordered by id.
    pub fn list_workspaces(&self) -> Result<Vec<Workspace>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM workspaces ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut workspaces = Vec::new();
        for row in rows {
            let (id, name) = row?;
            workspaces.push(Workspace {
                id: decode_workspace_id(id)?,
                name,
            });
        }
        Ok(workspaces)
    }

    /// Creates a workspace or updates its name.
    pub fn upsert_workspace(&mut self, workspace: &Workspace) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO workspaces (id, name) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name
            ",
            params![i64::from(workspace.id.get()), workspace.name],
        )?;
        Ok(())
    }

    /// Lists entries ordered by start time descending.
    ///
    /// `None` covers every workspace.
    pub fn list_entries(&self, workspace: Option<WorkspaceId>) -> Result<Vec<Entry>, DbError> {
        let mut raw = Vec::new();
        match workspace {
            Some(id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "
                    SELECT {ENTRY_COLUMNS}
                    FROM entries
                    WHERE workspace_id = ?
                    ORDER BY start_time DESC, id DESC
                    "
                ))?;
                let rows = stmt.query_map([i64::from(id.get())], raw_entry_row)?;
                for row in rows {
                    raw.push(row?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "
                    SELECT {ENTRY_COLUMNS}
                    FROM entries
                    ORDER BY start_time DESC, id DESC
                    "
                ))?;
                let rows = stmt.query_map([], raw_entry_row)?;
                for row in rows {
                    raw.push(row?);
                }
            }
        }
        raw.into_iter().map(decode_entry).collect()
    }

    /// Persists a completed interval and returns its assigned id.
    pub fn create_entry(&mut self, entry: &NewEntry) -> Result<EntryId, DbError> {
        self.conn.execute(
            "
            INSERT INTO entries (workspace_id, start_time, end_time, duration_ms, description)
            VALUES (?, ?, ?, ?, ?)
            ",
            params![
                i64::from(entry.workspace_id.get()),
                format_timestamp(entry.start_time),
                format_timestamp(entry.end_time),
                entry.duration_ms,
                entry.description,
            ],
        )?;
        Ok(EntryId::new(self.conn.last_insert_rowid()))
    }

    /// Replaces an entry's description.
    pub fn update_entry_description(
        &mut self,
        id: EntryId,
        description: &str,
    ) -> Result<(), DbError> {
        self.conn.execute(
            "UPDATE entries SET description = ? WHERE id = ?",
            params![description, id.get()],
        )?;
        Ok(())
    }

    /// Deletes a single entry.
    pub fn delete_entry(&mut self, id: EntryId) -> Result<(), DbError> {
        self.conn
            .execute("DELETE FROM entries WHERE id = ?", [id.get()])?;
        Ok(())
    }

    /// Deletes every entry across all workspaces.
    pub fn delete_all_entries(&mut self) -> Result<(), DbError> {
        let deleted = self.conn.execute("DELETE FROM entries", [])?;
        tracing::debug!(deleted, "cleared all entries");
        Ok(())
    }
}

fn raw_entry_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntry> {
    Ok(RawEntry {
        id: row.get(0)?,
        workspace_id: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        duration_ms: row.get(4)?,
        description: row.get(5)?,
    })
}

fn decode_entry(raw: RawEntry) -> Result<Entry, DbError> {
    Ok(Entry {
        id: EntryId::new(raw.id),
        workspace_id: decode_workspace_id(raw.workspace_id)?,
        start_time: parse_timestamp(&raw.start_time, raw.id)?,
        end_time: parse_timestamp(&raw.end_time, raw.id)?,
        duration_ms: raw.duration_ms,
        description: raw.description,
    })
}

fn decode_workspace_id(value: i64) -> Result<WorkspaceId, DbError> {
    u32::try_from(value)
        .ok()
        .and_then(|id| WorkspaceId::new(id).ok())
        .ok_or(DbError::InvalidWorkspaceId { value })
}

fn parse_timestamp(timestamp: &str, entry_id: i64) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            entry_id,
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn into_store_error(err: DbError) -> StoreError {
    StoreError::new(err.to_string())
}

impl EntryStore for Database {
    fn workspace_count(&self) -> Result<Option<u32>, StoreError> {
        Database::workspace_count(self).map_err(into_store_error)
    }

    fn set_workspace_count(&mut self, count: u32) -> Result<(), StoreError> {
        Database::set_workspace_count(self, count).map_err(into_store_error)
    }

    fn list_workspaces(&self) -> Result<Vec<Workspace>, StoreError> {
        Database::list_workspaces(self).map_err(into_store_error)
    }

    fn upsert_workspace(&mut self, workspace: &Workspace) -> Result<(), StoreError> {
        Database::upsert_workspace(self, workspace).map_err(into_store_error)
    }

    fn list_entries(&self, workspace: Option<WorkspaceId>) -> Result<Vec<Entry>, StoreError> {
        Database::list_entries(self, workspace).map_err(into_store_error)
    }

    fn create_entry(&mut self, entry: &NewEntry) -> Result<EntryId, StoreError> {
        Database::create_entry(self, entry).map_err(into_store_error)
    }

    fn update_entry_description(
        &mut self,
        id: EntryId,
        description: &str,
    ) -> Result<(), StoreError> {
        Database::update_entry_description(self, id, description).map_err(into_store_error)
    }

    fn delete_entry(&mut self, id: EntryId) -> Result<(), StoreError> {
        Database::delete_entry(self, id).map_err(into_store_error)
    }

    fn delete_all_entries(&mut self) -> Result<(), StoreError> {
        Database::delete_all_entries(self).map_err(into_store_error)
    }
}
