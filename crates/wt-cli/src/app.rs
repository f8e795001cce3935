//! Engine wiring shared by all subcommands.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use wt_core::tracker::Tracker;
use wt_db::Database;

use crate::state::{self, RuntimeState};
use crate::Config;

/// A loaded engine plus the path its timer state persists to.
pub struct App {
    pub tracker: Tracker<Database>,
    state_path: PathBuf,
}

impl App {
    /// Opens the database, loads the engine, and restores the live timer
    /// state from the adapter snapshot.
    pub fn open(config: &Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            fs::create_dir_all(parent).context("failed to create database directory")?;
        }
        let db = Database::open(&config.database_path).context("failed to open database")?;
        let mut tracker = Tracker::load(db, config.default_workspace_count.max(1))
            .context("failed to load tracker state")?;

        let state_path = state::state_path(&config.database_path);
        tracker.restore(state::load(&state_path).into_snapshot());
        Ok(Self {
            tracker,
            state_path,
        })
    }

    /// Persists the live timer state; call after any mutating command.
    pub fn save_state(&self) -> Result<()> {
        state::save(
            &self.state_path,
            &RuntimeState::from_snapshot(self.tracker.timer_snapshot()),
        )
    }
}
