//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use wt_core::filter::DateScope;
use wt_core::types::{EntryId, WorkspaceId};

/// Workspace time tracker.
///
/// Tracks elapsed work time across a small set of named workspaces,
/// persists completed intervals as entries, and reports over the recorded
/// history.
#[derive(Debug, Parser)]
#[command(name = "wt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the running timer and today's total.
    Status,

    /// Start timing a workspace.
    ///
    /// A timer running on another workspace is stopped and recorded first.
    Start {
        /// The workspace to start (1-based id).
        workspace: WorkspaceId,
    },

    /// Stop the running timer and record the interval.
    Stop {
        /// Description for the recorded entry.
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Inspect or reshape the workspace set.
    Workspaces {
        #[command(subcommand)]
        action: WorkspacesAction,
    },

    /// List recorded entries with optional filters.
    Entries {
        /// Only entries of this workspace.
        #[arg(long)]
        workspace: Option<WorkspaceId>,

        /// Only entries starting within this period.
        #[arg(long, value_enum, default_value = "all")]
        period: Period,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Replace an entry's description.
    Describe {
        /// The entry to edit.
        entry: EntryId,

        /// The new description; blank resets to the default.
        description: String,
    },

    /// Delete a single entry.
    Delete {
        /// The entry to delete.
        entry: EntryId,
    },

    /// Delete every recorded entry.
    Clear,

    /// Export all entries as CSV.
    Export {
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Workspace management actions.
#[derive(Debug, Subcommand)]
pub enum WorkspacesAction {
    /// List workspaces.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Rename a workspace.
    Rename {
        /// The workspace to rename.
        workspace: WorkspaceId,

        /// The new name; blank resets to the default.
        name: String,
    },

    /// Set how many workspaces are visible.
    ///
    /// Shrinking hides workspaces without deleting their history; growing
    /// the count again brings them back.
    Count {
        /// The new workspace count (at least 1).
        count: u32,
    },
}

/// Date window for entry listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Period {
    Today,
    Week,
    Month,
    All,
}

impl From<Period> for DateScope {
    fn from(period: Period) -> Self {
        match period {
            Period::Today => Self::Today,
            Period::Week => Self::Week,
            Period::Month => Self::Month,
            Period::All => Self::All,
        }
    }
}
