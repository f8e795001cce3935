//! CLI subcommand implementations.

pub mod clear;
pub mod delete;
pub mod describe;
pub mod entries;
pub mod export;
pub mod start;
pub mod status;
pub mod stop;
pub mod workspaces;

use wt_core::tracker::Tracker;
use wt_core::types::{WorkspaceId, default_workspace_name};
use wt_db::Database;

/// Display name for a workspace, falling back to the default.
pub(crate) fn workspace_name(tracker: &Tracker<Database>, id: WorkspaceId) -> String {
    tracker
        .workspace(id)
        .map_or_else(|| default_workspace_name(id), |workspace| workspace.name.clone())
}
