//! Workspace management: list, rename, resize.

use std::io::Write;

use anyhow::Result;
use chrono::Utc;

use wt_core::clock::format_compact;
use wt_core::types::{Workspace, WorkspaceId};

use crate::app::App;
use crate::commands::workspace_name;

pub fn list<W: Write>(writer: &mut W, app: &App, json: bool) -> Result<()> {
    if json {
        let workspaces: Vec<&Workspace> = app.tracker.workspaces().collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&workspaces)?)?;
        return Ok(());
    }

    for workspace in app.tracker.workspaces() {
        let marker = if app.tracker.active_workspace() == Some(workspace.id) {
            "  (running)"
        } else {
            ""
        };
        writeln!(writer, "{:>2}  {}{marker}", workspace.id, workspace.name)?;
    }
    Ok(())
}

pub fn rename<W: Write>(
    writer: &mut W,
    app: &mut App,
    workspace: WorkspaceId,
    name: &str,
) -> Result<()> {
    let applied = app.tracker.rename_workspace(workspace, name)?;
    writeln!(writer, "Workspace {workspace} is now \"{applied}\".")?;
    Ok(())
}

pub fn count<W: Write>(writer: &mut W, app: &mut App, count: u32) -> Result<()> {
    let flushed = app.tracker.set_workspace_count(count, Utc::now())?;
    app.save_state()?;

    if let Some(entry) = flushed {
        let name = workspace_name(&app.tracker, entry.workspace_id);
        writeln!(
            writer,
            "Recorded {} on {name} before resizing (entry {})",
            format_compact(entry.duration_ms),
            entry.id
        )?;
    }
    writeln!(writer, "Tracking {count} workspaces.")?;
    Ok(())
}
