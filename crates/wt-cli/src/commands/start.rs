//! Start command: begin timing a workspace.

use std::io::Write;

use anyhow::Result;
use chrono::Utc;

use wt_core::clock::format_compact;
use wt_core::types::WorkspaceId;

use crate::app::App;
use crate::commands::workspace_name;

pub fn run<W: Write>(writer: &mut W, app: &mut App, workspace: WorkspaceId) -> Result<()> {
    let now = Utc::now();
    let already_active = app.tracker.active_workspace() == Some(workspace);
    let flushed = app.tracker.start(workspace, now)?;
    app.save_state()?;

    if let Some(entry) = flushed {
        let name = workspace_name(&app.tracker, entry.workspace_id);
        writeln!(
            writer,
            "Recorded {} on {name} (entry {})",
            format_compact(entry.duration_ms),
            entry.id
        )?;
    }

    let name = workspace_name(&app.tracker, workspace);
    if already_active {
        writeln!(writer, "{name} is already running.")?;
    } else {
        writeln!(writer, "Started {name}.")?;
    }
    Ok(())
}
