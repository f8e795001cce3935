//! Stop command: flush the running timer into an entry.

use std::io::Write;

use anyhow::Result;
use chrono::Utc;

use wt_core::clock::format_compact;

use crate::app::App;
use crate::commands::workspace_name;

pub fn run<W: Write>(writer: &mut W, app: &mut App, message: Option<&str>) -> Result<()> {
    let now = Utc::now();
    let Some(active) = app.tracker.active_workspace() else {
        writeln!(writer, "No timer is running.")?;
        return Ok(());
    };

    let entry = app.tracker.stop(active, message.unwrap_or(""), now)?;
    app.save_state()?;

    match entry {
        Some(entry) => {
            let name = workspace_name(&app.tracker, entry.workspace_id);
            writeln!(
                writer,
                "Recorded {} on {name}: {} (entry {})",
                format_compact(entry.duration_ms),
                entry.description,
                entry.id
            )?;
        }
        None => writeln!(writer, "No timer is running.")?,
    }
    Ok(())
}
