//! Status command: running timer, per-workspace elapsed, today's total.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::{Local, Utc};

use wt_core::aggregate::total_today;
use wt_core::clock::format_hms;

use crate::app::App;

pub fn run<W: Write>(writer: &mut W, app: &App, database_path: &Path) -> Result<()> {
    let now = Utc::now();
    let now_local = Local::now();
    let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());

    writeln!(writer, "Workspace time tracker")?;
    writeln!(writer, "Database: {}", database_path.display())?;
    writeln!(writer, "Timezone: {timezone}")?;
    writeln!(writer)?;

    for workspace in app.tracker.workspaces() {
        let elapsed = app.tracker.current_elapsed(workspace.id, now);
        let marker = if app.tracker.active_workspace() == Some(workspace.id) {
            "  (running)"
        } else {
            ""
        };
        writeln!(
            writer,
            "{:>2}  {:<24} {}{marker}",
            workspace.id,
            workspace.name,
            format_hms(elapsed)
        )?;
    }

    let entries = app.tracker.all_entries();
    let total = total_today(
        entries.iter(),
        app.tracker.timers(),
        app.tracker.active_workspace(),
        &now_local,
    );
    writeln!(writer)?;
    writeln!(writer, "Today: {}", format_hms(total))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use wt_core::types::WorkspaceId;

    use super::*;

    use crate::commands::testing::{rendered, scratch_app};
    use crate::commands::start;

    #[test]
    fn status_lists_every_visible_workspace() {
        let (_temp, app, config) = scratch_app();
        let mut output = Vec::new();
        run(&mut output, &app, &config.database_path).unwrap();
        let output = rendered(output);

        assert!(output.contains("Workspace 1"));
        assert!(output.contains("Workspace 2"));
        assert!(output.contains("Today: 00:00:00"));
        assert!(!output.contains("(running)"));
    }

    #[test]
    fn status_marks_the_running_workspace() {
        let (_temp, mut app, config) = scratch_app();
        start::run(&mut Vec::new(), &mut app, WorkspaceId::new(2).unwrap()).unwrap();

        let mut output = Vec::new();
        run(&mut output, &app, &config.database_path).unwrap();
        let output = rendered(output);

        let running_line = output
            .lines()
            .find(|line| line.contains("(running)"))
            .expect("one workspace should be marked running");
        assert!(running_line.contains("Workspace 2"));
    }
}
