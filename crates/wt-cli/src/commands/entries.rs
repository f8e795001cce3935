//! Entries command: filtered listing with a summary footer.

use std::io::Write;

use anyhow::Result;
use chrono::Local;

use wt_core::aggregate::summarize;
use wt_core::clock::format_hms;
use wt_core::filter::{self, RecordsFilter};

use crate::app::App;
use crate::commands::workspace_name;

pub fn run<W: Write>(writer: &mut W, app: &App, filter: RecordsFilter, json: bool) -> Result<()> {
    let now = Local::now();
    let all = app.tracker.all_entries();
    let filtered = filter::apply(&all, filter, &now);
    let summary = summarize(&filtered);

    if json {
        let payload = serde_json::json!({
            "entries": filtered,
            "summary": summary,
        });
        writeln!(writer, "{}", serde_json::to_string_pretty(&payload)?)?;
        return Ok(());
    }

    if filtered.is_empty() {
        writeln!(writer, "No entries recorded.")?;
        return Ok(());
    }

    for entry in &filtered {
        let name = workspace_name(&app.tracker, entry.workspace_id);
        let start = entry.start_time.with_timezone(&Local);
        writeln!(
            writer,
            "{:>5}  {}  {:<24} {}  {}",
            entry.id,
            start.format("%Y-%m-%d %H:%M:%S"),
            name,
            format_hms(entry.duration_ms),
            entry.description
        )?;
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "{} entries, total {}, average {}",
        summary.count,
        format_hms(summary.total_ms),
        format_hms(summary.average_ms)
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use wt_core::types::WorkspaceId;

    use super::*;

    use crate::commands::testing::{rendered, scratch_app};
    use crate::commands::{start, stop};

    fn ws(id: u32) -> WorkspaceId {
        WorkspaceId::new(id).unwrap()
    }

    fn record(app: &mut crate::app::App, workspace: u32, description: &str) {
        start::run(&mut Vec::new(), app, ws(workspace)).unwrap();
        stop::run(&mut Vec::new(), app, Some(description)).unwrap();
    }

    #[test]
    fn empty_history_reports_no_entries() {
        let (_temp, app, _config) = scratch_app();
        let mut output = Vec::new();
        run(&mut output, &app, RecordsFilter::all(), false).unwrap();
        assert_eq!(rendered(output), "No entries recorded.\n");
    }

    #[test]
    fn listing_includes_descriptions_and_the_summary_footer() {
        let (_temp, mut app, _config) = scratch_app();
        record(&mut app, 1, "triage inbox");
        record(&mut app, 2, "pair review");

        let mut output = Vec::new();
        run(&mut output, &app, RecordsFilter::all(), false).unwrap();
        let output = rendered(output);

        assert!(output.contains("triage inbox"));
        assert!(output.contains("pair review"));
        assert!(output.contains("2 entries, total"));
    }

    #[test]
    fn workspace_filter_narrows_the_listing() {
        let (_temp, mut app, _config) = scratch_app();
        record(&mut app, 1, "first");
        record(&mut app, 2, "second");

        let filter = RecordsFilter {
            workspace: wt_core::filter::WorkspaceScope::Only(ws(2)),
            date: wt_core::filter::DateScope::All,
        };
        let mut output = Vec::new();
        run(&mut output, &app, filter, false).unwrap();
        let output = rendered(output);

        assert!(output.contains("second"));
        assert!(!output.contains("first"));
        assert!(output.contains("1 entries, total"));
    }

    #[test]
    fn json_output_carries_entries_and_summary() {
        let (_temp, mut app, _config) = scratch_app();
        record(&mut app, 1, "structured");

        let mut output = Vec::new();
        run(&mut output, &app, RecordsFilter::all(), true).unwrap();

        let payload: serde_json::Value = serde_json::from_str(&rendered(output)).unwrap();
        assert_eq!(payload["summary"]["count"], 1);
        assert_eq!(payload["entries"][0]["description"], "structured");
        assert_eq!(payload["entries"][0]["workspace_id"], 1);
    }
}
