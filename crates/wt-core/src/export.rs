//! Deterministic CSV serialization of the entry history.

use std::fmt::Write as _;

use chrono::TimeZone;
use thiserror::Error;

use crate::clock::format_hms;
use crate::types::{Entry, Workspace};

/// CSV column header.
pub const CSV_HEADER: &str =
    "Workspace,Date,Start Time,End Time,Duration,Duration (seconds),Description";

/// An export was requested with zero entries to serialize.
///
/// The condition is reported to the caller instead of producing an empty
/// file.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no entries to export")]
pub struct EmptyExport;

struct Row {
    name: String,
    date: String,
    start: String,
    end: String,
    duration: String,
    seconds: i64,
    description: String,
}

/// Serializes every workspace's entries into CSV text.
///
/// Dates and times render in `tz`. Rows sort descending by the rendered
/// `(date, start time)` pair, which matches chronological order because
/// dates are ISO-8601 and times are fixed-width. The workspace name and
/// description fields are always quoted with inner quotes doubled; the
/// date, time and numeric fields never are. Lines are `\n`-terminated.
pub fn export_csv<'a, Tz, I>(workspaces: I, tz: &Tz) -> Result<String, EmptyExport>
where
    Tz: TimeZone,
    I: IntoIterator<Item = (&'a Workspace, &'a [Entry])>,
{
    let mut rows = Vec::new();
    for (workspace, entries) in workspaces {
        for entry in entries {
            let start = entry.start_time.with_timezone(tz).naive_local();
            let end = entry.end_time.with_timezone(tz).naive_local();
            rows.push(Row {
                name: workspace.name.clone(),
                date: start.format("%Y-%m-%d").to_string(),
                start: start.format("%H:%M:%S").to_string(),
                end: end.format("%H:%M:%S").to_string(),
                duration: format_hms(entry.duration_ms),
                seconds: entry.duration_ms / 1000,
                description: entry.description.clone(),
            });
        }
    }
    if rows.is_empty() {
        return Err(EmptyExport);
    }

    rows.sort_by(|a, b| {
        (b.date.as_str(), b.start.as_str()).cmp(&(a.date.as_str(), a.start.as_str()))
    });

    let mut output = String::new();
    output.push_str(CSV_HEADER);
    output.push('\n');
    for row in rows {
        writeln!(
            output,
            "{},{},{},{},{},{},{}",
            quote(&row.name),
            row.date,
            row.start,
            row.end,
            row.duration,
            row.seconds,
            quote(&row.description),
        )
        .unwrap();
    }
    Ok(output)
}

/// Double-quote-wraps a text field, doubling inner quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
