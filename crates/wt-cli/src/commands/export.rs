//! Export command: serialize the entry history as CSV.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use wt_core::export::export_csv;

use crate::app::App;

pub fn run<W: Write>(writer: &mut W, app: &App, output: Option<&Path>) -> Result<()> {
    let pairs = app.tracker.workspace_entries();
    let csv = export_csv(pairs, &Local)?;

    match output {
        Some(path) => {
            fs::write(path, csv.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            let rows = csv.lines().count().saturating_sub(1);
            writeln!(writer, "Exported {rows} entries to {}", path.display())?;
        }
        None => write!(writer, "{csv}")?,
    }
    Ok(())
}
