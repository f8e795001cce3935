//! Clear command: delete every recorded entry.

use std::io::Write;

use anyhow::Result;

use crate::app::App;

pub fn run<W: Write>(writer: &mut W, app: &mut App) -> Result<()> {
    app.tracker.clear_entries()?;
    writeln!(writer, "Cleared all entries.")?;
    Ok(())
}
