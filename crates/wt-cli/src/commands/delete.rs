//! Delete command: remove a single entry.

use std::io::Write;

use anyhow::Result;

use wt_core::types::EntryId;

use crate::app::App;

pub fn run<W: Write>(writer: &mut W, app: &mut App, entry: EntryId) -> Result<()> {
    app.tracker.delete_entry(entry)?;
    writeln!(writer, "Deleted entry {entry}.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use wt_core::types::WorkspaceId;

    use super::*;

    use crate::commands::testing::{rendered, scratch_app};
    use crate::commands::{start, stop};

    #[test]
    fn delete_removes_the_entry() {
        let (_temp, mut app, _config) = scratch_app();
        let ws1 = WorkspaceId::new(1).unwrap();
        start::run(&mut Vec::new(), &mut app, ws1).unwrap();
        stop::run(&mut Vec::new(), &mut app, Some("short-lived")).unwrap();
        let entry_id = app.tracker.entries(ws1)[0].id;

        let mut output = Vec::new();
        run(&mut output, &mut app, entry_id).unwrap();
        assert_eq!(rendered(output), format!("Deleted entry {entry_id}.\n"));
        assert!(app.tracker.entries(ws1).is_empty());
    }
}
