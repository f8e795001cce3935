//! Describe command: replace an entry's description.

use std::io::Write;

use anyhow::Result;

use wt_core::types::EntryId;

use crate::app::App;

pub fn run<W: Write>(
    writer: &mut W,
    app: &mut App,
    entry: EntryId,
    description: &str,
) -> Result<()> {
    app.tracker.edit_description(entry, description)?;
    writeln!(writer, "Updated entry {entry}.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use wt_core::types::{DEFAULT_DESCRIPTION, WorkspaceId};

    use super::*;

    use crate::commands::testing::{rendered, scratch_app};
    use crate::commands::{start, stop};

    #[test]
    fn describe_rewrites_the_stored_text() {
        let (_temp, mut app, _config) = scratch_app();
        let ws1 = WorkspaceId::new(1).unwrap();
        start::run(&mut Vec::new(), &mut app, ws1).unwrap();
        stop::run(&mut Vec::new(), &mut app, Some("draft")).unwrap();
        let entry = app.tracker.entries(ws1)[0].clone();

        let mut output = Vec::new();
        run(&mut output, &mut app, entry.id, "  final wording ").unwrap();
        assert_eq!(rendered(output), format!("Updated entry {}.\n", entry.id));
        assert_eq!(app.tracker.entries(ws1)[0].description, "final wording");
    }

    #[test]
    fn blank_description_falls_back_to_the_default() {
        let (_temp, mut app, _config) = scratch_app();
        let ws1 = WorkspaceId::new(1).unwrap();
        start::run(&mut Vec::new(), &mut app, ws1).unwrap();
        stop::run(&mut Vec::new(), &mut app, Some("draft")).unwrap();
        let entry_id = app.tracker.entries(ws1)[0].id;

        run(&mut Vec::new(), &mut app, entry_id, "   ").unwrap();
        assert_eq!(
            app.tracker.entries(ws1)[0].description,
            DEFAULT_DESCRIPTION
        );
    }
}
