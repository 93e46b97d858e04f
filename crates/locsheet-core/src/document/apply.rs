//! Replaying and reverting commands against the store.

use super::{Document, DocumentStore};
use crate::command::{CellChange, Command, CommandKind, Direction};
use crate::error::{LocsheetError, Result};
use crate::history::CommandTarget;
use tracing::{debug, warn};

/// Write the before/after side of each change (row keys included).
fn write_changes(doc: &mut Document, changes: &[CellChange], direction: Direction) -> Result<()> {
    for change in changes {
        doc.check_cell(change.row, change.col)?;
    }
    let mut ordered: Vec<&CellChange> = changes.iter().collect();
    if direction == Direction::Undo {
        ordered.reverse();
    }
    for change in ordered {
        let row = &mut doc.rows[change.row];
        row.cells[change.col] = change.value(direction).to_string();
        if let Some(key_before) = &change.key_before {
            row.key = match direction {
                Direction::Undo => key_before.clone(),
                Direction::Redo => change.after.clone(),
            };
        }
    }
    Ok(())
}

fn check_row_span(doc: &Document, at: usize, count: usize) -> Result<()> {
    if at + count > doc.rows.len() {
        return Err(LocsheetError::RowOutOfRange {
            row: at + count,
            len: doc.rows.len(),
        });
    }
    Ok(())
}

fn check_col_span(doc: &Document, at: usize, count: usize) -> Result<()> {
    if at + count > doc.headers.len() {
        return Err(LocsheetError::ColumnOutOfRange {
            col: at + count,
            len: doc.headers.len(),
        });
    }
    Ok(())
}

/// Check that snapshots at ascending `indices` can be re-inserted into `len` slots.
fn check_reinsert(indices: impl Iterator<Item = usize>, len: usize, row: bool) -> Result<()> {
    for (inserted, index) in indices.enumerate() {
        if index > len + inserted {
            return Err(if row {
                LocsheetError::RowOutOfRange { row: index, len }
            } else {
                LocsheetError::ColumnOutOfRange { col: index, len }
            });
        }
    }
    Ok(())
}

fn apply_kind(doc: &mut Document, kind: &CommandKind, direction: Direction) -> Result<()> {
    match (kind, direction) {
        (CommandKind::EditCell(change), _) => {
            write_changes(doc, std::slice::from_ref(change), direction)?
        }
        (CommandKind::EditCells(changes), _) => write_changes(doc, changes, direction)?,

        (CommandKind::InsertRows { at, count }, Direction::Undo) => {
            check_row_span(doc, *at, *count)?;
            doc.remove_row_range(*at, *count);
        }
        (CommandKind::InsertRows { at, count }, Direction::Redo) => {
            check_row_span(doc, *at, 0)?;
            doc.insert_blank_rows(*at, *count);
        }

        (CommandKind::DeleteRows { removed }, Direction::Undo) => {
            check_reinsert(removed.iter().map(|r| r.index), doc.rows.len(), true)?;
            doc.restore_rows(removed);
        }
        (CommandKind::DeleteRows { removed }, Direction::Redo) => {
            let indices: Vec<usize> = removed.iter().map(|r| r.index).collect();
            if let Some(&last) = indices.last() {
                doc.check_row(last)?;
            }
            doc.remove_rows(&indices);
        }

        (CommandKind::DuplicateRows { added }, Direction::Undo) => {
            let indices: Vec<usize> = added.iter().map(|r| r.index).collect();
            if let Some(&last) = indices.last() {
                doc.check_row(last)?;
            }
            doc.remove_rows(&indices);
        }
        (CommandKind::DuplicateRows { added }, Direction::Redo) => {
            check_reinsert(added.iter().map(|r| r.index), doc.rows.len(), true)?;
            doc.restore_rows(added);
        }

        (CommandKind::InsertColumns { at, count }, Direction::Undo) => {
            check_col_span(doc, *at, *count)?;
            doc.remove_column_range(*at, *count);
        }
        (CommandKind::InsertColumns { at, count }, Direction::Redo) => {
            check_col_span(doc, *at, 0)?;
            doc.insert_blank_columns(*at, *count);
        }

        (CommandKind::DeleteColumns { removed }, Direction::Undo) => {
            check_reinsert(removed.iter().map(|c| c.index), doc.headers.len(), false)?;
            if removed.iter().any(|c| c.values.len() != doc.rows.len()) {
                return Err(LocsheetError::RowOutOfRange {
                    row: removed.first().map_or(0, |c| c.values.len()),
                    len: doc.rows.len(),
                });
            }
            doc.restore_columns(removed);
        }
        (CommandKind::DeleteColumns { removed }, Direction::Redo) => {
            let indices: Vec<usize> = removed.iter().map(|c| c.index).collect();
            if let Some(&last) = indices.last() {
                doc.check_col(last)?;
            }
            doc.remove_columns(&indices);
        }

        (CommandKind::RenameHeader { col, before, after }, _) => {
            doc.check_col(*col)?;
            doc.headers[*col] = match direction {
                Direction::Undo => before.clone(),
                Direction::Redo => after.clone(),
            };
        }

        (
            CommandKind::Fill {
                append_at,
                appended_rows,
                changes,
            }
            | CommandKind::Paste {
                append_at,
                appended_rows,
                changes,
            },
            Direction::Undo,
        ) => {
            check_row_span(doc, *append_at, *appended_rows)?;
            write_changes(doc, changes, direction)?;
            if *appended_rows > 0 {
                doc.remove_row_range(*append_at, *appended_rows);
            }
        }
        (
            CommandKind::Fill {
                append_at,
                appended_rows,
                changes,
            }
            | CommandKind::Paste {
                append_at,
                appended_rows,
                changes,
            },
            Direction::Redo,
        ) => {
            if *appended_rows > 0 {
                if *append_at != doc.rows.len() {
                    return Err(LocsheetError::RowOutOfRange {
                        row: *append_at,
                        len: doc.rows.len(),
                    });
                }
                doc.insert_blank_rows(*append_at, *appended_rows);
            }
            if let Err(err) = write_changes(doc, changes, direction) {
                if *appended_rows > 0 {
                    doc.remove_row_range(*append_at, *appended_rows);
                }
                return Err(err);
            }
        }
    }
    Ok(())
}

impl CommandTarget for DocumentStore {
    fn apply(&mut self, command: &Command, direction: Direction) {
        let result = self
            .document_mut(&command.document_id)
            .and_then(|doc| apply_kind(doc, &command.kind, direction).map(|()| doc));
        match result {
            Ok(doc) => {
                doc.dirty = true;
                debug!(
                    command = %command.id,
                    kind = command.kind.name(),
                    document = %command.document_id,
                    ?direction,
                    "command applied"
                );
            }
            Err(err) => warn!(
                command = %command.id,
                description = %command.description,
                ?direction,
                error = %err,
                "command no longer fits its document, skipped"
            ),
        }
    }
}
