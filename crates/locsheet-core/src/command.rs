//! Reversible edit records.
//!
//! A [`Command`] is a plain value describing one logical edit with everything
//! needed to revert and replay it, captured when the edit was made. Applying
//! a command in either [`Direction`] is done by a [`CommandTarget`]
//! (the document store); the history only moves commands between stacks.
//!
//! [`CommandTarget`]: crate::history::CommandTarget

use crate::document::DocumentId;
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// Unique id of a command.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct CommandId(Uuid);

impl CommandId {
    pub fn new() -> Self {
        CommandId(Uuid::new_v4())
    }
}

impl Default for CommandId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Which way a command is being applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Undo,
    Redo,
}

/// One cell's value before and after an edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub row: usize,
    pub col: usize,
    pub before: String,
    pub after: String,
    /// Row key before the edit; only set for first-column edits, which refresh the key
    pub key_before: Option<String>,
}

impl CellChange {
    pub fn value(&self, direction: Direction) -> &str {
        match direction {
            Direction::Undo => &self.before,
            Direction::Redo => &self.after,
        }
    }
}

/// A full row captured at its position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowSnapshot {
    pub index: usize,
    pub cells: Vec<String>,
    pub key: String,
}

/// A full column captured at its position: header plus one value per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSnapshot {
    pub index: usize,
    pub header: String,
    pub values: Vec<String>,
}

/// The edit a command records.
///
/// Snapshot lists (`removed`, `added`) are sorted ascending by index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandKind {
    /// A single cell edit
    EditCell(CellChange),
    /// Cell edits committed as one atomic group
    EditCells(Vec<CellChange>),
    InsertRows {
        at: usize,
        count: usize,
    },
    DeleteRows {
        removed: Vec<RowSnapshot>,
    },
    /// Clones inserted below their originals; snapshots hold the clones at their new positions
    DuplicateRows {
        added: Vec<RowSnapshot>,
    },
    InsertColumns {
        at: usize,
        count: usize,
    },
    DeleteColumns {
        removed: Vec<ColumnSnapshot>,
    },
    RenameHeader {
        col: usize,
        before: String,
        after: String,
    },
    /// Drag-fill: `appended_rows` blank rows added at `append_at`, then `changes` written
    Fill {
        append_at: usize,
        appended_rows: usize,
        changes: Vec<CellChange>,
    },
    /// Block paste, recorded like a fill
    Paste {
        append_at: usize,
        appended_rows: usize,
        changes: Vec<CellChange>,
    },
}

impl CommandKind {
    /// Short operation name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::EditCell(_) => "cell_edit",
            CommandKind::EditCells(_) => "batch_edit",
            CommandKind::InsertRows { .. } => "row_insert",
            CommandKind::DeleteRows { .. } => "row_delete",
            CommandKind::DuplicateRows { .. } => "row_duplicate",
            CommandKind::InsertColumns { .. } => "col_insert",
            CommandKind::DeleteColumns { .. } => "col_delete",
            CommandKind::RenameHeader { .. } => "header_rename",
            CommandKind::Fill { .. } => "fill",
            CommandKind::Paste { .. } => "paste",
        }
    }
}

/// What the selection should cover once a command has been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionHint {
    Cell { row: usize, col: usize },
    Cells(Vec<(usize, usize)>),
    Rows(Vec<usize>),
    Columns(Vec<usize>),
    Clear,
}

/// A reversible record of one logical edit.
#[derive(Clone, Debug)]
pub struct Command {
    pub id: CommandId,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub document_id: DocumentId,
    pub kind: CommandKind,
}

impl Command {
    pub fn new(document_id: DocumentId, description: impl Into<String>, kind: CommandKind) -> Self {
        Command {
            id: CommandId::new(),
            timestamp: Utc::now(),
            description: description.into(),
            document_id,
            kind,
        }
    }

    /// Selection the UI should restore after applying this command in `direction`.
    pub fn selection(&self, direction: Direction) -> SelectionHint {
        match (&self.kind, direction) {
            (CommandKind::EditCell(change), _) => SelectionHint::Cell {
                row: change.row,
                col: change.col,
            },
            (CommandKind::EditCells(changes), _) => {
                SelectionHint::Cells(changes.iter().map(|c| (c.row, c.col)).collect())
            }
            (
                CommandKind::Fill { changes, .. } | CommandKind::Paste { changes, .. },
                Direction::Redo,
            ) => {
                SelectionHint::Cells(changes.iter().map(|c| (c.row, c.col)).collect())
            }
            (
                CommandKind::Fill {
                    changes,
                    append_at,
                    appended_rows,
                }
                | CommandKind::Paste {
                    changes,
                    append_at,
                    appended_rows,
                },
                Direction::Undo,
            ) => {
                let kept = changes
                    .iter()
                    .filter(|c| *appended_rows == 0 || c.row < *append_at)
                    .map(|c| (c.row, c.col))
                    .collect();
                SelectionHint::Cells(kept)
            }
            (CommandKind::InsertRows { at, count }, Direction::Redo) => {
                SelectionHint::Rows((*at..at + count).collect())
            }
            (CommandKind::DuplicateRows { added }, Direction::Redo) => {
                SelectionHint::Rows(added.iter().map(|r| r.index).collect())
            }
            (CommandKind::InsertColumns { at, count }, Direction::Redo) => {
                SelectionHint::Columns((*at..at + count).collect())
            }
            (CommandKind::RenameHeader { col, .. }, _) => SelectionHint::Columns(vec![*col]),
            (CommandKind::InsertRows { .. }, Direction::Undo)
            | (CommandKind::DuplicateRows { .. }, Direction::Undo)
            | (CommandKind::InsertColumns { .. }, Direction::Undo)
            | (CommandKind::DeleteRows { .. }, _)
            | (CommandKind::DeleteColumns { .. }, _) => SelectionHint::Clear,
        }
    }
}
