//! locsheet-core - UI-agnostic document model, edit operations and undo history.

pub mod command;
pub mod document;
pub mod error;
pub mod history;
pub mod project;
pub mod toggle;
pub mod validate;

pub use command::{
    CellChange, ColumnSnapshot, Command, CommandId, CommandKind, Direction, RowSnapshot,
    SelectionHint,
};
pub use document::{
    CellUpdate, DEFAULT_COPY_SUFFIX, Document, DocumentId, DocumentMeta, DocumentStore, FillRequest,
    Row, TableData,
};
pub use error::{LocsheetError, Result};
pub use history::{CommandTarget, DEFAULT_HISTORY_LIMIT, History};
pub use project::Project;
pub use validate::{DEFAULT_KEY_PATTERN, IssueKind, KeyValidator, ValidationIssue};

pub use locsheet_fill::{FillAxis, FillMode};
