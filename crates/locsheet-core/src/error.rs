//! Error types for Locsheet core.

use crate::document::DocumentId;
use thiserror::Error;

/// Errors that can occur while editing documents
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocsheetError {
    #[error("Unknown document: {0}")]
    UnknownDocument(DocumentId),

    #[error("Document already open: {0}")]
    DocumentExists(DocumentId),

    #[error("Row {row} out of range (document has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("Column {col} out of range (document has {len} columns)")]
    ColumnOutOfRange { col: usize, len: usize },

    #[error("Row {row} has {found} cells but the document has {expected} columns")]
    RowTooWide {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid key pattern: {0}")]
    InvalidKeyPattern(String),

    #[error("Invalid fill source: {0}")]
    FillSource(String),
}

pub type Result<T> = std::result::Result<T, LocsheetError>;
