use crate::error::{LocsheetError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Suffix appended to the key of a duplicated row
pub const DEFAULT_COPY_SUFFIX: &str = "_copy";

/// Identifier of an open document (one tabular file).
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        DocumentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        DocumentId::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        DocumentId(id)
    }
}

/// One record of a document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    /// Position of the row in its document (kept in sync by `renumber`)
    pub index: usize,
    /// Cell values, one per header
    pub cells: Vec<String>,
    /// Localization key, cached from the first column
    pub key: String,
}

impl Row {
    /// Build a row from cell values, deriving the key from the first cell.
    pub fn new(index: usize, cells: Vec<String>) -> Self {
        let key = cells.first().cloned().unwrap_or_default();
        Row { index, cells, key }
    }

    /// An empty row with `width` blank cells.
    pub fn blank(index: usize, width: usize) -> Self {
        Row {
            index,
            cells: vec![String::new(); width],
            key: String::new(),
        }
    }
}

/// File-level metadata handed over by the file decoding collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentMeta {
    pub file_name: String,
    pub file_path: Option<PathBuf>,
    pub encoding: String,
    pub last_modified: i64,
}

/// Parsed tabular content: a header line plus data lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        TableData { headers, rows }
    }

    /// Convert to rows of exactly `headers.len()` cells.
    ///
    /// Short lines are padded with empty cells; lines wider than the header
    /// are rejected rather than truncated.
    pub(crate) fn into_rows(self) -> Result<(Vec<String>, Vec<Row>)> {
        let width = self.headers.len();
        let mut rows = Vec::with_capacity(self.rows.len());
        for (index, mut cells) in self.rows.into_iter().enumerate() {
            if cells.len() > width {
                return Err(LocsheetError::RowTooWide {
                    row: index,
                    expected: width,
                    found: cells.len(),
                });
            }
            cells.resize(width, String::new());
            rows.push(Row::new(index, cells));
        }
        Ok((self.headers, rows))
    }
}

/// One tabular file under edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub file_name: String,
    pub file_path: Option<PathBuf>,
    pub encoding: String,
    /// Column names
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    /// Whether the document has unsaved changes
    pub dirty: bool,
    /// Whether project-wide passes (validation) skip this document
    pub ignored: bool,
    /// Modification time of the file on disk, in milliseconds since the epoch
    pub last_modified: i64,
}

impl Document {
    pub fn new(id: DocumentId, meta: DocumentMeta, table: TableData) -> Result<Self> {
        let (headers, rows) = table.into_rows()?;
        Ok(Document {
            id,
            file_name: meta.file_name,
            file_path: meta.file_path,
            encoding: meta.encoding,
            headers,
            rows,
            dirty: false,
            ignored: false,
            last_modified: meta.last_modified,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.cells.get(col).map(String::as_str)
    }

    /// Reset every row's `index` to its position.
    pub(crate) fn renumber(&mut self) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.index = index;
        }
    }

    pub(crate) fn check_row(&self, row: usize) -> Result<()> {
        if row < self.rows.len() {
            Ok(())
        } else {
            Err(LocsheetError::RowOutOfRange {
                row,
                len: self.rows.len(),
            })
        }
    }

    pub(crate) fn check_col(&self, col: usize) -> Result<()> {
        if col < self.headers.len() {
            Ok(())
        } else {
            Err(LocsheetError::ColumnOutOfRange {
                col,
                len: self.headers.len(),
            })
        }
    }

    pub(crate) fn check_cell(&self, row: usize, col: usize) -> Result<()> {
        self.check_row(row)?;
        self.check_col(col)
    }
}

/// Owns every open document, keyed by id.
///
/// All content and structural edits go through this type; see `ops.rs`.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    pub(crate) documents: BTreeMap<DocumentId, Document>,
    pub(crate) copy_suffix: String,
}

impl DocumentStore {
    pub fn new() -> Self {
        DocumentStore {
            documents: BTreeMap::new(),
            copy_suffix: DEFAULT_COPY_SUFFIX.to_string(),
        }
    }

    /// Use a different suffix for the keys of duplicated rows.
    pub fn with_copy_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.copy_suffix = suffix.into();
        self
    }

    pub fn copy_suffix(&self) -> &str {
        &self.copy_suffix
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Documents in id order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.documents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.documents.values().any(|doc| doc.dirty)
    }

    pub(crate) fn document(&self, id: &DocumentId) -> Result<&Document> {
        self.documents
            .get(id)
            .ok_or_else(|| LocsheetError::UnknownDocument(id.clone()))
    }

    pub(crate) fn document_mut(&mut self, id: &DocumentId) -> Result<&mut Document> {
        self.documents
            .get_mut(id)
            .ok_or_else(|| LocsheetError::UnknownDocument(id.clone()))
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
