//! The editing session over a set of documents.
//!
//! `Project` owns the document store and the undo history. Every mutation
//! goes through it so that whatever the store changes is recorded exactly
//! once.

use crate::command::{Command, CommandId, Direction};
use crate::document::{
    CellUpdate, Document, DocumentId, DocumentMeta, DocumentStore, FillRequest, TableData,
};
use crate::error::Result;
use crate::history::History;
use crate::toggle::{preferred_true, toggle_boolean_value};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Project {
    store: DocumentStore,
    history: History,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parts(store: DocumentStore, history: History) -> Self {
        Project { store, history }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn document(&self, id: &DocumentId) -> Option<&Document> {
        self.store.get(id)
    }

    /// Push a command the store produced, if any.
    fn record(&mut self, command: Option<Command>) -> Option<CommandId> {
        let command = command?;
        let id = command.id;
        self.history.push_entry(command);
        Some(id)
    }

    // Lifecycle (not undoable)

    pub fn open_document(
        &mut self,
        id: DocumentId,
        meta: DocumentMeta,
        table: TableData,
    ) -> Result<&Document> {
        self.store.open_document(id, meta, table)
    }

    pub fn reload_document(
        &mut self,
        id: &DocumentId,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        timestamp: i64,
    ) -> Result<()> {
        self.store.reload_document(id, headers, rows, timestamp)
    }

    /// Close a document and drop its commands from the history.
    ///
    /// A document later opened under the same id starts with no undo entries.
    pub fn close_document(&mut self, id: &DocumentId) -> Result<Document> {
        let doc = self.store.close_document(id)?;
        self.history.purge_document(id);
        Ok(doc)
    }

    pub fn mark_saved(&mut self, id: &DocumentId, timestamp: i64) -> Result<()> {
        self.store.mark_saved(id, timestamp)
    }

    pub fn touch_timestamp(&mut self, id: &DocumentId, timestamp: i64) -> Result<()> {
        self.store.touch_timestamp(id, timestamp)
    }

    pub fn set_ignored(&mut self, id: &DocumentId, ignored: bool) -> Result<()> {
        self.store.set_ignored(id, ignored)
    }

    pub fn toggle_ignored(&mut self, id: &DocumentId) -> Result<bool> {
        self.store.toggle_ignored(id)
    }

    /// Close the project: drop every document and the whole history.
    pub fn reset(&mut self) {
        self.store.reset();
        self.history.clear();
    }

    // Recorded edits

    pub fn update_cell(
        &mut self,
        id: &DocumentId,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Result<Option<CommandId>> {
        let command = self.store.update_cell(id, row, col, value)?;
        Ok(self.record(command))
    }

    pub fn batch_update_cells(
        &mut self,
        id: &DocumentId,
        updates: Vec<CellUpdate>,
        description: impl Into<String>,
    ) -> Result<Option<CommandId>> {
        let command = self.store.batch_update_cells(id, updates, description)?;
        Ok(self.record(command))
    }

    pub fn insert_rows(
        &mut self,
        id: &DocumentId,
        at: usize,
        count: usize,
    ) -> Result<Option<CommandId>> {
        let command = self.store.insert_rows(id, at, count)?;
        Ok(self.record(command))
    }

    pub fn delete_rows(&mut self, id: &DocumentId, indices: &[usize]) -> Result<Option<CommandId>> {
        let command = self.store.delete_rows(id, indices)?;
        Ok(self.record(command))
    }

    pub fn duplicate_rows(
        &mut self,
        id: &DocumentId,
        indices: &[usize],
    ) -> Result<Option<CommandId>> {
        let command = self.store.duplicate_rows(id, indices)?;
        Ok(self.record(command))
    }

    pub fn insert_columns(
        &mut self,
        id: &DocumentId,
        at: usize,
        count: usize,
    ) -> Result<Option<CommandId>> {
        let command = self.store.insert_columns(id, at, count)?;
        Ok(self.record(command))
    }

    pub fn delete_columns(
        &mut self,
        id: &DocumentId,
        indices: &[usize],
    ) -> Result<Option<CommandId>> {
        let command = self.store.delete_columns(id, indices)?;
        Ok(self.record(command))
    }

    pub fn update_header(
        &mut self,
        id: &DocumentId,
        col: usize,
        name: impl Into<String>,
    ) -> Result<Option<CommandId>> {
        let command = self.store.update_header(id, col, name)?;
        Ok(self.record(command))
    }

    pub fn fill(&mut self, id: &DocumentId, request: FillRequest) -> Result<Option<CommandId>> {
        let command = self.store.fill(id, request)?;
        Ok(self.record(command))
    }

    pub fn paste(
        &mut self,
        id: &DocumentId,
        at_row: usize,
        at_col: usize,
        text: &str,
    ) -> Result<Option<CommandId>> {
        let command = self.store.paste(id, at_row, at_col, text)?;
        Ok(self.record(command))
    }

    /// Flip boolean-like cells as one undoable edit.
    ///
    /// Blank cells take the true-spelling already used in their column;
    /// non-boolean text is left alone.
    pub fn toggle_cells(
        &mut self,
        id: &DocumentId,
        cells: &[(usize, usize)],
    ) -> Result<Option<CommandId>> {
        let doc = self.store.document(id)?;
        for &(row, col) in cells {
            doc.check_cell(row, col)?;
        }

        let mut spelling: HashMap<usize, &'static str> = HashMap::new();
        let updates = cells
            .iter()
            .map(|&(row, col)| {
                let preferred = *spelling
                    .entry(col)
                    .or_insert_with(|| preferred_true(doc, col));
                let current = doc.rows[row].cells[col].as_str();
                CellUpdate::new(row, col, toggle_boolean_value(current, preferred))
            })
            .collect();

        self.batch_update_cells(id, updates, "Toggle")
    }

    // History

    pub fn undo(&mut self) -> Option<CommandId> {
        self.history.undo(&mut self.store)
    }

    pub fn redo(&mut self) -> Option<CommandId> {
        self.history.redo(&mut self.store)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Register an observer called after each undo/redo has been applied.
    pub fn on_applied(&mut self, observer: impl FnMut(&Command, Direction) + 'static) {
        self.history.subscribe(observer);
    }
}
