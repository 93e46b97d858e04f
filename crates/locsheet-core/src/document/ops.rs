use super::{Document, DocumentId, DocumentStore, Row};
use crate::command::{CellChange, ColumnSnapshot, Command, CommandKind, RowSnapshot};
use crate::error::{LocsheetError, Result};
use locsheet_fill::{FillAxis, FillMode, generate_fill_data};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use tracing::{debug, trace};

/// A requested cell write, part of a batch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellUpdate {
    pub row: usize,
    pub col: usize,
    pub value: String,
}

impl CellUpdate {
    pub fn new(row: usize, col: usize, value: impl Into<String>) -> Self {
        CellUpdate {
            row,
            col,
            value: value.into(),
        }
    }
}

/// A drag-fill from a selected block towards `target`.
///
/// For [`FillAxis::Down`] `target` is the last row to fill (rows past the end
/// of the document are appended); for [`FillAxis::Right`] it is the last
/// column to fill, which must exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FillRequest {
    pub rows: RangeInclusive<usize>,
    pub cols: RangeInclusive<usize>,
    pub axis: FillAxis,
    pub target: usize,
    pub mode: FillMode,
}

/// Sort and dedup caller-supplied indices.
fn normalize_indices(indices: &[usize]) -> Vec<usize> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}

impl Document {
    /// Write one cell, returning what it held before.
    ///
    /// First-column writes also refresh the row key.
    pub(crate) fn set_cell(&mut self, row: usize, col: usize, value: String) -> CellChange {
        let target = &mut self.rows[row];
        let key_before = (col == 0).then(|| std::mem::replace(&mut target.key, value.clone()));
        let before = std::mem::replace(&mut target.cells[col], value.clone());
        CellChange {
            row,
            col,
            before,
            after: value,
            key_before,
        }
    }

    pub(crate) fn insert_blank_rows(&mut self, at: usize, count: usize) {
        let width = self.headers.len();
        self.rows
            .splice(at..at, (0..count).map(|_| Row::blank(0, width)));
        self.renumber();
    }

    pub(crate) fn remove_row_range(&mut self, at: usize, count: usize) {
        self.rows.drain(at..at + count);
        self.renumber();
    }

    /// Remove rows at sorted, distinct `indices`, highest first.
    pub(crate) fn remove_rows(&mut self, indices: &[usize]) -> Vec<RowSnapshot> {
        let mut removed: Vec<RowSnapshot> = indices
            .iter()
            .rev()
            .map(|&index| {
                let row = self.rows.remove(index);
                RowSnapshot {
                    index,
                    cells: row.cells,
                    key: row.key,
                }
            })
            .collect();
        removed.reverse();
        self.renumber();
        removed
    }

    /// Insert snapshots (sorted ascending) back at their own indices.
    pub(crate) fn restore_rows(&mut self, snapshots: &[RowSnapshot]) {
        for snapshot in snapshots {
            self.rows.insert(
                snapshot.index,
                Row {
                    index: snapshot.index,
                    cells: snapshot.cells.clone(),
                    key: snapshot.key.clone(),
                },
            );
        }
        self.renumber();
    }

    /// Append `appended_rows` blank rows, then apply `writes` in order.
    pub(crate) fn append_and_write(
        &mut self,
        appended_rows: usize,
        writes: Vec<(usize, usize, String)>,
    ) -> Vec<CellChange> {
        if appended_rows > 0 {
            self.insert_blank_rows(self.rows.len(), appended_rows);
        }
        writes
            .into_iter()
            .map(|(row, col, value)| self.set_cell(row, col, value))
            .collect()
    }

    pub(crate) fn insert_blank_columns(&mut self, at: usize, count: usize) {
        self.headers
            .splice(at..at, std::iter::repeat_n(String::new(), count));
        for row in &mut self.rows {
            row.cells
                .splice(at..at, std::iter::repeat_n(String::new(), count));
        }
    }

    pub(crate) fn remove_column_range(&mut self, at: usize, count: usize) {
        self.headers.drain(at..at + count);
        for row in &mut self.rows {
            row.cells.drain(at..at + count);
        }
    }

    /// Remove columns at sorted, distinct `indices`, highest first.
    pub(crate) fn remove_columns(&mut self, indices: &[usize]) -> Vec<ColumnSnapshot> {
        let mut removed: Vec<ColumnSnapshot> = indices
            .iter()
            .rev()
            .map(|&index| {
                let header = self.headers.remove(index);
                let values = self
                    .rows
                    .iter_mut()
                    .map(|row| row.cells.remove(index))
                    .collect();
                ColumnSnapshot {
                    index,
                    header,
                    values,
                }
            })
            .collect();
        removed.reverse();
        removed
    }

    /// Insert column snapshots (sorted ascending) back at their own indices.
    pub(crate) fn restore_columns(&mut self, snapshots: &[ColumnSnapshot]) {
        for snapshot in snapshots {
            self.headers.insert(snapshot.index, snapshot.header.clone());
            for (row, value) in self.rows.iter_mut().zip(&snapshot.values) {
                row.cells.insert(snapshot.index, value.clone());
            }
        }
    }
}

impl DocumentStore {
    /// Set a single cell.
    ///
    /// Writing the value the cell already holds is a no-op and produces no command.
    pub fn update_cell(
        &mut self,
        id: &DocumentId,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Result<Option<Command>> {
        let value = value.into();
        let doc = self.document_mut(id)?;
        doc.check_cell(row, col)?;

        if doc.rows[row].cells[col] == value {
            trace!(document = %id, row, col, "cell unchanged, nothing to record");
            return Ok(None);
        }

        let change = doc.set_cell(row, col, value);
        doc.dirty = true;
        debug!(document = %id, row, col, "cell updated");

        Ok(Some(Command::new(
            id.clone(),
            format!("Edit cell ({}, {})", row, col),
            CommandKind::EditCell(change),
        )))
    }

    /// Apply many cell writes as one atomic, single-undo group.
    ///
    /// Writes that would not change their cell are dropped first; if none
    /// remain nothing happens. Several writes to the same cell keep the last
    /// value. Any out-of-range address rejects the whole batch.
    pub fn batch_update_cells(
        &mut self,
        id: &DocumentId,
        updates: Vec<CellUpdate>,
        description: impl Into<String>,
    ) -> Result<Option<Command>> {
        let doc = self.document_mut(id)?;
        for update in &updates {
            doc.check_cell(update.row, update.col)?;
        }

        // Fold repeated addresses, keeping first-seen order.
        let mut folded: Vec<CellUpdate> = Vec::with_capacity(updates.len());
        let mut seen: HashMap<(usize, usize), usize> = HashMap::new();
        for update in updates {
            match seen.get(&(update.row, update.col)).copied() {
                Some(slot) => folded[slot].value = update.value,
                None => {
                    seen.insert((update.row, update.col), folded.len());
                    folded.push(update);
                }
            }
        }

        let pending: Vec<CellUpdate> = folded
            .into_iter()
            .filter(|u| doc.rows[u.row].cells[u.col] != u.value)
            .collect();
        if pending.is_empty() {
            trace!(document = %id, "batch changes nothing, nothing to record");
            return Ok(None);
        }

        let changes: Vec<CellChange> = pending
            .into_iter()
            .map(|u| doc.set_cell(u.row, u.col, u.value))
            .collect();
        doc.dirty = true;
        debug!(document = %id, cells = changes.len(), "batch applied");

        Ok(Some(Command::new(
            id.clone(),
            description,
            CommandKind::EditCells(changes),
        )))
    }

    /// Insert `count` blank rows before row `at` (`at == rows.len()` appends).
    pub fn insert_rows(
        &mut self,
        id: &DocumentId,
        at: usize,
        count: usize,
    ) -> Result<Option<Command>> {
        let doc = self.document_mut(id)?;
        if at > doc.rows.len() {
            return Err(LocsheetError::RowOutOfRange {
                row: at,
                len: doc.rows.len(),
            });
        }
        if count == 0 {
            return Ok(None);
        }

        doc.insert_blank_rows(at, count);
        doc.dirty = true;
        debug!(document = %id, at, count, "rows inserted");

        Ok(Some(Command::new(
            id.clone(),
            format!("Insert {} row(s)", count),
            CommandKind::InsertRows { at, count },
        )))
    }

    /// Delete the rows at `indices` (any order, duplicates allowed).
    pub fn delete_rows(&mut self, id: &DocumentId, indices: &[usize]) -> Result<Option<Command>> {
        let doc = self.document_mut(id)?;
        let indices = normalize_indices(indices);
        let Some(&last) = indices.last() else {
            return Ok(None);
        };
        doc.check_row(last)?;

        let removed = doc.remove_rows(&indices);
        doc.dirty = true;
        debug!(document = %id, count = removed.len(), "rows deleted");

        Ok(Some(Command::new(
            id.clone(),
            format!("Delete {} row(s)", removed.len()),
            CommandKind::DeleteRows { removed },
        )))
    }

    /// Insert a copy of each row at `indices` directly below its original.
    ///
    /// The copy's key gets the store's copy suffix; collisions with existing
    /// keys are left for validation to report.
    pub fn duplicate_rows(&mut self, id: &DocumentId, indices: &[usize]) -> Result<Option<Command>> {
        let suffix = self.copy_suffix.clone();
        let doc = self.document_mut(id)?;
        let indices = normalize_indices(indices);
        let Some(&last) = indices.last() else {
            return Ok(None);
        };
        doc.check_row(last)?;

        // Highest first so pending originals keep their positions.
        for &index in indices.iter().rev() {
            let mut copy = doc.rows[index].clone();
            if !copy.key.is_empty() {
                copy.key.push_str(&suffix);
            }
            doc.rows.insert(index + 1, copy);
        }
        doc.renumber();

        // The k-th smallest original has k earlier copies above its own.
        let added: Vec<RowSnapshot> = indices
            .iter()
            .enumerate()
            .map(|(earlier, &index)| {
                let at = index + 1 + earlier;
                let row = &doc.rows[at];
                RowSnapshot {
                    index: at,
                    cells: row.cells.clone(),
                    key: row.key.clone(),
                }
            })
            .collect();
        doc.dirty = true;
        debug!(document = %id, count = added.len(), "rows duplicated");

        Ok(Some(Command::new(
            id.clone(),
            format!("Duplicate {} row(s)", added.len()),
            CommandKind::DuplicateRows { added },
        )))
    }

    /// Insert `count` blank columns (with empty headers) before column `at`.
    pub fn insert_columns(
        &mut self,
        id: &DocumentId,
        at: usize,
        count: usize,
    ) -> Result<Option<Command>> {
        let doc = self.document_mut(id)?;
        if at > doc.headers.len() {
            return Err(LocsheetError::ColumnOutOfRange {
                col: at,
                len: doc.headers.len(),
            });
        }
        if count == 0 {
            return Ok(None);
        }

        doc.insert_blank_columns(at, count);
        doc.dirty = true;
        debug!(document = %id, at, count, "columns inserted");

        Ok(Some(Command::new(
            id.clone(),
            format!("Insert {} column(s)", count),
            CommandKind::InsertColumns { at, count },
        )))
    }

    /// Delete the columns at `indices` (any order, duplicates allowed).
    pub fn delete_columns(&mut self, id: &DocumentId, indices: &[usize]) -> Result<Option<Command>> {
        let doc = self.document_mut(id)?;
        let indices = normalize_indices(indices);
        let Some(&last) = indices.last() else {
            return Ok(None);
        };
        doc.check_col(last)?;

        let removed = doc.remove_columns(&indices);
        doc.dirty = true;
        debug!(document = %id, count = removed.len(), "columns deleted");

        Ok(Some(Command::new(
            id.clone(),
            format!("Delete {} column(s)", removed.len()),
            CommandKind::DeleteColumns { removed },
        )))
    }

    /// Rename a column header.
    pub fn update_header(
        &mut self,
        id: &DocumentId,
        col: usize,
        name: impl Into<String>,
    ) -> Result<Option<Command>> {
        let name = name.into();
        let doc = self.document_mut(id)?;
        doc.check_col(col)?;
        if doc.headers[col] == name {
            return Ok(None);
        }

        let before = std::mem::replace(&mut doc.headers[col], name.clone());
        doc.dirty = true;
        debug!(document = %id, col, "header renamed");

        Ok(Some(Command::new(
            id.clone(),
            format!("Rename column {}", col),
            CommandKind::RenameHeader {
                col,
                before,
                after: name,
            },
        )))
    }

    /// Extend a selected block with generated values.
    ///
    /// Each column (filling down) or row (filling right) of the block is its
    /// own source sequence. Filling down past the last row appends blank rows
    /// first; the appended rows and the writes form one command.
    pub fn fill(&mut self, id: &DocumentId, request: FillRequest) -> Result<Option<Command>> {
        let doc = self.document_mut(id)?;
        let FillRequest {
            rows,
            cols,
            axis,
            target,
            mode,
        } = request;
        let (start_row, end_row) = (*rows.start(), *rows.end());
        let (start_col, end_col) = (*cols.start(), *cols.end());
        if start_row > end_row || start_col > end_col {
            return Err(LocsheetError::FillSource(format!(
                "empty selection rows {:?} cols {:?}",
                rows, cols
            )));
        }
        doc.check_cell(end_row, end_col)?;

        let len = doc.rows.len();
        let mut writes: Vec<(usize, usize, String)> = Vec::new();
        let mut appended_rows = 0;
        match axis {
            FillAxis::Down => {
                if target < end_row {
                    return Err(LocsheetError::FillSource(format!(
                        "target row {} is above the selection",
                        target
                    )));
                }
                let count = target - end_row;
                let wanted = target.checked_add(1).ok_or_else(|| {
                    LocsheetError::FillSource(format!("target row {} is out of range", target))
                })?;
                appended_rows = wanted.saturating_sub(len);
                for col in start_col..=end_col {
                    let source: Vec<&str> = (start_row..=end_row)
                        .map(|row| doc.rows[row].cells[col].as_str())
                        .collect();
                    for (offset, value) in generate_fill_data(&source, count, mode)
                        .into_iter()
                        .enumerate()
                    {
                        let row = end_row + 1 + offset;
                        let current = doc.cell(row, col).unwrap_or("");
                        if current != value {
                            writes.push((row, col, value));
                        }
                    }
                }
            }
            FillAxis::Right => {
                doc.check_col(target)?;
                if target < end_col {
                    return Err(LocsheetError::FillSource(format!(
                        "target column {} is left of the selection",
                        target
                    )));
                }
                let count = target - end_col;
                for row in start_row..=end_row {
                    let source = &doc.rows[row].cells[start_col..=end_col];
                    for (offset, value) in generate_fill_data(source, count, mode)
                        .into_iter()
                        .enumerate()
                    {
                        let col = end_col + 1 + offset;
                        if doc.rows[row].cells[col] != value {
                            writes.push((row, col, value));
                        }
                    }
                }
            }
        }

        if writes.is_empty() && appended_rows == 0 {
            trace!(document = %id, "fill changes nothing, nothing to record");
            return Ok(None);
        }

        let changes = doc.append_and_write(appended_rows, writes);
        doc.dirty = true;
        debug!(document = %id, cells = changes.len(), appended_rows, %mode, "fill applied");

        Ok(Some(Command::new(
            id.clone(),
            "Fill",
            CommandKind::Fill {
                append_at: len,
                appended_rows,
                changes,
            },
        )))
    }

    /// Paste tab-separated text with its top-left cell at (`at_row`, `at_col`).
    ///
    /// Values past the last column are dropped; lines past the last row
    /// append rows. Only cells whose value changes are recorded, and a paste
    /// that changes nothing appends nothing.
    pub fn paste(
        &mut self,
        id: &DocumentId,
        at_row: usize,
        at_col: usize,
        text: &str,
    ) -> Result<Option<Command>> {
        let doc = self.document_mut(id)?;
        doc.check_cell(at_row, at_col)?;
        if text.is_empty() {
            return Ok(None);
        }

        let lines = split_clipboard(text);
        let len = doc.rows.len();
        let width = doc.headers.len();
        let mut writes: Vec<(usize, usize, String)> = Vec::new();
        for (offset, line) in lines.iter().enumerate() {
            let row = at_row + offset;
            for (col, value) in (at_col..width).zip(line) {
                if doc.cell(row, col).unwrap_or("") != *value {
                    writes.push((row, col, value.to_string()));
                }
            }
        }
        if writes.is_empty() {
            trace!(document = %id, "paste changes nothing, nothing to record");
            return Ok(None);
        }

        let appended_rows = (at_row + lines.len()).saturating_sub(len);
        let changes = doc.append_and_write(appended_rows, writes);
        doc.dirty = true;
        debug!(document = %id, cells = changes.len(), appended_rows, "paste applied");

        Ok(Some(Command::new(
            id.clone(),
            "Paste",
            CommandKind::Paste {
                append_at: len,
                appended_rows,
                changes,
            },
        )))
    }
}

/// Split clipboard text into rows of tab-separated values.
///
/// Lines end in `\n` or `\r\n`; the empty line after a final newline is dropped.
fn split_clipboard(text: &str) -> Vec<Vec<&str>> {
    let mut lines: Vec<Vec<&str>> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).split('\t').collect())
        .collect();
    if lines.len() > 1 && lines.last().is_some_and(|last| last == &[""]) {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentMeta, TableData};
    use pretty_assertions::assert_eq;

    fn store() -> (DocumentStore, DocumentId) {
        let mut store = DocumentStore::new();
        let id = DocumentId::from("file-1");
        let table = TableData::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![
                vec!["a0".into(), "b0".into(), "c0".into()],
                vec!["a1".into(), "b1".into(), "c1".into()],
                vec!["a2".into(), "b2".into(), "c2".into()],
            ],
        );
        store
            .open_document(id.clone(), DocumentMeta::default(), table)
            .unwrap();
        (store, id)
    }

    fn cells(store: &DocumentStore, id: &DocumentId) -> Vec<Vec<String>> {
        store.get(id).unwrap().rows.iter().map(|r| r.cells.clone()).collect()
    }

    fn assert_indices_match_positions(store: &DocumentStore, id: &DocumentId) {
        for (pos, row) in store.get(id).unwrap().rows.iter().enumerate() {
            assert_eq!(row.index, pos);
        }
    }

    #[test]
    fn test_update_cell_records_previous_value() {
        let (mut store, id) = store();
        let cmd = store.update_cell(&id, 1, 2, "new").unwrap().unwrap();
        assert_eq!(store.get(&id).unwrap().cell(1, 2), Some("new"));
        assert!(store.get(&id).unwrap().dirty);
        match cmd.kind {
            CommandKind::EditCell(change) => {
                assert_eq!(change.before, "c1");
                assert_eq!(change.after, "new");
                assert_eq!(change.key_before, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_update_cell_same_value_is_noop() {
        let (mut store, id) = store();
        assert!(store.update_cell(&id, 0, 0, "a0").unwrap().is_none());
        assert!(!store.get(&id).unwrap().dirty);
    }

    #[test]
    fn test_update_first_column_refreshes_key() {
        let (mut store, id) = store();
        let cmd = store.update_cell(&id, 0, 0, "KEY").unwrap().unwrap();
        assert_eq!(store.get(&id).unwrap().rows[0].key, "KEY");
        match cmd.kind {
            CommandKind::EditCell(change) => assert_eq!(change.key_before.as_deref(), Some("a0")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_update_cell_out_of_range() {
        let (mut store, id) = store();
        assert_eq!(
            store.update_cell(&id, 3, 0, "x").unwrap_err(),
            LocsheetError::RowOutOfRange { row: 3, len: 3 }
        );
        assert_eq!(
            store.update_cell(&id, 0, 3, "x").unwrap_err(),
            LocsheetError::ColumnOutOfRange { col: 3, len: 3 }
        );
        assert!(matches!(
            store.update_cell(&"missing".into(), 0, 0, "x"),
            Err(LocsheetError::UnknownDocument(_))
        ));
    }

    #[test]
    fn test_batch_filters_unchanged_cells() {
        let (mut store, id) = store();
        let cmd = store
            .batch_update_cells(
                &id,
                vec![CellUpdate::new(0, 1, "b0"), CellUpdate::new(1, 1, "x")],
                "replace",
            )
            .unwrap()
            .unwrap();
        match cmd.kind {
            CommandKind::EditCells(changes) => {
                assert_eq!(changes.len(), 1);
                assert_eq!((changes[0].row, changes[0].col), (1, 1));
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cmd.description, "replace");
    }

    #[test]
    fn test_batch_without_changes_is_noop() {
        let (mut store, id) = store();
        let result = store
            .batch_update_cells(&id, vec![CellUpdate::new(0, 0, "a0")], "noop")
            .unwrap();
        assert!(result.is_none());
        assert!(!store.get(&id).unwrap().dirty);
    }

    #[test]
    fn test_batch_repeated_address_keeps_last_value() {
        let (mut store, id) = store();
        let cmd = store
            .batch_update_cells(
                &id,
                vec![CellUpdate::new(2, 2, "x"), CellUpdate::new(2, 2, "y")],
                "twice",
            )
            .unwrap()
            .unwrap();
        assert_eq!(store.get(&id).unwrap().cell(2, 2), Some("y"));
        match cmd.kind {
            CommandKind::EditCells(changes) => {
                assert_eq!(changes.len(), 1);
                assert_eq!(changes[0].before, "c2");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_batch_out_of_range_touches_nothing() {
        let (mut store, id) = store();
        let result = store.batch_update_cells(
            &id,
            vec![CellUpdate::new(0, 0, "x"), CellUpdate::new(9, 0, "y")],
            "bad",
        );
        assert!(result.is_err());
        assert_eq!(store.get(&id).unwrap().cell(0, 0), Some("a0"));
    }

    #[test]
    fn test_insert_rows_scenario() {
        let (mut store, id) = store();
        store.insert_rows(&id, 1, 2).unwrap().unwrap();
        let rows = cells(&store, &id);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[1], vec!["", "", ""]);
        assert_eq!(rows[2], vec!["", "", ""]);
        assert_eq!(rows[3], vec!["a1", "b1", "c1"]);
        assert_indices_match_positions(&store, &id);
    }

    #[test]
    fn test_insert_rows_bounds() {
        let (mut store, id) = store();
        assert!(store.insert_rows(&id, 3, 1).unwrap().is_some());
        assert!(store.insert_rows(&id, 5, 1).is_err());
        assert!(store.insert_rows(&id, 0, 0).unwrap().is_none());
    }

    #[test]
    fn test_delete_rows_scenario() {
        let (mut store, id) = store();
        let cmd = store.delete_rows(&id, &[2, 0, 2]).unwrap().unwrap();
        let doc = store.get(&id).unwrap();
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0].cells, vec!["a1", "b1", "c1"]);
        assert_eq!(doc.rows[0].index, 0);
        match cmd.kind {
            CommandKind::DeleteRows { removed } => {
                let indices: Vec<usize> = removed.iter().map(|r| r.index).collect();
                assert_eq!(indices, vec![0, 2]);
                assert_eq!(removed[1].cells, vec!["a2", "b2", "c2"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_delete_rows_rejects_out_of_range() {
        let (mut store, id) = store();
        assert!(store.delete_rows(&id, &[0, 3]).is_err());
        assert_eq!(store.get(&id).unwrap().rows.len(), 3);
        assert!(store.delete_rows(&id, &[]).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_rows_scenario() {
        let (mut store, id) = store();
        store.duplicate_rows(&id, &[1]).unwrap().unwrap();
        let doc = store.get(&id).unwrap();
        assert_eq!(doc.rows.len(), 4);
        assert_eq!(doc.rows[2].cells[0], doc.rows[1].cells[0]);
        assert_eq!(doc.rows[2].key, format!("{}_copy", doc.rows[1].key));
        assert_eq!(doc.rows[3].cells[0], "a2");
        assert_indices_match_positions(&store, &id);
    }

    #[test]
    fn test_duplicate_rows_added_positions() {
        let (mut store, id) = store();
        let cmd = store.duplicate_rows(&id, &[2, 0]).unwrap().unwrap();
        match cmd.kind {
            CommandKind::DuplicateRows { added } => {
                let positions: Vec<usize> = added.iter().map(|r| r.index).collect();
                assert_eq!(positions, vec![1, 4]);
            }
            other => panic!("unexpected command {:?}", other),
        }
        let keys: Vec<String> = store
            .get(&id)
            .unwrap()
            .rows
            .iter()
            .map(|r| r.key.clone())
            .collect();
        assert_eq!(keys, vec!["a0", "a0_copy", "a1", "a2", "a2_copy"]);
    }

    #[test]
    fn test_duplicate_blank_key_stays_blank() {
        let (mut store, id) = store();
        store.insert_rows(&id, 0, 1).unwrap();
        store.duplicate_rows(&id, &[0]).unwrap();
        assert_eq!(store.get(&id).unwrap().rows[1].key, "");
    }

    #[test]
    fn test_custom_copy_suffix() {
        let (store, id) = store();
        let mut store = store.with_copy_suffix("_dup");
        store.duplicate_rows(&id, &[0]).unwrap();
        assert_eq!(store.get(&id).unwrap().rows[1].key, "a0_dup");
    }

    #[test]
    fn test_insert_columns_keeps_rows_aligned() {
        let (mut store, id) = store();
        store.insert_columns(&id, 1, 1).unwrap().unwrap();
        let doc = store.get(&id).unwrap();
        assert_eq!(doc.headers, vec!["A", "", "B", "C"]);
        assert_eq!(doc.rows[0].cells, vec!["a0", "", "b0", "c0"]);
        assert!(doc.rows.iter().all(|r| r.cells.len() == doc.headers.len()));
    }

    #[test]
    fn test_delete_columns_captures_values() {
        let (mut store, id) = store();
        let cmd = store.delete_columns(&id, &[1]).unwrap().unwrap();
        let doc = store.get(&id).unwrap();
        assert_eq!(doc.headers, vec!["A", "C"]);
        assert_eq!(doc.rows[0].cells, vec!["a0", "c0"]);
        match cmd.kind {
            CommandKind::DeleteColumns { removed } => {
                assert_eq!(removed.len(), 1);
                assert_eq!(removed[0].header, "B");
                assert_eq!(removed[0].values, vec!["b0", "b1", "b2"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_update_header() {
        let (mut store, id) = store();
        assert!(store.update_header(&id, 0, "A").unwrap().is_none());
        assert!(store.update_header(&id, 0, "Key").unwrap().is_some());
        assert_eq!(store.get(&id).unwrap().headers[0], "Key");
        assert!(store.update_header(&id, 3, "X").is_err());
    }

    #[test]
    fn test_fill_down_appends_rows() {
        let (mut store, id) = store();
        store.update_cell(&id, 0, 1, "Item01").unwrap();
        store.update_cell(&id, 1, 1, "Item02").unwrap();
        let request = FillRequest {
            rows: 0..=1,
            cols: 1..=1,
            axis: FillAxis::Down,
            target: 3,
            mode: FillMode::Auto,
        };
        let cmd = store.fill(&id, request).unwrap().unwrap();
        let doc = store.get(&id).unwrap();
        assert_eq!(doc.rows.len(), 4);
        assert_eq!(doc.cell(2, 1), Some("Item03"));
        assert_eq!(doc.cell(3, 1), Some("Item04"));
        assert_eq!(doc.rows[3].cells.len(), 3);
        assert_indices_match_positions(&store, &id);
        match cmd.kind {
            CommandKind::Fill {
                append_at,
                appended_rows,
                changes,
            } => {
                assert_eq!(append_at, 3);
                assert_eq!(appended_rows, 1);
                assert_eq!(changes.len(), 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_fill_right_copies() {
        let (mut store, id) = store();
        let request = FillRequest {
            rows: 0..=0,
            cols: 0..=0,
            axis: FillAxis::Right,
            target: 2,
            mode: FillMode::Copy,
        };
        store.fill(&id, request).unwrap().unwrap();
        assert_eq!(cells(&store, &id)[0], vec!["a0", "a0", "a0"]);
    }

    #[test]
    fn test_fill_right_cannot_add_columns() {
        let (mut store, id) = store();
        let request = FillRequest {
            rows: 0..=0,
            cols: 0..=0,
            axis: FillAxis::Right,
            target: 3,
            mode: FillMode::Copy,
        };
        assert!(store.fill(&id, request).is_err());
    }

    #[test]
    fn test_fill_onto_selection_is_noop() {
        let (mut store, id) = store();
        let request = FillRequest {
            rows: 0..=1,
            cols: 0..=0,
            axis: FillAxis::Down,
            target: 1,
            mode: FillMode::Auto,
        };
        assert!(store.fill(&id, request).unwrap().is_none());
    }

    #[test]
    fn test_fill_down_to_last_index_is_rejected() {
        let (mut store, id) = store();
        let request = FillRequest {
            rows: 0..=0,
            cols: 0..=0,
            axis: FillAxis::Down,
            target: usize::MAX,
            mode: FillMode::Copy,
        };
        assert!(matches!(
            store.fill(&id, request),
            Err(LocsheetError::FillSource(_))
        ));
        assert_eq!(store.get(&id).unwrap().rows.len(), 3);
    }

    #[test]
    fn test_paste_block_from_top_left() {
        let (mut store, id) = store();
        let cmd = store.paste(&id, 1, 1, "x\ty\nz\tw").unwrap().unwrap();
        assert_eq!(
            cells(&store, &id),
            vec![
                vec!["a0", "b0", "c0"],
                vec!["a1", "x", "y"],
                vec!["a2", "z", "w"],
            ]
        );
        assert_eq!(cmd.description, "Paste");
        assert!(store.get(&id).unwrap().dirty);
    }

    #[test]
    fn test_paste_clips_columns_and_appends_rows() {
        let (mut store, id) = store();
        let cmd = store
            .paste(&id, 2, 2, "p\tdropped\nq\tdropped\nr")
            .unwrap()
            .unwrap();
        let doc = store.get(&id).unwrap();
        assert_eq!(doc.headers.len(), 3);
        assert_eq!(doc.rows.len(), 5);
        assert_eq!(doc.cell(2, 2), Some("p"));
        assert_eq!(doc.cell(3, 2), Some("q"));
        assert_eq!(doc.cell(4, 2), Some("r"));
        assert_eq!(doc.rows[4].cells, vec!["", "", "r"]);
        assert_indices_match_positions(&store, &id);
        match cmd.kind {
            CommandKind::Paste {
                append_at,
                appended_rows,
                changes,
            } => {
                assert_eq!(append_at, 3);
                assert_eq!(appended_rows, 2);
                assert_eq!(changes.len(), 3);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_paste_drops_trailing_newline() {
        let (mut store, id) = store();
        store.paste(&id, 2, 0, "KEY\r\n").unwrap().unwrap();
        let doc = store.get(&id).unwrap();
        assert_eq!(doc.rows.len(), 3);
        assert_eq!(doc.cell(2, 0), Some("KEY"));
        assert_eq!(doc.rows[2].key, "KEY");
    }

    #[test]
    fn test_paste_crlf_lines() {
        let (mut store, id) = store();
        store.paste(&id, 0, 2, "one\r\ntwo\r\nthree").unwrap().unwrap();
        let column: Vec<&str> = (0..3)
            .map(|row| store.get(&id).unwrap().cell(row, 2).unwrap())
            .collect();
        assert_eq!(column, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_paste_skips_unchanged_cells() {
        let (mut store, id) = store();
        let cmd = store.paste(&id, 0, 0, "a0\tnew\tc0").unwrap().unwrap();
        match cmd.kind {
            CommandKind::Paste { changes, .. } => {
                assert_eq!(changes.len(), 1);
                assert_eq!((changes[0].row, changes[0].col), (0, 1));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_paste_without_changes_is_noop() {
        let (mut store, id) = store();
        assert!(store.paste(&id, 0, 0, "a0\tb0").unwrap().is_none());
        assert!(store.paste(&id, 0, 0, "").unwrap().is_none());
        // The trailing newline does not count as a row to append.
        assert!(store.paste(&id, 2, 0, "a2\n").unwrap().is_none());
        let doc = store.get(&id).unwrap();
        assert_eq!(doc.rows.len(), 3);
        assert!(!doc.dirty);
    }

    #[test]
    fn test_paste_out_of_range_start() {
        let (mut store, id) = store();
        assert!(matches!(
            store.paste(&id, 3, 0, "x"),
            Err(LocsheetError::RowOutOfRange { row: 3, len: 3 })
        ));
        assert!(matches!(
            store.paste(&id, 0, 3, "x"),
            Err(LocsheetError::ColumnOutOfRange { col: 3, len: 3 })
        ));
    }
}
