//! Document lifecycle: hand-over from and to the file collaborators.
//!
//! None of these operations record history.

use super::{Document, DocumentId, DocumentMeta, DocumentStore, TableData};
use crate::error::{LocsheetError, Result};
use tracing::{debug, info};

impl DocumentStore {
    /// Create a document from freshly decoded content.
    pub fn open_document(
        &mut self,
        id: DocumentId,
        meta: DocumentMeta,
        table: TableData,
    ) -> Result<&Document> {
        if self.documents.contains_key(&id) {
            return Err(LocsheetError::DocumentExists(id));
        }
        let doc = Document::new(id.clone(), meta, table)?;
        debug!(
            document = %id,
            rows = doc.rows.len(),
            cols = doc.headers.len(),
            "document opened"
        );
        Ok(self.documents.entry(id).or_insert(doc))
    }

    /// Replace a document's content after an external change on disk.
    ///
    /// The undo log is bypassed and the document is considered clean afterwards.
    pub fn reload_document(
        &mut self,
        id: &DocumentId,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        timestamp: i64,
    ) -> Result<()> {
        let (headers, rows) = TableData::new(headers, rows).into_rows()?;
        let doc = self.document_mut(id)?;
        doc.headers = headers;
        doc.rows = rows;
        doc.dirty = false;
        doc.last_modified = timestamp;
        info!(document = %id, rows = doc.rows.len(), "document reloaded from disk");
        Ok(())
    }

    pub fn close_document(&mut self, id: &DocumentId) -> Result<Document> {
        self.documents
            .remove(id)
            .ok_or_else(|| LocsheetError::UnknownDocument(id.clone()))
    }

    /// Drop every document.
    pub fn reset(&mut self) {
        self.documents.clear();
    }

    /// Record that the document was written to disk.
    pub fn mark_saved(&mut self, id: &DocumentId, timestamp: i64) -> Result<()> {
        let doc = self.document_mut(id)?;
        doc.dirty = false;
        doc.last_modified = timestamp;
        Ok(())
    }

    /// Accept an external modification time without reloading ("keep local").
    pub fn touch_timestamp(&mut self, id: &DocumentId, timestamp: i64) -> Result<()> {
        self.document_mut(id)?.last_modified = timestamp;
        Ok(())
    }

    pub fn set_ignored(&mut self, id: &DocumentId, ignored: bool) -> Result<()> {
        self.document_mut(id)?.ignored = ignored;
        Ok(())
    }

    /// Flip whether project-wide passes skip the document. Returns the new state.
    pub fn toggle_ignored(&mut self, id: &DocumentId) -> Result<bool> {
        let doc = self.document_mut(id)?;
        doc.ignored = !doc.ignored;
        Ok(doc.ignored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> TableData {
        TableData::new(
            vec!["Key".into(), "en".into()],
            vec![vec!["A".into(), "a".into()], vec!["B".into()]],
        )
    }

    #[test]
    fn test_open_pads_short_rows() {
        let mut store = DocumentStore::new();
        let doc = store
            .open_document("f".into(), DocumentMeta::default(), table())
            .unwrap();
        assert_eq!(doc.rows[1].cells, vec!["B", ""]);
        assert_eq!(doc.rows[1].index, 1);
        assert_eq!(doc.rows[1].key, "B");
        assert!(!doc.dirty);
    }

    #[test]
    fn test_open_rejects_wide_rows() {
        let mut store = DocumentStore::new();
        let wide = TableData::new(vec!["Key".into()], vec![vec!["A".into(), "extra".into()]]);
        assert_eq!(
            store
                .open_document("f".into(), DocumentMeta::default(), wide)
                .unwrap_err(),
            LocsheetError::RowTooWide {
                row: 0,
                expected: 1,
                found: 2
            }
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_twice_is_rejected() {
        let mut store = DocumentStore::new();
        store
            .open_document("f".into(), DocumentMeta::default(), table())
            .unwrap();
        assert!(matches!(
            store.open_document("f".into(), DocumentMeta::default(), table()),
            Err(LocsheetError::DocumentExists(_))
        ));
    }

    #[test]
    fn test_reload_replaces_and_cleans() {
        let mut store = DocumentStore::new();
        let id = DocumentId::from("f");
        store
            .open_document(id.clone(), DocumentMeta::default(), table())
            .unwrap();
        store.update_cell(&id, 0, 1, "changed").unwrap();
        assert!(store.is_dirty());

        store
            .reload_document(&id, vec!["K".into()], vec![vec!["X".into()]], 42)
            .unwrap();
        let doc = store.get(&id).unwrap();
        assert_eq!(doc.headers, vec!["K"]);
        assert_eq!(doc.rows[0].cells, vec!["X"]);
        assert!(!doc.dirty);
        assert_eq!(doc.last_modified, 42);
    }

    #[test]
    fn test_ignore_flags() {
        let mut store = DocumentStore::new();
        let id = DocumentId::from("f");
        store
            .open_document(id.clone(), DocumentMeta::default(), table())
            .unwrap();
        assert!(store.toggle_ignored(&id).unwrap());
        assert!(!store.toggle_ignored(&id).unwrap());
        store.set_ignored(&id, true).unwrap();
        assert!(store.get(&id).unwrap().ignored);
    }

    #[test]
    fn test_mark_saved_and_touch() {
        let mut store = DocumentStore::new();
        let id = DocumentId::from("f");
        store
            .open_document(id.clone(), DocumentMeta::default(), table())
            .unwrap();
        store.update_cell(&id, 0, 1, "changed").unwrap();
        store.touch_timestamp(&id, 7).unwrap();
        assert!(store.get(&id).unwrap().dirty);
        store.mark_saved(&id, 9).unwrap();
        let doc = store.get(&id).unwrap();
        assert!(!doc.dirty);
        assert_eq!(doc.last_modified, 9);
    }
}
