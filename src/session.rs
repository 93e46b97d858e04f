//! A configured editing session: the project plus the key validator.

use crate::config::EditorConfig;
use locsheet_core::{
    DocumentId, DocumentMeta, DocumentStore, FillAxis, FillMode, FillRequest, History,
    KeyValidator, Project, Result, TableData, ValidationIssue,
};
use tracing::debug;

/// Id of the scratch document the command line works on
const SCRATCH_ID: &str = "<cli>";

pub struct Session {
    config: EditorConfig,
    project: Project,
    validator: KeyValidator,
}

impl Session {
    pub fn new(config: EditorConfig) -> Result<Self> {
        let validator = KeyValidator::new(&config.key_pattern)?;
        let store = DocumentStore::new().with_copy_suffix(config.copy_suffix.clone());
        let project = Project::with_parts(store, History::with_limit(config.history_limit));
        debug!(
            history_limit = config.history_limit,
            key_pattern = validator.pattern(),
            "session ready"
        );
        Ok(Session {
            config,
            project,
            validator,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    /// Validate the keys of every document that is not ignored.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        self.validator.validate(self.project.store())
    }

    /// Replace the scratch document with a single `Key` column holding `values`.
    fn load_scratch(&mut self, values: &[String]) -> Result<DocumentId> {
        let id = DocumentId::from(SCRATCH_ID);
        if self.project.store().contains(&id) {
            self.project.close_document(&id)?;
        }
        let rows = values.iter().map(|value| vec![value.clone()]).collect();
        self.project.open_document(
            id.clone(),
            DocumentMeta::default(),
            TableData::new(vec!["Key".to_string()], rows),
        )?;
        Ok(id)
    }

    /// Drag-fill `count` values below `values`, returning only the new ones.
    ///
    /// `mode` falls back to the configured fill mode.
    pub fn fill_column(
        &mut self,
        values: &[String],
        count: usize,
        mode: Option<FillMode>,
    ) -> Result<Vec<String>> {
        if values.is_empty() {
            return Ok(vec![String::new(); count]);
        }
        let id = self.load_scratch(values)?;
        let last = values.len() - 1;
        self.project.fill(
            &id,
            FillRequest {
                rows: 0..=last,
                cols: 0..=0,
                axis: FillAxis::Down,
                target: last + count,
                mode: mode.unwrap_or(self.config.fill_mode),
            },
        )?;

        let filled = self
            .project
            .document(&id)
            .map(|doc| {
                doc.rows[values.len()..]
                    .iter()
                    .map(|row| row.cells[0].clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(filled)
    }

    /// Check `keys` as if they were the rows of one document.
    pub fn check_keys(&mut self, keys: &[String]) -> Result<Vec<ValidationIssue>> {
        self.load_scratch(keys)?;
        Ok(self.validate())
    }
}
