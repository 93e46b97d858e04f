//! Project-wide key validation.
//!
//! Keys are checked for emptiness, format and uniqueness across every
//! document that is not ignored. Duplicated-row keys (`X_copy`) that collide
//! with existing ones surface here.

use crate::document::{DocumentId, DocumentStore};
use crate::error::{LocsheetError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

/// Keys must be upper-case letters, digits and underscores by default
pub const DEFAULT_KEY_PATTERN: &str = "^[A-Z0-9_]+$";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueKind {
    EmptyKey,
    InvalidKey,
    DuplicateKey,
}

/// One problem found on a row's key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    pub document_id: DocumentId,
    pub row: usize,
    pub col: usize,
    pub kind: IssueKind,
    pub key: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IssueKind::EmptyKey => write!(f, "{} row {}: key is empty", self.document_id, self.row),
            IssueKind::InvalidKey => write!(
                f,
                "{} row {}: malformed key \"{}\"",
                self.document_id, self.row, self.key
            ),
            IssueKind::DuplicateKey => write!(
                f,
                "{} row {}: duplicate key \"{}\"",
                self.document_id, self.row, self.key
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub struct KeyValidator {
    pattern: Regex,
}

impl KeyValidator {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern =
            Regex::new(pattern).map_err(|e| LocsheetError::InvalidKeyPattern(e.to_string()))?;
        Ok(KeyValidator { pattern })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Check every key of every non-ignored document.
    ///
    /// Issues come per document in id order: empty and malformed keys first,
    /// then every location of each duplicated key.
    pub fn validate(&self, store: &DocumentStore) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut locations: BTreeMap<&str, Vec<(&DocumentId, usize)>> = BTreeMap::new();

        for doc in store.documents().filter(|doc| !doc.ignored) {
            for row in &doc.rows {
                let key = row.key.as_str();
                if key.trim().is_empty() {
                    issues.push(ValidationIssue {
                        document_id: doc.id.clone(),
                        row: row.index,
                        col: 0,
                        kind: IssueKind::EmptyKey,
                        key: key.to_string(),
                    });
                    continue;
                }
                if !self.pattern.is_match(key) {
                    issues.push(ValidationIssue {
                        document_id: doc.id.clone(),
                        row: row.index,
                        col: 0,
                        kind: IssueKind::InvalidKey,
                        key: key.to_string(),
                    });
                }
                locations.entry(key).or_default().push((&doc.id, row.index));
            }
        }

        for (key, found) in locations.into_iter().filter(|(_, found)| found.len() > 1) {
            for (document_id, row) in found {
                issues.push(ValidationIssue {
                    document_id: document_id.clone(),
                    row,
                    col: 0,
                    kind: IssueKind::DuplicateKey,
                    key: key.to_string(),
                });
            }
        }

        issues
    }
}

impl Default for KeyValidator {
    fn default() -> Self {
        KeyValidator {
            pattern: Regex::new(DEFAULT_KEY_PATTERN).expect("default key pattern must compile"),
        }
    }
}
