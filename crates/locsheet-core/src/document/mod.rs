//! Document state and edit operations (UI-agnostic).

mod apply;
mod io;
mod ops;
mod state;

pub use ops::{CellUpdate, FillRequest};
pub use state::{DEFAULT_COPY_SUFFIX, Document, DocumentId, DocumentMeta, DocumentStore, Row, TableData};
