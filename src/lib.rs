//! locsheet - configuration, logging and the editing session around locsheet-core.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use config::{EditorConfig, load_config};
pub use error::{ConfigError, Result};
pub use session::Session;
