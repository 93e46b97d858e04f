//! Error types for the Locsheet application

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML output error: {0}")]
    TomlOutput(#[from] toml::ser::Error),

    #[error("Refusing to read {}: file too large ({size} bytes, max {max})", .path.display())]
    TooLarge { path: PathBuf, size: u64, max: u64 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
