//! Editor configuration, read from `config.toml`.

use crate::error::{ConfigError, Result};
use directories::ProjectDirs;
use locsheet_core::{DEFAULT_COPY_SUFFIX, DEFAULT_HISTORY_LIMIT, DEFAULT_KEY_PATTERN, KeyValidator};
use locsheet_fill::FillMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Undo entries kept before the oldest is dropped
    pub history_limit: usize,
    /// Appended to the key of a duplicated row
    pub copy_suffix: String,
    /// Regex every localization key must match
    pub key_pattern: String,
    /// Fill mode used when none is given
    pub fill_mode: FillMode,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            history_limit: DEFAULT_HISTORY_LIMIT,
            copy_suffix: DEFAULT_COPY_SUFFIX.to_string(),
            key_pattern: DEFAULT_KEY_PATTERN.to_string(),
            fill_mode: FillMode::default(),
        }
    }
}

impl EditorConfig {
    /// Render as TOML, in the same shape `load_config` accepts.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

/// Read and parse one config file.
pub fn read_config(path: &Path) -> Result<EditorConfig> {
    let size = std::fs::metadata(path)?.len();
    if size > MAX_CONFIG_FILE_BYTES {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            size,
            max: MAX_CONFIG_FILE_BYTES,
        });
    }
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load the configuration from `explicit` or the user config dir.
///
/// Never fails: problems are reported as warnings and defaults are used in
/// their place. A missing default file is not a problem; a missing explicit
/// one is.
pub fn load_config(explicit: Option<&Path>) -> (EditorConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let path = explicit.map(Path::to_path_buf).or_else(user_config_path);

    let mut config = match path.as_ref() {
        Some(path) if path.exists() => match read_config(path) {
            Ok(config) => config,
            Err(err) => {
                warnings.push(format!("Ignoring {}: {}", path.display(), err));
                EditorConfig::default()
            }
        },
        Some(path) if explicit.is_some() => {
            warnings.push(format!("Config file not found: {}", path.display()));
            EditorConfig::default()
        }
        _ => EditorConfig::default(),
    };

    if config.history_limit == 0 {
        warnings.push("history_limit must be at least 1; using 1".to_string());
        config.history_limit = 1;
    }
    if let Err(err) = KeyValidator::new(&config.key_pattern) {
        warnings.push(format!("{}; using {}", err, DEFAULT_KEY_PATTERN));
        config.key_pattern = DEFAULT_KEY_PATTERN.to_string();
    }

    (config, warnings)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "locsheet")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
