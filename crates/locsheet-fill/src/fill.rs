//! Fill value generation.

use crate::progression::detect_progression;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a drag-fill extends the selected values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    /// Continue a numeric progression when one is detected, otherwise copy.
    #[default]
    #[serde(alias = "series")]
    Auto,
    /// Repeat the source values cyclically.
    Copy,
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillMode::Auto => write!(f, "auto"),
            FillMode::Copy => write!(f, "copy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFillModeError(pub String);

impl fmt::Display for ParseFillModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown fill mode '{}' (expected 'auto', 'series' or 'copy')", self.0)
    }
}

impl std::error::Error for ParseFillModeError {}

impl FromStr for FillMode {
    type Err = ParseFillModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "series" => Ok(FillMode::Auto),
            "copy" => Ok(FillMode::Copy),
            other => Err(ParseFillModeError(other.to_string())),
        }
    }
}

/// Direction a fill handle is dragged in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillAxis {
    /// Extend downwards: each column of the selection is its own source.
    Down,
    /// Extend to the right: each row of the selection is its own source.
    Right,
}

/// Generate `count` values continuing `source`.
///
/// An empty source fills with empty strings.
pub fn generate_fill_data<S: AsRef<str>>(source: &[S], count: usize, mode: FillMode) -> Vec<String> {
    if source.is_empty() {
        return vec![String::new(); count];
    }

    if mode == FillMode::Auto
        && let Some(progression) = detect_progression(source)
    {
        return progression.continue_after(source.len(), count);
    }

    cycle(source, count)
}

fn cycle<S: AsRef<str>>(source: &[S], count: usize) -> Vec<String> {
    source
        .iter()
        .cycle()
        .take(count)
        .map(|s| s.as_ref().to_string())
        .collect()
}
