//! Boolean-like columns: detection and value flipping.
//!
//! Localization tables often carry flag columns written as `0`/`1` or
//! `true`/`false`. Toggling keeps the spelling the cell already uses.

use crate::document::Document;

const BOOLEAN_VALUES: [&str; 6] = ["0", "1", "true", "false", "TRUE", "FALSE"];

const PREFERENCE_SCAN_ROWS: usize = 20;

/// Indices of columns whose non-empty cells are all boolean-like.
///
/// A column with no non-empty cell is not reported.
pub fn detect_boolean_columns(doc: &Document) -> Vec<usize> {
    (0..doc.headers.len())
        .filter(|&col| {
            let mut values = doc
                .rows
                .iter()
                .filter_map(|row| row.cells.get(col))
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .peekable();
            values.peek().is_some() && values.all(|value| BOOLEAN_VALUES.contains(&value))
        })
        .collect()
}

pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Whether `value` can live in a boolean column (blank counts as false).
pub fn is_boolean_value(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || BOOLEAN_VALUES.contains(&value)
}

/// The true-spelling a blank cell of `col` should take, guessed from the
/// first rows of the column. Defaults to `"1"`.
pub fn preferred_true(doc: &Document, col: usize) -> &'static str {
    doc.rows
        .iter()
        .take(PREFERENCE_SCAN_ROWS)
        .filter_map(|row| row.cells.get(col))
        .map(|value| value.trim())
        .find_map(|value| match value {
            "true" | "false" => Some("true"),
            "TRUE" | "FALSE" => Some("TRUE"),
            "0" | "1" => Some("1"),
            _ => None,
        })
        .unwrap_or("1")
}

/// Flip a boolean-like value; blanks become `preferred_true`, other text is returned unchanged.
pub fn toggle_boolean_value(value: &str, preferred_true: &str) -> String {
    match value.trim() {
        "" => preferred_true.to_string(),
        "0" => "1".to_string(),
        "1" => "0".to_string(),
        "true" => "false".to_string(),
        "false" => "true".to_string(),
        "TRUE" => "FALSE".to_string(),
        "FALSE" => "TRUE".to_string(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentMeta, TableData};

    fn doc(rows: Vec<Vec<&str>>) -> Document {
        let headers = vec!["Key".to_string(), "Flag".to_string(), "Text".to_string()];
        let rows = rows
            .into_iter()
            .map(|r| r.into_iter().map(String::from).collect())
            .collect();
        Document::new("d".into(), DocumentMeta::default(), TableData::new(headers, rows)).unwrap()
    }

    #[test]
    fn test_detects_flag_columns() {
        let d = doc(vec![
            vec!["A", "1", "hello"],
            vec!["B", "", "0"],
            vec!["C", "0", ""],
        ]);
        assert_eq!(detect_boolean_columns(&d), vec![1]);
    }

    #[test]
    fn test_empty_column_is_not_boolean() {
        let d = doc(vec![vec!["A", "", "x"]]);
        assert!(detect_boolean_columns(&d).is_empty());
    }

    #[test]
    fn test_toggle_keeps_spelling() {
        assert_eq!(toggle_boolean_value("0", "1"), "1");
        assert_eq!(toggle_boolean_value("true", "1"), "false");
        assert_eq!(toggle_boolean_value("FALSE", "1"), "TRUE");
        assert_eq!(toggle_boolean_value(" ", "true"), "true");
        assert_eq!(toggle_boolean_value("maybe", "1"), "maybe");
    }

    #[test]
    fn test_preferred_true_follows_column() {
        let d = doc(vec![
            vec!["A", "", "TRUE"],
            vec!["B", "false", ""],
            vec!["C", "", ""],
        ]);
        assert_eq!(preferred_true(&d, 1), "true");
        assert_eq!(preferred_true(&d, 2), "TRUE");
        assert_eq!(preferred_true(&d, 0), "1");
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy("1"));
        assert!(is_truthy("True"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
        assert!(is_boolean_value(""));
        assert!(!is_boolean_value("yes"));
    }
}
