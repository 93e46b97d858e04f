//! Numeric progression detection.
//!
//! A progression is a run of values that share the same text before and after
//! a trailing number, with the numbers forming an arithmetic sequence:
//!
//! ```ignore
//! let p = detect_progression(&["Item01", "Item02"]).unwrap();
//! assert_eq!(p.step, 1);
//! assert_eq!(p.render(2), "Item03");
//! ```

use regex::Regex;
use std::sync::OnceLock;

/// A detected arithmetic sequence embedded in text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progression {
    /// Text before the number, identical across all source values.
    pub prefix: String,
    /// Text after the number, identical across all source values (contains no digits).
    pub suffix: String,
    /// Number carried by the first source value.
    pub start: i64,
    /// Difference between consecutive source values (1 for a single value).
    pub step: i64,
    /// Zero-padded width, when any source number was written with leading zeros.
    pub width: Option<usize>,
}

impl Progression {
    /// Render the value at `position` in the sequence (0 is the first source value).
    pub fn render(&self, position: usize) -> String {
        let value = i128::from(self.start) + position as i128 * i128::from(self.step);
        let digits = match self.width {
            Some(width) => format!("{:0width$}", value.unsigned_abs(), width = width),
            None => value.unsigned_abs().to_string(),
        };
        let sign = if value < 0 { "-" } else { "" };
        format!("{}{}{}{}", self.prefix, sign, digits, self.suffix)
    }

    /// Continue the sequence after `source_len` known values.
    pub fn continue_after(&self, source_len: usize, count: usize) -> Vec<String> {
        (0..count).map(|i| self.render(source_len + i)).collect()
    }
}

/// Matches `(prefix)(trailing digit run)(suffix without digits)`.
fn trailing_number_re() -> &'static Regex {
    static TRAILING_NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    TRAILING_NUMBER_RE.get_or_init(|| {
        Regex::new(r"^(?<prefix>.*?)(?<digits>[0-9]+)(?<suffix>[^0-9]*)$")
            .expect("trailing number regex must compile")
    })
}

/// Detect an arithmetic progression across `values`.
///
/// Returns `None` when any value lacks a trailing number, when prefixes or
/// suffixes differ, when a number does not fit in an `i64`, or when the
/// differences between consecutive numbers are not constant.
pub fn detect_progression<S: AsRef<str>>(values: &[S]) -> Option<Progression> {
    let re = trailing_number_re();
    let mut parts = Vec::with_capacity(values.len());
    for value in values {
        let caps = re.captures(value.as_ref())?;
        let prefix = caps.name("prefix")?.as_str();
        let digits = caps.name("digits")?.as_str();
        let suffix = caps.name("suffix")?.as_str();
        parts.push((prefix, digits, suffix));
    }

    let (prefix, first_digits, suffix) = *parts.first()?;
    if parts.iter().any(|(p, _, s)| *p != prefix || *s != suffix) {
        return None;
    }

    let numbers = parts
        .iter()
        .map(|(_, digits, _)| digits.parse::<i64>().ok())
        .collect::<Option<Vec<i64>>>()?;

    let step = match numbers.as_slice() {
        [_] => 1,
        [first, second, ..] => second.checked_sub(*first)?,
        [] => return None,
    };
    let linear = numbers
        .windows(2)
        .all(|pair| pair[1].checked_sub(pair[0]) == Some(step));
    if !linear {
        return None;
    }

    let padded = parts
        .iter()
        .any(|(_, digits, _)| digits.starts_with('0') && digits.len() > 1);

    Some(Progression {
        prefix: prefix.to_string(),
        suffix: suffix.to_string(),
        start: numbers[0],
        step,
        width: padded.then_some(first_digits.len()),
    })
}
