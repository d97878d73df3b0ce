//! Bin codes and classification results.
//!
//! The vision backend is instructed to answer with a single leading digit
//! (`1`..`4`) followed by a free-text justification, typically formatted as
//! `"N. explanation"`. This module owns the parsing of that text into a
//! tagged [`BinCode`] plus explanation, with defined behavior for every
//! malformed input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of characters stripped from the front of a recognized response
/// to recover the explanation (the `"N. "` prefix).
///
/// The prefix length is a best-effort heuristic, not a backend guarantee;
/// stripping is done on char boundaries and saturates on short strings.
pub const EXPLANATION_OFFSET: usize = 3;

/// Municipal waste-stream category for a classified item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BinCode {
    /// Recycling
    Blue,
    /// Compost
    Green,
    /// General waste
    Black,
    /// Does not belong in any curbside bin
    Other,
    /// Backend response did not carry a usable bin digit
    #[default]
    Unrecognized,
}

/// Accent colour used when presenting a bin code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    Blue,
    Green,
    Gray,
    Yellow,
    Red,
}

impl BinCode {
    /// Map the leading digit of a backend response to a bin code.
    ///
    /// Anything outside `1`..`4` (including a missing first character)
    /// maps to [`BinCode::Unrecognized`].
    pub fn from_leading_digit(c: Option<char>) -> Self {
        match c {
            Some('1') => BinCode::Blue,
            Some('2') => BinCode::Green,
            Some('3') => BinCode::Black,
            Some('4') => BinCode::Other,
            _ => BinCode::Unrecognized,
        }
    }

    /// Get string representation of the bin code.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinCode::Blue => "blue",
            BinCode::Green => "green",
            BinCode::Black => "black",
            BinCode::Other => "other",
            BinCode::Unrecognized => "unrecognized",
        }
    }

    /// User-facing label for this bin code.
    pub fn label(&self) -> &'static str {
        match self {
            BinCode::Blue => "Blue bin",
            BinCode::Green => "Green bin",
            BinCode::Black => "Black bin",
            BinCode::Other => "Other",
            BinCode::Unrecognized => "Error",
        }
    }

    /// Accent colour paired with the label.
    pub fn accent(&self) -> Accent {
        match self {
            BinCode::Blue => Accent::Blue,
            BinCode::Green => Accent::Green,
            BinCode::Black => Accent::Gray,
            BinCode::Other => Accent::Yellow,
            BinCode::Unrecognized => Accent::Red,
        }
    }

    /// Whether the backend produced a usable category.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, BinCode::Unrecognized)
    }
}

impl fmt::Display for BinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed classification result.
///
/// Immutable once constructed; one is produced per completed backend call
/// and no history is retained here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Parsed waste-stream category
    pub bin: BinCode,
    /// Free-text justification from the backend (may be empty)
    pub explanation: String,
}

impl Classification {
    /// Parse raw backend response text into a classification.
    ///
    /// Recognized codes get the `"N. "` prefix stripped from the
    /// explanation. Unrecognized input keeps the full original text so no
    /// user-facing information is dropped. Never panics on empty or short
    /// input.
    pub fn parse(content: &str) -> Self {
        let bin = BinCode::from_leading_digit(content.chars().next());

        let explanation = if bin.is_recognized() {
            strip_prefix_chars(content, EXPLANATION_OFFSET).to_string()
        } else {
            content.to_string()
        };

        Self { bin, explanation }
    }
}

/// Drop the first `n` chars of `s`, saturating to the empty string.
fn strip_prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}
