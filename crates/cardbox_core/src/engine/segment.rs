//! Content segmentation into atomic knowledge units.
//!
//! # Responsibility
//! - Split raw plaintext on blank-line boundaries.
//! - Trim units and drop the ones that trim to nothing.
//!
//! # Invariants
//! - Segmentation is pure and deterministic for the same input.
//! - Every returned unit is non-empty after trimming.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static PARAGRAPH_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\r?\n){2,}").expect("valid paragraph break regex"));

/// Segmentation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentError {
    /// No unit survived trimming; the caller must supply more content.
    EmptyContent,
}

impl Display for SegmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "content produced no non-empty units"),
        }
    }
}

impl Error for SegmentError {}

/// Splits `raw_text` into trimmed, non-empty paragraph units.
///
/// Units are separated by two or more consecutive newlines (CRLF input
/// is tolerated).
///
/// # Errors
/// - [`SegmentError::EmptyContent`] when nothing survives trimming.
pub fn segment(raw_text: &str) -> Result<Vec<String>, SegmentError> {
    let units: Vec<String> = PARAGRAPH_BREAK_RE
        .split(raw_text)
        .map(str::trim)
        .filter(|unit| !unit.is_empty())
        .map(ToString::to_string)
        .collect();

    if units.is_empty() {
        return Err(SegmentError::EmptyContent);
    }

    Ok(units)
}
