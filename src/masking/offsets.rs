//! Offset units and unit-aware text slicing
//!
//! Detector offsets are expressed in the detector's indexing unit, not in
//! UTF-8 bytes. The upstream language service reports UTF-16 code units by
//! default, so `"👋 Bob"` has `Bob` at offset 3 (the emoji is a surrogate
//! pair), while in Unicode code points it is at offset 2.
//!
//! [`TextIndex`] maps every unit position of a text to its byte offset once,
//! so that all slicing during normalization and reconstruction uses exactly
//! the same unit as the entities and the emitted spans.

use crate::domain::{Result, ScrubError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Indexing unit for entity offsets and output spans
///
/// Serialized with the names the language service uses for its
/// `stringIndexType` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OffsetUnit {
    /// UTF-16 code units (characters outside the BMP count as two)
    #[default]
    Utf16CodeUnit,
    /// Unicode scalar values
    UnicodeCodePoint,
}

impl OffsetUnit {
    /// Name of the unit as understood by the language service
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf16CodeUnit => "Utf16CodeUnit",
            Self::UnicodeCodePoint => "UnicodeCodePoint",
        }
    }

    /// Length of `text` in this unit
    pub fn measure(&self, text: &str) -> usize {
        match self {
            Self::Utf16CodeUnit => text.encode_utf16().count(),
            Self::UnicodeCodePoint => text.chars().count(),
        }
    }

    fn width(&self, c: char) -> usize {
        match self {
            Self::Utf16CodeUnit => c.len_utf16(),
            Self::UnicodeCodePoint => 1,
        }
    }
}

impl fmt::Display for OffsetUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OffsetUnit {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "utf16" | "utf-16" | "utf16codeunit" => Ok(Self::Utf16CodeUnit),
            "codepoint" | "unicodecodepoint" => Ok(Self::UnicodeCodePoint),
            _ => Err(ScrubError::Configuration(format!(
                "Invalid offset unit '{s}'. Must be one of: Utf16CodeUnit, UnicodeCodePoint"
            ))),
        }
    }
}

/// A text indexed by [`OffsetUnit`] positions
///
/// `boundaries[i]` holds the byte offset of unit position `i`, or `None` when
/// position `i` falls inside a character (the low half of a surrogate pair).
/// The final entry is the byte length of the text.
#[derive(Debug, Clone)]
pub struct TextIndex<'a> {
    text: &'a str,
    unit: OffsetUnit,
    boundaries: Vec<Option<usize>>,
}

impl<'a> TextIndex<'a> {
    /// Index `text` in the given unit
    pub fn new(text: &'a str, unit: OffsetUnit) -> Self {
        let mut boundaries = Vec::with_capacity(text.len() + 1);
        for (byte, c) in text.char_indices() {
            boundaries.push(Some(byte));
            for _ in 1..unit.width(c) {
                boundaries.push(None);
            }
        }
        boundaries.push(Some(text.len()));

        Self {
            text,
            unit,
            boundaries,
        }
    }

    /// The indexed text
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// The unit used for positions
    pub fn unit(&self) -> OffsetUnit {
        self.unit
    }

    /// Length of the text in units
    pub fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Whether the text is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte offset of a unit position, if it lies on a character boundary
    pub fn byte_offset(&self, position: usize) -> Option<usize> {
        self.boundaries.get(position).copied().flatten()
    }

    /// Slice `[start, end)` in units
    ///
    /// Returns `None` if the range is reversed, out of bounds, or splits a
    /// character.
    pub fn slice(&self, start: usize, end: usize) -> Option<&'a str> {
        if start > end {
            return None;
        }
        let from = self.byte_offset(start)?;
        let to = self.byte_offset(end)?;
        Some(&self.text[from..to])
    }
}
