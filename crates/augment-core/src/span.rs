//! Source location tracking for diagnostics.
//!
//! Provides [`Span`] to track where declarations, call sites and errors occur.
//! Every span also records the [`FileId`] of the compilation unit it belongs to,
//! since augmentation units and their use sites routinely live in different files.

use std::fmt;

/// Identifies one compiled file (compilation unit).
///
/// The numeric value doubles as the compile-unit ordinal: registration merges
/// per-file results in ascending `FileId` order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A span of source code, represented by its starting position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// File the span belongs to.
    pub file: FileId,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a new span in the given file.
    #[inline]
    pub fn new(file: FileId, line: u32, col: u32, len: u32) -> Self {
        Self {
            file,
            line,
            col,
            len,
        }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(file: FileId, line: u32, col: u32) -> Self {
        Self {
            file,
            line,
            col,
            len: 0,
        }
    }

    /// Whether this span is empty (zero length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The length of this span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Key used to order diagnostics deterministically.
    #[inline]
    pub fn sort_key(&self) -> (FileId, u32, u32) {
        (self.file, self.line, self.col)
    }

    /// Merge two spans into one that starts at the first span and covers both.
    ///
    /// Spans from different lines keep the first position and add the lengths.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        if self.line == other.line {
            let start_col = self.col.min(other.col);
            let end_col = (other.col + other.len).max(self.col + self.len);
            Span {
                file: self.file,
                line: self.line,
                col: start_col,
                len: end_col - start_col,
            }
        } else {
            Span {
                file: self.file,
                line: self.line,
                col: self.col,
                len: self.len + other.len,
            }
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
