//! Position and location tracking for source code locations
//!
//! This module defines the data structures for representing positions and locations in
//! source code, as well as utilities for converting byte offsets to line/column positions.
//!
//! ## Types
//!
//! - [`Position`] - A line:column position plus its absolute byte offset
//! - [`Range`] - A half-open source range `[start, end)`
//! - [`SourceLocation`] - Utility for converting byte offsets to positions
//!
//! ## Key Design
//!
//! - **Mandatory locations**: tokens and AST nodes carry required ranges, never `Option`
//! - **Total order**: positions compare by offset; line/column always agree with it
//! - **Zero based**: lines and columns start at 0, columns count bytes within the line
//! - **Efficient conversion**: O(log n) binary search for byte-to-position conversion
//!
//! The lexer produces byte spans from logos and converts them here once; everything
//! downstream only copies ranges around.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Range as ByteRange;

/// A position in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// One-based `line:column` form used in user-facing messages.
    pub fn to_display_string(&self) -> String {
        format!("{}:{}", self.line + 1, self.column + 1)
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset
            .cmp(&other.offset)
            .then(self.line.cmp(&other.line))
            .then(self.column.cmp(&other.column))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width range at `position`.
    pub fn empty_at(position: Position) -> Self {
        Self::new(position, position)
    }

    /// Byte span of this range, suitable for slicing the source.
    pub fn span(&self) -> ByteRange<usize> {
        self.start.offset..self.end.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Check if a position is contained within this range.
    ///
    /// The end is inclusive so that a cursor placed right after the last character of a
    /// name still counts as being on it, which is what editors report.
    pub fn contains(&self, pos: Position) -> bool {
        self.start.offset <= pos.offset && pos.offset <= self.end.offset
    }

    /// Check if another range overlaps with this range
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start.offset < other.end.offset && other.start.offset < self.end.offset
    }

    /// Smallest range covering both `self` and `other`.
    pub fn cover(&self, other: &Range) -> Range {
        Range::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Build a bounding box that contains all provided ranges.
    pub fn bounding_box<'a, I>(mut ranges: I) -> Option<Range>
    where
        I: Iterator<Item = &'a Range>,
    {
        let first = *ranges.next()?;
        Some(ranges.fold(first, |acc, range| acc.cover(range)))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Provides fast conversion from byte offsets to line/column positions
#[derive(Debug, Clone)]
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
    len: usize,
}

impl SourceLocation {
    /// Create a new SourceLocation from source code
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Convert a byte offset to a line/column position.
    ///
    /// Offsets past the end of the source are clamped to the end.
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let offset = byte_offset.min(self.len);
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);

        Position::new(line, offset - self.line_starts[line], offset)
    }

    /// Convert a byte range to a range
    pub fn byte_range_to_range(&self, range: &ByteRange<usize>) -> Range {
        Range::new(
            self.byte_to_position(range.start),
            self.byte_to_position(range.end),
        )
    }

    /// Convert a zero-based line/column pair to a position, if it lies inside the source.
    pub fn line_column_to_position(&self, line: usize, column: usize) -> Option<Position> {
        let start = *self.line_starts.get(line)?;
        let line_end = self
            .line_starts
            .get(line + 1)
            .map_or(self.len, |next| next - 1);
        let offset = start + column;
        (offset <= line_end).then(|| Position::new(line, column, offset))
    }

    /// Get the total number of lines in the source
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the byte offset for the start of a line
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }
}
