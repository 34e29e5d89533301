//! Source location types
//!
//! Byte offsets into the original script text. Line/column positions are
//! derived on demand, since the lossless tree never needs them to print.

use serde::{Deserialize, Serialize};

/// Single location in source code (1-based line, 0-based byte column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Half-open byte range `[start, end)` in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} after end {}", start, end);
        Self { start, end }
    }

    /// Create a zero span (0..0)
    pub fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Zero-width span at `offset`
    pub fn empty_at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Smallest span covering both
    pub fn cover(&self, other: &Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Resolve the start of this span to a line/column location
    pub fn start_location(&self, source: &str) -> Location {
        location_of(source, self.start)
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// Line/column of a byte offset. Offsets past the end clamp to the end.
pub fn location_of(source: &str, offset: usize) -> Location {
    let offset = offset.min(source.len());
    let before = &source.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() as u32 + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|p| p + 1)
        .unwrap_or(0);
    Location::new(line, (offset - line_start) as u32)
}
