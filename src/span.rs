//! Source positions and character ranges
//!
//! The render pipeline tags blocks with the source line they came from and,
//! for fine-grained notation, tags leaf spans with the `[start, end)`
//! character range they cover within that line.

/// Cursor position in the source document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourcePosition {
    /// Source line (as tagged by the render pipeline)
    pub line: usize,
    /// Character offset relative to the start of the line
    pub character: usize,
}

impl SourcePosition {
    /// Create a position
    pub const fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// Half-open character range `[start, end)` relative to a source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharRange {
    pub start: usize,
    pub end: usize,
}

impl CharRange {
    /// Create a range. Returns `None` when `end < start`.
    pub const fn new(start: usize, end: usize) -> Option<Self> {
        if end < start {
            None
        } else {
            Some(Self { start, end })
        }
    }

    /// Check whether `offset` falls inside the range
    #[inline]
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Length in characters
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the range covers nothing
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
