//! Byte ranges of the source, attached to every tree node and diagnostic.

use std::fmt;

use codespan::ByteIndex;
use codespan_reporting::diagnostic::Label;

/// A span of source code, as byte offsets.
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct Span(codespan::Span);

/// Converts a byte offset. Sources larger than 4GiB are clamped to the end.
fn offset(pos: usize) -> ByteIndex {
    ByteIndex(u32::try_from(pos).unwrap_or(u32::MAX))
}

impl Span {
    /// Empty span at the start of the source.
    pub const fn initial() -> Self {
        Self(codespan::Span::initial())
    }

    /// Empty span at a given offset.
    pub fn at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// Span between two offsets, in any order.
    pub fn new(start: usize, end: usize) -> Self {
        let (start, end) = (start.min(end), start.max(end));
        Self(codespan::Span::new(offset(start), offset(end)))
    }

    /// Start offset of the span.
    pub fn start(&self) -> usize {
        self.0.start().to_usize()
    }

    /// End offset of the span.
    pub fn end(&self) -> usize {
        self.0.end().to_usize()
    }

    /// Primary diagnostic label pointing at this span.
    pub fn as_label(&self) -> Label<()> {
        Label::primary((), self.start()..self.end())
    }

    /// Secondary diagnostic label pointing at this span.
    pub fn as_secondary_label(&self) -> Label<()> {
        Label::secondary((), self.start()..self.end())
    }

    /// Smallest span covering both spans, even disjoint ones.
    pub fn merge(self, other: Self) -> Self {
        Self(self.0.merge(other.0))
    }
}

impl From<Span> for Label<()> {
    fn from(span: Span) -> Self {
        span.as_label()
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(span: pest::Span<'_>) -> Self {
        Self::new(span.start(), span.end())
    }
}

impl Default for Span {
    fn default() -> Self {
        Span::initial()
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}..{}", self.start(), self.end())
    }
}
