//! Source location spans.
//!
//! A [`Span`] is a plain value: file id, half-open byte range, and an optional
//! 1-based line/column of its start. Line and column are `0` when unknown;
//! the lexer leaves them unset and the diagnostic layer resolves them through
//! its source map.

use std::fmt;

/// Error when creating a span from a range that exceeds `u32::MAX`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpanError {
    /// Span start position exceeds `u32::MAX`.
    #[error("span start {0} (0x{0:X}) exceeds u32::MAX (0x{max:X})", max = u32::MAX)]
    StartTooLarge(usize),
    /// Span end position exceeds `u32::MAX`.
    #[error("span end {0} (0x{0:X}) exceeds u32::MAX (0x{max:X})", max = u32::MAX)]
    EndTooLarge(usize),
}

/// Source location span.
///
/// Layout: 20 bytes
/// - `file_id`: owning file, `0` means "no file"
/// - `start`/`end`: byte offsets, `end` exclusive
/// - `line`/`col`: 1-based position of `start`, `0` when not computed
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub file_id: u32,
    pub start: u32,
    pub end: u32,
    pub line: u32,
    pub col: u32,
}

impl Span {
    /// Placeholder span with no file.
    pub const DUMMY: Span = Span {
        file_id: 0,
        start: 0,
        end: 0,
        line: 0,
        col: 0,
    };

    /// Create a span without line/column information.
    #[inline]
    pub const fn new(file_id: u32, start: u32, end: u32) -> Self {
        Span {
            file_id,
            start,
            end,
            line: 0,
            col: 0,
        }
    }

    /// Attach a 1-based line and column to this span.
    #[inline]
    #[must_use]
    pub const fn with_line_col(mut self, line: u32, col: u32) -> Self {
        self.line = line;
        self.col = col;
        self
    }

    /// Try to create a span from a byte range.
    #[inline]
    pub fn try_from_range(file_id: u32, range: std::ops::Range<usize>) -> Result<Self, SpanError> {
        let start =
            u32::try_from(range.start).map_err(|_| SpanError::StartTooLarge(range.start))?;
        let end = u32::try_from(range.end).map_err(|_| SpanError::EndTooLarge(range.end))?;
        Ok(Span::new(file_id, start, end))
    }

    /// A span is valid when it names a file and its range is not reversed.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.file_id != 0 && self.end >= self.start
    }

    /// Length of the span in bytes (0 for reversed spans).
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Swap `start` and `end` if they are reversed.
    #[inline]
    #[must_use]
    pub const fn normalize(self) -> Span {
        if self.end < self.start {
            Span {
                start: self.end,
                end: self.start,
                ..self
            }
        } else {
            self
        }
    }

    /// Merge two spans into one covering both.
    ///
    /// - If either side is invalid, the other side is returned normalized.
    /// - Spans from different files keep the left operand.
    /// - Otherwise the result is the union of both ranges, positioned at the
    ///   earlier known line/column.
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        if !self.is_valid() {
            return other.normalize();
        }
        if !other.is_valid() {
            return self.normalize();
        }
        if self.file_id != other.file_id {
            return self;
        }

        let (line, col) = earlier_position((self.line, self.col), (other.line, other.col));
        Span {
            file_id: self.file_id,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line,
            col,
        }
    }

    /// Clamp both offsets to `max_end`, then normalize.
    #[must_use]
    pub fn clamp(self, max_end: u32) -> Span {
        Span {
            start: self.start.min(max_end),
            end: self.end.min(max_end),
            ..self
        }
        .normalize()
    }

    /// Check if an offset is within this span (`start <= offset < end`).
    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Check whether two spans share a file and their inclusive ranges meet.
    #[inline]
    pub fn overlaps(&self, other: &Span) -> bool {
        self.file_id == other.file_id && self.start <= other.end && other.start <= self.end
    }

    /// Convert to a `std::ops::Range`.
    #[inline]
    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Pick the earlier of two `(line, col)` positions, treating line `0` as unknown.
fn earlier_position(a: (u32, u32), b: (u32, u32)) -> (u32, u32) {
    match (a.0 == 0, b.0 == 0) {
        (true, _) => b,
        (_, true) => a,
        _ => a.min(b),
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}..{}", self.file_id, self.start, self.end)?;
        if self.line != 0 {
            write!(f, "@{}:{}", self.line, self.col)?;
        }
        Ok(())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// Size assertions to prevent accidental regressions
mod size_asserts {
    use super::Span;
    crate::static_assert_size!(Span, 20);
}
