use core::fmt;

/// A half-open byte range into a single source file.
///
/// Every token, syntax node and diagnostic carries one of these so that a
/// downstream tool (an editor plugin, a code generator's error reporter) can
/// point back at the exact slice of source text that produced it. Ranges
/// compose: a syntax node's span is the union of its first and last child.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Byte offset of the first byte covered by this span.
    pub start: u32,
    /// Byte offset one past the last byte covered by this span.
    pub end: u32,
}

impl Span {
    /// Creates a new span covering `[start, end)`.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// A zero-length span at `offset`, used for diagnostics about missing
    /// tokens (e.g. "expected `)` but found end of input").
    pub fn empty_at(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    /// The smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Length in bytes.
    pub fn len(self) -> u32 {
        self.end - self.start
    }

    /// True if this span covers zero bytes.
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Slices `source` with this span's range. Panics if the span does not
    /// fall on a char boundary of `source` or is out of bounds; spans
    /// produced by the lexer always satisfy this.
    pub fn slice<'a>(self, source: &'a str) -> &'a str {
        &source[self.start as usize..self.end as usize]
    }

    /// Resolves this span to a 1-indexed line and column within `source`,
    /// for use by diagnostic renderers.
    pub fn start_line_col(self, source: &str) -> LineCol {
        LineCol::locate(source, self.start as usize)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A 1-indexed line and column, computed lazily from a byte offset.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct LineCol {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column, counted in `char`s from the start of the line.
    pub column: u32,
}

impl LineCol {
    fn locate(source: &str, byte_offset: usize) -> Self {
        let mut line = 1u32;
        let mut column = 1u32;
        for (idx, ch) in source.char_indices() {
            if idx >= byte_offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self { line, column }
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Anything that has a source [`Span`].
pub trait Spanned {
    /// Returns the span covering this node's full extent.
    fn span(&self) -> Span;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_union() {
        let a = Span::new(3, 7);
        let b = Span::new(5, 12);
        assert_eq!(a.to(b), Span::new(3, 12));
    }

    #[test]
    fn line_col_counts_newlines() {
        let src = "select 1\nfrom foo\nwhere x = 1";
        let span = Span::new(19, 20); // the 'x' in the third line
        let lc = span.start_line_col(src);
        assert_eq!(lc, LineCol { line: 3, column: 7 });
    }

    #[test]
    fn line_col_first_line() {
        let src = "select 1";
        assert_eq!(
            Span::new(0, 1).start_line_col(src),
            LineCol { line: 1, column: 1 }
        );
    }
}
