//! Read position over normalized lines

use crate::source::SourceLine;

/// Position within a line slice
///
/// Cursors are `Copy`; extractors take one by value and hand back the cursor
/// positioned after whatever they consumed.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    lines: &'a [SourceLine],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(lines: &'a [SourceLine]) -> Self {
        Self { lines, pos: 0 }
    }

    /// Line under the cursor
    pub fn peek(&self) -> Option<&'a SourceLine> {
        self.lines.get(self.pos)
    }

    /// Cursor moved forward by `n` lines, clamped to the end
    pub fn advance(self, n: usize) -> Self {
        Self {
            lines: self.lines,
            pos: (self.pos + n).min(self.lines.len()),
        }
    }

    /// Lines from the cursor to the end
    pub fn rest(&self) -> &'a [SourceLine] {
        &self.lines[self.pos..]
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::source_lines;

    #[test]
    fn test_advance_and_peek() {
        let lines = source_lines("a\nb\nc\n");
        let start = Cursor::new(&lines);
        let next = start.advance(2);

        assert_eq!(start.peek().unwrap().text, "a");
        assert_eq!(next.peek().unwrap().text, "c");
        assert_eq!(next.rest().len(), 1);
        assert_eq!(next.position(), 2);
    }

    #[test]
    fn test_advance_clamps_at_end() {
        let lines = source_lines("a\n");
        let cursor = Cursor::new(&lines).advance(5);

        assert!(cursor.is_at_end());
        assert!(cursor.peek().is_none());
        assert!(cursor.rest().is_empty());
    }
}
