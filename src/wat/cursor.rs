//! Character cursor over source text.
//!
//! Tracks byte offset, line and column as characters are consumed so every
//! token and error can carry an accurate [`Span`].

use super::token::Span;

/// A saved cursor position, used as the start of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Span from this position up to `end`, located at this position's line and column.
    #[must_use]
    pub fn span_to(self, end: &Position) -> Span {
        Span::new(self.offset, end.offset, self.line, self.column)
    }

    #[must_use]
    pub fn span_here(self) -> Span {
        Span::new(self.offset, self.offset, self.line, self.column)
    }
}

pub struct Cursor<'a> {
    source: &'a str,
    pos: Position,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: Position {
                offset: 0,
                line: 1,
                column: 1,
            },
        }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos.offset..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Whether the remaining input starts with `prefix`.
    pub fn at(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Consume one character. A newline moves to column 1 of the next line.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos.offset += c.len_utf8();
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(c)
    }

    /// Consume `c` if it is next.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume characters while `pred` holds and return the consumed text.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos.offset;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        &self.source[start..self.pos.offset]
    }

    /// Source text between `start` and the current position.
    pub fn slice_from(&self, start: &Position) -> &'a str {
        &self.source[start.offset..self.pos.offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_line_one_column_one() {
        let cursor = Cursor::new("(module)");
        assert_eq!(
            cursor.position(),
            Position {
                offset: 0,
                line: 1,
                column: 1
            }
        );
        assert_eq!(cursor.peek(), Some('('));
    }

    #[test]
    fn empty_source_has_nothing_to_bump() {
        let mut cursor = Cursor::new("");
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.bump(), None);
    }

    #[test]
    fn newline_resets_column() {
        let mut cursor = Cursor::new("a\n  b");
        cursor.bump();
        cursor.bump();
        assert_eq!(cursor.position().line, 2);
        assert_eq!(cursor.position().column, 1);
        cursor.take_while(|c| c == ' ');
        assert_eq!(cursor.peek(), Some('b'));
        assert_eq!(cursor.position().column, 3);
    }

    #[test]
    fn columns_count_characters() {
        let mut cursor = Cursor::new("é$x");
        cursor.bump();
        assert_eq!(cursor.position().offset, 2);
        assert_eq!(cursor.position().column, 2);
    }

    #[test]
    fn eat_and_at() {
        let mut cursor = Cursor::new("(;x");
        assert!(cursor.at("(;"));
        assert!(!cursor.eat(')'));
        assert!(cursor.eat('('));
        assert_eq!(cursor.peek(), Some(';'));
    }

    #[test]
    fn take_while_returns_run() {
        let mut cursor = Cursor::new("i32.add)");
        let start = cursor.position();
        assert_eq!(cursor.take_while(|c| c != ')'), "i32.add");
        assert_eq!(cursor.slice_from(&start), "i32.add");
        let span = start.span_to(&cursor.position());
        assert_eq!(span.len(), 7);
    }
}
