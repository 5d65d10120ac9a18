/// Position of a [Reader]. Copy it out with [Reader::cursor] and put it back
/// with [Reader::restore] to undo any amount of consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub index:  usize,
    pub line:   usize,
    pub column: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor { index: 0, line: 1, column: 1 }
    }
}

/// A cursor over the characters of a schema source.
pub struct Reader {
    chars:  Vec<char>,
    cursor: Cursor,
}

impl Reader {
    pub fn new(text: &str) -> Reader {
        Reader {
            chars:  text.chars().collect(),
            cursor: Cursor::default(),
        }
    }

    /// The next `n` characters (fewer near the end), without advancing.
    pub fn peek(&self, n: usize) -> &[char] {
        let start = self.cursor.index;
        let end = start.saturating_add(n).min(self.chars.len());
        &self.chars[start..end]
    }

    /// The next `n` characters (fewer near the end), advancing past them.
    pub fn consume(&mut self, n: usize) -> &[char] {
        let start = self.cursor.index;
        let end = start.saturating_add(n).min(self.chars.len());
        for &c in &self.chars[start..end] {
            if c == '\n' {
                self.cursor.line += 1;
                self.cursor.column = 1;
            } else {
                self.cursor.column += 1;
            }
        }
        self.cursor.index = end;
        &self.chars[start..end]
    }

    pub fn at_end(&self) -> bool {
        self.cursor.index >= self.chars.len()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn restore(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_advance() {
        let reader = Reader::new("abc");
        assert_eq!(reader.peek(2), &['a', 'b']);
        assert_eq!(reader.peek(2), &['a', 'b']);
        assert_eq!(reader.cursor(), Cursor::default());
    }

    #[test]
    fn consume_clamps_at_end() {
        let mut reader = Reader::new("ab");
        assert_eq!(reader.consume(1), &['a']);
        assert_eq!(reader.consume(5), &['b']);
        assert!(reader.at_end());
        assert!(reader.consume(1).is_empty());
        assert!(reader.peek(3).is_empty());
    }

    #[test]
    fn tracks_lines_and_columns() {
        let mut reader = Reader::new("a\nbc");
        reader.consume(3);
        let cursor = reader.cursor();
        assert_eq!((cursor.index, cursor.line, cursor.column), (3, 2, 2));
    }

    #[test]
    fn restore_rewinds() {
        let mut reader = Reader::new("message");
        let saved = reader.cursor();
        reader.consume(4);
        reader.restore(saved);
        assert_eq!(reader.peek(7).iter().collect::<String>(), "message");
    }
}
