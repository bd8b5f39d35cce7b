use std::str::Chars;

/// Peekable iterator over the characters of one candidate match.
///
/// Patterns advance a cursor over the remaining text of a line and report
/// how many bytes they consumed.
pub(crate) struct Cursor<'a> {
    len_start: usize,
    chars: Chars<'a>,
}

pub(crate) const EOF: char = '\0';

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            len_start: input.len(),
            chars: input.chars(),
        }
    }

    /// Peek at next character to be consumed
    pub fn peek(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF)
    }

    pub fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    pub fn advance(&mut self) -> Option<char> {
        self.chars.next()
    }

    /// Consume characters while some predicate is true or until EOF is reached
    pub fn advance_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while !self.is_eof() && predicate(self.peek()) {
            self.advance();
        }
    }

    /// Bytes consumed since the cursor was created
    pub fn consumed(&self) -> usize {
        self.len_start - self.chars.as_str().len()
    }
}
