use crate::error::ParseErrorKind;

/// Byte-indexed cursor over the input text.
///
/// Grammar rules advance the cursor on success and restore a saved
/// position on failure; no lookahead beyond that is needed.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn restore(&mut self, pos: usize) {
        debug_assert!(pos <= self.input.len());
        self.pos = pos;
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    pub(crate) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_str(&mut self, expected: &str) -> bool {
        if self.rest().starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    /// Text between a saved position and the current one.
    pub(crate) fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.pos]
    }

    /// Consume the maximal run of characters matching `pred` and return it.
    pub(crate) fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        &self.input[start..self.pos]
    }
}

/// A grammar-level failure carrying a byte offset instead of a line and
/// column; the file parser translates it into a [`crate::ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SyntaxError {
    pub(crate) pos: usize,
    pub(crate) kind: ParseErrorKind,
}

impl SyntaxError {
    pub(crate) fn new(pos: usize, kind: ParseErrorKind) -> Self {
        Self { pos, kind }
    }
}

/// Translate a byte offset into a 1-based line and column.
pub(crate) fn position_at(input: &str, offset: usize) -> (u32, u32) {
    let clamped = offset.min(input.len());
    let mut line = 1u32;
    let mut line_start = 0usize;
    for (idx, byte) in input.as_bytes()[..clamped].iter().enumerate() {
        if *byte == b'\n' {
            line += 1;
            line_start = idx + 1;
        }
    }
    let column = input[line_start..clamped].chars().count() as u32 + 1;
    (line, column)
}
