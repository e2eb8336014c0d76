//! Human-readable positions within a text source.

use core::fmt;

/// Tab stops occur every eight columns.
const TAB_WIDTH: u64 = 8;

/// A position within a text source.
///
/// Lines and columns are 1-based; the byte offset is 0-based. A
/// `Position` is a plain value: it is advanced one decoded character at
/// a time by [`advance`](Position::advance) and carries just enough
/// state to collapse a `\r\n` pair into a single line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Byte offset from the start of the source.
    pub offset: u64,
    /// 1-based line number.
    pub line: u64,
    /// 1-based column number.
    pub column: u64,
    // Set after '\r' so that a following '\n' does not count as a second
    // line break.
    skip_next_lf: bool,
}

impl Position {
    /// Returns the position of the start of a source: line 1, column 1,
    /// offset 0.
    #[must_use]
    pub fn new() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
            skip_next_lf: false,
        }
    }

    /// Sets this position back to the start of a source.
    pub fn reset(&mut self) {
        *self = Position::new();
    }

    /// Updates the position, given the character encountered at the
    /// current position and the number of bytes used to encode it.
    ///
    /// A `size` of zero is a no-op. For UTF-8 sources `ch` and `size`
    /// are the values produced by the decoder, but this method does not
    /// care which encoding was actually used.
    ///
    /// Special characters:
    /// - `'\r'` and `'\n'` each start a new line, except that the `'\n'`
    ///   of a `"\r\n"` pair is free;
    /// - `'\t'` advances the column to the next multiple-of-8 tab stop.
    pub fn advance(&mut self, ch: char, size: usize) {
        if size == 0 {
            return;
        }

        self.offset += size as u64;
        if ch == '\r' {
            self.line += 1;
            self.column = 1;
            self.skip_next_lf = true;
        } else if ch == '\n' && self.skip_next_lf {
            self.skip_next_lf = false;
        } else if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else if ch == '\t' {
            self.column += TAB_WIDTH - ((self.column - 1) % TAB_WIDTH);
            self.skip_next_lf = false;
        } else {
            self.column += 1;
            self.skip_next_lf = false;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {} column {} (byte offset {})",
            self.line, self.column, self.offset
        )
    }
}
