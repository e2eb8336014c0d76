//! The buffered, backtrackable character stream.
//!
//! [`CharStream`] is the lexing primitive beneath a hand-written parser:
//! it pulls bytes from a [`Read`] source in blocks, decodes them into
//! characters, and keeps every speculatively-read character in a log so
//! the caller can try a grammar production, back out, and try another.
//!
//! The stepping contract is [`advance`](CharStream::advance) plus the
//! accessors [`ch`](CharStream::ch), [`size`](CharStream::size),
//! [`position`](CharStream::position) and [`err`](CharStream::err).
//! Backtracking is controlled by [`save`](CharStream::save) /
//! [`restore`](CharStream::restore) / [`rewind`](CharStream::rewind),
//! and [`commit`](CharStream::commit) draws the line behind which no
//! restore can reach, releasing buffered characters.
//!
//! # Examples
//!
//! ```rust
//! use charstream::CharStream;
//!
//! let mut stream = CharStream::new("word1 word2".as_bytes());
//! let mut word = Vec::new();
//! stream.take_while(None, &mut word, char::is_alphanumeric);
//! stream.commit();
//! assert_eq!(word.iter().collect::<String>(), "word1");
//!
//! // The space did not match and is still there to be read.
//! assert!(stream.advance());
//! assert_eq!(stream.ch(), ' ');
//! ```

use std::{io::Read, ops::Range};

use crate::{
    Position, StreamError,
    decoder::{Decoder, Utf8Decoder},
    options::{DEFAULT_BLOCK_SIZE, StreamOptions},
};

/// Ceiling on the number of uncommitted characters. Reaching it means
/// the caller is advancing without ever committing.
const MAX_UNCOMMITTED: usize = 0x4000_0000;

/// What the stream found at one position: a decoded character, or the
/// terminal error that ended the stream. Never both.
#[derive(Debug, Clone)]
enum UnitState {
    Decoded { ch: char, size: usize },
    Terminal(StreamError),
}

/// One decoded character (or the terminal error), with the position it
/// was found at. Owned by the stream's log.
#[derive(Debug, Clone)]
struct SavedUnit {
    pos: Position,
    state: UnitState,
}

impl SavedUnit {
    fn is_terminal(&self) -> bool {
        matches!(self.state, UnitState::Terminal(_))
    }
}

/// A snapshot of a stream position, created by [`CharStream::save`].
///
/// A save point is a cheap copyable value, valid until the next
/// [`commit`](CharStream::commit) or [`reset`](CharStream::reset) on
/// the stream it came from.
#[derive(Debug, Clone, Copy)]
pub struct SavePoint {
    generation: u64,
    spec: usize,
}

/// An engine for lexing characters from a byte stream.
///
/// Conceptually similar to a "read one character / unread one
/// character" reader, except that a `CharStream` can unread an
/// arbitrary number of characters: everything read since the last
/// [`commit`](CharStream::commit) stays buffered and can be revisited
/// through [`restore`](CharStream::restore) or
/// [`rewind`](CharStream::rewind). It also tracks the human-friendly
/// [`Position`] of each character, and offers convenience methods for
/// extracting runs of characters matching a predicate.
///
/// The stream owns its source `R` for the duration; pass `&mut reader`
/// to keep ownership at the call site (`Read` is implemented for
/// `&mut R`). The source is never closed by the stream. A stream is an
/// exclusively-owned cursor: it is not meant to be shared across
/// threads and provides no internal synchronization.
///
/// # Examples
///
/// Lexing a word or a number, trying one production then the other:
///
/// ```rust
/// use charstream::CharStream;
///
/// fn lex_word_or_number(stream: &mut CharStream<&[u8]>) -> Option<String> {
///     if !stream.advance() {
///         return None;
///     }
///     let ch = stream.ch();
///     if ch.is_alphabetic() {
///         let mut word = vec![ch];
///         stream.take_while(None, &mut word, char::is_alphabetic);
///         stream.commit();
///         return Some(word.iter().collect());
///     }
///     if ch.is_ascii_digit() {
///         let mut number = vec![ch];
///         stream.take_while(None, &mut number, |c| c.is_ascii_digit());
///         stream.commit();
///         return Some(number.iter().collect());
///     }
///     stream.rewind();
///     None
/// }
///
/// let mut stream = CharStream::new("hello".as_bytes());
/// assert_eq!(lex_word_or_number(&mut stream).as_deref(), Some("hello"));
/// ```
pub struct CharStream<R, D = Utf8Decoder> {
    /// The byte source. Read in blocks, at most once per load.
    source: R,
    decoder: D,
    block_size: usize,
    /// Reusable buffer of `block_size + decoder.max_bytes_per_unit()`
    /// bytes; the slack guarantees a whole character always fits after
    /// the carried-over tail.
    buf: Vec<u8>,
    /// The sub-range of `buf` holding bytes read but not yet decoded.
    pending: Range<usize>,
    /// Position of the next character to be decoded from the source.
    pos: Position,
    /// Characters decoded since the last commit; index 0 is the oldest
    /// uncommitted one.
    log: Vec<SavedUnit>,
    /// Index into `log` of the character the caller is working on.
    curr: Option<usize>,
    /// Generation number, incremented on each commit or reset.
    generation: u64,
    /// Speculative read count: an index one past the last consumed log
    /// entry.
    spec: usize,
    /// Once the source reports an error it is recorded here, and no
    /// further reads are issued.
    terminal: Option<StreamError>,
}

impl<R: Read> CharStream<R> {
    /// Constructs a stream over `source` with the default UTF-8 decoder
    /// and default options.
    pub fn new(source: R) -> Self {
        Self::with_options(source, Utf8Decoder, StreamOptions::default())
    }
}

impl<R: Read, D: Decoder> CharStream<R, D> {
    /// Constructs a stream over `source` with an explicit decoder and
    /// options.
    ///
    /// # Panics
    ///
    /// Panics if the decoder reports `max_bytes_per_unit() < 1`.
    pub fn with_options(source: R, decoder: D, options: StreamOptions) -> Self {
        let max = decoder.max_bytes_per_unit();
        assert!(
            max >= 1,
            "decoder {} reports max_bytes_per_unit < 1",
            decoder.name()
        );
        let block_size = if options.block_size == 0 {
            DEFAULT_BLOCK_SIZE
        } else {
            options.block_size
        };
        CharStream {
            source,
            decoder,
            block_size,
            buf: vec![0; block_size + max],
            pending: 0..0,
            pos: Position::new(),
            log: Vec::new(),
            curr: None,
            generation: 0,
            spec: 0,
            terminal: None,
        }
    }

    /// Returns this stream to the newly-constructed state, reading from
    /// a new source.
    ///
    /// The byte buffer's allocation is retained, so resetting is the
    /// way to lex many inputs without paying for a fresh allocation
    /// each time. All logical state is cleared; the generation counter
    /// advances, so save points taken before the reset become stale.
    pub fn reset(&mut self, source: R) {
        self.source = source;
        self.pending = 0..0;
        self.pos.reset();
        self.log.clear();
        self.curr = None;
        self.generation += 1;
        self.spec = 0;
        self.terminal = None;
    }

    /// Returns the decoder this stream was built with.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Creates a save point at the current speculative position. O(1).
    #[must_use]
    pub fn save(&self) -> SavePoint {
        SavePoint {
            generation: self.generation,
            spec: self.spec,
        }
    }

    /// Rewinds the stream to the given save point.
    ///
    /// # Panics
    ///
    /// Panics if the save point predates a [`commit`](Self::commit) or
    /// [`reset`](Self::reset): committed characters are gone and cannot
    /// be restored to.
    pub fn restore(&mut self, sp: SavePoint) {
        assert!(
            sp.generation == self.generation,
            "save point is stale: it predates a commit() or reset()"
        );
        self.spec = sp.spec;
        self.curr = None;
    }

    /// Rewinds the stream to the position of the last
    /// [`commit`](Self::commit).
    pub fn rewind(&mut self) {
        self.spec = 0;
        self.curr = None;
    }

    /// Declares that the stream will never be rewound behind the
    /// current position, releasing the characters buffered before it.
    ///
    /// Each call to `commit` invalidates all outstanding save points.
    pub fn commit(&mut self) {
        self.log.drain(..self.spec);
        self.generation += 1;
        self.spec = 0;
        self.curr = None;
    }

    /// Reads the next block of characters from the byte source.
    ///
    /// Issues at most one read, then decodes every complete character
    /// that became available. The caller loops if it needs more.
    fn load(&mut self) {
        assert!(
            self.log.len() < MAX_UNCOMMITTED,
            "too many calls to advance() without commit()"
        );

        if let Some(err) = &self.terminal {
            // The source already failed; surface the same error again
            // without touching it.
            self.log.push(SavedUnit {
                pos: self.pos,
                state: UnitState::Terminal(err.clone()),
            });
            return;
        }

        // Carry the undecoded tail to the front, then fill after it.
        let tail = self.pending.len();
        self.buf.copy_within(self.pending.clone(), 0);
        let read = self.source.read(&mut self.buf[tail..tail + self.block_size]);
        let n = match &read {
            Ok(n) => *n,
            Err(_) => 0,
        };
        self.pending = 0..tail + n;

        while self.decoder.is_complete(&self.buf[self.pending.clone()]) {
            let (ch, size) = self.decoder.decode(&self.buf[self.pending.clone()]);
            debug_assert!(size >= 1 && size <= self.pending.len());
            self.log.push(SavedUnit {
                pos: self.pos,
                state: UnitState::Decoded { ch, size },
            });
            self.pos.advance(ch, size);
            self.pending.start += size;
        }

        let err = match read {
            Ok(0) => Some(StreamError::Eof),
            Ok(_) => None,
            Err(e) => Some(StreamError::from(e)),
        };
        if let Some(err) = err {
            self.terminal = Some(err.clone());
            self.log.push(SavedUnit {
                pos: self.pos,
                state: UnitState::Terminal(err),
            });
        }
    }

    /// Moves forward in the stream, returning `true` if a new character
    /// is available or `false` if the source reported an error (such as
    /// end of input).
    ///
    /// Once `false` has been returned, further calls keep returning
    /// `false` without touching the source; the error is available from
    /// [`err`](Self::err).
    pub fn advance(&mut self) -> bool {
        if let Some(i) = self.curr {
            if self.log[i].is_terminal() {
                return false;
            }
        }
        while self.spec >= self.log.len() {
            self.load();
        }
        let i = self.spec;
        self.curr = Some(i);
        self.spec += 1;
        !self.log[i].is_terminal()
    }

    fn current(&self) -> &SavedUnit {
        let i = self
            .curr
            .expect("no current character: advance() has not been called");
        &self.log[i]
    }

    /// Returns the character at the current stream position.
    ///
    /// # Panics
    ///
    /// Panics if [`advance`](Self::advance) has not been called since
    /// construction or the last restore/rewind/commit, or if the stream
    /// position is terminal (the last `advance` returned `false`).
    #[must_use]
    pub fn ch(&self) -> char {
        match self.current().state {
            UnitState::Decoded { ch, .. } => ch,
            UnitState::Terminal(_) => panic!("no character at the end of the stream; see err()"),
        }
    }

    /// Returns the number of bytes occupied by the character at the
    /// current stream position.
    ///
    /// # Panics
    ///
    /// Same conditions as [`ch`](Self::ch).
    #[must_use]
    pub fn size(&self) -> usize {
        match self.current().state {
            UnitState::Decoded { size, .. } => size,
            UnitState::Terminal(_) => panic!("no character at the end of the stream; see err()"),
        }
    }

    /// Returns the position of the current character, or of the
    /// terminal error.
    ///
    /// # Panics
    ///
    /// Panics if [`advance`](Self::advance) has not been called.
    #[must_use]
    pub fn position(&self) -> Position {
        self.current().pos
    }

    /// Returns the error the source reported, if the current stream
    /// position is terminal.
    ///
    /// # Panics
    ///
    /// Panics if [`advance`](Self::advance) has not been called.
    #[must_use]
    pub fn err(&self) -> Option<&StreamError> {
        match &self.current().state {
            UnitState::Terminal(err) => Some(err),
            UnitState::Decoded { .. } => None,
        }
    }

    /// Consumes one character, advancing the stream only if the next
    /// character matches `pred`. Returns the character that matched.
    pub fn take<F>(&mut self, mut pred: F) -> Option<char>
    where
        F: FnMut(char) -> bool,
    {
        let sp = self.save();
        if self.advance() {
            let ch = self.ch();
            if pred(ch) {
                return Some(ch);
            }
        }
        self.restore(sp);
        None
    }

    /// Consumes zero or more characters, advancing the stream for as
    /// long as `pred` returns `true`, and appends them to `out`.
    ///
    /// `out` may already hold characters gathered by an earlier call;
    /// they are kept, so runs can be accumulated across calls. At most
    /// `max` characters are consumed when it is `Some`. The character
    /// that ended the run (if any) is not consumed.
    pub fn take_while<F>(&mut self, max: Option<usize>, out: &mut Vec<char>, mut pred: F)
    where
        F: FnMut(char) -> bool,
    {
        let mut sp = self.save();
        let mut count = 0;
        while max.is_none_or(|m| count < m) {
            if !self.advance() {
                break;
            }
            let ch = self.ch();
            if !pred(ch) {
                break;
            }
            count += 1;
            out.push(ch);
            sp = self.save();
        }
        self.restore(sp);
    }

    /// Consumes zero or more characters, advancing the stream until
    /// `pred` returns `true` for a character, and appends them to
    /// `out`.
    ///
    /// The character that matched `pred` is not consumed. At most `max`
    /// characters are consumed when it is `Some`.
    pub fn take_until<F>(&mut self, max: Option<usize>, out: &mut Vec<char>, mut pred: F)
    where
        F: FnMut(char) -> bool,
    {
        self.take_while(max, out, |ch| !pred(ch));
    }
}
