//! Buffered, backtrackable character decoding for hand-written lexers.
//!
//! [`CharStream`] turns any [`std::io::Read`] byte source into a stream
//! of decoded [`char`]s, tracking each character's human-readable
//! [`Position`] (line, column, byte offset). Where a plain buffered
//! reader offers "read one character / unread one character", a
//! `CharStream` offers unbounded lookahead with explicit commit points:
//! a parser can try one grammar production, [`restore`] to an earlier
//! [`SavePoint`] when it fails, and try another, only
//! [`commit`]ting once input has been irrevocably consumed.
//!
//! Decoding is pluggable through the [`Decoder`] trait; the default
//! [`Utf8Decoder`] decodes UTF-8 code points. The stream itself does
//! not tokenize, does not parse, and is not thread-safe: it is the
//! exclusively-owned primitive a tokenizer is built on.
//!
//! # Examples
//!
//! ```rust
//! use charstream::{CharStream, StreamError};
//!
//! let mut stream = CharStream::new("hello, world".as_bytes());
//!
//! let mut word = Vec::new();
//! stream.take_while(None, &mut word, char::is_alphabetic);
//! stream.commit();
//! assert_eq!(word.iter().collect::<String>(), "hello");
//!
//! assert!(stream.advance());
//! assert_eq!(stream.ch(), ',');
//! assert_eq!(stream.position().to_string(), "line 1 column 6 (byte offset 5)");
//! ```
//!
//! [`restore`]: CharStream::restore
//! [`commit`]: CharStream::commit

mod decoder;
mod error;
mod options;
mod position;
mod stream;

pub use decoder::{Decoder, Utf8Decoder};
pub use error::StreamError;
pub use options::{DEFAULT_BLOCK_SIZE, StreamOptions};
pub use position::Position;
pub use stream::{CharStream, SavePoint};
