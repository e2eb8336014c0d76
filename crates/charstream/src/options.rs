//! Configuration options for building a stream.

/// Number of fresh bytes requested from the source per load when
/// [`StreamOptions::block_size`] is left at zero.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Configuration options for a [`CharStream`].
///
/// # Examples
///
/// ```rust
/// use charstream::{CharStream, StreamOptions, Utf8Decoder};
///
/// let options = StreamOptions { block_size: 64 };
/// let mut stream = CharStream::with_options("input".as_bytes(), Utf8Decoder, options);
/// assert!(stream.advance());
/// assert_eq!(stream.ch(), 'i');
/// ```
///
/// [`CharStream`]: crate::CharStream
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamOptions {
    /// Number of fresh bytes requested from the source on each load.
    ///
    /// Zero selects [`DEFAULT_BLOCK_SIZE`]. Small values are mainly
    /// useful in tests, to force characters across buffer boundaries.
    ///
    /// # Default
    ///
    /// `0`
    pub block_size: usize,
}
