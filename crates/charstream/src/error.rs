//! The terminal error surfaced when a stream stops producing characters.

use std::{io, sync::Arc};

use thiserror::Error;

/// The error captured from the byte source when a stream reaches its
/// end.
///
/// End-of-data and genuine I/O failures are distinguished only by
/// variant identity; neither is retried at this layer. The value is
/// cheaply cloneable so a stream can keep surfacing the same terminal
/// error for as long as it lives.
#[derive(Debug, Clone, Error)]
pub enum StreamError {
    /// The source reported end of input (a read returned zero bytes).
    #[error("end of input")]
    Eof,
    /// The source's read failed; the error is passed through unmodified.
    #[error(transparent)]
    Io(Arc<io::Error>),
}

impl StreamError {
    /// Returns `true` if this is the ordinary end-of-input marker rather
    /// than an I/O failure.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, StreamError::Eof)
    }
}

impl From<io::Error> for StreamError {
    fn from(err: io::Error) -> Self {
        StreamError::Io(Arc::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_displays_as_end_of_input() {
        assert_eq!(StreamError::Eof.to_string(), "end of input");
        assert!(StreamError::Eof.is_eof());
    }

    #[test]
    fn io_errors_pass_through_unmodified() {
        let err = StreamError::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe burst"));
        assert!(!err.is_eof());
        assert_eq!(err.to_string(), "pipe burst");
        match err {
            StreamError::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::BrokenPipe),
            StreamError::Eof => unreachable!(),
        }
    }
}
