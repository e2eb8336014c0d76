//! Pluggable charset decoders.

use bstr::decode_utf8;

/// A charset decoder: the capability a [`CharStream`] is parameterized
/// over.
///
/// Implementations are stateless. Every method takes `&self` and a
/// decoder value may be shared freely across streams. The stream only
/// ever calls [`decode`](Decoder::decode) on input for which
/// [`is_complete`](Decoder::is_complete) returned `true`.
///
/// [`CharStream`]: crate::CharStream
pub trait Decoder {
    /// An identifier for the charset, e.g. `"utf-8"`.
    fn name(&self) -> &'static str;

    /// The maximum number of bytes a single character can occupy. Must
    /// be at least 1; it sizes the stream buffer's trailing slack so
    /// that a character never spans beyond the buffer.
    fn max_bytes_per_unit(&self) -> usize;

    /// Returns `true` iff `bytes` starts with enough bytes to decode
    /// the next character.
    fn is_complete(&self, bytes: &[u8]) -> bool;

    /// Decodes exactly one character from the front of `bytes`,
    /// returning it together with the number of bytes it occupied
    /// (at least 1).
    fn decode(&self, bytes: &[u8]) -> (char, usize);
}

/// The default [`Decoder`], for UTF-8.
///
/// Invalid sequences decode to `U+FFFD`, consuming the maximal invalid
/// prefix, so arbitrary byte input always makes forward progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Decoder;

impl Decoder for Utf8Decoder {
    fn name(&self) -> &'static str {
        "utf-8"
    }

    fn max_bytes_per_unit(&self) -> usize {
        4
    }

    fn is_complete(&self, bytes: &[u8]) -> bool {
        let Some(&lead) = bytes.first() else {
            return false;
        };
        let need = match lead {
            0x00..=0x7F => return true,
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            // Stray continuation bytes and invalid lead bytes decode
            // immediately as U+FFFD.
            _ => return true,
        };
        if bytes.len() >= need {
            return true;
        }
        // Fewer than `need` bytes: the sequence is nevertheless complete
        // if a bad continuation byte has already made it invalid.
        for (i, &b) in bytes.iter().enumerate().skip(1) {
            let valid = match (lead, i) {
                (0xE0, 1) => (0xA0..=0xBF).contains(&b),
                (0xED, 1) => (0x80..=0x9F).contains(&b),
                (0xF0, 1) => (0x90..=0xBF).contains(&b),
                (0xF4, 1) => (0x80..=0x8F).contains(&b),
                _ => (0x80..=0xBF).contains(&b),
            };
            if !valid {
                return true;
            }
        }
        false
    }

    fn decode(&self, bytes: &[u8]) -> (char, usize) {
        match decode_utf8(bytes) {
            (Some(ch), size) => (ch, size),
            (None, size) => {
                debug_assert!(size >= 1, "decode() called on incomplete input");
                (char::REPLACEMENT_CHARACTER, size.max(1))
            }
        }
    }
}
