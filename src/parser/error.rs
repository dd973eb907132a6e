//! Error type for binary module decoding.
//!
//! Decoding is strict and non-recovering: the first failure aborts the whole
//! parse and no partial module is returned. Every variant carries the byte
//! offset the failure was detected at.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[must_use]
pub enum ParseError {
    #[error("unexpected end of file at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("unexpected end of file when skipping {count} bytes from offset {offset}")]
    UnexpectedEofInSkip { count: usize, offset: usize },

    #[error("expected byte {expected:#04x} at offset {offset}, found {found:#04x}")]
    UnexpectedByte {
        expected: u8,
        found: u8,
        offset: usize,
    },

    /// A LEB128 encoding carried more bits than the declared integer width.
    /// `position` is "trailing" or "middle" depending on which byte overflowed.
    #[error("invalid encoding of {kind}{bits} at offset {offset}: more than {bits} bits encoded by {position} byte")]
    IntTooWide {
        kind: &'static str,
        bits: u32,
        position: &'static str,
        offset: usize,
    },

    #[error("vector length {len} at offset {offset} would overflow")]
    VecTooLong { len: u32, offset: usize },

    #[error("name at offset {offset} is not valid utf-8")]
    InvalidUtf8 { offset: usize },

    #[error("unrecognized {what} {found:#04x} at offset {offset}")]
    UnknownTag {
        what: &'static str,
        found: u8,
        offset: usize,
    },

    /// An unrecognized LEB128-encoded discriminant: elem/data segment kinds
    /// and the secondary opcodes behind the 0xFC and 0xFE prefixes.
    #[error("unrecognized {what} {found} at offset {offset}")]
    UnknownDiscriminant {
        what: &'static str,
        found: u32,
        offset: usize,
    },

    #[error("invalid section id {id} in byte range [{start},{end}): declared size {declared} doesn't match actual size {actual}")]
    SectionSizeMismatch {
        id: u8,
        start: usize,
        end: usize,
        declared: u32,
        actual: usize,
    },

    #[error("expected end of file at offset {offset}, but the data continues: {found:#04x}...")]
    TrailingData { offset: usize, found: u8 },
}
