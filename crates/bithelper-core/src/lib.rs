//! bithelper — interactive bit string builder (core library)
//!
//! This crate provides the command parser, hex codec and bit engine used by the
//! `bithelper` session and CLI.

mod bits;
mod codec;
mod engine;
mod parse;

pub use bits::BitVector;
pub use codec::{format_display, from_hex, to_hex};
pub use engine::{Engine, DEFAULT_BYTES, MAX_BYTES, MIN_BYTES};
pub use parse::{strip_ignored, Command, CommandParser, Operation};

use thiserror::Error;

/// Reasons a line can fail to parse or apply.
///
/// The display strings are the short messages shown to the user. None of these
/// are fatal: the bit vector is left untouched and the session keeps running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("no input")]
    NoInput,
    #[error("invalid index")]
    InvalidIndex,
    #[error("invalid range")]
    InvalidRange,
    #[error("Invalid quantity!")]
    InvalidQuantity,
    #[error("invalid size")]
    InvalidSize,
    #[error("index outside of size boundary")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("range exceeds size boundary")]
    RangeOutOfBounds { hi: usize, len: usize },
    #[error("invalid size (valid range: {min} - {max})", min = MIN_BYTES, max = MAX_BYTES)]
    InputOutOfRange(usize),
    #[error("input larger than size boundary")]
    OperandTooLarge { digits: usize, max: usize },
    #[error("could not convert input")]
    HexDecodeFailure,
    #[error("bit length {0} is not a multiple of 4")]
    UnalignedLength(usize),
    #[error("invalid command pattern: {0}")]
    Pattern(String),
    #[error("unrecognized input")]
    Unrecognized,
}
