//! bithelper — Interactive Bit String Builder
//!
//! This crate provides the session and screens for the `bithelper` CLI. Parsing,
//! the hex codec and the bit engine live in `bithelper-core`.

pub mod render;
mod session;

pub use bithelper_core::{
    format_display, from_hex, strip_ignored, to_hex, BitVector, Command, CommandParser, Engine,
    Error, Operation, DEFAULT_BYTES, MAX_BYTES, MIN_BYTES,
};
pub use session::{Session, Step};
