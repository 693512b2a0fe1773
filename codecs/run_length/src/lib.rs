#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cell streams for Cell Machine level codes.
//!
//! A level's grid is flattened into a stream of base-74 symbols, one per
//! position, and compressed in one of two notations:
//!
//! - [`runs`]: a symbol optionally followed by a repeat marker, `)d` for a
//!   single digit count or `(ddd)` for a longer one;
//! - [`back_reference`]: literal symbols interleaved with copy tokens that
//!   repeat a window of already decoded symbols.
//!
//! [`StreamLayout`] maps flattened stream positions onto grid coordinates.
//! Neither notation knows what a symbol means; packing cells into symbols is
//! left to the level grammars.

use cell_machine_levels_base74::Base74Error;
use thiserror::Error;

pub mod back_reference;
mod layout;
pub mod runs;
mod scanner;

pub use layout::StreamLayout;
pub use runs::{EncodedRun, Run, RunForm};

/// Marker introducing a repeat or copy whose operands are single digits.
pub const SHORT_MARKER: char = ')';
/// Marker opening a bracketed multi-digit operand.
pub const LONG_OPEN: char = '(';
/// Marker closing a bracketed multi-digit operand.
pub const LONG_CLOSE: char = ')';

/// Errors raised while reading or writing a cell stream.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A character that is not a base-74 digit appeared where a cell symbol was expected.
    #[error("'{symbol}' at offset {offset} is not a cell symbol")]
    InvalidSymbol {
        /// Offending character.
        symbol: char,
        /// Byte offset of the character within the stream.
        offset: usize,
    },
    /// A short marker ended the stream before its operand.
    #[error("marker at offset {offset} is missing its count")]
    MissingRunLength {
        /// Byte offset of the marker.
        offset: usize,
    },
    /// A bracketed operand was never closed.
    #[error("'(' at offset {offset} is never closed")]
    UnterminatedRun {
        /// Byte offset of the opening bracket.
        offset: usize,
    },
    /// A bracketed operand contained no digits.
    #[error("bracketed count at offset {offset} is empty")]
    EmptyRunLength {
        /// Byte offset of the opening bracket.
        offset: usize,
    },
    /// A copy token referred to symbols before the start of the stream.
    #[error("copy at offset {offset} reaches back {distance} of {available} symbols")]
    ReferenceOutOfRange {
        /// Byte offset of the copy token.
        offset: usize,
        /// How far back the copy reaches.
        distance: u64,
        /// Number of symbols decoded before the token.
        available: usize,
    },
    /// The stream describes more positions than the grid can hold.
    #[error("stream describes more than {capacity} cells")]
    Overflow {
        /// Number of positions available.
        capacity: usize,
    },
    /// A symbol handed to an encoder has no single-digit representation.
    #[error("symbol value {value} does not fit in a single base-74 digit")]
    SymbolOutOfRange {
        /// Offending symbol value.
        value: u8,
    },
    /// An operand was not a valid base-74 numeral.
    #[error("invalid count at offset {offset}: {source}")]
    Numeral {
        /// Byte offset of the operand.
        offset: usize,
        /// Underlying numeral error.
        #[source]
        source: Base74Error,
    },
}

/// Index of the last symbol worth encoding, i.e. the stream length once every
/// trailing `background` symbol has been dropped.
#[must_use]
pub fn content_len(symbols: &[u8], background: u8) -> usize {
    symbols
        .iter()
        .rposition(|&symbol| symbol != background)
        .map_or(0, |last| last + 1)
}

fn digit(value: u8) -> Result<char, StreamError> {
    cell_machine_levels_base74::digit(u64::from(value))
        .ok_or(StreamError::SymbolOutOfRange { value })
}

fn capacity_limit(capacity: usize) -> u64 {
    u64::try_from(capacity).unwrap_or(u64::MAX)
}
