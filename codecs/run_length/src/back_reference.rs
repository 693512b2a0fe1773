//! Back-reference notation.
//!
//! The stream is a sequence of literal symbols and copy tokens. A copy
//! repeats `length` symbols starting `offset + 1` positions back; the source
//! window may overlap the symbols the copy itself produces, so `X)08` is `X`
//! followed by eight more `X`.
//!
//! Copy tokens come in three shapes:
//!
//! - `)` + offset digit + length digit;
//! - `(` + offset digits + `)` + length digit;
//! - `(` + offset digits + `(` + length digits + `)`.

use std::collections::HashMap;

use cell_machine_levels_base74::{self as base74, RADIX};
use log::trace;

use crate::scanner::Scanner;
use crate::{
    capacity_limit, content_len, digit, StreamError, LONG_CLOSE, LONG_OPEN, SHORT_MARKER,
};

/// Shortest match the encoder replaces with a copy token.
pub const MIN_COPY_LENGTH: usize = 4;

/// How far back the encoder searches for matches.
pub const SEARCH_WINDOW: usize = (RADIX * RADIX) as usize;

/// Most earlier positions the encoder compares against per match search.
pub const MAX_CANDIDATES: usize = 256;

/// Marks the end of a candidate chain.
const NO_CANDIDATE: usize = usize::MAX;

/// One element of a back-reference stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// A single symbol.
    Literal(u8),
    /// Repeat `length` symbols starting `offset + 1` positions back.
    Copy {
        /// Distance back to the first copied symbol, minus one.
        offset: u64,
        /// Number of symbols produced.
        length: u64,
    },
}

/// Parses a stream into tokens without expanding copies.
pub fn parse(stream: &str) -> Result<Vec<Token>, StreamError> {
    let mut scanner = Scanner::new(stream);
    let mut tokens = Vec::new();
    while let Some((_, token)) = next_token(&mut scanner)? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// Decodes a stream into one symbol per position.
///
/// Fails as soon as the stream would describe more than `capacity` positions.
pub fn decode(stream: &str, capacity: usize) -> Result<Vec<u8>, StreamError> {
    let mut scanner = Scanner::new(stream);
    let mut symbols: Vec<u8> = Vec::new();

    while let Some((at, token)) = next_token(&mut scanner)? {
        match token {
            Token::Literal(symbol) => {
                if symbols.len() >= capacity {
                    return Err(StreamError::Overflow { capacity });
                }
                symbols.push(symbol);
            }
            Token::Copy { offset, length } => {
                let available = symbols.len();
                let distance = offset.saturating_add(1);
                let start = usize::try_from(distance)
                    .ok()
                    .and_then(|distance| available.checked_sub(distance))
                    .ok_or(StreamError::ReferenceOutOfRange {
                        offset: at,
                        distance,
                        available,
                    })?;

                let end = u64::try_from(available)
                    .ok()
                    .and_then(|available| available.checked_add(length))
                    .filter(|end| *end <= capacity_limit(capacity))
                    .and_then(|end| usize::try_from(end).ok())
                    .ok_or(StreamError::Overflow { capacity })?;
                symbols.reserve(end - available);

                for source in start..start + (end - available) {
                    let symbol = symbols[source];
                    symbols.push(symbol);
                }
            }
        }
    }

    trace!("expanded {} stream bytes into {} symbols", stream.len(), symbols.len());
    Ok(symbols)
}

/// Encodes symbols with a greedy longest-match search.
///
/// Trailing `background` symbols are dropped first; positions missing from a
/// stream decode as background. Candidate sources are the earlier positions
/// that share the next [`MIN_COPY_LENGTH`] symbols, nearest first, limited to
/// [`SEARCH_WINDOW`] and [`MAX_CANDIDATES`].
pub fn encode(symbols: &[u8], background: u8) -> Result<String, StreamError> {
    let content = &symbols[..content_len(symbols, background)];
    let mut chains = MatchChains::new(content);
    let mut stream = String::new();
    let mut index = 0;

    while index < content.len() {
        let (distance, length) = chains.longest_match(index);
        let step = if length >= MIN_COPY_LENGTH {
            write_copy(distance as u64 - 1, length as u64, &mut stream);
            length
        } else {
            stream.push(digit(content[index])?);
            1
        };
        for position in index..index + step {
            chains.insert(position);
        }
        index += step;
    }
    Ok(stream)
}

type Prefix = [u8; MIN_COPY_LENGTH];

/// Earlier positions grouped by the symbols they start with.
struct MatchChains<'a> {
    content: &'a [u8],
    heads: HashMap<Prefix, usize>,
    previous: Vec<usize>,
}

impl<'a> MatchChains<'a> {
    fn new(content: &'a [u8]) -> Self {
        Self {
            content,
            heads: HashMap::new(),
            previous: vec![NO_CANDIDATE; content.len()],
        }
    }

    fn prefix(&self, position: usize) -> Option<Prefix> {
        let window = self.content.get(position..position + MIN_COPY_LENGTH)?;
        Prefix::try_from(window).ok()
    }

    fn insert(&mut self, position: usize) {
        if let Some(prefix) = self.prefix(position) {
            self.previous[position] = self.heads.insert(prefix, position).unwrap_or(NO_CANDIDATE);
        }
    }

    /// Longest `(distance, length)` match for the symbols starting at `index`,
    /// preferring the nearest source on ties.
    fn longest_match(&self, index: usize) -> (usize, usize) {
        let mut best = (0, 0);
        let Some(prefix) = self.prefix(index) else {
            return best;
        };
        let ahead = &self.content[index..];
        let mut candidate = self.heads.get(&prefix).copied().unwrap_or(NO_CANDIDATE);

        for _ in 0..MAX_CANDIDATES {
            if candidate == NO_CANDIDATE || index - candidate > SEARCH_WINDOW {
                break;
            }
            let length = ahead
                .iter()
                .zip(&self.content[candidate..])
                .take_while(|(next, source)| next == source)
                .count();
            if length > best.1 {
                best = (index - candidate, length);
                if length == ahead.len() {
                    break;
                }
            }
            candidate = self.previous[candidate];
        }
        best
    }
}

fn write_copy(offset: u64, length: u64, stream: &mut String) {
    if offset < RADIX && length < RADIX {
        stream.push(SHORT_MARKER);
        base74::encode_into(offset, stream);
        base74::encode_into(length, stream);
    } else if length < RADIX {
        stream.push(LONG_OPEN);
        base74::encode_into(offset, stream);
        stream.push(LONG_CLOSE);
        base74::encode_into(length, stream);
    } else {
        stream.push(LONG_OPEN);
        base74::encode_into(offset, stream);
        stream.push(LONG_OPEN);
        base74::encode_into(length, stream);
        stream.push(LONG_CLOSE);
    }
}

fn next_token(scanner: &mut Scanner<'_>) -> Result<Option<(usize, Token)>, StreamError> {
    let at = scanner.offset();
    let token = match scanner.peek() {
        None => return Ok(None),
        Some(SHORT_MARKER) => {
            scanner.advance();
            let offset = scanner.single_digit(at)?;
            let length = scanner.single_digit(at)?;
            Token::Copy { offset, length }
        }
        Some(LONG_OPEN) => {
            scanner.advance();
            let (offset, terminator) = scanner.digits_until(at, &[LONG_OPEN, LONG_CLOSE])?;
            let length = if terminator == LONG_OPEN {
                scanner.digits_until(at, &[LONG_CLOSE])?.0
            } else {
                scanner.single_digit(at)?
            };
            Token::Copy { offset, length }
        }
        Some(_) => match scanner.symbol()? {
            Some(symbol) => Token::Literal(symbol),
            None => return Ok(None),
        },
    };
    Ok(Some((at, token)))
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, parse, Token};
    use crate::StreamError;

    const BACKGROUND: u8 = 72;
    const PLACEABLE_BACKGROUND: u8 = 73;
    const MOVER_UP: u8 = 60;

    fn reference_symbols() -> Vec<u8> {
        let mut symbols = vec![PLACEABLE_BACKGROUND];
        symbols.extend([BACKGROUND; 9]);
        symbols.push(MOVER_UP);
        symbols
    }

    #[test]
    fn all_copy_shapes_parse_to_the_same_token() {
        let expected = vec![
            Token::Literal(PLACEABLE_BACKGROUND),
            Token::Literal(BACKGROUND),
            Token::Copy {
                offset: 0,
                length: 8,
            },
            Token::Literal(MOVER_UP),
        ];
        assert_eq!(parse("}{)08Y"), Ok(expected.clone()));
        assert_eq!(parse("}{(0)8Y"), Ok(expected.clone()));
        assert_eq!(parse("}{(0(8)Y"), Ok(expected));
    }

    #[test]
    fn copies_expand_overlapping_windows() {
        assert_eq!(decode("}{)08Y", 100), Ok(reference_symbols()));
        assert_eq!(decode("ab)15", 100), Ok(b"\x0a\x0b\x0a\x0b\x0a\x0b\x0a".to_vec()));
    }

    #[test]
    fn copies_cannot_reach_before_the_stream() {
        assert_eq!(
            decode("a)15", 100),
            Err(StreamError::ReferenceOutOfRange {
                offset: 1,
                distance: 2,
                available: 1
            })
        );
    }

    #[test]
    fn malformed_copies_fail() {
        assert_eq!(
            decode("a(0(8", 100),
            Err(StreamError::UnterminatedRun { offset: 1 })
        );
        assert_eq!(
            decode("a)0", 100),
            Err(StreamError::MissingRunLength { offset: 1 })
        );
        assert_eq!(
            decode("a()5", 100),
            Err(StreamError::EmptyRunLength { offset: 1 })
        );
    }

    #[test]
    fn decoding_respects_capacity() {
        assert_eq!(
            decode("a)0}", 50),
            Err(StreamError::Overflow { capacity: 50 })
        );
        assert_eq!(decode("aaa", 2), Err(StreamError::Overflow { capacity: 2 }));
    }

    #[test]
    fn encoder_reproduces_reference_stream() {
        let mut symbols = reference_symbols();
        symbols.extend([BACKGROUND; 89]);
        assert_eq!(encode(&symbols, BACKGROUND), Ok("}{)08Y".to_owned()));
    }

    #[test]
    fn encoder_uses_bracketed_forms_for_long_copies() {
        let symbols = vec![5; 200];
        let stream = encode(&symbols, BACKGROUND).expect("encodes");
        assert_eq!(stream, "5(0(2P)");
        assert_eq!(decode(&stream, 200), Ok(symbols));
    }

    #[test]
    fn sources_beyond_the_window_are_not_referenced() {
        let mut symbols = vec![1, 2, 3, 4];
        symbols.extend([9; 5480]);
        symbols.extend([1, 2, 3, 4]);
        let stream = encode(&symbols, BACKGROUND).expect("encodes");
        assert_eq!(stream, "12349(0(103)1234");
        assert_eq!(decode(&stream, symbols.len()), Ok(symbols));
    }

    #[test]
    fn short_repeats_stay_literal() {
        assert_eq!(encode(&[1, 1, 1, 1], BACKGROUND), Ok("1111".to_owned()));
        assert_eq!(encode(&[1, 1, 1, 1, 1], BACKGROUND), Ok("1)04".to_owned()));
    }
}
