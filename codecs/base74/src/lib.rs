#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Base-74 numerals used throughout Cell Machine level codes.
//!
//! Every integer packed into a level code (dimensions, cell values, repeat
//! counts) is written as a positional numeral over the fixed [`ALPHABET`],
//! most significant digit first.

use thiserror::Error;

/// Digit symbols in ascending value order.
pub const ALPHABET: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!$%&+-.=?^{}";

/// Number of distinct digits.
pub const RADIX: u64 = 74;

const DIGITS: &[u8; 74] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!$%&+-.=?^{}";

/// Errors raised while decoding a base-74 numeral.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Base74Error {
    /// The numeral contained a character outside the alphabet.
    #[error("'{digit}' at position {position} is not a base-74 digit")]
    InvalidDigit {
        /// Offending character.
        digit: char,
        /// Character index of the offending digit within the numeral.
        position: usize,
    },
    /// The numeral was empty.
    #[error("empty base-74 numeral")]
    MalformedNumeral,
    /// The numeral denotes a value too large to represent.
    #[error("base-74 numeral '{numeral}' does not fit in 64 bits")]
    Overflow {
        /// The numeral, truncated for display.
        numeral: String,
    },
}

/// Symbol for a single digit value, if the value is below [`RADIX`].
#[must_use]
pub fn digit(value: u64) -> Option<char> {
    usize::try_from(value)
        .ok()
        .and_then(|index| DIGITS.get(index))
        .map(|&byte| char::from(byte))
}

/// Value of a single digit symbol, if the symbol belongs to the alphabet.
#[must_use]
pub fn value_of(symbol: char) -> Option<u8> {
    let byte = u8::try_from(symbol).ok()?;
    DIGITS
        .iter()
        .position(|&candidate| candidate == byte)
        .and_then(|index| u8::try_from(index).ok())
}

/// Reports whether the character is a base-74 digit.
#[must_use]
pub fn is_digit(symbol: char) -> bool {
    value_of(symbol).is_some()
}

/// Encodes a value as its minimal base-74 numeral.
#[must_use]
pub fn encode(value: u64) -> String {
    let mut numeral = String::new();
    encode_into(value, &mut numeral);
    numeral
}

/// Appends the minimal base-74 numeral for `value` to `out`.
pub fn encode_into(value: u64, out: &mut String) {
    let mut reversed = Vec::new();
    let mut remaining = value;
    loop {
        reversed.push(DIGITS[(remaining % RADIX) as usize]);
        remaining /= RADIX;
        if remaining == 0 {
            break;
        }
    }
    out.extend(reversed.iter().rev().map(|&byte| char::from(byte)));
}

/// Decodes a base-74 numeral.
pub fn decode(numeral: &str) -> Result<u64, Base74Error> {
    if numeral.is_empty() {
        return Err(Base74Error::MalformedNumeral);
    }

    numeral
        .chars()
        .enumerate()
        .try_fold(0u64, |value, (position, symbol)| {
            let digit = value_of(symbol).ok_or(Base74Error::InvalidDigit {
                digit: symbol,
                position,
            })?;
            value
                .checked_mul(RADIX)
                .and_then(|shifted| shifted.checked_add(u64::from(digit)))
                .ok_or_else(|| Base74Error::Overflow {
                    numeral: truncate(numeral),
                })
        })
}

fn truncate(numeral: &str) -> String {
    const LIMIT: usize = 16;
    if numeral.chars().count() > LIMIT {
        let head: String = numeral.chars().take(LIMIT).collect();
        format!("{head}...")
    } else {
        numeral.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, digit, encode, value_of, Base74Error, ALPHABET, RADIX};

    #[test]
    fn alphabet_has_radix_distinct_symbols() {
        let mut symbols: Vec<char> = ALPHABET.chars().collect();
        assert_eq!(symbols.len() as u64, RADIX);
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len() as u64, RADIX);
    }

    #[test]
    fn single_digits_map_to_alphabet_positions() {
        assert_eq!(encode(0), "0");
        assert_eq!(encode(10), "a");
        assert_eq!(encode(60), "Y");
        assert_eq!(encode(72), "{");
        assert_eq!(encode(73), "}");
        assert_eq!(digit(74), None);
        assert_eq!(value_of('('), None);
        assert_eq!(value_of('é'), None);
    }

    #[test]
    fn multi_digit_values_use_positional_expansion() {
        assert_eq!(encode(74), "10");
        assert_eq!(encode(88), "1e");
        assert_eq!(encode(74 * 74 - 1), "}}");
        assert_eq!(decode("100"), Ok(74 * 74));
    }

    #[test]
    fn empty_numeral_is_malformed() {
        assert_eq!(decode(""), Err(Base74Error::MalformedNumeral));
    }

    #[test]
    fn foreign_characters_are_invalid_digits() {
        assert_eq!(
            decode("a;b"),
            Err(Base74Error::InvalidDigit {
                digit: ';',
                position: 1
            })
        );
    }

    #[test]
    fn values_beyond_u64_overflow() {
        assert_eq!(decode(&encode(u64::MAX)), Ok(u64::MAX));
        assert!(matches!(
            decode("}}}}}}}}}}}}}}}}}}}}}"),
            Err(Base74Error::Overflow { .. })
        ));
    }
}
