use cell_machine_levels_base74::{self as base74, Base74Error};

use crate::StreamError;

/// Left-to-right cursor over a cell stream.
pub(crate) struct Scanner<'a> {
    stream: &'a str,
    offset: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(stream: &'a str) -> Self {
        Self { stream, offset: 0 }
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.stream[self.offset..].chars().next()
    }

    pub(crate) fn advance(&mut self) {
        if let Some(next) = self.peek() {
            self.offset += next.len_utf8();
        }
    }

    /// Consumes one cell symbol.
    pub(crate) fn symbol(&mut self) -> Result<Option<u8>, StreamError> {
        let offset = self.offset;
        let Some(next) = self.peek() else {
            return Ok(None);
        };
        let value = base74::value_of(next).ok_or(StreamError::InvalidSymbol {
            symbol: next,
            offset,
        })?;
        self.advance();
        Ok(Some(value))
    }

    /// Consumes a single-digit operand belonging to the marker at `marker`.
    pub(crate) fn single_digit(&mut self, marker: usize) -> Result<u64, StreamError> {
        let offset = self.offset;
        let next = self
            .peek()
            .ok_or(StreamError::MissingRunLength { offset: marker })?;
        let value = base74::value_of(next).ok_or(StreamError::Numeral {
            offset,
            source: Base74Error::InvalidDigit {
                digit: next,
                position: 0,
            },
        })?;
        self.advance();
        Ok(u64::from(value))
    }

    /// Consumes a multi-digit operand opened at `open` up to and including
    /// the first of `terminators`, returning the value and the terminator.
    pub(crate) fn digits_until(
        &mut self,
        open: usize,
        terminators: &[char],
    ) -> Result<(u64, char), StreamError> {
        let start = self.offset;
        loop {
            let next = self
                .peek()
                .ok_or(StreamError::UnterminatedRun { offset: open })?;
            if terminators.contains(&next) {
                let numeral = &self.stream[start..self.offset];
                self.advance();
                if numeral.is_empty() {
                    return Err(StreamError::EmptyRunLength { offset: open });
                }
                let value = base74::decode(numeral).map_err(|source| StreamError::Numeral {
                    offset: start,
                    source,
                })?;
                return Ok((value, next));
            }
            self.advance();
        }
    }
}
