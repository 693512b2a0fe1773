//! Repeat-marker notation.
//!
//! Each symbol may be followed by `)d`, repeating it `d` more times, or by
//! `(ddd)`, repeating it by a multi-digit count. A symbol without a marker
//! occurs once.

use cell_machine_levels_base74::{self as base74, RADIX};
use log::trace;

use crate::scanner::Scanner;
use crate::{capacity_limit, digit, StreamError, LONG_CLOSE, LONG_OPEN, SHORT_MARKER};

/// Longest run written out literally instead of with a repeat marker.
pub const LITERAL_RUN_LIMIT: u64 = 4;

/// A symbol together with the total number of times it occurs in a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    /// Symbol value in `0..74`.
    pub symbol: u8,
    /// Number of consecutive occurrences, at least one.
    pub count: u64,
}

/// Notation used to write a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunForm {
    /// The symbol repeated `count` times without a marker.
    Literal,
    /// The symbol followed by `)` and one digit.
    Short,
    /// The symbol followed by a bracketed multi-digit count.
    Long,
}

impl RunForm {
    /// Canonical notation for a run of `count` symbols.
    #[must_use]
    pub const fn for_count(count: u64) -> Self {
        if count <= LITERAL_RUN_LIMIT {
            RunForm::Literal
        } else if count - 1 < RADIX {
            RunForm::Short
        } else {
            RunForm::Long
        }
    }
}

/// A run paired with the notation chosen for writing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodedRun {
    /// Symbol value in `0..74`.
    pub symbol: u8,
    /// Number of consecutive occurrences, at least one.
    pub count: u64,
    /// Notation used when the run is written.
    pub form: RunForm,
}

/// Parses a stream into runs.
pub fn parse_runs(stream: &str) -> Result<Vec<Run>, StreamError> {
    let mut scanner = Scanner::new(stream);
    let mut runs = Vec::new();

    while let Some(symbol) = scanner.symbol()? {
        let marker = scanner.offset();
        let extra = match scanner.peek() {
            Some(SHORT_MARKER) => {
                scanner.advance();
                scanner.single_digit(marker)?
            }
            Some(LONG_OPEN) => {
                scanner.advance();
                scanner.digits_until(marker, &[LONG_CLOSE])?.0
            }
            _ => 0,
        };
        runs.push(Run {
            symbol,
            count: extra.saturating_add(1),
        });
    }

    trace!("parsed {} runs from {} stream bytes", runs.len(), stream.len());
    Ok(runs)
}

/// Materialises runs into one symbol per position.
///
/// Fails without allocating when the runs cover more than `capacity` positions.
pub fn expand_runs(runs: &[Run], capacity: usize) -> Result<Vec<u8>, StreamError> {
    let total = runs
        .iter()
        .try_fold(0u64, |total, run| total.checked_add(run.count))
        .filter(|total| *total <= capacity_limit(capacity))
        .ok_or(StreamError::Overflow { capacity })?;

    let mut symbols = Vec::with_capacity(usize::try_from(total).unwrap_or(capacity));
    for run in runs {
        let count = usize::try_from(run.count).map_err(|_| StreamError::Overflow { capacity })?;
        symbols.extend(std::iter::repeat(run.symbol).take(count));
    }
    Ok(symbols)
}

/// Groups consecutive equal symbols into runs with their canonical notation.
#[must_use]
pub fn encode_runs(symbols: &[u8]) -> Vec<EncodedRun> {
    let mut runs: Vec<EncodedRun> = Vec::new();
    for &symbol in symbols {
        match runs.last_mut() {
            Some(run) if run.symbol == symbol => run.count += 1,
            _ => runs.push(EncodedRun {
                symbol,
                count: 1,
                form: RunForm::Literal,
            }),
        }
    }

    for run in &mut runs {
        run.form = RunForm::for_count(run.count);
    }
    runs
}

/// Drops a trailing run of `background` symbols.
///
/// Positions missing from a stream decode as background, so the final run
/// carries no information when it is background. The first matching rule
/// applies:
///
/// 1. a literal background run of one to [`LITERAL_RUN_LIMIT`] symbols;
/// 2. a short-form background run;
/// 3. a long-form background run.
pub fn trim_background_tail(runs: &mut Vec<EncodedRun>, background: u8) {
    let Some(last) = runs.last() else {
        return;
    };
    if last.symbol != background {
        return;
    }

    let trim = match last.form {
        RunForm::Literal => (1..=LITERAL_RUN_LIMIT).contains(&last.count),
        RunForm::Short => true,
        RunForm::Long => true,
    };
    if trim {
        runs.truncate(runs.len() - 1);
    }
}

/// Writes runs in their chosen notation.
pub fn write_runs(runs: &[EncodedRun]) -> Result<String, StreamError> {
    let mut stream = String::new();
    for run in runs {
        let symbol = digit(run.symbol)?;
        match run.form {
            RunForm::Literal => {
                for _ in 0..run.count {
                    stream.push(symbol);
                }
            }
            RunForm::Short => {
                stream.push(symbol);
                stream.push(SHORT_MARKER);
                base74::encode_into(run.count - 1, &mut stream);
            }
            RunForm::Long => {
                stream.push(symbol);
                stream.push(LONG_OPEN);
                base74::encode_into(run.count - 1, &mut stream);
                stream.push(LONG_CLOSE);
            }
        }
    }
    Ok(stream)
}

/// Encodes symbols into their canonical, trimmed stream.
pub fn encode(symbols: &[u8], background: u8) -> Result<String, StreamError> {
    let mut runs = encode_runs(symbols);
    trim_background_tail(&mut runs, background);
    write_runs(&runs)
}

/// Parses and expands a stream in one step.
pub fn decode(stream: &str, capacity: usize) -> Result<Vec<u8>, StreamError> {
    expand_runs(&parse_runs(stream)?, capacity)
}

#[cfg(test)]
mod tests {
    use super::{
        decode, encode, encode_runs, parse_runs, trim_background_tail, EncodedRun, Run, RunForm,
    };
    use crate::StreamError;

    const BACKGROUND: u8 = 72;
    const PLACEABLE_BACKGROUND: u8 = 73;
    const MOVER_UP: u8 = 60;

    #[test]
    fn short_and_long_forms_describe_the_same_runs() {
        let short = parse_runs("}{)8Y").expect("short form parses");
        let long = parse_runs("}{(8)Y").expect("long form parses");
        assert_eq!(short, long);
        assert_eq!(
            short,
            vec![
                Run {
                    symbol: PLACEABLE_BACKGROUND,
                    count: 1
                },
                Run {
                    symbol: BACKGROUND,
                    count: 9
                },
                Run {
                    symbol: MOVER_UP,
                    count: 1
                },
            ],
        );
    }

    #[test]
    fn unterminated_brackets_fail() {
        assert_eq!(
            parse_runs("}{(8Y"),
            Err(StreamError::UnterminatedRun { offset: 2 })
        );
    }

    #[test]
    fn markers_need_a_symbol_and_a_count() {
        assert_eq!(
            parse_runs(")3"),
            Err(StreamError::InvalidSymbol {
                symbol: ')',
                offset: 0
            })
        );
        assert_eq!(
            parse_runs("a)"),
            Err(StreamError::MissingRunLength { offset: 1 })
        );
        assert_eq!(
            parse_runs("a()"),
            Err(StreamError::EmptyRunLength { offset: 1 })
        );
        assert!(matches!(
            parse_runs("a)("),
            Err(StreamError::Numeral { offset: 2, .. })
        ));
    }

    #[test]
    fn expansion_is_bounded_by_capacity() {
        assert_eq!(decode("{)8", 9).map(|symbols| symbols.len()), Ok(9));
        assert_eq!(
            decode("{)8", 8),
            Err(StreamError::Overflow { capacity: 8 })
        );
        assert_eq!(
            decode("{(}}}}}}}})", 100),
            Err(StreamError::Overflow { capacity: 100 })
        );
    }

    #[test]
    fn run_forms_follow_run_length() {
        let mut symbols = vec![1; 4];
        symbols.extend([2; 5]);
        symbols.extend([3; 75]);
        let runs = encode_runs(&symbols);
        let forms: Vec<RunForm> = runs.iter().map(|run| run.form).collect();
        assert_eq!(forms, vec![RunForm::Literal, RunForm::Short, RunForm::Long]);
    }

    #[test]
    fn trailing_literal_background_is_dropped() {
        let mut runs = encode_runs(&[MOVER_UP, BACKGROUND, BACKGROUND, BACKGROUND]);
        trim_background_tail(&mut runs, BACKGROUND);
        assert_eq!(
            runs,
            vec![EncodedRun {
                symbol: MOVER_UP,
                count: 1,
                form: RunForm::Literal
            }]
        );
    }

    #[test]
    fn trailing_marked_background_is_dropped() {
        let mut symbols = vec![MOVER_UP];
        symbols.extend([BACKGROUND; 9]);
        assert_eq!(encode(&symbols, BACKGROUND), Ok("Y".to_owned()));

        symbols.extend([BACKGROUND; 100]);
        assert_eq!(encode(&symbols, BACKGROUND), Ok("Y".to_owned()));
    }

    #[test]
    fn placeable_background_is_never_trimmed() {
        let symbols = [BACKGROUND, PLACEABLE_BACKGROUND, PLACEABLE_BACKGROUND];
        assert_eq!(encode(&symbols, BACKGROUND), Ok("{}}".to_owned()));
    }

    #[test]
    fn reference_level_stream_is_canonical() {
        let mut symbols = vec![PLACEABLE_BACKGROUND];
        symbols.extend([BACKGROUND; 9]);
        symbols.push(MOVER_UP);
        symbols.extend([BACKGROUND; 89]);
        assert_eq!(encode(&symbols, BACKGROUND), Ok("}{)8Y".to_owned()));
    }

    #[test]
    fn encoders_reject_symbols_outside_the_alphabet() {
        assert_eq!(
            encode(&[74], BACKGROUND),
            Err(StreamError::SymbolOutOfRange { value: 74 })
        );
    }
}
