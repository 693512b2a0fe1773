//! V3 level codes: the V2 field layout with a back-reference cell stream.

use cell_machine_levels_core::Level;
use cell_machine_levels_run_length::back_reference;

use super::streamed::StreamedGrammar;
use crate::error::{LevelParsingError, SaveError};
use crate::LevelFormat;

static GRAMMAR: StreamedGrammar =
    StreamedGrammar::new("V3", back_reference::decode, back_reference::encode);

/// `V3;<width>;<height>;<stream>;<tutorial text>;<name>[;<wall>]`.
///
/// Copy tokens repeat earlier symbols: `)` + offset + length, `(` offset `)`
/// length, or `(` offset `(` length `)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct V3;

impl LevelFormat for V3 {
    fn tag(&self) -> &'static str {
        GRAMMAR.tag()
    }

    fn open(&self, code: &str) -> Result<Level, LevelParsingError> {
        GRAMMAR.open(code)
    }

    fn save(&self, level: &Level) -> Result<String, SaveError> {
        GRAMMAR.save(level)
    }
}

#[cfg(test)]
mod tests {
    use super::V3;
    use crate::{LevelFormat, LevelParsingError};
    use cell_machine_levels_run_length::StreamError;

    #[test]
    fn copies_reaching_before_the_stream_are_rejected() {
        assert_eq!(
            V3.open("V3;a;a;)05;;x"),
            Err(LevelParsingError::InvalidCellStream {
                tag: "V3",
                source: StreamError::ReferenceOutOfRange {
                    offset: 0,
                    distance: 1,
                    available: 0,
                },
            })
        );
    }

    #[test]
    fn streams_longer_than_the_grid_are_rejected() {
        assert_eq!(
            V3.open("V3;2;2;0)0}"),
            Err(LevelParsingError::Malformed { tag: "V3" })
        );
        assert_eq!(
            V3.open("V3;2;2;0)0};;x"),
            Err(LevelParsingError::InvalidCellStream {
                tag: "V3",
                source: StreamError::Overflow { capacity: 4 },
            })
        );
    }
}
