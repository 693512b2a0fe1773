//! V2 level codes: base-74 dimensions and a repeat-marker cell stream.

use cell_machine_levels_core::Level;
use cell_machine_levels_run_length::runs;

use super::streamed::StreamedGrammar;
use crate::error::{LevelParsingError, SaveError};
use crate::LevelFormat;

static GRAMMAR: StreamedGrammar = StreamedGrammar::new("V2", runs::decode, runs::encode);

/// `V2;<width>;<height>;<runs>;<tutorial text>;<name>[;<wall>]`.
///
/// Runs repeat the preceding symbol: `)` plus one digit for short repeats,
/// `(` digits `)` for long ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct V2;

impl LevelFormat for V2 {
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
