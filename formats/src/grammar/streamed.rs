//! Field layout shared by the stream-based grammars.
//!
//! `<tag>;<width>;<height>;<stream>;<tutorial text>;<name>[;<wall>]`, with
//! base-74 dimensions. Versions differ only in their tag and in the stream
//! notation.

use std::sync::OnceLock;

use cell_machine_levels_base74 as base74;
use cell_machine_levels_core::Level;
use cell_machine_levels_run_length::{StreamError, StreamLayout};
use log::debug;
use regex::{Captures, Regex};

use super::{check_text, pattern, wall_effect, BASE74_CLASS};
use crate::cell_codes::{pack, unpack, BACKGROUND_SYMBOL};
use crate::error::{LevelParsingError, SaveError};

/// Decodes a cell stream into at most `capacity` symbols.
pub(super) type DecodeStream = fn(&str, usize) -> Result<Vec<u8>, StreamError>;
/// Encodes symbols into a cell stream, omitting trailing background.
pub(super) type EncodeStream = fn(&[u8], u8) -> Result<String, StreamError>;

pub(super) struct StreamedGrammar {
    tag: &'static str,
    decode: DecodeStream,
    encode: EncodeStream,
    pattern: OnceLock<Regex>,
}

impl StreamedGrammar {
    pub(super) const fn new(tag: &'static str, decode: DecodeStream, encode: EncodeStream) -> Self {
        Self {
            tag,
            decode,
            encode,
            pattern: OnceLock::new(),
        }
    }

    pub(super) const fn tag(&self) -> &'static str {
        self.tag
    }

    fn pattern(&self) -> &Regex {
        pattern(&self.pattern, || {
            format!(
                "^{tag};([{digits}]+);([{digits}]+);([{digits}()]*);([^;]*);([^;]*)(?:;([0-3]?))?$",
                tag = regex::escape(self.tag),
                digits = BASE74_CLASS,
            )
        })
    }

    pub(super) fn open(&self, code: &str) -> Result<Level, LevelParsingError> {
        let tag = self.tag;
        let captures = self
            .pattern()
            .captures(code)
            .ok_or(LevelParsingError::Malformed { tag })?;

        let width = self.dimension(&captures, 1, "width")?;
        let height = self.dimension(&captures, 2, "height")?;
        let mut level = Level::new(width, height)
            .map_err(|source| LevelParsingError::InvalidDimensions { tag, source })?;

        let layout = StreamLayout::new(width, height);
        let symbols = (self.decode)(field(&captures, 3), layout.capacity())
            .map_err(|source| LevelParsingError::InvalidCellStream { tag, source })?;
        for ((x, y), &symbol) in layout.positions().zip(&symbols) {
            let (cell, placeable) = unpack(symbol);
            level
                .set_cell(x, y, cell)
                .and_then(|()| level.set_placeable(x, y, placeable))
                .map_err(|_| LevelParsingError::CellOutOfBounds { tag, x, y })?;
        }

        level.set_tutorial_text(field(&captures, 4));
        level.set_name(field(&captures, 5));
        level.set_wall_effect(wall_effect(captures.get(6).map(|m| m.as_str())));

        debug!(
            "opened {tag} level {width}x{height} from {} stream symbols",
            symbols.len()
        );
        Ok(level)
    }

    pub(super) fn save(&self, level: &Level) -> Result<String, SaveError> {
        let tag = self.tag;
        check_text(tag, "tutorial text", level.tutorial_text())?;
        check_text(tag, "name", level.name())?;

        let layout = StreamLayout::new(level.width(), level.height());
        let row = level.width() as usize;
        let mut reached = vec![false; level.cells().len()];
        let mut symbols = Vec::with_capacity(layout.capacity());
        for (x, y) in layout.positions() {
            if let Some(slot) = reached.get_mut(y as usize * row + x as usize) {
                *slot = true;
            }
            if let (Some(cell), Some(placeable)) = (level.cell(x, y), level.is_placeable(x, y)) {
                symbols.push(pack(cell, placeable));
            }
        }

        // Positions the layout never visits decode as unplaceable background.
        let lost = level
            .cells()
            .zip(&reached)
            .find(|((_, _, cell, placeable), reached)| {
                !**reached && (!cell.is_background() || *placeable)
            });
        if let Some(((x, y, _, _), _)) = lost {
            return Err(SaveError::Unrepresentable { tag, x, y });
        }

        let stream = (self.encode)(&symbols, BACKGROUND_SYMBOL)
            .map_err(|source| SaveError::InvalidCellStream { tag, source })?;

        debug!(
            "saved {tag} level {}x{} as {} stream bytes",
            level.width(),
            level.height(),
            stream.len()
        );
        Ok(format!(
            "{tag};{width};{height};{stream};{text};{name};{wall}",
            width = base74::encode(u64::from(level.width())),
            height = base74::encode(u64::from(level.height())),
            text = level.tutorial_text(),
            name = level.name(),
            wall = level.wall_effect().index(),
        ))
    }

    fn dimension(
        &self,
        captures: &Captures<'_>,
        index: usize,
        name: &'static str,
    ) -> Result<u32, LevelParsingError> {
        let tag = self.tag;
        let value = base74::decode(field(captures, index)).map_err(|source| {
            LevelParsingError::InvalidNumeral {
                tag,
                field: name,
                source,
            }
        })?;
        u32::try_from(value).map_err(|_| LevelParsingError::NumberOutOfRange {
            tag,
            field: name,
            value: value.to_string(),
        })
    }
}

fn field<'c>(captures: &Captures<'c>, index: usize) -> &'c str {
    captures.get(index).map_or("", |m| m.as_str())
}
