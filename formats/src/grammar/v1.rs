//! V1 level codes: decimal dimensions and explicit position lists.

use std::sync::OnceLock;

use cell_machine_levels_core::{Cell, Level, Rotation};
use log::{debug, warn};
use regex::Regex;

use super::{check_text, decimal, pattern, wall_effect};
use crate::cell_codes::{code_of, kind_from_code};
use crate::error::{LevelParsingError, SaveError};
use crate::LevelFormat;

const TAG: &str = "V1";

/// Separates entries of the position lists.
const ENTRY_SEPARATOR: char = ',';
/// Separates numbers within an entry.
const NUMBER_SEPARATOR: char = '.';

static PATTERN: OnceLock<Regex> = OnceLock::new();

/// `V1;<width>;<height>;<placeables>;<cells>;<name>[;<wall>]`.
///
/// Placeables are `x.y` entries and cells are `code.rotation.x.y` entries,
/// both comma-separated and both in decimal. Unlisted positions are
/// unplaceable background. V1 codes have no tutorial text field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct V1;

impl V1 {
    fn pattern() -> &'static Regex {
        pattern(&PATTERN, || {
            let pair = r"[0-9]+\.[0-9]+";
            let quad = r"[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+";
            format!(
                r"^{TAG};([0-9]+);([0-9]+);((?:{pair}(?:,{pair})*)?);((?:{quad}(?:,{quad})*)?);([^;]*)(?:;([0-3]?))?$"
            )
        })
    }
}

impl LevelFormat for V1 {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn open(&self, code: &str) -> Result<Level, LevelParsingError> {
        let captures = Self::pattern()
            .captures(code)
            .ok_or(LevelParsingError::Malformed { tag: TAG })?;
        let field = |index: usize| captures.get(index).map_or("", |m| m.as_str());

        let width = decimal(TAG, "width", field(1))?;
        let height = decimal(TAG, "height", field(2))?;
        let mut level = Level::new(width, height)
            .map_err(|source| LevelParsingError::InvalidDimensions { tag: TAG, source })?;

        for entry in entries(field(3)) {
            let [x, y] = numbers::<2>(entry, "placeable position")?;
            level
                .set_placeable(x, y, true)
                .map_err(|_| LevelParsingError::CellOutOfBounds { tag: TAG, x, y })?;
        }

        let mut placed = 0usize;
        for entry in entries(field(4)) {
            let [code, rotation, x, y] = numbers::<4>(entry, "cell")?;
            let kind = kind_from_code(code)
                .ok_or(LevelParsingError::UnknownCellCode { tag: TAG, code })?;
            level
                .set_cell(x, y, Cell::new(kind, Rotation::from_index(rotation)))
                .map_err(|_| LevelParsingError::CellOutOfBounds { tag: TAG, x, y })?;
            placed += 1;
        }

        level.set_name(field(5));
        level.set_wall_effect(wall_effect(captures.get(6).map(|m| m.as_str())));

        debug!("opened {TAG} level {width}x{height} with {placed} listed cells");
        Ok(level)
    }

    fn save(&self, level: &Level) -> Result<String, SaveError> {
        check_text(TAG, "name", level.name())?;
        if !level.tutorial_text().is_empty() {
            warn!("{TAG} level codes cannot carry tutorial text; dropping it");
        }

        let mut placeables = Vec::new();
        let mut cells = Vec::new();
        for (x, y, cell, placeable) in level.cells() {
            if placeable {
                placeables.push(format!("{x}.{y}"));
            }
            if !cell.is_background() {
                cells.push(format!(
                    "{}.{}.{x}.{y}",
                    code_of(cell.kind()),
                    cell.rotation().index()
                ));
            }
        }

        debug!(
            "saved {TAG} level {}x{} with {} listed cells",
            level.width(),
            level.height(),
            cells.len()
        );
        Ok(format!(
            "{TAG};{};{};{};{};{};{}",
            level.width(),
            level.height(),
            placeables.join(","),
            cells.join(","),
            level.name(),
            level.wall_effect().index(),
        ))
    }
}

fn entries(list: &str) -> impl Iterator<Item = &str> {
    list.split(ENTRY_SEPARATOR).filter(|entry| !entry.is_empty())
}

/// Splits a matched entry into exactly `N` decimal numbers.
fn numbers<const N: usize>(
    entry: &str,
    field: &'static str,
) -> Result<[u32; N], LevelParsingError> {
    let mut values = [0; N];
    let mut parts = entry.split(NUMBER_SEPARATOR);
    for value in &mut values {
        let part = parts.next().ok_or(LevelParsingError::Malformed { tag: TAG })?;
        *value = decimal(TAG, field, part)?;
    }
    if parts.next().is_some() {
        return Err(LevelParsingError::Malformed { tag: TAG });
    }
    Ok(values)
}
