use std::fmt;

use cell_machine_levels_core::Level;
use log::debug;

use crate::error::{truncate_for_display, LevelParsingError, SaveError};
use crate::{format_tag, V1, V2, V3};

/// A level code grammar identified by its tag.
pub trait LevelFormat: Sync {
    /// Leading field that selects this grammar.
    fn tag(&self) -> &'static str;

    /// Decodes a complete level code, tag included.
    fn open(&self, code: &str) -> Result<Level, LevelParsingError>;

    /// Encodes the level as a complete level code.
    fn save(&self, level: &Level) -> Result<String, SaveError>;
}

static STANDARD: FormatRegistry = FormatRegistry::new(&[
    &V1 as &dyn LevelFormat,
    &V2 as &dyn LevelFormat,
    &V3 as &dyn LevelFormat,
]);

/// Fixed table of grammars keyed by tag.
///
/// The table is built at compile time; the first grammar with a matching tag
/// wins.
#[derive(Clone, Copy)]
pub struct FormatRegistry {
    formats: &'static [&'static dyn LevelFormat],
}

impl FormatRegistry {
    /// Creates a registry over the provided grammars.
    #[must_use]
    pub const fn new(formats: &'static [&'static dyn LevelFormat]) -> Self {
        Self { formats }
    }

    /// Registry holding the V1, V2 and V3 grammars.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Grammar registered under `tag`.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&'static dyn LevelFormat> {
        self.formats.iter().copied().find(|format| format.tag() == tag)
    }

    /// Tags of every registered grammar in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.formats.iter().map(|format| format.tag())
    }

    /// Decodes a level code with the grammar named by its leading field.
    pub fn open(&self, code: &str) -> Result<Level, LevelParsingError> {
        let tag = format_tag(code);
        let format = self.get(tag).ok_or_else(|| LevelParsingError::UnknownFormat {
            tag: truncate_for_display(tag),
        })?;
        debug!("dispatching {} byte level code to {tag}", code.len());
        format.open(code)
    }

    /// Encodes the level with the grammar registered under `tag`.
    pub fn save(&self, level: &Level, tag: &str) -> Result<String, SaveError> {
        let format = self.get(tag).ok_or_else(|| SaveError::UnsupportedFormat {
            tag: truncate_for_display(tag),
        })?;
        debug!("saving {}x{} level as {tag}", level.width(), level.height());
        format.save(level)
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tags()).finish()
    }
}
