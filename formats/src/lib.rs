#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level code grammars for Cell Machine levels.
//!
//! A level code is a `;`-separated string whose first field names its format.
//! [`open`] reads the tag, looks the grammar up in the standard
//! [`FormatRegistry`] and decodes the rest; [`save`] writes a [`Level`] back
//! out in the requested format.
//!
//! | Tag | Dimensions | Cells                                           |
//! |-----|------------|-------------------------------------------------|
//! | V1  | decimal    | explicit `x.y` and `code.rotation.x.y` lists    |
//! | V2  | base-74    | repeat-marker stream                            |
//! | V3  | base-74    | back-reference stream                           |

mod cell_codes;
mod error;
mod grammar;
mod registry;

use cell_machine_levels_core::Level;

pub use error::{LevelParsingError, SaveError};
pub use grammar::{V1, V2, V3};
pub use registry::{FormatRegistry, LevelFormat};

/// Character separating the fields of a level code.
pub const FIELD_SEPARATOR: char = ';';

/// Leading field of a level code, or the whole code when it has no separator.
#[must_use]
pub fn format_tag(code: &str) -> &str {
    code.split_once(FIELD_SEPARATOR).map_or(code, |(tag, _)| tag)
}

/// Decodes a level code using the standard registry.
pub fn open(code: &str) -> Result<Level, LevelParsingError> {
    FormatRegistry::standard().open(code)
}

/// Encodes a level in the format named by `tag` using the standard registry.
pub fn save(level: &Level, tag: &str) -> Result<String, SaveError> {
    FormatRegistry::standard().save(level, tag)
}
