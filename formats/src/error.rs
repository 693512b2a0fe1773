use cell_machine_levels_base74::Base74Error;
use cell_machine_levels_core::GridError;
use cell_machine_levels_run_length::StreamError;
use thiserror::Error;

/// Longest tag echoed back verbatim in error messages.
const TAG_DISPLAY_LIMIT: usize = 10;

/// Errors raised while decoding a level code.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelParsingError {
    /// No registered grammar handles the code's tag.
    #[error("the format {tag} is not supported or doesn't exist")]
    UnknownFormat {
        /// The tag, truncated for display.
        tag: String,
    },
    /// The code does not have the shape its grammar requires.
    #[error("invalid {tag} level code")]
    Malformed {
        /// Grammar that rejected the code.
        tag: &'static str,
    },
    /// A decimal field does not fit the range it describes.
    #[error("invalid {tag} level code: {field} '{value}' is out of range")]
    NumberOutOfRange {
        /// Grammar that rejected the code.
        tag: &'static str,
        /// Field holding the number.
        field: &'static str,
        /// The number, truncated for display.
        value: String,
    },
    /// A base-74 field could not be decoded.
    #[error("invalid {tag} level code: bad {field}: {source}")]
    InvalidNumeral {
        /// Grammar that rejected the code.
        tag: &'static str,
        /// Field holding the numeral.
        field: &'static str,
        /// Underlying numeral error.
        #[source]
        source: Base74Error,
    },
    /// The dimensions do not describe a valid grid.
    #[error("invalid {tag} level code: {source}")]
    InvalidDimensions {
        /// Grammar that rejected the code.
        tag: &'static str,
        /// Underlying grid error.
        #[source]
        source: GridError,
    },
    /// The cell stream could not be decoded.
    #[error("invalid {tag} level code: {source}")]
    InvalidCellStream {
        /// Grammar that rejected the code.
        tag: &'static str,
        /// Underlying stream error.
        #[source]
        source: StreamError,
    },
    /// A listed position lies outside the grid.
    #[error("invalid {tag} level code: position ({x}, {y}) lies outside the grid")]
    CellOutOfBounds {
        /// Grammar that rejected the code.
        tag: &'static str,
        /// Column of the position.
        x: u32,
        /// Row of the position.
        y: u32,
    },
    /// A listed cell uses a code the grammar does not define.
    #[error("invalid {tag} level code: unknown cell code {code}")]
    UnknownCellCode {
        /// Grammar that rejected the code.
        tag: &'static str,
        /// The unknown code.
        code: u32,
    },
}

/// Errors raised while encoding a level.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SaveError {
    /// No registered grammar is named by the requested tag.
    #[error("the format {tag} is not supported or doesn't exist")]
    UnsupportedFormat {
        /// The tag, truncated for display.
        tag: String,
    },
    /// A text field contains the field separator and cannot be written.
    #[error("cannot write a {tag} level code: the {field} contains ';'")]
    Unencodable {
        /// Grammar asked to write the level.
        tag: &'static str,
        /// Offending field.
        field: &'static str,
    },
    /// A cell or placement flag lies on a position the stream layout never
    /// visits, so the code could not describe it.
    #[error("cannot write a {tag} level code: the cell stream never reaches ({x}, {y})")]
    Unrepresentable {
        /// Grammar asked to write the level.
        tag: &'static str,
        /// Column of the position.
        x: u32,
        /// Row of the position.
        y: u32,
    },
    /// The cell stream could not be written.
    #[error("cannot write a {tag} level code: {source}")]
    InvalidCellStream {
        /// Grammar asked to write the level.
        tag: &'static str,
        /// Underlying stream error.
        #[source]
        source: StreamError,
    },
}

/// Shortens user-provided text for inclusion in an error message.
pub(crate) fn truncate_for_display(text: &str) -> String {
    if text.chars().count() > TAG_DISPLAY_LIMIT {
        let head: String = text.chars().take(TAG_DISPLAY_LIMIT).collect();
        format!("{head}...")
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_for_display;

    #[test]
    fn short_text_is_kept() {
        assert_eq!(truncate_for_display("V9"), "V9");
        assert_eq!(truncate_for_display("0123456789"), "0123456789");
    }

    #[test]
    fn long_text_is_truncated() {
        assert_eq!(truncate_for_display("0123456789abc"), "0123456789...");
    }
}
