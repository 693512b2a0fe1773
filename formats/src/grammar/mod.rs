//! Grammars of the supported level code versions.

mod streamed;
mod v1;
mod v2;
mod v3;

use std::sync::OnceLock;

use cell_machine_levels_core::WallEffect;
use regex::Regex;

use crate::error::{truncate_for_display, LevelParsingError, SaveError};
use crate::FIELD_SEPARATOR;

pub use v1::V1;
pub use v2::V2;
pub use v3::V3;

/// Digit class of the base-74 alphabet, for use inside a regex character class.
const BASE74_CLASS: &str = r"0-9a-zA-Z!$%&+\-.=?^{}";

/// Compiles `source` on first use.
fn pattern<'a>(cache: &'a OnceLock<Regex>, source: impl FnOnce() -> String) -> &'a Regex {
    cache.get_or_init(|| Regex::new(&source()).expect("level code patterns are valid regexes"))
}

/// Wall effect of the optional trailing field; absent or empty means stop.
fn wall_effect(field: Option<&str>) -> WallEffect {
    field
        .and_then(|digit| digit.parse().ok())
        .and_then(WallEffect::from_index)
        .unwrap_or_default()
}

/// Parses a decimal field that has already been matched as ASCII digits.
fn decimal(tag: &'static str, field: &'static str, text: &str) -> Result<u32, LevelParsingError> {
    text.parse().map_err(|_| LevelParsingError::NumberOutOfRange {
        tag,
        field,
        value: truncate_for_display(text),
    })
}

/// Rejects text that would split into extra fields.
fn check_text(tag: &'static str, field: &'static str, text: &str) -> Result<(), SaveError> {
    if text.contains(FIELD_SEPARATOR) {
        Err(SaveError::Unencodable { tag, field })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{check_text, decimal, wall_effect};
    use crate::{LevelParsingError, SaveError};
    use cell_machine_levels_core::WallEffect;

    #[test]
    fn missing_wall_field_means_stop() {
        assert_eq!(wall_effect(None), WallEffect::Stop);
        assert_eq!(wall_effect(Some("")), WallEffect::Stop);
        assert_eq!(wall_effect(Some("3")), WallEffect::Flip);
    }

    #[test]
    fn oversized_decimals_are_reported() {
        assert_eq!(decimal("V1", "width", "42"), Ok(42));
        assert_eq!(
            decimal("V1", "width", "99999999999"),
            Err(LevelParsingError::NumberOutOfRange {
                tag: "V1",
                field: "width",
                value: "9999999999...".to_owned(),
            })
        );
    }

    #[test]
    fn separators_make_text_unencodable() {
        assert_eq!(check_text("V2", "name", "plain"), Ok(()));
        assert_eq!(
            check_text("V2", "name", "a;b"),
            Err(SaveError::Unencodable {
                tag: "V2",
                field: "name"
            })
        );
    }
}
