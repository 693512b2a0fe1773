//! Numeric cell codes shared by the V1, V2 and V3 grammars.

use cell_machine_levels_core::{Cell, CellKind, Rotation};

/// Number of non-background cell codes.
const KINDS: u32 = 9;

/// Stream symbol of an unplaceable background position.
pub(crate) const BACKGROUND_SYMBOL: u8 = 72;

/// Cell kind for a wire code.
pub(crate) fn kind_from_code(code: u32) -> Option<CellKind> {
    let kind = match code {
        0 => CellKind::Generator,
        1 => CellKind::SpinnerRight,
        2 => CellKind::SpinnerLeft,
        3 => CellKind::Mover,
        4 => CellKind::Slide,
        5 => CellKind::Push,
        6 => CellKind::Immobile,
        7 => CellKind::Enemy,
        8 => CellKind::Trash,
        9 => CellKind::Background,
        _ => return None,
    };
    Some(kind)
}

/// Wire code for a cell kind.
pub(crate) fn code_of(kind: CellKind) -> u32 {
    match kind {
        CellKind::Generator => 0,
        CellKind::SpinnerRight => 1,
        CellKind::SpinnerLeft => 2,
        CellKind::Mover => 3,
        CellKind::Slide => 4,
        CellKind::Push => 5,
        CellKind::Immobile => 6,
        CellKind::Enemy => 7,
        CellKind::Trash => 8,
        CellKind::Background => 9,
    }
}

/// Packs a position into its stream symbol.
///
/// Background positions only carry the placement flag (`72 + placeable`);
/// every other cell packs as `2 * (code + 9 * rotation) + placeable`.
pub(crate) fn pack(cell: Cell, placeable: bool) -> u8 {
    let flag = u32::from(placeable);
    let value = if cell.is_background() {
        u32::from(BACKGROUND_SYMBOL) + flag
    } else {
        2 * (code_of(cell.kind()) + KINDS * cell.rotation().index()) + flag
    };
    // At most 2 * (8 + 9 * 3) + 1 = 71 for cells, 73 for background.
    value as u8
}

/// Unpacks a stream symbol into its cell and placement flag.
pub(crate) fn unpack(symbol: u8) -> (Cell, bool) {
    if symbol >= BACKGROUND_SYMBOL {
        return (Cell::background(), symbol > BACKGROUND_SYMBOL);
    }

    let value = u32::from(symbol);
    let placeable = value % 2 == 1;
    let packed = value / 2;
    let kind = kind_from_code(packed % KINDS).unwrap_or_default();
    let cell = Cell::new(kind, Rotation::from_index(packed / KINDS));
    (cell, placeable)
}
