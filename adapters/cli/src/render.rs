//! Plain-text rendering of level grids.
//!
//! Every position takes two characters: the cell letter and its facing.
//! Placeable positions use lowercase letters; empty ones render as `..`, or
//! `++` when placeable.

use cell_machine_levels_core::{Cell, CellKind, Level, Rotation};

/// Renders the level row by row, top row first.
pub(crate) fn grid(level: &Level) -> String {
    let mut out = String::with_capacity(level.cells().len() * 2 + level.height() as usize);
    for (x, _, cell, placeable) in level.cells() {
        out.push_str(&position(cell, placeable));
        if x + 1 == level.width() {
            out.push('\n');
        }
    }
    out
}

fn position(cell: Cell, placeable: bool) -> String {
    let Some(letter) = letter(cell.kind()) else {
        return if placeable { "++" } else { ".." }.to_owned();
    };
    let letter = if placeable {
        letter.to_ascii_lowercase()
    } else {
        letter
    };
    format!("{letter}{}", facing(cell.rotation()))
}

fn letter(kind: CellKind) -> Option<char> {
    let letter = match kind {
        CellKind::Background => return None,
        CellKind::Generator => 'G',
        CellKind::SpinnerRight => 'R',
        CellKind::SpinnerLeft => 'L',
        CellKind::Mover => 'M',
        CellKind::Slide => 'S',
        CellKind::Push => 'P',
        CellKind::Immobile => 'I',
        CellKind::Enemy => 'E',
        CellKind::Trash => 'T',
    };
    Some(letter)
}

fn facing(rotation: Rotation) -> char {
    match rotation {
        Rotation::Right => '>',
        Rotation::Down => 'v',
        Rotation::Left => '<',
        Rotation::Up => '^',
    }
}

#[cfg(test)]
mod tests {
    use super::grid;
    use cell_machine_levels_core::{Cell, CellKind, Level, Rotation};

    #[test]
    fn renders_one_line_per_row() {
        let mut level = Level::new(3, 2).expect("valid dimensions");
        level.set_placeable(0, 0, true).expect("in bounds");
        level
            .set_cell(2, 0, Cell::new(CellKind::Mover, Rotation::Up))
            .expect("in bounds");
        level
            .set_cell(1, 1, Cell::new(CellKind::Generator, Rotation::Left))
            .expect("in bounds");
        level.set_placeable(1, 1, true).expect("in bounds");

        assert_eq!(grid(&level), "++..M^\n..g<..\n");
    }
}
