use cell_machine_levels_core::{Cell, CellKind, Level, Rotation, WallEffect};

fn sample_level() -> Level {
    let mut level = Level::new(3, 2)
        .expect("level")
        .with_name("sample")
        .with_wall_effect(WallEffect::Wrap);
    level
        .set_cell(1, 0, Cell::new(CellKind::Mover, Rotation::Up))
        .expect("write cell");
    level
        .set_cell(2, 1, Cell::new(CellKind::Trash, Rotation::Left))
        .expect("write cell");
    level.set_placeable(0, 1, true).expect("write flag");
    level
}

#[test]
fn new_level_is_background_and_unplaceable() {
    let level = Level::new(4, 3).expect("level");

    assert_eq!(level.size(), (4, 3));
    assert_eq!(level.wall_effect(), WallEffect::Stop);
    assert!(level.name().is_empty());
    assert!(
        level
            .cells()
            .all(|(_, _, cell, placeable)| cell == Cell::background() && !placeable),
        "a fresh level must only contain default positions",
    );
}

#[test]
fn cells_walk_the_grid_in_row_major_order() {
    let level = sample_level();
    let positions: Vec<(u32, u32)> = level.cells().map(|(x, y, _, _)| (x, y)).collect();

    assert_eq!(
        positions,
        vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)],
        "x must vary fastest, then y",
    );
    assert_eq!(level.cells().len(), 6);
}

#[test]
fn cells_traversals_are_independent() {
    let level = sample_level();
    let mut first = level.cells();
    let _ = first.next();
    let _ = first.next();

    let second: Vec<_> = level.cells().collect();
    assert_eq!(second.len(), 6, "a new traversal must restart from the origin");
    assert_eq!(second[0].0, 0);
    assert_eq!(first.len(), 4);
}

#[test]
fn cells_report_written_values() {
    let level = sample_level();
    let written: Vec<_> = level
        .cells()
        .filter(|(_, _, cell, placeable)| !cell.is_background() || *placeable)
        .collect();

    assert_eq!(
        written,
        vec![
            (1, 0, Cell::new(CellKind::Mover, Rotation::Up), false),
            (0, 1, Cell::background(), true),
            (2, 1, Cell::new(CellKind::Trash, Rotation::Left), false),
        ],
    );
}

#[test]
fn optimized_level_keeps_flags_and_metadata() {
    let mut level = sample_level();
    level.set_tutorial_text("push the trash");
    let optimized = level.optimized();

    assert_eq!(
        optimized.cell(2, 1),
        Some(Cell::new(CellKind::Trash, Rotation::Right))
    );
    assert_eq!(
        optimized.cell(1, 0),
        Some(Cell::new(CellKind::Mover, Rotation::Up))
    );
    assert_eq!(optimized.is_placeable(0, 1), Some(true));
    assert_eq!(optimized.name(), "sample");
    assert_eq!(optimized.tutorial_text(), "push the trash");
    assert_eq!(optimized.wall_effect(), WallEffect::Wrap);

    level.optimize();
    assert_eq!(level, optimized);
}

#[test]
fn levels_compare_by_content() {
    let mut other = sample_level();
    assert_eq!(sample_level(), other);

    other.set_name("renamed");
    assert_ne!(sample_level(), other);
}
