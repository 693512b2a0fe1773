#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core level model shared across the Cell Machine level tooling.
//!
//! A [`Level`] is a fixed-size rectangle of [`Cell`] values paired with a
//! parallel grid of placement flags. Both grids are stored as flat buffers
//! indexed by `y * width + x`. Codecs populate levels through the explicit
//! write operations and read them back through [`Level::cells`], which walks
//! the grid in row-major order.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest number of cells a single level may contain.
pub const MAX_CELLS: usize = 1 << 24;

/// Kinds of cells that can occupy a grid position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Empty position without any cell.
    #[default]
    Background,
    /// Duplicates the cell behind it in front of it.
    Generator,
    /// Rotates neighbouring cells clockwise.
    SpinnerRight,
    /// Rotates neighbouring cells counter-clockwise.
    SpinnerLeft,
    /// Moves forward every tick, pushing what is in front of it.
    Mover,
    /// Can only be pushed along one axis.
    Slide,
    /// Can be pushed from any side.
    Push,
    /// Cannot be moved at all.
    Immobile,
    /// Destroys itself together with whatever enters it.
    Enemy,
    /// Destroys whatever enters it.
    Trash,
}

impl CellKind {
    /// Every cell kind, background first.
    pub const ALL: [CellKind; 10] = [
        CellKind::Background,
        CellKind::Generator,
        CellKind::SpinnerRight,
        CellKind::SpinnerLeft,
        CellKind::Mover,
        CellKind::Slide,
        CellKind::Push,
        CellKind::Immobile,
        CellKind::Enemy,
        CellKind::Trash,
    ];

    /// Reports whether the kind represents an empty position.
    #[must_use]
    pub const fn is_background(self) -> bool {
        matches!(self, CellKind::Background)
    }
}

/// Facing of a cell. Rotations step clockwise in the order right, down, left, up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    /// Facing toward increasing `x`.
    #[default]
    Right,
    /// Facing toward increasing `y`.
    Down,
    /// Facing toward decreasing `x`.
    Left,
    /// Facing toward decreasing `y`.
    Up,
}

impl Rotation {
    /// Builds a rotation from its numeric index, taken modulo four.
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        match index % 4 {
            0 => Rotation::Right,
            1 => Rotation::Down,
            2 => Rotation::Left,
            _ => Rotation::Up,
        }
    }

    /// Numeric index of the rotation in `0..4`.
    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            Rotation::Right => 0,
            Rotation::Down => 1,
            Rotation::Left => 2,
            Rotation::Up => 3,
        }
    }

    /// Rotation a quarter turn clockwise from this one.
    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Rotation a quarter turn counter-clockwise from this one.
    #[must_use]
    pub const fn rotated_counter_clockwise(self) -> Self {
        Self::from_index(self.index() + 3)
    }
}

/// Behaviour applied when cells reach the edge of the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallEffect {
    /// Cells stop at the edge.
    #[default]
    Stop,
    /// Cells leaving one edge re-enter from the opposite edge.
    Wrap,
    /// Cells leaving the grid are deleted.
    Delete,
    /// Cells bounce back and reverse their facing.
    Flip,
}

impl WallEffect {
    /// Builds a wall effect from its numeric index, if the index is known.
    #[must_use]
    pub const fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(WallEffect::Stop),
            1 => Some(WallEffect::Wrap),
            2 => Some(WallEffect::Delete),
            3 => Some(WallEffect::Flip),
            _ => None,
        }
    }

    /// Numeric index of the wall effect in `0..4`.
    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            WallEffect::Stop => 0,
            WallEffect::Wrap => 1,
            WallEffect::Delete => 2,
            WallEffect::Flip => 3,
        }
    }
}

/// A single grid position: what occupies it and which way it faces.
///
/// Background cells carry no orientation and always report [`Rotation::Right`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    kind: CellKind,
    rotation: Rotation,
}

impl Cell {
    /// Creates a cell of the provided kind and rotation.
    #[must_use]
    pub const fn new(kind: CellKind, rotation: Rotation) -> Self {
        let rotation = if kind.is_background() {
            Rotation::Right
        } else {
            rotation
        };
        Self { kind, rotation }
    }

    /// Empty background cell.
    #[must_use]
    pub const fn background() -> Self {
        Self {
            kind: CellKind::Background,
            rotation: Rotation::Right,
        }
    }

    /// Kind of the cell.
    #[must_use]
    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    /// Facing of the cell.
    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Reports whether the cell is empty background.
    #[must_use]
    pub const fn is_background(&self) -> bool {
        self.kind.is_background()
    }

    /// Turns the cell a quarter turn counter-clockwise.
    pub fn rotate_left(&mut self) {
        *self = Self::new(self.kind, self.rotation.rotated_counter_clockwise());
    }

    /// Turns the cell a quarter turn clockwise.
    pub fn rotate_right(&mut self) {
        *self = Self::new(self.kind, self.rotation.rotated_clockwise());
    }

    /// Canonical form of the cell.
    ///
    /// Kinds that behave identically in every facing are normalised to
    /// [`Rotation::Right`]; slides only distinguish their axis, so they keep
    /// the rotation modulo two.
    #[must_use]
    pub const fn optimized(self) -> Self {
        match self.kind {
            CellKind::Enemy
            | CellKind::Immobile
            | CellKind::Push
            | CellKind::Trash
            | CellKind::SpinnerLeft
            | CellKind::SpinnerRight => Self::new(self.kind, Rotation::Right),
            CellKind::Slide => {
                Self::new(self.kind, Rotation::from_index(self.rotation.index() % 2))
            }
            CellKind::Background | CellKind::Generator | CellKind::Mover => self,
        }
    }
}

/// Errors raised when constructing or writing into a [`Level`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// One of the requested dimensions was zero.
    #[error("level dimensions must be positive, got {width}x{height}")]
    ZeroDimension {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The requested grid holds more cells than a level supports.
    #[error("level dimensions {width}x{height} exceed the supported area of {MAX_CELLS} cells")]
    TooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A write addressed a position outside the grid.
    #[error("position ({x}, {y}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Column of the rejected position.
        x: u32,
        /// Row of the rejected position.
        y: u32,
        /// Width of the grid.
        width: u32,
        /// Height of the grid.
        height: u32,
    },
}

/// A puzzle level: a rectangle of cells, placement flags and metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    width: u32,
    height: u32,
    name: String,
    tutorial_text: String,
    wall_effect: WallEffect,
    cells: Vec<Cell>,
    placeable: Vec<bool>,
}

impl Level {
    /// Creates an empty level filled with unplaceable background cells.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension { width, height });
        }

        let area = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(width, height)| width.checked_mul(height))
            .filter(|area| *area <= MAX_CELLS)
            .ok_or(GridError::TooLarge { width, height })?;

        Ok(Self {
            width,
            height,
            name: String::new(),
            tutorial_text: String::new(),
            wall_effect: WallEffect::Stop,
            cells: vec![Cell::background(); area],
            placeable: vec![false; area],
        })
    }

    /// Replaces the level name, returning the updated level.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the wall effect, returning the updated level.
    #[must_use]
    pub fn with_wall_effect(mut self, wall_effect: WallEffect) -> Self {
        self.wall_effect = wall_effect;
        self
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions of the grid as `(width, height)`.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Display name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the display name of the level.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Auxiliary text shown alongside the level.
    #[must_use]
    pub fn tutorial_text(&self) -> &str {
        &self.tutorial_text
    }

    /// Replaces the auxiliary text shown alongside the level.
    pub fn set_tutorial_text(&mut self, text: impl Into<String>) {
        self.tutorial_text = text.into();
    }

    /// Behaviour at the grid boundary.
    #[must_use]
    pub const fn wall_effect(&self) -> WallEffect {
        self.wall_effect
    }

    /// Replaces the behaviour at the grid boundary.
    pub fn set_wall_effect(&mut self, wall_effect: WallEffect) {
        self.wall_effect = wall_effect;
    }

    /// Cell at the provided position, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, x: u32, y: u32) -> Option<Cell> {
        self.index(x, y).map(|index| self.cells[index])
    }

    /// Placement flag at the provided position, if it lies inside the grid.
    #[must_use]
    pub fn is_placeable(&self, x: u32, y: u32) -> Option<bool> {
        self.index(x, y).map(|index| self.placeable[index])
    }

    /// Writes a cell at the provided position.
    pub fn set_cell(&mut self, x: u32, y: u32, cell: Cell) -> Result<(), GridError> {
        let index = self.checked_index(x, y)?;
        self.cells[index] = cell;
        Ok(())
    }

    /// Writes the placement flag at the provided position.
    pub fn set_placeable(&mut self, x: u32, y: u32, placeable: bool) -> Result<(), GridError> {
        let index = self.checked_index(x, y)?;
        self.placeable[index] = placeable;
        Ok(())
    }

    /// Iterates every position in row-major order.
    ///
    /// Each call starts a fresh traversal from `(0, 0)`.
    #[must_use]
    pub fn cells(&self) -> LevelCells<'_> {
        LevelCells {
            level: self,
            next: 0,
        }
    }

    /// Copy of the level with every cell in its canonical rotation.
    #[must_use]
    pub fn optimized(&self) -> Self {
        let mut result = self.clone();
        result.optimize();
        result
    }

    /// Normalises every cell to its canonical rotation in place.
    pub fn optimize(&mut self) {
        for cell in &mut self.cells {
            *cell = cell.optimized();
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            let row = usize::try_from(y).ok()?;
            let column = usize::try_from(x).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn checked_index(&self, x: u32, y: u32) -> Result<usize, GridError> {
        self.index(x, y).ok_or(GridError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }
}

/// Row-major traversal over a level yielding `(x, y, cell, placeable)`.
#[derive(Clone, Debug)]
pub struct LevelCells<'a> {
    level: &'a Level,
    next: usize,
}

impl Iterator for LevelCells<'_> {
    type Item = (u32, u32, Cell, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next;
        let cell = *self.level.cells.get(index)?;
        let placeable = self.level.placeable[index];
        self.next += 1;

        // The area is capped at MAX_CELLS, so the coordinates fit in u32.
        let width = self.level.width as usize;
        let x = (index % width) as u32;
        let y = (index / width) as u32;
        Some((x, y, cell, placeable))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.level.cells.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LevelCells<'_> {}

impl FusedIterator for LevelCells<'_> {}
