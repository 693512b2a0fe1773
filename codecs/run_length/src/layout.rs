/// Mapping between flattened stream positions and grid coordinates.
///
/// Position `k` lands on `(k % width, k / height)`. The row is derived by
/// dividing by the height, not the width; existing level codes depend on
/// this, so for non-square grids some positions fall below the last row.
/// Those positions are outside the layout's [`capacity`](Self::capacity):
/// a stream may cover at most `min(width, height) * height` positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamLayout {
    width: u32,
    height: u32,
}

impl StreamLayout {
    /// Creates the layout for a grid of the provided dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of stream positions that land inside the grid.
    #[must_use]
    pub fn capacity(&self) -> usize {
        let rows = self.height as usize;
        (self.width.min(self.height) as usize).saturating_mul(rows)
    }

    /// Grid coordinate of the stream position, if it lands inside the grid.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<(u32, u32)> {
        if self.width == 0 || self.height == 0 || index >= self.capacity() {
            return None;
        }
        let x = index % self.width as usize;
        let y = index / self.height as usize;
        Some((u32::try_from(x).ok()?, u32::try_from(y).ok()?))
    }

    /// Every in-grid stream position in stream order.
    pub fn positions(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.capacity()).filter_map(|index| self.position(index))
    }
}
