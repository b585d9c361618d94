//! Which modules the ordinary dot pass may draw.
//!
//! Finder patterns are drawn separately by the corner pass, and the logo region is
//! left empty when background dots are hidden. Coordinates here are display
//! coordinates: `row` grows downward, `col` grows rightward.

/// Outer ring of a finder pattern.
pub const SQUARE_MASK: [[u8; 7]; 7] = [
    [1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1],
];

/// Center block of a finder pattern.
pub const DOT_MASK: [[u8; 7]; 7] = [
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 1, 1, 0, 0],
    [0, 0, 1, 1, 1, 0, 0],
    [0, 0, 1, 1, 1, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
];

/// Looks up a finder mask cell, treating anything outside the 7x7 grid as empty.
pub fn mask_at(mask: &[[u8; 7]; 7], row: i64, col: i64) -> bool {
    if !(0..7).contains(&row) || !(0..7).contains(&col) {
        return false;
    }
    mask[row as usize][col as usize] != 0
}

/// Paintability of every module for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotMask {
    count: usize,
    hidden_columns: usize,
    hidden_rows: usize,
}

impl DotMask {
    /// A mask excluding only the finder patterns.
    pub fn new(count: usize) -> Self {
        Self { count, hidden_columns: 0, hidden_rows: 0 }
    }

    /// Also excludes a centered `hidden_columns` x `hidden_rows` block.
    pub fn with_hidden_region(mut self, hidden_columns: usize, hidden_rows: usize) -> Self {
        self.hidden_columns = hidden_columns;
        self.hidden_rows = hidden_rows;
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_paintable(&self, row: usize, col: usize) -> bool {
        row < self.count && col < self.count && !self.in_finder(row, col) && !self.in_hidden_region(row, col)
    }

    /// Whether `(row, col)` lies in one of the three 7x7 finder footprints.
    pub fn in_finder(&self, row: usize, col: usize) -> bool {
        let far = self.count.saturating_sub(7);
        let top = row < 7;
        let left = col < 7;
        let bottom = row >= far;
        let right = col >= far;
        (top && left) || (top && right) || (bottom && left)
    }

    pub fn in_hidden_region(&self, row: usize, col: usize) -> bool {
        // Doubled to stay in integers: the region spans (count - n) / 2 .. (count + n) / 2.
        let inside = |index: usize, extent: usize| {
            extent > 0 && 2 * index + extent >= self.count && 2 * index < self.count + extent
        };
        inside(col, self.hidden_columns) && inside(row, self.hidden_rows)
    }
}
