//! Grid module - row/column <-> flat index mapping
//!
//! Every board layer is a flat array in row-major order: `i = row * width + col`.
//! Dimensions come from the active game mode, so they are carried by value
//! instead of being compile-time constants.

use arrayvec::ArrayVec;

/// Orthogonal neighbour offsets as (row, col): up, down, left, right.
pub const DIRS4: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Board dimensions and coordinate helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index from (row, col)
    #[inline(always)]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// (row, col) from a flat index
    #[inline(always)]
    pub fn rowcol(&self, i: usize) -> (usize, usize) {
        (i / self.width, i % self.width)
    }

    #[inline(always)]
    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && (row as usize) < self.height && col >= 0 && (col as usize) < self.width
    }

    /// Whether a flat index addresses a cell of this grid
    pub fn contains(&self, i: usize) -> bool {
        i < self.len()
    }

    /// Index of the cell at (dr, dc) from `i`, if it is on the board
    pub fn offset(&self, i: usize, dr: isize, dc: isize) -> Option<usize> {
        let (r, c) = self.rowcol(i);
        let (nr, nc) = (r as isize + dr, c as isize + dc);
        if self.in_bounds(nr, nc) {
            Some(self.index(nr as usize, nc as usize))
        } else {
            None
        }
    }

    /// In-bounds orthogonal neighbours of `i` (up, down, left, right order)
    pub fn neighbors4(&self, i: usize) -> ArrayVec<usize, 4> {
        DIRS4
            .iter()
            .filter_map(|&(dr, dc)| self.offset(i, dr, dc))
            .collect()
    }

    /// In-bounds 3x3 neighbourhood of `i`, including `i` itself
    pub fn area3x3(&self, i: usize) -> ArrayVec<usize, 9> {
        let mut out = ArrayVec::new();
        for dr in -1..=1 {
            for dc in -1..=1 {
                if let Some(n) = self.offset(i, dr, dc) {
                    out.push(n);
                }
            }
        }
        out
    }

    /// Cells of one row, left to right
    pub fn row_cells(&self, row: usize) -> impl Iterator<Item = usize> {
        let start = row * self.width;
        start..start + self.width
    }

    /// Cells of one column, top to bottom
    pub fn col_cells(&self, col: usize) -> impl Iterator<Item = usize> {
        let width = self.width;
        (0..self.height).map(move |r| r * width + col)
    }

    /// Manhattan distance of exactly one
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        let (ra, ca) = self.rowcol(a);
        let (rb, cb) = self.rowcol(b);
        ra.abs_diff(rb) + ca.abs_diff(cb) == 1
    }
}
