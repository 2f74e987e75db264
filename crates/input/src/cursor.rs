//! Board cursor and two-click swap selection.

/// Result of pressing select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Selected(usize),
    Cleared,
    /// Second click on a neighbour of the selected cell.
    Swap(usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    row: usize,
    col: usize,
    width: usize,
    height: usize,
    selected: Option<usize>,
}

impl Cursor {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            row: height / 2,
            col: width / 2,
            width: width.max(1),
            height: height.max(1),
            selected: None,
        }
    }

    /// Adapt to a new board size, keeping the position when it still fits
    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    /// Move by one cell, clamped to the board
    pub fn step(&mut self, d_row: i32, d_col: i32) {
        let clamp = |v: usize, d: i32, len: usize| (v as i64 + d as i64).clamp(0, len as i64 - 1) as usize;
        self.row = clamp(self.row, d_row, self.height);
        self.col = clamp(self.col, d_col, self.width);
    }

    pub fn index(&self) -> usize {
        self.row * self.width + self.col
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn jump_to(&mut self, index: usize) {
        if index < self.width * self.height {
            self.row = index / self.width;
            self.col = index % self.width;
        }
    }

    pub fn press(&mut self) -> Selection {
        let here = self.index();
        match self.selected {
            Some(sel) if sel == here => {
                self.selected = None;
                Selection::Cleared
            }
            Some(sel) if self.is_neighbour(sel, here) => {
                self.selected = None;
                Selection::Swap(sel, here)
            }
            _ => {
                self.selected = Some(here);
                Selection::Selected(here)
            }
        }
    }

    fn is_neighbour(&self, a: usize, b: usize) -> bool {
        let (ar, ac) = (a / self.width, a % self.width);
        let (br, bc) = (b / self.width, b % self.width);
        ar.abs_diff(br) + ac.abs_diff(bc) == 1
    }
}
