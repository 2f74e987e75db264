//! Board module - the grid's mutable layers
//!
//! The board is stored as four parallel flat layers indexed by `row * width + col`:
//! symbols, special markers, obstacle kinds and obstacle health.
//!
//! Invariant: a cell occupied by an obstacle never carries a symbol or a special
//! marker. Every write path that places an obstacle clears the other layers.

use crate::grid::Grid;
use crate::types::{ObstacleKind, SpecialKind, Symbol};

/// The game board - `width x height` cells in parallel layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    symbols: Vec<Option<Symbol>>,
    specials: Vec<Option<SpecialKind>>,
    obstacles: Vec<Option<ObstacleKind>>,
    health: Vec<Option<u8>>,
}

impl Board {
    /// Create an empty board
    pub fn new(width: usize, height: usize) -> Self {
        let grid = Grid::new(width, height);
        let len = grid.len();
        Self {
            grid,
            symbols: vec![None; len],
            specials: vec![None; len],
            obstacles: vec![None; len],
            health: vec![None; len],
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn symbol(&self, i: usize) -> Option<Symbol> {
        self.symbols.get(i).copied().flatten()
    }

    pub fn special(&self, i: usize) -> Option<SpecialKind> {
        self.specials.get(i).copied().flatten()
    }

    pub fn obstacle(&self, i: usize) -> Option<ObstacleKind> {
        self.obstacles.get(i).copied().flatten()
    }

    pub fn health(&self, i: usize) -> Option<u8> {
        self.health.get(i).copied().flatten()
    }

    /// Set the symbol of a free cell. Ignored on obstacle cells.
    pub fn set_symbol(&mut self, i: usize, symbol: Option<Symbol>) -> bool {
        if !self.grid.contains(i) || (symbol.is_some() && self.is_blocked(i)) {
            return false;
        }
        self.symbols[i] = symbol;
        true
    }

    /// Set the special marker of a free cell. Ignored on obstacle cells.
    pub fn set_special(&mut self, i: usize, special: Option<SpecialKind>) -> bool {
        if !self.grid.contains(i) || (special.is_some() && self.is_blocked(i)) {
            return false;
        }
        self.specials[i] = special;
        true
    }

    /// Put an obstacle on a cell, wiping its tile.
    ///
    /// Health-bearing kinds start at their configured health.
    pub fn place_obstacle(&mut self, i: usize, kind: ObstacleKind) -> bool {
        if !self.grid.contains(i) {
            return false;
        }
        self.obstacles[i] = Some(kind);
        self.health[i] = kind.config().map(|c| c.health);
        self.symbols[i] = None;
        self.specials[i] = None;
        true
    }

    /// Remove the obstacle (and its health) from a cell
    pub fn clear_obstacle(&mut self, i: usize) {
        if self.grid.contains(i) {
            self.obstacles[i] = None;
            self.health[i] = None;
        }
    }

    pub(crate) fn set_health(&mut self, i: usize, health: Option<u8>) {
        if self.grid.contains(i) {
            self.health[i] = health;
        }
    }

    /// Cell is occupied by any obstacle
    #[inline]
    pub fn is_blocked(&self, i: usize) -> bool {
        self.obstacle(i).is_some()
    }

    /// Cell holds a health-bearing obstacle
    pub fn is_health_bearing(&self, i: usize) -> bool {
        self.obstacle(i).is_some_and(|k| k.is_health_bearing())
    }

    /// Remove symbol and special marker from a cell
    pub fn clear_tile(&mut self, i: usize) {
        if self.grid.contains(i) {
            self.symbols[i] = None;
            self.specials[i] = None;
        }
    }

    /// Exchange symbols and special markers of two cells
    pub fn swap_tiles(&mut self, a: usize, b: usize) {
        if self.grid.contains(a) && self.grid.contains(b) {
            self.symbols.swap(a, b);
            self.specials.swap(a, b);
        }
    }

    /// Move every layer of `from` onto `to`, leaving `from` empty
    pub(crate) fn move_cell(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        self.symbols[to] = self.symbols[from].take();
        self.specials[to] = self.specials[from].take();
        self.obstacles[to] = self.obstacles[from].take();
        self.health[to] = self.health[from].take();
    }

    pub fn count_obstacles(&self, kind: ObstacleKind) -> usize {
        self.obstacles.iter().filter(|o| **o == Some(kind)).count()
    }

    /// Indices of cells without any obstacle
    pub fn free_cells(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| !self.is_blocked(i)).collect()
    }

    pub fn symbols(&self) -> &[Option<Symbol>] {
        &self.symbols
    }

    pub fn specials(&self) -> &[Option<SpecialKind>] {
        &self.specials
    }

    pub fn obstacles(&self) -> &[Option<ObstacleKind>] {
        &self.obstacles
    }

    pub fn healths(&self) -> &[Option<u8>] {
        &self.health
    }

    /// Whether the obstacle/tile exclusivity invariant holds for every cell
    pub fn is_consistent(&self) -> bool {
        (0..self.len()).all(|i| {
            let blocked = self.is_blocked(i);
            let tile_ok = !blocked || (self.symbols[i].is_none() && self.specials[i].is_none());
            let special_ok = self.specials[i].is_none() || self.symbols[i].is_some();
            let health_ok = self.health[i].is_some() == self.is_health_bearing(i);
            tile_ok && special_ok && health_ok
        })
    }

    /// Build a board from text rows, one character per cell.
    ///
    /// Legend: `0`-`9` symbols, `.` empty, `i` ice, `c` chocolate, `t` trash,
    /// `s` ice spawner, `g` chocolate spawner. Returns `None` for ragged rows
    /// or unknown characters.
    ///
    /// ```
    /// use tui_match3_core::Board;
    ///
    /// let board = Board::parse(&["012", "1t.", "c22"]).unwrap();
    /// assert_eq!(board.width(), 3);
    /// assert!(board.is_health_bearing(4));
    /// ```
    pub fn parse(rows: &[&str]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut board = Board::new(width, height);
        for (r, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return None;
            }
            for (c, ch) in row.chars().enumerate() {
                let i = board.grid.index(r, c);
                match ch {
                    '0'..='9' => {
                        board.symbols[i] = Some(Symbol(ch as u8 - b'0'));
                    }
                    '.' => {}
                    'i' => {
                        board.place_obstacle(i, ObstacleKind::Ice);
                    }
                    'c' => {
                        board.place_obstacle(i, ObstacleKind::Chocolate);
                    }
                    't' => {
                        board.place_obstacle(i, ObstacleKind::Trash);
                    }
                    's' => {
                        board.place_obstacle(i, ObstacleKind::IceSpawner);
                    }
                    'g' => {
                        board.place_obstacle(i, ObstacleKind::ChocolateSpawner);
                    }
                    _ => return None,
                }
            }
        }
        Some(board)
    }

    /// Render the board back into the `parse` legend (specials are not shown)
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height())
            .map(|r| {
                self.grid
                    .row_cells(r)
                    .map(|i| match (self.obstacle(i), self.symbol(i)) {
                        (Some(ObstacleKind::Ice), _) => 'i',
                        (Some(ObstacleKind::Chocolate), _) => 'c',
                        (Some(ObstacleKind::Trash), _) => 't',
                        (Some(ObstacleKind::IceSpawner), _) => 's',
                        (Some(ObstacleKind::ChocolateSpawner), _) => 'g',
                        (None, Some(sym)) => char::from(b'0' + sym.0.min(9)),
                        (None, None) => '.',
                    })
                    .collect()
            })
            .collect()
    }
}
