//! Matcher module - run detection and special-tile creation rules
//!
//! Rows are scanned before columns, so horizontal runs always precede
//! vertical runs in the result. Any empty or obstacle cell breaks a run.

use std::collections::{BTreeSet, HashMap};

use crate::board::Board;
use crate::grid::Grid;
use crate::types::{SpecialKind, Symbol};

/// Minimum run length that counts as a match
pub const MIN_RUN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A maximal line of at least three equal symbols, in scan order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub orientation: Orientation,
    pub cells: Vec<usize>,
}

impl Run {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, i: usize) -> bool {
        self.cells.contains(&i)
    }
}

/// A special tile to be created by a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialPlan {
    pub index: usize,
    pub kind: SpecialKind,
}

/// Cells to clear and specials to create for one set of runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub to_remove: BTreeSet<usize>,
    pub specials: Vec<SpecialPlan>,
}

/// Matchable symbol of a cell: `None` for empty or obstacle cells
#[inline]
fn matchable(board: &Board, i: usize) -> Option<Symbol> {
    if board.is_blocked(i) {
        None
    } else {
        board.symbol(i)
    }
}

/// Find every run on the board
pub fn find_matches(board: &Board) -> Vec<Run> {
    find_runs_by(board.grid(), |i| matchable(board, i))
}

/// Find runs using an arbitrary symbol lookup (used for speculative swaps)
pub fn find_runs_by<F>(grid: Grid, lookup: F) -> Vec<Run>
where
    F: Fn(usize) -> Option<Symbol>,
{
    let mut runs = Vec::new();
    for r in 0..grid.height() {
        scan_line(grid.row_cells(r), Orientation::Horizontal, &lookup, &mut runs);
    }
    for c in 0..grid.width() {
        scan_line(grid.col_cells(c), Orientation::Vertical, &lookup, &mut runs);
    }
    runs
}

fn scan_line<I, F>(cells: I, orientation: Orientation, lookup: &F, out: &mut Vec<Run>)
where
    I: Iterator<Item = usize>,
    F: Fn(usize) -> Option<Symbol>,
{
    let mut run: Vec<usize> = Vec::new();
    let mut current: Option<Symbol> = None;
    let mut flush = |run: &mut Vec<usize>| {
        if run.len() >= MIN_RUN {
            out.push(Run {
                orientation,
                cells: std::mem::take(run),
            });
        } else {
            run.clear();
        }
    };

    for i in cells {
        match lookup(i) {
            None => {
                flush(&mut run);
                current = None;
            }
            Some(sym) if current == Some(sym) => run.push(i),
            Some(sym) => {
                flush(&mut run);
                run.push(i);
                current = Some(sym);
            }
        }
    }
    flush(&mut run);
}

/// Whether any run exists on the board
pub fn has_match(board: &Board) -> bool {
    has_match_by(board.grid(), |i| matchable(board, i))
}

/// Short-circuiting run check over a symbol lookup
pub fn has_match_by<F>(grid: Grid, lookup: F) -> bool
where
    F: Fn(usize) -> Option<Symbol>,
{
    let line_has_run = |cells: &mut dyn Iterator<Item = usize>| {
        let mut len = 0usize;
        let mut current = None;
        for i in cells {
            match lookup(i) {
                None => {
                    len = 0;
                    current = None;
                }
                Some(sym) if current == Some(sym) => {
                    len += 1;
                    if len >= MIN_RUN {
                        return true;
                    }
                }
                Some(sym) => {
                    len = 1;
                    current = Some(sym);
                }
            }
        }
        false
    };
    (0..grid.height()).any(|r| line_has_run(&mut grid.row_cells(r)))
        || (0..grid.width()).any(|c| line_has_run(&mut grid.col_cells(c)))
}

/// Whether swapping the symbols of `a` and `b` would produce a run
pub fn matches_after_swap(board: &Board, a: usize, b: usize) -> bool {
    has_match_by(board.grid(), |i| {
        let src = if i == a {
            b
        } else if i == b {
            a
        } else {
            i
        };
        // Obstacles never move; only symbols are exchanged.
        if board.is_blocked(i) {
            None
        } else {
            matchable(board, src)
        }
    })
}

/// Decide the removal set and special creations for a set of runs.
///
/// - a cell shared by two runs becomes an area bomb
/// - 5+ in a line becomes a colour clear at the run's third cell
/// - exactly 4 becomes a row/column clear at the first swapped cell inside
///   the run, otherwise at its second cell
///
/// When two runs pick the same cell the first one wins. Cells chosen for a
/// special are removed from the removal set.
pub fn plan_specials(runs: &[Run], swapped: &[usize]) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();
    if runs.is_empty() {
        return outcome;
    }

    let mut counts: HashMap<usize, u32> = HashMap::new();
    for run in runs {
        for &i in &run.cells {
            outcome.to_remove.insert(i);
            *counts.entry(i).or_insert(0) += 1;
        }
    }

    let mut taken = BTreeSet::new();
    for run in runs {
        let cross = run
            .cells
            .iter()
            .copied()
            .find(|i| counts.get(i).copied().unwrap_or(0) > 1);

        let plan = if let Some(index) = cross {
            Some(SpecialPlan {
                index,
                kind: SpecialKind::AreaBomb,
            })
        } else if run.len() >= 5 {
            Some(SpecialPlan {
                index: run.cells[2],
                kind: SpecialKind::ColorClear,
            })
        } else if run.len() == 4 {
            let index = swapped
                .iter()
                .copied()
                .find(|i| run.contains(*i))
                .unwrap_or(run.cells[1]);
            let kind = match run.orientation {
                Orientation::Horizontal => SpecialKind::RowClear,
                Orientation::Vertical => SpecialKind::ColClear,
            };
            Some(SpecialPlan { index, kind })
        } else {
            None
        };

        if let Some(plan) = plan {
            if taken.insert(plan.index) {
                outcome.to_remove.remove(&plan.index);
                outcome.specials.push(plan);
            }
        }
    }
    outcome
}
