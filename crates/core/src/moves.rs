//! Moves module - valid-move search, forced moves and reshuffling

use log::warn;

use crate::board::Board;
use crate::matcher::{find_matches, has_match, matches_after_swap};
use crate::rng::RandomSource;
use crate::types::{SpecialKind, Symbol, FORCE_MOVE_ATTEMPTS};

/// Whether swapping `a` and `b` is a productive move on this board.
///
/// Any pair touching a special tile counts; otherwise the swap must create
/// a run. Both cells must be obstacle-free.
pub fn is_productive_swap(board: &Board, a: usize, b: usize) -> bool {
    if board.is_blocked(a) || board.is_blocked(b) {
        return false;
    }
    if board.special(a).is_some() || board.special(b).is_some() {
        return true;
    }
    matches_after_swap(board, a, b)
}

/// Orthogonally adjacent obstacle-free pairs, row-major, right before down
fn candidate_pairs(board: &Board) -> impl Iterator<Item = (usize, usize)> + '_ {
    let grid = board.grid();
    (0..grid.len())
        .filter(move |&i| !board.is_blocked(i))
        .flat_map(move |i| {
            let right = grid.offset(i, 0, 1);
            let down = grid.offset(i, 1, 0);
            [right, down]
                .into_iter()
                .flatten()
                .filter(move |&j| !board.is_blocked(j))
                .map(move |j| (i, j))
        })
}

/// First productive swap in scan order
pub fn find_valid_move(board: &Board) -> Option<(usize, usize)> {
    candidate_pairs(board).find(|&(a, b)| is_productive_swap(board, a, b))
}

/// Every productive swap
pub fn valid_moves(board: &Board) -> Vec<(usize, usize)> {
    candidate_pairs(board)
        .filter(|&(a, b)| is_productive_swap(board, a, b))
        .collect()
}

pub fn has_valid_moves(board: &Board) -> bool {
    find_valid_move(board).is_some()
}

/// Plant a three-in-a-line from a random anchor until a valid move exists.
///
/// Best effort: gives up after `FORCE_MOVE_ATTEMPTS` anchors. Returns whether
/// the board has a valid move afterwards.
pub fn force_valid_move<R: RandomSource>(board: &mut Board, rng: &mut R) -> bool {
    let free = board.free_cells();
    if free.len() < 3 {
        return has_valid_moves(board);
    }
    let grid = board.grid();

    for _ in 0..FORCE_MOVE_ATTEMPTS {
        let Some(&anchor) = rng.pick(&free) else {
            break;
        };
        let symbol = board.symbol(anchor);
        for (dr, dc) in [(0, 1), (1, 0)] {
            let first = grid.offset(anchor, dr, dc);
            let second = grid.offset(anchor, dr * 2, dc * 2);
            let (Some(first), Some(second)) = (first, second) else {
                continue;
            };
            if board.is_blocked(first) || board.is_blocked(second) {
                continue;
            }
            for target in [first, second] {
                board.set_symbol(target, symbol);
                board.set_special(target, None);
            }
            if has_valid_moves(board) {
                return true;
            }
        }
    }
    warn!("force_valid_move: retry budget exhausted without a valid move");
    has_valid_moves(board)
}

/// Randomly permute (symbol, special) pairs over the obstacle-free cells
pub fn shuffle_tiles<R: RandomSource>(board: &mut Board, rng: &mut R) {
    let cells = board.free_cells();
    let mut tiles: Vec<(Option<Symbol>, Option<SpecialKind>)> = cells
        .iter()
        .map(|&i| (board.symbol(i), board.special(i)))
        .collect();
    rng.shuffle(&mut tiles);
    for (&i, (symbol, special)) in cells.iter().zip(tiles) {
        board.set_symbol(i, symbol);
        board.set_special(i, special);
    }
}

/// Re-roll every cell that is part of a run, up to `passes` times.
///
/// Returns true when the board ends without runs.
pub fn reroll_matches<R: RandomSource>(
    board: &mut Board,
    rng: &mut R,
    symbol_count: usize,
    passes: u32,
) -> bool {
    for _ in 0..passes {
        let runs = find_matches(board);
        if runs.is_empty() {
            return true;
        }
        for run in runs {
            for i in run.cells {
                board.set_symbol(i, Some(Symbol(rng.next_index(symbol_count) as u8)));
            }
        }
    }
    !has_match(board)
}
