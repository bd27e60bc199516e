//! Fixed-depth minimax over the move engine.
//!
//! No pruning and no move ordering: squares are tried in row-major order and
//! only a strictly better value replaces the current best, so ties go to the
//! earliest square.
//!
//! Every node starts from its side's bound and a child must beat that bound
//! to be chosen. A side whose every reply scores exactly the bound therefore
//! reports no square even though it has legal moves.

use crate::{Board, Side, Square};

/// Deepest ply index. Successors found at this depth are scored directly.
pub const MAX_DEPTH: u32 = 4;

/// Bound a node starts from: First searches down from `INFINITY`, Second up
/// from `-INFINITY`. A node without a legal move reports its bound.
pub const INFINITY: i32 = 0x3f3f3f3f;

/// Outcome of searching one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// Minimax value from Second's point of view.
    pub value: i32,
    /// Chosen square, or None when no legal move beat the node's bound.
    pub best: Option<Square>,
}

/// Counters collected while searching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes expanded (including the root)
    pub nodes: u64,
    /// Successors scored with the evaluation instead of expanded
    pub leaves: u64,
    /// Leaves cut off early because the game was over
    pub terminal_leaves: u64,
}

impl SearchStats {
    /// Fold another search's counters into this one.
    pub fn merge(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.leaves += other.leaves;
        self.terminal_leaves += other.terminal_leaves;
    }
}

/// Minimax driver that keeps node counters across searches.
#[derive(Debug, Default)]
pub struct Searcher {
    pub stats: SearchStats,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search `board` with `side` to move.
    pub fn search(&mut self, board: &Board, side: Side) -> SearchResult {
        self.minimax(board, side, 0)
    }

    fn minimax(&mut self, board: &Board, side: Side, depth: u32) -> SearchResult {
        self.stats.nodes += 1;

        let mut best_value = bound(side);
        let mut best_square = None;

        for square in Square::all() {
            let next = match board.apply_move(side, square) {
                Some(next) => next,
                None => continue,
            };

            let value = if depth == MAX_DEPTH {
                self.stats.leaves += 1;
                next.evaluate()
            } else if next.is_terminal() {
                self.stats.leaves += 1;
                self.stats.terminal_leaves += 1;
                next.evaluate()
            } else {
                self.minimax(&next, side.opposite(), depth + 1).value
            };

            let improves = match side {
                Side::First => value < best_value,
                Side::Second => value > best_value,
            };
            if improves {
                best_value = value;
                best_square = Some(square);
            }
        }

        SearchResult {
            value: best_value,
            best: best_square,
        }
    }
}

#[inline]
fn bound(side: Side) -> i32 {
    match side {
        Side::First => INFINITY,
        Side::Second => -INFINITY,
    }
}

/// Best square for `side`, or None when no legal move beat the bound.
pub fn best_move(board: &Board, side: Side) -> Option<Square> {
    Searcher::new().search(board, side).best
}
