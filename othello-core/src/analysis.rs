//! Position analysis: mobility, terminal detection, fixed discs and the
//! heuristic evaluation used at search leaves.

use crate::{Board, Side, Square};

/// Upper bound on legal moves: one per square.
pub const MAX_MOVES: usize = 64;

/// Score per corner held.
pub const CORNER_WEIGHT: i32 = 10;
/// Score per fixed disc held.
pub const STABLE_WEIGHT: i32 = 2;
/// Multiplier on the disc differential of a finished game.
pub const TERMINAL_SCALE: i32 = 1000;

/// (0,0), (0,7), (7,0), (7,7).
pub const CORNERS: [Square; 4] = [
    Square::from_row_col(0, 0),
    Square::from_row_col(0, 7),
    Square::from_row_col(7, 0),
    Square::from_row_col(7, 7),
];

/// A fixed-size move list that avoids heap allocation.
#[derive(Clone, Copy)]
pub struct MoveList {
    moves: [Square; MAX_MOVES],
    len: u8,
}

impl MoveList {
    /// Create an empty move list.
    #[inline]
    pub const fn new() -> MoveList {
        MoveList {
            moves: [Square::from_row_col(0, 0); MAX_MOVES],
            len: 0,
        }
    }

    /// Add a move to the list.
    #[inline]
    pub fn push(&mut self, square: Square) {
        debug_assert!((self.len as usize) < MAX_MOVES);
        self.moves[self.len as usize] = square;
        self.len += 1;
    }

    /// Get the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Check if empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check whether `square` is in the list.
    pub fn contains(&self, square: Square) -> bool {
        self.iter().any(|m| m == square)
    }

    /// Iterate over moves.
    pub fn iter(&self) -> impl Iterator<Item = Square> + '_ {
        self.moves[..self.len as usize].iter().copied()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Mask with bits `lo..=hi` set (hi < 64).
#[inline]
fn span(lo: u32, hi: u32) -> u64 {
    let upper = if hi == 63 { u64::MAX } else { (1u64 << (hi + 1)) - 1 };
    upper & !((1u64 << lo) - 1)
}

/// Mask of the rectangle rows `r0..=r1` × cols `c0..=c1`.
#[inline]
fn rectangle(r0: u8, r1: u8, c0: u8, c1: u8) -> u64 {
    const FILE_A: u64 = 0x0101_0101_0101_0101;
    let rows = span(r0 as u32 * 8, r1 as u32 * 8 + 7);
    let cols = span(c0 as u32, c1 as u32) * FILE_A;
    rows & cols
}

impl Board {
    /// All squares where `side` may play, in row-major order.
    pub fn legal_moves(&self, side: Side) -> MoveList {
        let mut moves = MoveList::new();
        for square in Square::all() {
            if self.is_legal(side, square) {
                moves.push(square);
            }
        }
        moves
    }

    /// Number of squares where `side` may play.
    pub fn count_legal_moves(&self, side: Side) -> u32 {
        Square::all().filter(|&sq| self.is_legal(side, sq)).count() as u32
    }

    /// Check if neither side can move.
    ///
    /// A board with empty squares can still be terminal, and a side without a
    /// move does not end the game while the other side has one.
    pub fn is_terminal(&self) -> bool {
        self.count_legal_moves(Side::First) == 0 && self.count_legal_moves(Side::Second) == 0
    }

    /// Check whether the disc on `square` is fixed.
    ///
    /// A disc is fixed when one of the four rectangles spanning from it to a
    /// board corner is entirely held by the disc's owner. Empty squares are
    /// never fixed.
    pub fn is_stable(&self, square: Square) -> bool {
        let owner = match self.owner(square) {
            Some(side) => self.mask(side),
            None => return false,
        };

        let (r, c) = (square.row(), square.col());
        [
            rectangle(0, r, 0, c),
            rectangle(0, r, c, 7),
            rectangle(r, 7, 0, c),
            rectangle(r, 7, c, 7),
        ]
        .iter()
        .any(|&rect| owner & rect == rect)
    }

    /// Heuristic value of the position for `side`.
    ///
    /// Mobility + 10 per corner + 2 per fixed disc.
    pub fn positional_score(&self, side: Side) -> i32 {
        let mut value = self.count_legal_moves(side) as i32;

        for &corner in &CORNERS {
            if self.occupied_by(side, corner) {
                value += CORNER_WEIGHT;
            }
        }

        for square in Square::all() {
            if self.occupied_by(side, square) && self.is_stable(square) {
                value += STABLE_WEIGHT;
            }
        }

        value
    }

    /// Evaluation from Second's point of view.
    ///
    /// Finished games score the scaled disc differential; anything else
    /// scores the positional difference.
    pub fn evaluate(&self) -> i32 {
        if self.is_terminal() {
            let first = self.piece_count(Side::First) as i32;
            let second = self.piece_count(Side::Second) as i32;
            TERMINAL_SCALE * (second - first)
        } else {
            self.positional_score(Side::Second) - self.positional_score(Side::First)
        }
    }
}
