//! Randomized invariant checks
//!
//! Plays seeded random games and checks, at every position reached:
//! - legal-move count agrees with a direct scan of `is_legal`
//! - terminal iff neither side has a move
//! - a legal move adds exactly one disc, never shrinks the mover and never
//!   grows the opponent
//! - empty squares are never fixed
//! - the text encoding round-trips bit for bit

use othello_core::{Board, Side, Square};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GAMES: u64 = 40;

fn check_position(board: &Board) {
    for side in Side::all() {
        let scanned = Square::all().filter(|&sq| board.is_legal(side, sq)).count() as u32;
        assert_eq!(board.count_legal_moves(side), scanned);
        assert_eq!(board.legal_moves(side).len() as u32, scanned);

        for square in board.legal_moves(side).iter() {
            let next = board.apply_move(side, square).expect("listed move is legal");
            let total = |b: &Board| b.piece_count(Side::First) + b.piece_count(Side::Second);
            assert_eq!(total(&next), total(board) + 1);
            assert!(next.piece_count(side) > board.piece_count(side));
            assert!(next.piece_count(side.opposite()) < board.piece_count(side.opposite()));
            assert!(next.occupied_by(side, square));
            let (first, second) = next.masks();
            assert_eq!(first & second, 0);
        }
    }

    assert_eq!(
        board.is_terminal(),
        board.count_legal_moves(Side::First) == 0 && board.count_legal_moves(Side::Second) == 0
    );

    for square in Square::all() {
        if board.is_empty(square) {
            assert!(!board.is_stable(square));
        }
    }

    assert_eq!(Board::from_encoding(&board.to_encoding()), Ok(*board));
}

#[test]
fn test_random_games_hold_invariants() {
    for seed in 0..GAMES {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::initial();
        let mut side = Side::First;

        while !board.is_terminal() {
            check_position(&board);

            let moves = board.legal_moves(side);
            if moves.is_empty() {
                side = side.opposite();
                continue;
            }
            let pick = moves.iter().nth(rng.random_range(0..moves.len())).unwrap();
            board = board.apply_move(side, pick).unwrap();
            side = side.opposite();
        }

        check_position(&board);
    }
}

#[test]
fn test_random_boards_round_trip() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let first: u64 = rng.random();
        let second: u64 = rng.random::<u64>() & !first;
        let board = Board::from_masks(first, second).unwrap();
        assert_eq!(Board::from_encoding(&board.to_encoding()).unwrap().masks(), (first, second));
        check_position(&board);
    }
}
