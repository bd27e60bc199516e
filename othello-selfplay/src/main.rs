//! Othello Self-Play
//!
//! Plays move-selection strategies against each other (minimax on both sides
//! by default) and reports search statistics.

mod stats;

use std::env;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use othello_core::{
    Board, Game, Outcome, SearchStats, Searcher, Side, Square, Strategy, MAX_DEPTH,
};

use crate::stats::SelfPlayStats;

/// Value following `flag` on the command line.
fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Starting position from `--board` / `--turn`, or the standard opening.
fn starting_game(args: &[String]) -> Result<Game, String> {
    let turn = match arg_value(args, "--turn") {
        Some(flag) => {
            let flag: i32 = flag
                .parse()
                .map_err(|_| format!("invalid --turn value: {}", flag))?;
            Side::from_turn_flag(flag)
        }
        None => Side::First,
    };

    match arg_value(args, "--board") {
        Some(encoded) => {
            let board = Board::from_encoding(encoded).map_err(|e| format!("invalid --board: {}", e))?;
            Ok(Game::from_position(board, turn))
        }
        None => Ok(Game::from_position(Board::initial(), turn)),
    }
}

/// Strategy for one side from `flag`, minimax when absent.
fn strategy_arg(args: &[String], flag: &str) -> Result<Strategy, String> {
    match arg_value(args, flag) {
        Some(name) => name.parse().map_err(|e| format!("invalid {}: {}", flag, e)),
        None => Ok(Strategy::Minimax),
    }
}

/// Pick a square for `side`, counting search nodes when minimax runs.
fn choose(strategy: Strategy, board: &Board, side: Side) -> (Option<Square>, Option<i32>, SearchStats) {
    match strategy {
        Strategy::Minimax => {
            let mut searcher = Searcher::new();
            let result = searcher.search(board, side);
            (result.best, Some(result.value), searcher.stats)
        }
        _ => (strategy.choose(board, side), None, SearchStats::default()),
    }
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::First => "First (B)",
        Side::Second => "Second (W)",
    }
}

fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let quiet = args.contains(&"--quiet".to_string());

    let setup = starting_game(&args).and_then(|game| {
        let first = strategy_arg(&args, "--first")?;
        let second = strategy_arg(&args, "--second")?;
        Ok((game, first, second))
    });
    let (mut game, first_strategy, second_strategy) = match setup {
        Ok(setup) => setup,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let strategy_for = |side: Side| match side {
        Side::First => first_strategy,
        Side::Second => second_strategy,
    };

    println!("Othello Self-Play");
    println!("=================");
    println!("First: {}", first_strategy);
    println!("Second: {}", second_strategy);
    println!("Search depth: {} plies", MAX_DEPTH + 1);
    println!();

    // Set up SIGINT handler: finish the current move, then stop
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!("\n\nInterrupt received, stopping after this move...");
        r.store(false, Ordering::SeqCst);
    }) {
        eprintln!("Warning: could not set Ctrl-C handler: {}", e);
    }

    if !quiet {
        println!("{}", game.board());
    }

    let mut stats = SelfPlayStats::new();

    while !game.is_over() && running.load(Ordering::SeqCst) {
        let side = game.turn();
        let strategy = strategy_for(side);

        let start = Instant::now();
        let (best, value, search) = choose(strategy, game.board(), side);
        let elapsed = start.elapsed();

        let square = match best {
            Some(square) => square,
            None if game.board().count_legal_moves(side) == 0 => {
                // Only reachable from a supplied position where the side to
                // move is stuck
                println!("{} has no legal move and passes", side_name(side));
                stats.record_pass();
                game = Game::from_position(*game.board(), side.opposite());
                continue;
            }
            None => {
                println!(
                    "{} ({}) found no move to play; stopping",
                    side_name(side),
                    strategy
                );
                break;
            }
        };

        stats.record_move(side, &search, elapsed);

        let passed = match game.play(square) {
            Ok(passed) => passed,
            Err(e) => {
                eprintln!("Error: {} chose {}: {}", strategy, square, e);
                process::exit(1);
            }
        };

        if !quiet {
            let value = value.map_or_else(String::new, |v| format!("value {}, ", v));
            println!(
                "Move {}: {} plays {} ({}{} nodes, {:.3}s)",
                stats.moves(),
                side_name(side),
                square,
                value,
                search.nodes,
                elapsed.as_secs_f64()
            );
            println!("{}", game.board());
        }

        if let Some(stuck) = passed {
            if !game.is_over() {
                println!("{} has no legal move and passes", side_name(stuck));
                stats.record_pass();
            }
        }
    }

    let (first, second) = game.counts();

    println!("\n=================");
    println!("Final position");
    println!("=================");
    println!("{}", game.board());
    println!("Discs: First {} - Second {}", first, second);
    println!();
    stats.print_summary();

    match game.outcome() {
        Outcome::FirstWins => println!("\nFirst wins."),
        Outcome::SecondWins => println!("\nSecond wins."),
        Outcome::Draw => println!("\nGame is a draw."),
        Outcome::Ongoing => println!("\nGame stopped before completion."),
    }
}
