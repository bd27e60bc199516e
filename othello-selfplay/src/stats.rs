//! Self-play statistics tracking.

use std::time::{Duration, Instant};

use othello_core::{SearchStats, Side};

/// Statistics collected over one game.
#[derive(Debug, Default)]
pub struct SelfPlayStats {
    /// Moves played by each side
    pub first_moves: u64,
    pub second_moves: u64,

    /// Turns skipped because the side to move had no legal move
    pub passes: u64,

    /// Search counters summed over every move
    pub search: SearchStats,

    /// Slowest single search
    pub slowest_move: Duration,

    /// Time spent searching
    pub search_time: Duration,

    start_time: Option<Instant>,
}

impl SelfPlayStats {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Record one searched move
    pub fn record_move(&mut self, side: Side, search: &SearchStats, elapsed: Duration) {
        match side {
            Side::First => self.first_moves += 1,
            Side::Second => self.second_moves += 1,
        }
        self.search.merge(search);
        self.search_time += elapsed;
        if elapsed > self.slowest_move {
            self.slowest_move = elapsed;
        }
    }

    pub fn record_pass(&mut self) {
        self.passes += 1;
    }

    pub fn moves(&self) -> u64 {
        self.first_moves + self.second_moves
    }

    /// Get search nodes per second
    pub fn nodes_per_sec(&self) -> f64 {
        let secs = self.search_time.as_secs_f64();
        if secs > 0.0 {
            self.search.nodes as f64 / secs
        } else {
            0.0
        }
    }

    /// Print final summary
    pub fn print_summary(&self) {
        println!("Moves played: {}", self.moves());
        println!("  - First: {}", self.first_moves);
        println!("  - Second: {}", self.second_moves);
        println!("Passes: {}", self.passes);
        println!("Nodes searched: {}", self.search.nodes);
        println!("Leaves evaluated: {}", self.search.leaves);
        println!("  - Game over: {}", self.search.terminal_leaves);
        println!("Search time: {:.2}s", self.search_time.as_secs_f64());
        println!("Slowest move: {:.3}s", self.slowest_move.as_secs_f64());

        if let Some(start) = self.start_time {
            println!("Wall time: {:.2}s", start.elapsed().as_secs_f64());
        }
        println!("Average rate: {:.0} nodes/sec", self.nodes_per_sec());
    }
}
