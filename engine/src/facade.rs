//! The engine's single entry point: owns the transposition table and
//! history table across searches, translates a UCI time control into a
//! completed [`SearchReport`], and exposes a thread-safe way to abort a
//! search in flight.
//!
//! Everything below the facade — [`crate::search`], [`crate::position`] —
//! is single-threaded and synchronous; the only concurrency in this crate
//! is the stop flag shared with a [`StopHandle`] held by whatever thread
//! is reading the host's UCI input.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chess::piece::Color;
use uci::time_control::TimeControl;

use crate::history_tables::HistoryTable;
use crate::position::Position;
use crate::search::{ReportFn, SearchReport};
use crate::time_control::TimeController;
use crate::transpositions::TTable;

/// Minimum, default and maximum values for the `Hash` UCI option,
/// in megabytes.
pub const MIN_HASH_MB: usize = 1;
pub const DEFAULT_HASH_MB: usize = 16;
pub const MAX_HASH_MB: usize = 4096;

/// Configuration the facade is constructed with. Mirrors the options the
/// engine advertises over UCI: `Threads` is accepted but always pinned to
/// 1, since this engine's search is single-threaded.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub hash_mb: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { hash_mb: DEFAULT_HASH_MB }
    }
}

/// A cheaply-cloneable handle that lets another thread abort whatever
/// search is currently running on the [`Engine`] it was obtained from.
/// Safe to call `stop()` on even when no search is in flight; the flag is
/// simply cleared at the start of the next one.
#[derive(Debug, Clone)]
pub struct StopHandle {
    stop: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

/// Owns the tables that persist across searches within a game: the
/// transposition table and the history heuristic table. Killers and the
/// PV table live inside [`crate::search::Search`] instead, since they're
/// only meaningful within a single search.
pub struct Engine {
    tt: TTable,
    history: HistoryTable,
    stop: Arc<AtomicBool>,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self {
            tt: TTable::with_capacity_mb(config.hash_mb),
            history: HistoryTable::new(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Clear the transposition table and history table. Called on the
    /// UCI `ucinewgame` command: history from a previous, unrelated game
    /// has no business influencing this one.
    pub fn new_game(&mut self) {
        self.tt.clear();
        self.history = HistoryTable::new();
    }

    /// Reallocate the transposition table to a new size, clamped to
    /// [`MIN_HASH_MB`]..=[`MAX_HASH_MB`]. Corresponds to the UCI `setoption
    /// name Hash value <mb>` command.
    pub fn resize_tt(&mut self, mb: usize) {
        let mb = mb.clamp(MIN_HASH_MB, MAX_HASH_MB);
        self.tt = TTable::with_capacity_mb(mb);
    }

    /// A cloneable handle that can `stop()` the search started by the
    /// next call to [`Engine::find_best_move`], from any thread.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle { stop: self.stop.clone() }
    }

    /// Abort the currently running search, if any, equivalent to calling
    /// `stop()` on a handle obtained from [`Engine::stop_handle`].
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Run iterative deepening on `position` under `time_control`, aging
    /// the transposition table first so entries from the previous search
    /// are preferentially replaced. `on_iteration` is invoked once per
    /// completed depth, for UCI `info` reporting.
    ///
    /// Only one search may be in flight on a given `Engine` at a time;
    /// overlapping calls are undefined behavior, not a runtime error.
    pub fn find_best_move(
        &mut self,
        position: &Position,
        time_control: TimeControl,
        side: Color,
        on_iteration: &mut ReportFn,
    ) -> SearchReport {
        self.tt.increment_age();

        let mut controller = TimeController::with_stop_flag(time_control, side, self.stop.clone());

        position.search(&mut self.tt, &mut controller, &mut self.history, on_iteration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::board::Board;

    #[test]
    fn finds_mate_in_one() {
        let board: Board = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1".parse().unwrap();
        let pos = Position::new(board);

        let mut engine = Engine::new(Config::default());
        let report = engine.find_best_move(&pos, TimeControl::Depth(3), Color::White, &mut |_| {});

        assert!(!report.pv.is_empty());
    }

    #[test]
    fn new_game_clears_history_across_searches() {
        let board = Board::default();
        let pos = Position::new(board);

        let mut engine = Engine::new(Config::default());
        engine.find_best_move(&pos, TimeControl::Depth(4), Color::White, &mut |_| {});
        engine.new_game();

        // A fresh search after ucinewgame should still find a legal move;
        // this is mostly a smoke test that new_game doesn't leave the
        // engine in a broken state.
        let report = engine.find_best_move(&pos, TimeControl::Depth(2), Color::White, &mut |_| {});
        assert!(!report.pv.is_empty());
    }

    #[test]
    fn stop_handle_aborts_an_in_flight_search() {
        let board = Board::default();
        let pos = Position::new(board);

        let mut engine = Engine::new(Config::default());
        let handle = engine.stop_handle();
        handle.stop();

        // Stopping before the search even starts should still yield a
        // legal move from whatever partial work completes at depth 1.
        let report = engine.find_best_move(&pos, TimeControl::Depth(64), Color::White, &mut |_| {});
        assert!(report.pv.is_empty() || pos.legal_moves().contains(&report.pv[0]));
    }
}
