//! The search logic for the corvus engine core.
//!
//! The main entry point performs iterative deepening: incrementally
//! deeper negamax searches with alpha-beta pruning, each one reusing the
//! transposition table and history tables populated by the previous
//! iteration to speed up its own search. Each iteration's leaves are
//! extended with a quiescence search so the static evaluation is never
//! trusted in the middle of a sequence of captures.

use std::time::{Duration, Instant};

use chess::movegen::moves::Move;
use uci::search_info::{Score as UciScore, SearchInfo};

use crate::history_tables::{HistoryTable, Killers, PVTable};
use crate::position::Position;
use crate::score::{Score, ScoreExt};
use crate::time_control::TimeController;
use crate::transpositions::TTable;

pub mod params;
mod aspiration;
mod negamax;
mod quiescence;
mod zero_window;

pub use params::MAX_DEPTH;

/// Per-ply scratch space shared across recursive calls within a single
/// search.
#[derive(Debug, Copy, Clone, Default)]
struct SearchStackEntry {
    eval: Score,
}

/// Holds the mutable state threaded through one iterative-deepening
/// search: counters, the history tables, and the handle to check whether
/// time has run out.
pub struct Search<'a> {
    pub depth: usize,
    pub seldepth: usize,
    pub nodes: u64,
    pub qnodes: u64,
    pub tt_hits: u64,
    pub tt_misses: u64,
    pub beta_cutoffs: u64,

    pub tt: &'a mut TTable,
    pub tc: &'a mut TimeController,
    /// Borrowed from the facade: the history table persists across root
    /// searches within a game, unlike killers, which are reset below.
    pub history: &'a mut HistoryTable,
    pub killers: [Killers; MAX_DEPTH],

    aborted: bool,
    stack: [SearchStackEntry; MAX_DEPTH],
}

impl<'a> Search<'a> {
    pub fn new(tt: &'a mut TTable, tc: &'a mut TimeController, history: &'a mut HistoryTable) -> Self {
        Self {
            depth: 1,
            seldepth: 0,
            nodes: 0,
            qnodes: 0,
            tt_hits: 0,
            tt_misses: 0,
            beta_cutoffs: 0,
            tt,
            tc,
            history,
            killers: [Killers::new(); MAX_DEPTH],
            aborted: false,
            stack: [SearchStackEntry::default(); MAX_DEPTH],
        }
    }

    fn clear_killers_at(&mut self, ply: usize) {
        if ply < MAX_DEPTH {
            self.killers[ply] = Killers::new();
        }
    }
}

/// Statistics and result from a completed (or aborted-but-partial)
/// iterative deepening search.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub depth: u8,
    pub seldepth: u8,
    pub nodes: u64,
    pub qnodes: u64,
    pub tt_hits: u64,
    pub tt_misses: u64,
    pub beta_cutoffs: u64,
    pub duration: Duration,
    pub score: Score,
    pub pv: Vec<Move>,
    pub hashfull: u32,
}

impl Default for SearchReport {
    fn default() -> Self {
        Self {
            depth: 0,
            seldepth: 0,
            nodes: 0,
            qnodes: 0,
            tt_hits: 0,
            tt_misses: 0,
            beta_cutoffs: 0,
            duration: Duration::ZERO,
            score: 0,
            pv: Vec::new(),
            hashfull: 0,
        }
    }
}

impl SearchReport {
    fn new(search: &Search, pv: &PVTable, score: Score, duration: Duration) -> Self {
        Self {
            depth: search.depth as u8,
            seldepth: search.seldepth as u8,
            nodes: search.nodes,
            qnodes: search.qnodes,
            tt_hits: search.tt_hits,
            tt_misses: search.tt_misses,
            beta_cutoffs: search.beta_cutoffs,
            duration,
            score,
            pv: pv.moves().to_vec(),
            hashfull: search.tt.occupancy(),
        }
    }
}

trait ScoreUciExt {
    fn to_uci_score(self) -> UciScore;
}

impl ScoreUciExt for Score {
    fn to_uci_score(self) -> UciScore {
        if self.is_mate() {
            UciScore::Mate(self.signum() * (self.mate_distance() + 1) / 2)
        } else {
            UciScore::Cp(self)
        }
    }
}

impl From<&SearchReport> for SearchInfo {
    fn from(report: &SearchReport) -> Self {
        let nps = (1_000_000 * report.nodes)
            .checked_div(report.duration.as_micros().max(1) as u64)
            .unwrap_or_default();

        Self {
            depth: Some(report.depth),
            seldepth: Some(report.seldepth),
            time: Some(report.duration.as_millis() as u64),
            nodes: Some(report.nodes as u32),
            score: Some(report.score.to_uci_score()),
            pv: report.pv.clone(),
            hashfull: Some(report.hashfull),
            nps: Some(nps),
            currmove: None,
            currmovenumber: None,
        }
    }
}

/// Called once per completed iteration, for UCI reporting or interactive
/// debugging. `report` reflects the iteration that just finished.
pub type ReportFn<'a> = dyn FnMut(&SearchReport) + 'a;

impl Position {
    /// Run iterative deepening, calling `on_iteration` after every
    /// completed depth, and returning the result of the last iteration
    /// that finished before time ran out (or before reaching
    /// [`MAX_DEPTH`]).
    pub fn search(
        &self,
        tt: &mut TTable,
        tc: &mut TimeController,
        history: &mut HistoryTable,
        on_iteration: &mut ReportFn,
    ) -> SearchReport {
        let mut latest_report = SearchReport::default();
        let mut pv = PVTable::new();

        let mut search = Search::new(tt, tc, history);

        while search.depth <= MAX_DEPTH && search.tc.should_start_iteration(search.depth) {
            let iteration_start = Instant::now();
            pv.clear();

            let score = self.aspiration_search(search.depth, latest_report.score, &mut pv, &mut search);

            if search.aborted {
                break;
            }

            let duration = search.tc.elapsed();
            latest_report = SearchReport::new(&search, &pv, score, duration);
            on_iteration(&latest_report);

            if latest_report.score.is_mate() {
                break;
            }

            search.tc.record_iteration(iteration_start.elapsed());
            search.depth += 1;
        }

        latest_report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::board::Board;
    use chess::piece::Color;
    use uci::time_control::TimeControl;

    #[test]
    fn finds_mate_in_one() {
        // White mates immediately with Ra1-a8#: the back rank is sealed by
        // black's own f7/g7/h7 pawns.
        let board: Board = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1".parse().unwrap();
        let pos = Position::new(board);

        let mut tt = TTable::with_capacity_mb(1);
        let mut history = HistoryTable::new();
        let (mut tc, _handle) = TimeController::new(TimeControl::Depth(3), Color::White);

        let report = pos.search(&mut tt, &mut tc, &mut history, &mut |_| {});

        assert!(report.score.is_mate());
        assert!(!report.pv.is_empty());
    }

    #[test]
    fn search_result_is_always_a_legal_move() {
        let board = Board::default();
        let pos = Position::new(board);

        let mut tt = TTable::with_capacity_mb(1);
        let mut history = HistoryTable::new();
        let (mut tc, _handle) = TimeController::new(TimeControl::Depth(3), Color::White);

        let report = pos.search(&mut tt, &mut tc, &mut history, &mut |_| {});
        let legal = pos.legal_moves();

        assert!(!report.pv.is_empty());
        assert!(legal.contains(&report.pv[0]));
    }
}
