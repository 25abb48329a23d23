//! Translates a UCI time control into concrete soft/hard time budgets, and
//! answers the two questions the iterative deepening driver needs to ask:
//! "should the current search keep going?" and "is it worth starting
//! another, deeper iteration?"
//!
//! Unlike a move-stability-weighted soft-time model, this controller uses
//! a plain estimate: the next iteration is assumed to take roughly three
//! times as long as the last one, and a new iteration is only started if
//! that estimate still fits inside the soft time budget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chess::piece::Color;
use uci::time_control::TimeControl;

/// Safety margin subtracted from the raw clock time to leave room for UCI
/// I/O and move transmission.
const OVERHEAD: Duration = Duration::from_millis(20);

/// How many nodes pass between checks of the clock/stop-flag.
const CHECKUP_INTERVAL: u64 = 4096;

/// The factor by which the next iteration is assumed to be slower than the
/// last one, when deciding whether it's worth starting.
const NEXT_ITERATION_ESTIMATE_FACTOR: u32 = 3;

#[derive(Debug, Clone)]
pub struct TimeController {
    tc: TimeControl,
    start: Instant,
    soft_time: Duration,
    hard_time: Duration,
    stop: Arc<AtomicBool>,
    next_checkup: u64,
    last_iteration_duration: Duration,
}

/// A cheaply-cloneable handle that lets another thread (e.g. the UCI input
/// reader, on receiving `stop`) abort an in-progress search.
#[derive(Debug, Clone)]
pub struct TimeControlHandle {
    stop: Arc<AtomicBool>,
}

impl TimeControlHandle {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

impl TimeController {
    pub fn new(tc: TimeControl, side: Color) -> (Self, TimeControlHandle) {
        let stop = Arc::new(AtomicBool::new(false));
        let handle = TimeControlHandle { stop: stop.clone() };

        let controller = Self::with_stop_flag(tc, side, stop);

        (controller, handle)
    }

    /// Build a controller sharing an existing stop flag, rather than
    /// minting a fresh one. Used by the facade, whose [`StopHandle`] must
    /// stay valid across searches rather than being re-issued by each
    /// call to `find_best_move`. The flag is cleared here so a `stop()`
    /// from a previous search doesn't leak into this one.
    pub fn with_stop_flag(tc: TimeControl, side: Color, stop: Arc<AtomicBool>) -> Self {
        stop.store(false, Ordering::SeqCst);

        let (soft_time, hard_time) = Self::budgets(&tc, side);

        Self {
            tc,
            start: Instant::now(),
            soft_time,
            hard_time,
            stop,
            next_checkup: CHECKUP_INTERVAL,
            last_iteration_duration: Duration::ZERO,
        }
    }

    fn budgets(tc: &TimeControl, side: Color) -> (Duration, Duration) {
        match *tc {
            TimeControl::FixedTime(max_time) => {
                let hard = max_time.saturating_sub(OVERHEAD);
                (hard, hard)
            }

            TimeControl::Clock { wtime, btime, winc, binc, movestogo } => {
                let time = if side.is_white() { wtime } else { btime };
                let inc = (if side.is_white() { winc } else { binc }).unwrap_or_default();

                let allowed = time.saturating_sub(OVERHEAD);

                let base = if let Some(movestogo) = movestogo {
                    allowed / movestogo.max(1) + inc / 2
                } else {
                    allowed / 20 + inc / 2
                };

                let soft = base.min(allowed);
                let hard = (base * 3).min(allowed);
                (soft, hard)
            }

            // Depth/Nodes/Infinite time controls aren't bounded by a wall
            // clock; should_continue/should_start_iteration fall back to
            // those limits directly instead.
            _ => (Duration::MAX, Duration::MAX),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Called periodically from inside the search; returns false once the
    /// hard limit (or an external stop signal) has been hit.
    pub fn should_continue(&mut self, nodes: u64) -> bool {
        if nodes < self.next_checkup {
            return true;
        }

        self.next_checkup = nodes + CHECKUP_INTERVAL;

        if self.stopped() {
            return false;
        }

        match self.tc {
            TimeControl::Nodes(max_nodes) => nodes < max_nodes as u64,
            TimeControl::FixedTime(_) | TimeControl::Clock { .. } => self.elapsed() < self.hard_time,
            _ => true,
        }
    }

    /// Called between iterative deepening iterations. Depth/Nodes/Infinite
    /// controls defer entirely to their own counters; clock-based controls
    /// additionally require that the next iteration, estimated at
    /// [`NEXT_ITERATION_ESTIMATE_FACTOR`] times as long as the last one,
    /// still fits within the soft time budget.
    pub fn should_start_iteration(&self, depth: usize) -> bool {
        if depth <= 1 {
            return true;
        }

        if self.stopped() {
            return false;
        }

        match self.tc {
            TimeControl::Depth(max_depth) => depth <= max_depth,
            TimeControl::Nodes(_) => true,
            TimeControl::FixedTime(_) => self.elapsed() < self.soft_time,
            TimeControl::Clock { .. } => {
                let estimate = self.last_iteration_duration * NEXT_ITERATION_ESTIMATE_FACTOR;
                self.elapsed() + estimate < self.soft_time
            }
            TimeControl::Infinite => true,
        }
    }

    /// Record how long the iteration that just finished took, so the next
    /// call to `should_start_iteration` can use it for its estimate.
    pub fn record_iteration(&mut self, duration: Duration) {
        self.last_iteration_duration = duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_hard_and_soft_budgets_match() {
        let (tc, _handle) = TimeController::new(TimeControl::FixedTime(Duration::from_millis(1000)), Color::White);
        assert_eq!(tc.soft_time, tc.hard_time);
        assert_eq!(tc.hard_time, Duration::from_millis(980));
    }

    #[test]
    fn depth_one_always_starts() {
        let (tc, _handle) = TimeController::new(TimeControl::Depth(1), Color::White);
        assert!(tc.should_start_iteration(1));
    }

    #[test]
    fn external_stop_halts_iteration_and_continuation() {
        let (mut tc, handle) = TimeController::new(TimeControl::FixedTime(Duration::from_millis(1000)), Color::White);
        handle.stop();

        assert!(!tc.should_start_iteration(5));
        assert!(!tc.should_continue(CHECKUP_INTERVAL));
    }

    #[test]
    fn clock_control_skips_iteration_when_estimate_exceeds_soft_budget() {
        let (mut tc, _handle) = TimeController::new(
            TimeControl::Clock {
                wtime: Duration::from_millis(2000),
                btime: Duration::from_millis(2000),
                winc: None,
                binc: None,
                movestogo: None,
            },
            Color::White,
        );

        tc.record_iteration(tc.soft_time);
        assert!(!tc.should_start_iteration(5));
    }
}
