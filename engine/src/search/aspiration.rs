//! Aspiration windows: instead of searching each iterative-deepening
//! depth with the full `[-inf, +inf]` window, start from a narrow window
//! centered on the previous iteration's score. A narrower window prunes
//! more aggressively, so a correct guess pays for itself in saved nodes;
//! a wrong one is detected by a fail-low or fail-high and re-searched
//! with a wider window.

use crate::history_tables::PVTable;
use crate::position::Position;
use crate::score::{Score, ScoreExt};

use super::params::*;
use super::Search;

impl Position {
    /// Search `depth`, widening the aspiration window around `guess`
    /// (the previous iteration's score) until the result falls strictly
    /// inside the window.
    pub(super) fn aspiration_search(
        &self,
        depth: usize,
        guess: Score,
        pv: &mut PVTable,
        search: &mut Search,
    ) -> Score {
        let mut alpha = Score::MINUS_INF;
        let mut beta = Score::PLUS_INF;
        let mut width = ASPIRATION_BASE_WINDOW;

        if depth >= ASPIRATION_MIN_DEPTH {
            alpha = guess.saturating_sub(width).max(Score::MINUS_INF);
            beta = guess.saturating_add(width).min(Score::PLUS_INF);
        }

        loop {
            let score = search.negamax::<true>(self, 0, depth, alpha, beta, pv, false);

            if search.aborted() {
                return Score::MINUS_INF;
            }

            if score <= alpha {
                // Fail-low: the true score is at or below alpha. Widen
                // downward, and pull beta in too, since we now know the
                // position isn't as good as `guess` suggested.
                alpha = (alpha - width).max(Score::MINUS_INF);
                beta = (alpha + beta) / 2;
            } else if score >= beta {
                // Fail-high: widen upward.
                beta = (beta + width).min(Score::PLUS_INF);
            } else {
                return score;
            }

            width *= 2;

            if width > ASPIRATION_MAX_WINDOW {
                alpha = Score::MINUS_INF;
                beta = Score::PLUS_INF;
            }
        }
    }
}
