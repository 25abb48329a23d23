//! A thin wrapper around [`Search::negamax`] that searches with a
//! one-point-wide window `[value - 1, value]`.
//!
//! This is the "null window" probe used both by the zero-window moves in
//! principal-variation search and by null-move pruning: the caller only
//! wants to know whether the true score is above or below `value`, not
//! its exact value, so a window of width one is enough to get a
//! fail-high/fail-low answer cheaply.

use crate::history_tables::PVTable;
use crate::position::Position;
use crate::score::Score;

use super::Search;

impl<'a> Search<'a> {
    pub fn zero_window(
        &mut self,
        pos: &Position,
        ply: usize,
        depth: usize,
        value: Score,
        pv: &mut PVTable,
        try_null: bool,
    ) -> Score {
        self.negamax::<false>(pos, ply, depth, value - 1, value, pv, try_null)
    }
}
