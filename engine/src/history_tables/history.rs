//! The quiet-move history table: for every `(side, piece type, from, to)`
//! combination, a running score of how often that move has caused a beta
//! cutoff elsewhere in the tree.
//!
//! History tables are the least precise of the three move-ordering
//! sources (transposition table, killers, history): they aren't even tied
//! to the current node, just to "this kind of move has worked well
//! somewhere in this search".

use std::ops::{Index, IndexMut};

use chess::board::Board;
use chess::movegen::moves::Move;
use chess::piece::{Color, PieceType};
use chess::square::Square;

pub type HistoryScore = i32;

const MAX_HISTORY: HistoryScore = 16_384;
const CEILING_FRACTION: HistoryScore = (MAX_HISTORY * 9) / 10;

/// Index into a [`HistoryTable`]: side to move, the moving piece's type,
/// and its source and target squares.
#[derive(Debug, Copy, Clone)]
pub struct HistoryIndex {
    side: Color,
    piece_type: PieceType,
    from: Square,
    to: Square,
}

impl HistoryIndex {
    pub fn new(board: &Board, mv: Move) -> Self {
        let piece = board.get_at(mv.src()).expect("move source square must hold a piece");

        Self {
            side: piece.color(),
            piece_type: piece.piece_type(),
            from: mv.src(),
            to: mv.tgt(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryTable {
    scores: Box<[[[[HistoryScore; Square::COUNT]; Square::COUNT]; PieceType::COUNT]; Color::COUNT]>,
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            scores: Box::new([[[[0; Square::COUNT]; Square::COUNT]; PieceType::COUNT]; Color::COUNT]),
        }
    }

    /// The bonus awarded to the move that caused the cutoff: `depth²`.
    pub fn bonus(depth: usize) -> HistoryScore {
        (depth * depth) as HistoryScore
    }

    /// The penalty applied to quiet moves that were tried and failed to
    /// cause a cutoff before the move that did: `⌊depth / 2⌋`.
    pub fn penalty(depth: usize) -> HistoryScore {
        (depth / 2) as HistoryScore
    }

    /// Apply a signed adjustment to an entry, halving every entry in the
    /// table once any single entry would cross 90% of the representable
    /// range.
    pub fn update(&mut self, index: HistoryIndex, delta: HistoryScore) {
        let entry = &mut self[index];
        *entry = (*entry + delta).clamp(0, MAX_HISTORY);

        if *entry >= CEILING_FRACTION {
            self.halve_all();
        }
    }

    fn halve_all(&mut self) {
        for side in &mut *self.scores {
            for piece in &mut *side {
                for from in &mut *piece {
                    for to in from.iter_mut() {
                        *to /= 2;
                    }
                }
            }
        }
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<HistoryIndex> for HistoryTable {
    type Output = HistoryScore;

    fn index(&self, index: HistoryIndex) -> &Self::Output {
        &self.scores[index.side as usize][index.piece_type as usize][index.from as usize][index.to as usize]
    }
}

impl IndexMut<HistoryIndex> for HistoryTable {
    fn index_mut(&mut self, index: HistoryIndex) -> &mut Self::Output {
        &mut self.scores[index.side as usize][index.piece_type as usize][index.from as usize][index.to as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::movegen::moves::MoveType;

    #[test]
    fn fresh_table_scores_everything_zero() {
        let table = HistoryTable::new();
        let board = Board::default();
        let mv = Move::new(Square::E2, Square::E4, MoveType::DoublePush);

        assert_eq!(table[HistoryIndex::new(&board, mv)], 0);
    }

    #[test]
    fn update_accumulates_bonus() {
        let mut table = HistoryTable::new();
        let board = Board::default();
        let mv = Move::new(Square::G1, Square::F3, MoveType::Quiet);
        let idx = HistoryIndex::new(&board, mv);

        table.update(idx, HistoryTable::bonus(4));

        assert_eq!(table[idx], 16);
    }

    #[test]
    fn penalty_reduces_the_score() {
        let mut table = HistoryTable::new();
        let board = Board::default();
        let mv = Move::new(Square::G1, Square::F3, MoveType::Quiet);
        let idx = HistoryIndex::new(&board, mv);

        table.update(idx, HistoryTable::bonus(6));
        table.update(idx, -HistoryTable::penalty(6));

        assert_eq!(table[idx], 36 - 3);
    }

    #[test]
    fn crossing_the_ceiling_halves_every_entry() {
        let mut table = HistoryTable::new();
        let board = Board::default();
        let mv_a = Move::new(Square::G1, Square::F3, MoveType::Quiet);
        let mv_b = Move::new(Square::B1, Square::C3, MoveType::Quiet);

        let idx_a = HistoryIndex::new(&board, mv_a);
        let idx_b = HistoryIndex::new(&board, mv_b);

        table.update(idx_b, 500);
        table.update(idx_a, CEILING_FRACTION);

        assert_eq!(table[idx_b], 250);
    }
}
