//! A `Position` pairs a [`Board`] with its incrementally-maintained
//! [`ZHash`] and enough move history to detect repetitions.
//!
//! The negamax core never mutates a `Board` in place; `play_move` returns
//! a new, independent `Position` rather than applying the move in place.
//! The parent's `Position` is left untouched, which is this crate's
//! equivalent of "unmake" — there's nothing to undo, the caller just
//! keeps holding onto its own copy.

use arrayvec::ArrayVec;
use chess::board::Board;
use chess::movegen::moves::Move;
use chess::piece::Color;

use crate::zobrist::ZHash;

/// How many previous hashes we keep around for repetition detection. This
/// comfortably covers any realistic single game.
const HISTORY_CAP: usize = 512;

#[derive(Debug, Clone)]
pub struct Position {
    pub board: Board,
    pub hash: ZHash,
    history: ArrayVec<ZHash, HISTORY_CAP>,
}

impl Position {
    pub fn new(board: Board) -> Self {
        Self {
            hash: ZHash::of(&board),
            board,
            history: ArrayVec::new(),
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.board.current
    }

    pub fn in_check(&self) -> bool {
        self.board.in_check()
    }

    /// Legal, fully quiet-and-tactical move generation.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.legal_moves::<true>()
    }

    /// Captures, en passant and promotions only — used by quiescence
    /// search.
    pub fn tactical_moves(&self) -> Vec<Move> {
        self.board.legal_moves::<false>()
    }

    /// Play a move, returning the resulting position. The incremental hash
    /// is simply recomputed off of the freshly-played board: the `chess`
    /// crate doesn't expose an incremental hash update of its own, so we
    /// fold the (tested) from-scratch Zobrist computation in here rather
    /// than hand-roll a second, harder-to-verify incremental path.
    pub fn play_move(&self, mv: Move) -> Position {
        let board = self.board.play_move(mv);
        let hash = ZHash::of(&board);

        let mut history = self.history.clone();

        // A capture or pawn move resets the fifty-move counter, and with
        // it any possibility of repeating a position from before the
        // reset, so there's no point remembering further back than that.
        if mv.is_capture() || board.half_moves == 0 {
            history.clear();
        } else if history.len() == history.capacity() {
            history.remove(0);
        }

        history.push(self.hash);

        Position { board, hash, history }
    }

    /// Play a null move: flip the side to move without moving a piece.
    /// Used by null-move pruning.
    pub fn play_null_move(&self) -> Position {
        let mut board = self.board;
        board.current = !board.current;
        board.en_passant = None;

        Position {
            hash: self.hash,
            board,
            history: self.history.clone(),
        }
    }

    /// Has the current position occurred earlier in this game (ignoring
    /// the current instance)? Used by the negamax core's draw
    /// short-circuit.
    pub fn is_repetition(&self) -> bool {
        self.history.iter().rev().any(|&h| h == self.hash)
    }

    pub fn is_draw(&self) -> bool {
        self.board.half_moves >= 100
            || self.board.insufficient_material()
            || self.is_repetition()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_move_updates_hash_to_match_from_scratch() {
        let pos = Position::new(Board::default());

        for mv in pos.legal_moves() {
            let next = pos.play_move(mv);
            assert_eq!(next.hash, ZHash::of(&next.board));
        }
    }

    #[test]
    fn kiwipete_moves_hash_consistently() {
        let board: Board = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        let pos = Position::new(board);

        for mv in pos.legal_moves() {
            let next = pos.play_move(mv);
            assert_eq!(next.hash, ZHash::of(&next.board));
        }
    }

    #[test]
    fn threefold_shuffle_is_detected_as_repetition() {
        let mut pos = Position::new(Board::default());

        for bare in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            let mv = pos.board.find_move(bare.parse().unwrap()).unwrap();
            pos = pos.play_move(mv);
        }

        assert!(pos.is_repetition());
    }
}
