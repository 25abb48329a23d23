//! Static evaluation: material balance plus piece-square tables, tapered
//! between midgame and endgame values by remaining material.
//!
//! This is a deliberately small fraction of what a tuned hand-crafted
//! evaluator looks like; it exists to give the search something non-zero
//! to terminate on, not to play strong chess on its own. The packed
//! midgame/endgame score representation and the phase/lerp technique are
//! carried over from the richer evaluator this crate's search core was
//! grounded on, without that evaluator's mobility/threat terms, pawn
//! cache or tuning infrastructure.

use std::ops::{Add, AddAssign, Neg, Sub};

use chess::board::Board;
use chess::piece::{Color, PieceType};
use chess::square::Square;

/// Centipawn score, from the perspective of the side being scored.
pub type Score = i32;

/// A packed midgame/endgame score pair.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct S(Score, Score);

impl S {
    pub const fn new(mg: Score, eg: Score) -> Self {
        Self(mg, eg)
    }

    pub fn mg(self) -> Score {
        self.0
    }

    pub fn eg(self) -> Score {
        self.1
    }

    /// Interpolate between midgame and endgame scores given a phase value
    /// between 0 (pure endgame) and 24 (pure midgame).
    pub fn lerp(self, phase: u8) -> Score {
        (phase as Score * self.mg() + (24 - phase as Score) * self.eg()) / 24
    }
}

impl Add for S {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl AddAssign for S {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for S {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0, self.1 - rhs.1)
    }
}

impl Neg for S {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0, -self.1)
    }
}

const fn s(mg: Score, eg: Score) -> S {
    S::new(mg, eg)
}

#[rustfmt::skip]
const PIECE_VALUES: [S; PieceType::COUNT] = [
    s(100, 120),   // Pawn
    s(320, 300),   // Knight
    s(330, 310),   // Bishop
    s(500, 520),   // Rook
    s(900, 950),   // Queen
    s(0, 0),       // King
];

/// How much each piece type contributes to the 0..=24 game-phase counter.
const GAME_PHASE_VALUES: [u8; PieceType::COUNT] = [0, 1, 1, 2, 4, 0];

#[rustfmt::skip]
const PAWN_PST: [Score; Square::COUNT] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10,-20,-20, 10, 10,  5,
     5, -5,-10,  0,  0,-10, -5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5,  5, 10, 25, 25, 10,  5,  5,
    10, 10, 20, 30, 30, 20, 10, 10,
    50, 50, 50, 50, 50, 50, 50, 50,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_PST: [Score; Square::COUNT] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_PST: [Score; Square::COUNT] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_PST: [Score; Square::COUNT] = [
     0,  0,  0,  5,  5,  0,  0,  0,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     5, 10, 10, 10, 10, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_PST: [Score; Square::COUNT] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -10,  5,  5,  5,  5,  5,  0,-10,
      0,  0,  5,  5,  5,  5,  0, -5,
     -5,  0,  5,  5,  5,  5,  0, -5,
    -10,  0,  5,  5,  5,  5,  0,-10,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_MG_PST: [Score; Square::COUNT] = [
     20, 30, 10,  0,  0, 10, 30, 20,
     20, 20,  0,  0,  0,  0, 20, 20,
    -10,-20,-20,-20,-20,-20,-20,-10,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
];

#[rustfmt::skip]
const KING_EG_PST: [Score; Square::COUNT] = [
    -50,-30,-30,-30,-30,-30,-30,-50,
    -30,-30,  0,  0,  0,  0,-30,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -50,-40,-30,-20,-20,-30,-40,-50,
];

fn pst_value(piece_type: PieceType, sq: Square, color: Color) -> S {
    // PSTs above are written from White's perspective with rank 8 first;
    // mirror the square vertically for Black.
    let idx = match color {
        Color::White => sq as usize ^ 56,
        Color::Black => sq as usize,
    };

    match piece_type {
        PieceType::Pawn => S::new(PAWN_PST[idx], PAWN_PST[idx]),
        PieceType::Knight => S::new(KNIGHT_PST[idx], KNIGHT_PST[idx]),
        PieceType::Bishop => S::new(BISHOP_PST[idx], BISHOP_PST[idx]),
        PieceType::Rook => S::new(ROOK_PST[idx], ROOK_PST[idx]),
        PieceType::Queen => S::new(QUEEN_PST[idx], QUEEN_PST[idx]),
        PieceType::King => S::new(KING_MG_PST[idx], KING_EG_PST[idx]),
    }
}

/// Evaluate `board` from the perspective of the side to move.
pub fn evaluate(board: &Board) -> Score {
    let mut total = S::default();
    let mut phase: u32 = 0;

    for sq in Square::ALL {
        let Some(piece) = board.get_at(sq) else { continue };
        let piece_type = piece.piece_type();
        let color = piece.color();

        let value = PIECE_VALUES[piece_type as usize] + pst_value(piece_type, sq, color);
        phase += GAME_PHASE_VALUES[piece_type as usize] as u32;

        total = match color {
            Color::White => total + value,
            Color::Black => total - value,
        };
    }

    let phase = phase.min(24) as u8;
    let score = total.lerp(phase);

    match board.current {
        Color::White => score,
        Color::Black => -score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_is_balanced() {
        let board = Board::default();
        assert_eq!(evaluate(&board), 0);
    }

    #[test]
    fn missing_black_queen_favors_white() {
        let board: Board = "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
            .parse()
            .unwrap();

        assert!(evaluate(&board) > 0);
    }

    #[test]
    fn score_is_from_side_to_moves_perspective() {
        let white_to_move: Board = "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
            .parse()
            .unwrap();
        let black_to_move: Board = "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1"
            .parse()
            .unwrap();

        assert_eq!(evaluate(&white_to_move), -evaluate(&black_to_move));
    }
}
