use crate::bitboard::Bitboard;

pub const LIGHT_SQUARES: Bitboard = Bitboard(6172840429334713770);
pub const DARK_SQUARES: Bitboard = Bitboard(12273903644374837845);

/// `FILES[file]`: every square on the given file (0 = a-file .. 7 = h-file).
pub const FILES: [Bitboard; 8] = gen_files();

/// `RANKS[rank]`: every square on the given rank (0 = rank 1 .. 7 = rank 8).
pub const RANKS: [Bitboard; 8] = gen_ranks();

/// The ranks pawns promote on, named from the mover's perspective rather
/// than indexed by rank number.
pub struct Rank;

impl Rank {
    pub const W_PROMO_RANK: Bitboard = RANKS[7];
    pub const B_PROMO_RANK: Bitboard = RANKS[0];
}

const fn gen_files() -> [Bitboard; 8] {
    const FILE_A: u64 = 0x0101_0101_0101_0101;
    let mut files = [Bitboard::EMPTY; 8];
    let mut file = 0;

    while file < 8 {
        files[file] = Bitboard(FILE_A << file);
        file += 1;
    }

    files
}

const fn gen_ranks() -> [Bitboard; 8] {
    const RANK_1: u64 = 0xFF;
    let mut ranks = [Bitboard::EMPTY; 8];
    let mut rank = 0;

    while rank < 8 {
        ranks[rank] = Bitboard(RANK_1 << (8 * rank));
        rank += 1;
    }

    ranks
}
