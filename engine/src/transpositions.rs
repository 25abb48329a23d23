//! The transposition table maps a position's Zobrist fingerprint to the
//! result of a previous search at that position, so that transposing move
//! orders don't have to be re-searched from scratch.

use chess::movegen::moves::Move;

use crate::score::Score;
use crate::score::ScoreExt;
use crate::zobrist::ZHash;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Copy, Clone)]
pub struct TTEntry {
    pub hash: ZHash,
    pub depth: u8,
    pub score: Score,
    pub bound: Bound,
    pub best_move: Option<Move>,
    pub age: u8,
}

impl TTEntry {
    /// Return the stored score if it can be used to resolve this node
    /// outright, without searching any children. The entry's depth must
    /// be at least as deep as the one requested, and the bound must
    /// actually constrain the `[alpha, beta]` window being searched.
    pub fn usable_score(&self, depth: u8, alpha: Score, beta: Score, ply: usize) -> Option<Score> {
        if self.depth < depth {
            return None;
        }

        let score = self.score.absolute(ply);

        match self.bound {
            Bound::Exact => Some(score),
            Bound::Lower if score >= beta => Some(score),
            Bound::Upper if score <= alpha => Some(score),
            _ => None,
        }
    }
}

/// A single table slot. `None` when the slot has never been written.
type Slot = Option<TTEntry>;

pub struct TTable {
    table: Vec<Slot>,
    /// `table.len()` is a power of two, so `mask = table.len() - 1` turns
    /// modulo-capacity indexing into a bitwise AND.
    mask: usize,
    age: u8,
}

const BYTES_PER_ENTRY: usize = std::mem::size_of::<TTEntry>() + std::mem::size_of::<bool>();

impl TTable {
    /// Build a table sized to fit within `mb_size` megabytes, rounded down
    /// to the nearest power of two entry count.
    pub fn with_capacity_mb(mb_size: usize) -> Self {
        let bytes = mb_size.max(1) << 20;
        let capacity = (bytes / BYTES_PER_ENTRY).max(1);
        let capacity = capacity.next_power_of_two() / 2;
        let capacity = capacity.max(1);

        Self {
            table: vec![None; capacity],
            mask: capacity - 1,
            age: 0,
        }
    }

    fn index(&self, hash: ZHash) -> usize {
        (hash.0 as usize) & self.mask
    }

    /// Write an entry for `hash` at `hash mod capacity`, unless an existing
    /// deeper, same-age entry is already more informative.
    pub fn store(
        &mut self,
        hash: ZHash,
        depth: u8,
        score: Score,
        bound: Bound,
        best_move: Option<Move>,
        ply: usize,
    ) {
        let idx = self.index(hash);
        let new_entry = TTEntry {
            hash,
            depth,
            score: score.relative(ply),
            bound,
            best_move,
            age: self.age,
        };

        let replace = match &self.table[idx] {
            None => true,
            Some(existing) => {
                existing.hash == hash
                    || depth >= existing.depth && (depth > existing.depth || existing.age != self.age)
            }
        };

        if replace {
            self.table[idx] = Some(new_entry);
        }
    }

    /// Look up `hash`, verifying the stored fingerprint to rule out
    /// collisions within the same slot.
    pub fn probe(&self, hash: ZHash) -> Option<TTEntry> {
        let idx = self.index(hash);
        self.table[idx].filter(|entry| entry.hash == hash)
    }

    pub fn clear(&mut self) {
        self.table.iter_mut().for_each(|slot| *slot = None);
        self.age = 0;
    }

    pub fn increment_age(&mut self) {
        self.age = self.age.wrapping_add(1);
    }

    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    /// The fraction of slots in use, as a per-mille value, sampled over the
    /// first thousand slots (matching the UCI `hashfull` reporting
    /// granularity).
    pub fn occupancy(&self) -> u32 {
        let sample_size = self.table.len().min(1000);
        let occupied = self.table[..sample_size].iter().filter(|s| s.is_some()).count();

        if sample_size == 0 {
            0
        } else {
            (1000 * occupied / sample_size) as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_hash(n: u64) -> ZHash {
        ZHash(n)
    }

    #[test]
    fn probe_returns_none_for_empty_table() {
        let tt = TTable::with_capacity_mb(1);
        assert!(tt.probe(dummy_hash(42)).is_none());
    }

    #[test]
    fn store_then_probe_round_trips() {
        let mut tt = TTable::with_capacity_mb(1);
        let hash = dummy_hash(1234);

        tt.store(hash, 5, 37, Bound::Exact, None, 0);

        let entry = tt.probe(hash).expect("entry should be present");
        assert_eq!(entry.score, 37);
        assert_eq!(entry.depth, 5);
        assert_eq!(entry.bound, Bound::Exact);
    }

    #[test]
    fn hash_mismatch_within_a_slot_is_a_miss() {
        let mut tt = TTable::with_capacity_mb(1);
        let capacity = tt.capacity() as u64;

        let hash_a = dummy_hash(5);
        let hash_b = dummy_hash(5 + capacity);

        tt.store(hash_a, 3, 10, Bound::Exact, None, 0);

        // Same index, different fingerprint: must not be returned as hash_b.
        assert!(tt.probe(hash_b).is_none());
    }

    #[test]
    fn usable_score_respects_bound_kind() {
        let exact = TTEntry { hash: dummy_hash(0), depth: 4, score: 50, bound: Bound::Exact, best_move: None, age: 0 };
        assert_eq!(exact.usable_score(4, -100, 100, 0), Some(50));
        assert_eq!(exact.usable_score(5, -100, 100, 0), None);

        let lower = TTEntry { hash: dummy_hash(0), depth: 4, score: 150, bound: Bound::Lower, best_move: None, age: 0 };
        assert_eq!(lower.usable_score(4, -100, 100, 0), Some(150));
        assert_eq!(lower.usable_score(4, -100, 200, 0), None);

        let upper = TTEntry { hash: dummy_hash(0), depth: 4, score: -150, bound: Bound::Upper, best_move: None, age: 0 };
        assert_eq!(upper.usable_score(4, -100, 100, 0), Some(-150));
        assert_eq!(upper.usable_score(4, -200, 100, 0), None);
    }

    #[test]
    fn deeper_same_age_entry_replaces_shallower() {
        let mut tt = TTable::with_capacity_mb(1);
        let hash = dummy_hash(7);

        tt.store(hash, 2, 10, Bound::Exact, None, 0);
        tt.store(hash, 6, 20, Bound::Exact, None, 0);

        let entry = tt.probe(hash).unwrap();
        assert_eq!(entry.depth, 6);
        assert_eq!(entry.score, 20);
    }

    #[test]
    fn new_age_entry_replaces_even_at_equal_depth() {
        let mut tt = TTable::with_capacity_mb(1);
        let hash = dummy_hash(9);

        tt.store(hash, 4, 10, Bound::Exact, None, 0);
        tt.increment_age();
        tt.store(hash, 4, 99, Bound::Exact, None, 0);

        let entry = tt.probe(hash).unwrap();
        assert_eq!(entry.score, 99);
    }
}
