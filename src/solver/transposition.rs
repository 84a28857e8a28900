use crate::hex::coords::HexPoint;

/// A memoized solve result for one position, keyed by Zobrist hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DfsData {
    pub win: bool,
    pub num_moves: u16,
    pub best_move: HexPoint,
    pub num_states: u64,
}

impl DfsData {
    pub fn new(win: bool, num_moves: u16, best_move: HexPoint, num_states: u64) -> DfsData {
        DfsData { win, num_moves, best_move, num_states }
    }
}

/// A fixed-size, direct-mapped transposition table. Collisions replace the
/// existing slot outright: retaining the entry with more invested work is
/// a permitted tiebreak, not a requirement, and the extra bookkeeping isn't
/// worth it at this scale.
pub struct TransTable<T> {
    slots: Vec<Option<(u64, T)>>,
    mask: u64,
    hits: u64,
    misses: u64,
}

impl<T: Clone> TransTable<T> {
    /// `size_pow2` is rounded up internally to the next power of two so the
    /// index can be computed with a mask instead of a modulo.
    pub fn new(size_pow2: usize) -> TransTable<T> {
        let capacity = size_pow2.next_power_of_two().max(1);
        TransTable { slots: vec![None; capacity], mask: (capacity - 1) as u64, hits: 0, misses: 0 }
    }

    fn index(&self, hash: u64) -> usize {
        (hash & self.mask) as usize
    }

    pub fn get(&mut self, hash: u64) -> Option<T> {
        let idx = self.index(hash);
        match &self.slots[idx] {
            Some((h, data)) if *h == hash => {
                self.hits += 1;
                Some(data.clone())
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn put(&mut self, hash: u64, data: T) {
        let idx = self.index(hash);
        self.slots[idx] = Some((hash, data));
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.hits = 0;
        self.misses = 0;
    }
}

impl<T: Clone> Default for TransTable<T> {
    fn default() -> Self {
        // 2^20 slots by default: enough for a meaningful search without an
        // unreasonable memory footprint.
        TransTable::new(1 << 20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_recalls_by_hash() {
        let mut tt: TransTable<DfsData> = TransTable::new(16);
        let data = DfsData::new(true, 3, 42, 100);
        tt.put(7, data);
        assert_eq!(tt.get(7), Some(data));
        assert_eq!(tt.get(8), None);
    }

    #[test]
    fn collisions_replace_the_slot() {
        let mut tt: TransTable<DfsData> = TransTable::new(4);
        tt.put(0, DfsData::new(true, 1, 1, 1));
        tt.put(4, DfsData::new(false, 2, 2, 2));
        assert_eq!(tt.get(4), Some(DfsData::new(false, 2, 2, 2)));
        assert_eq!(tt.get(0), None);
    }
}
