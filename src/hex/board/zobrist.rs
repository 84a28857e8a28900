use std::hash::{DefaultHasher, Hasher};
use std::sync::OnceLock;

use crate::hex::consts::{Color, MAX_CELLS};

const NUM_SLOTS: usize = MAX_CELLS * 3;

static ZOBRIST_TABLE: OnceLock<[u64; NUM_SLOTS]> = OnceLock::new();

/// Gets the zobrist contribution for a given cell being a given colour.
/// EMPTY never contributes (its absence from BLACK/WHITE/DEAD is already
/// reflected by the other three slots cancelling out).
pub(super) fn cell_hash(cell: usize, color: Color) -> u64 {
    let table = ZOBRIST_TABLE.get_or_init(|| {
        let mut table = [0u64; NUM_SLOTS];
        let mut hasher = DefaultHasher::new();
        for (i, entry) in table.iter_mut().enumerate() {
            hasher.write_usize(i);
            hasher.write_u8(0x5a);
            *entry = hasher.finish();
        }
        table
    });

    let slot = match color {
        Color::Black => 0,
        Color::White => 1,
        Color::Dead => 2,
        Color::Empty => return 0,
    };
    table[cell * 3 + slot]
}
