mod groups;
mod hexboard;
mod pattern;
mod zobrist;

use std::rc::Rc;

use crate::hex::consts::Color;
use crate::hex::coords::{Geometry, HexPoint};
use crate::hex::sets::{Bitset, SetOps};
use crate::utils::prelude::*;

pub use groups::Groups;
pub use hexboard::HexBoard;
pub use pattern::PatternState;

/// Per-cell colour layout plus an incremental Zobrist hash, for a fixed
/// board geometry. Edge sentinels are always set to their owning colour.
#[derive(Clone, Debug)]
pub struct StoneBoard {
    geometry: Rc<Geometry>,
    black: Bitset,
    white: Bitset,
    dead: Bitset,
    hash: u64,
}

impl StoneBoard {
    /// Builds an empty board with both edge pairs pre-set to their owner.
    pub fn new(geometry: Rc<Geometry>) -> StoneBoard {
        let mut board = StoneBoard {
            geometry: geometry.clone(),
            black: Bitset::default(),
            white: Bitset::default(),
            dead: Bitset::default(),
            hash: 0,
        };
        let (n, s) = geometry.edges_of(Color::Black);
        let (e, w) = geometry.edges_of(Color::White);
        board.raw_set(n, Color::Black);
        board.raw_set(s, Color::Black);
        board.raw_set(e, Color::White);
        board.raw_set(w, Color::White);
        board
    }

    pub fn geometry(&self) -> &Rc<Geometry> {
        &self.geometry
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn color_at(&self, p: HexPoint) -> Color {
        if self.black.contains(p) {
            Color::Black
        } else if self.white.contains(p) {
            Color::White
        } else if self.dead.contains(p) {
            Color::Dead
        } else {
            Color::Empty
        }
    }

    pub fn is_empty(&self, p: HexPoint) -> bool {
        matches!(self.color_at(p), Color::Empty)
    }

    pub fn cells_of(&self, color: Color) -> Bitset {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
            Color::Dead => self.dead,
            Color::Empty => self.empty(),
        }
    }

    /// The bitset of every unoccupied (not black, white, or dead) cell.
    pub fn empty(&self) -> Bitset {
        let all = Bitset::full(self.geometry.num_cells);
        all.difference(&self.black).difference(&self.white).difference(&self.dead)
    }

    /// Sets a single cell to the given colour, maintaining the hash.
    /// Panics (in debug) if the cell was already occupied; callers are
    /// expected to have validated this via `is_empty` beforehand.
    pub fn set(&mut self, p: HexPoint, color: Color) {
        debug_assert!(self.is_empty(p), "cell {p} is already occupied");
        self.raw_set(p, color);
    }

    /// Clears a cell back to EMPTY, maintaining the hash. Used by undo.
    pub fn unset(&mut self, p: HexPoint) {
        let prev = self.color_at(p);
        if prev == Color::Empty {
            return;
        }
        self.hash ^= zobrist::cell_hash(p, prev);
        match prev {
            Color::Black => {
                self.black.remove(p);
            }
            Color::White => {
                self.white.remove(p);
            }
            Color::Dead => {
                self.dead.remove(p);
            }
            Color::Empty => {}
        }
    }

    fn raw_set(&mut self, p: HexPoint, color: Color) {
        match color {
            Color::Black => {
                self.black.insert(p);
            }
            Color::White => {
                self.white.insert(p);
            }
            Color::Dead => {
                self.dead.insert(p);
            }
            Color::Empty => return,
        }
        self.hash ^= zobrist::cell_hash(p, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zobrist_round_trips_through_set_and_unset() {
        let g = Rc::new(Geometry::new(5, 5));
        let mut b = StoneBoard::new(g.clone());
        let initial = b.hash();

        let c1 = g.cell(1, 1);
        let c2 = g.cell(2, 3);
        b.set(c1, Color::Black);
        b.set(c2, Color::White);
        assert_ne!(b.hash(), initial);

        b.unset(c2);
        b.unset(c1);
        assert_eq!(b.hash(), initial);
    }

    #[test]
    fn edges_are_preset_and_disjoint() {
        let g = Rc::new(Geometry::new(6, 7));
        let b = StoneBoard::new(g.clone());
        assert_eq!(b.color_at(g.north()), Color::Black);
        assert_eq!(b.color_at(g.south()), Color::Black);
        assert_eq!(b.color_at(g.east()), Color::White);
        assert_eq!(b.color_at(g.west()), Color::White);
        for p in g.interior_cells() {
            assert_eq!(b.color_at(p), Color::Empty);
        }
    }
}
