use std::rc::Rc;

use crate::hex::consts::Color;
use crate::hex::coords::{Geometry, HexPoint};

use super::StoneBoard;

/// A precomputed, per-cell snapshot of neighbour colours, so the
/// dead-by-enclosure scan (`ice::patterns::scan_dead_via_enclosure`) doesn't
/// have to re-query the stone board for every cell it inspects. The compiled
/// pattern table walks the board directly via `Geometry::directional_neighbour`
/// instead, since it needs each ring's neighbours in a fixed rotation order
/// rather than the unordered per-cell list kept here. Rebuilt whenever the
/// board's fillin changes, the same way Groups is.
#[derive(Clone, Debug)]
pub struct PatternState {
    geometry: Rc<Geometry>,
    neighbor_colors: Vec<Vec<(HexPoint, Color)>>,
}

impl PatternState {
    pub fn rebuild(board: &StoneBoard) -> PatternState {
        let geometry = board.geometry().clone();
        let neighbor_colors = geometry
            .all_cells()
            .map(|p| geometry.neighbours(p).iter().map(|q| (q, board.color_at(q))).collect())
            .collect();
        PatternState { geometry, neighbor_colors }
    }

    /// The (cell, colour) pairs for every neighbour of `p`, in the board's
    /// canonical adjacency order.
    pub fn neighbor_colors(&self, p: HexPoint) -> &[(HexPoint, Color)] {
        &self.neighbor_colors[p]
    }

    pub fn geometry(&self) -> &Rc<Geometry> {
        &self.geometry
    }
}
