use crate::hex::board::HexBoard;
use crate::hex::consts::Color;
use crate::hex::ice::IceConfig;
use crate::hex::sets::{Bitset, SetOps};

/// Shrinks a proof bitset by checking which of its cells ICE alone can
/// fill back in once every other empty cell is handed to the loser. Any
/// such cell wasn't load-bearing for the proof and can be dropped,
/// improving future transposition/database hit rates.
///
/// `winner` is the color the proof claims a result for; `loser` is handed
/// every cell outside `proof`.
pub fn shrink_proof(geometry: &std::rc::Rc<crate::hex::coords::Geometry>, proof: &Bitset, winner: Color, ice_config: IceConfig) -> Bitset {
    let loser = -winner;
    let mut hb = HexBoard::new(geometry.clone(), ice_config);
    hb.compute_all(winner);

    let empty = hb.board().empty();
    let hypothetical_loser_cells = empty.difference(proof);
    if !hypothetical_loser_cells.is_empty() {
        hb.add_stones(loser, &hypothetical_loser_cells, winner);
    }

    let filled_by_ice = hb.inferior().all_filled();
    proof.difference(&filled_by_ice.intersect(proof))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::coords::Geometry;
    use std::rc::Rc;

    #[test]
    fn shrinking_never_grows_the_proof() {
        let g = Rc::new(Geometry::new(5, 5));
        let mut proof = Bitset::default();
        proof.insert(g.cell(0, 0));
        proof.insert(g.cell(2, 2));
        proof.insert(g.cell(4, 4));
        let shrunk = shrink_proof(&g, &proof, Color::Black, IceConfig::default());
        assert!(shrunk.intersect(&proof) == shrunk, "shrunk proof must be a subset of the original");
    }
}
