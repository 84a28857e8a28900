use std::rc::Rc;

use crate::hex::consts::Color;
use crate::hex::coords::{Geometry, HexPoint};
use crate::hex::sets::{Bitset, SetOps};
use crate::utils::prelude::*;

use super::StoneBoard;

/// A connected component of same-colour stones (or a lone edge/DEAD cell).
#[derive(Clone, Debug)]
pub struct GroupInfo {
    pub color: Color,
    pub captain: HexPoint,
    pub members: Bitset,
    /// The empty neighbour cells of this group — its liberties.
    pub liberties: Bitset,
}

/// A union-find partition of a StoneBoard's occupied cells and edges into
/// connected same-colour components, rebuilt fresh whenever the underlying
/// fillin changes (per the contract: Groups are a derived view, not an
/// incrementally maintained structure).
#[derive(Clone, Debug)]
pub struct Groups {
    geometry: Rc<Geometry>,
    parent: Vec<HexPoint>,
    rank: Vec<u8>,
    captains: HashMap<HexPoint, GroupInfo>,
}

impl Groups {
    /// Rebuilds the full group partition from a StoneBoard. DEAD cells are
    /// never merged with anything (treated as colourless for adjacency);
    /// each becomes its own singleton group.
    pub fn rebuild(board: &StoneBoard) -> Groups {
        let geometry = board.geometry().clone();
        let n = geometry.num_cells;
        let mut parent: Vec<HexPoint> = (0..n).collect();
        let mut rank = vec![0u8; n];

        let find = |parent: &mut Vec<HexPoint>, mut x: HexPoint| -> HexPoint {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        };

        let mut union = |parent: &mut Vec<HexPoint>, rank: &mut Vec<u8>, a: HexPoint, b: HexPoint| {
            let ra = find(parent, a);
            let rb = find(parent, b);
            if ra == rb {
                return;
            }
            if rank[ra] < rank[rb] {
                parent[ra] = rb;
            } else if rank[ra] > rank[rb] {
                parent[rb] = ra;
            } else {
                parent[rb] = ra;
                rank[ra] += 1;
            }
        };

        for p in geometry.all_cells() {
            let color = board.color_at(p);
            if !color.is_player() {
                continue;
            }
            for q in geometry.neighbours(p).iter() {
                if q > p && board.color_at(q) == color {
                    union(&mut parent, &mut rank, p, q);
                }
            }
        }

        let mut captains: HashMap<HexPoint, GroupInfo> = HashMap::new();
        for p in geometry.all_cells() {
            let color = board.color_at(p);
            if color == Color::Empty {
                continue;
            }
            let captain = if color.is_player() { find(&mut parent, p) } else { p };
            let entry = captains.entry(captain).or_insert_with(|| GroupInfo {
                color,
                captain,
                members: Bitset::default(),
                liberties: Bitset::default(),
            });
            entry.members.insert(p);
        }

        let empty = board.empty();
        for info in captains.values_mut() {
            let mut libs = Bitset::default();
            for m in info.members.iter() {
                libs.union_inplace(geometry.neighbours(m));
            }
            libs.intersect_inplace(&empty);
            info.liberties = libs;
        }

        Groups { geometry, parent, rank, captains }
    }

    fn find(&self, mut x: HexPoint) -> HexPoint {
        while self.parent[x] != x {
            x = self.parent[x];
        }
        x
    }

    /// Gets the group containing a given occupied cell, if any.
    pub fn group_at(&self, p: HexPoint) -> Option<&GroupInfo> {
        let captain = self.find(p);
        self.captains.get(&captain)
    }

    /// Iterates over every distinct group on the board.
    pub fn groups(&self) -> impl Iterator<Item = &GroupInfo> {
        self.captains.values()
    }

    /// Iterates over every group of a given colour.
    pub fn groups_of(&self, color: Color) -> impl Iterator<Item = &GroupInfo> {
        self.captains.values().filter(move |g| g.color == color)
    }

    #[allow(dead_code)]
    fn _rank_used(&self) -> usize {
        self.rank.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_stones_form_their_own_groups() {
        let g = Rc::new(Geometry::new(5, 5));
        let mut b = StoneBoard::new(g.clone());
        let c1 = g.cell(2, 2);
        b.set(c1, Color::Black);
        let groups = Groups::rebuild(&b);
        let group = groups.group_at(c1).unwrap();
        assert_eq!(group.members.len(), 1);
        assert_eq!(group.color, Color::Black);
    }

    #[test]
    fn adjacent_same_color_stones_merge() {
        let g = Rc::new(Geometry::new(5, 5));
        let mut b = StoneBoard::new(g.clone());
        let a = g.cell(2, 2);
        let nb = g.neighbours(a).iter().next().unwrap();
        b.set(a, Color::Black);
        b.set(nb, Color::Black);
        let groups = Groups::rebuild(&b);
        assert_eq!(groups.group_at(a).unwrap().members.len(), 2);
        assert_eq!(groups.group_at(a).unwrap().captain, groups.group_at(nb).unwrap().captain);
    }

    #[test]
    fn black_stone_merges_with_north_edge() {
        let g = Rc::new(Geometry::new(5, 5));
        let mut b = StoneBoard::new(g.clone());
        let top = g.cell(0, 0);
        b.set(top, Color::Black);
        let groups = Groups::rebuild(&b);
        assert_eq!(groups.group_at(top).unwrap().captain, groups.group_at(g.north()).unwrap().captain);
    }

    #[test]
    fn dead_cells_never_merge() {
        let g = Rc::new(Geometry::new(5, 5));
        let mut b = StoneBoard::new(g.clone());
        let a = g.cell(2, 2);
        let nb = g.neighbours(a).iter().next().unwrap();
        b.set(a, Color::Dead);
        b.set(nb, Color::Dead);
        let groups = Groups::rebuild(&b);
        assert_ne!(groups.group_at(a).unwrap().captain, groups.group_at(nb).unwrap().captain);
    }
}
