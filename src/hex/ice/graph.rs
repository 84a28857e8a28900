use std::collections::VecDeque;

use crate::hex::board::{Groups, StoneBoard};
use crate::hex::consts::Color;
use crate::hex::coords::{Geometry, HexPoint};
use crate::hex::sets::{Bitset, SetOps};
use crate::utils::prelude::*;

use super::{Ice, InferiorCells, Witness};

/// The two cells whose board-neighbour degree is minimal (two interior
/// neighbours plus the two edges that meet there). Dead regardless of any
/// stone placement, on any board with at least two rows and two columns —
/// below that the "corners" degenerate (on a 1x1 board the only cell
/// touches all four edges at once and is obviously not dead) so the rule
/// is skipped entirely.
pub(super) fn corner_dead_cells(geometry: &Geometry) -> Bitset {
    let mut corners = Bitset::default();
    if geometry.width >= 2 && geometry.height >= 2 {
        corners.insert(geometry.cell(0, 0));
        corners.insert(geometry.cell(geometry.height - 1, geometry.width - 1));
    }
    corners
}

/// An empty cell that touches only empty cells and members of a single
/// `color` group contributes nothing beyond that group's existing
/// liberties: it is permanently inferior to any of that group's other empty
/// liberties. A conservative local rule; it never mislabels playable cells
/// but does not attempt the full permanently-inferior theory.
pub(super) fn find_permanently_inferior(
    board: &StoneBoard,
    groups: &Groups,
    color: Color,
) -> (Bitset, Bitset) {
    let geometry = board.geometry();
    let mut cells = Bitset::default();
    let mut carrier = Bitset::default();

    for p in geometry.interior_cells() {
        if !board.is_empty(p) {
            continue;
        }
        let mut touched_group: Option<HexPoint> = None;
        let mut empties = Bitset::default();
        let mut disqualified = false;

        for q in geometry.neighbours(p).iter() {
            match board.color_at(q) {
                Color::Empty => {
                    empties.insert(q);
                }
                c if c == color => {
                    let captain = groups.group_at(q).map(|g| g.captain);
                    match (touched_group, captain) {
                        (None, Some(cap)) => touched_group = Some(cap),
                        (Some(existing), Some(cap)) if existing == cap => {}
                        _ => disqualified = true,
                    }
                }
                _ => disqualified = true,
            }
            if disqualified {
                break;
            }
        }

        if !disqualified && touched_group.is_some() && !empties.is_empty() {
            cells.insert(p);
            carrier.union_inplace(&empties);
        }
    }

    (cells, carrier)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Node {
    Empty(HexPoint),
    Group(HexPoint),
}

fn footprint(node: Node, groups: &Groups) -> Bitset {
    match node {
        Node::Empty(p) => {
            let mut s = Bitset::default();
            s.insert(p);
            s
        }
        Node::Group(captain) => groups.group_at(captain).map(|g| g.members).unwrap_or_default(),
    }
}

fn touches(a: Node, b: Node, geometry: &Geometry, groups: &Groups) -> bool {
    let fa = footprint(a, groups);
    let fb = footprint(b, groups);
    fa.iter().any(|c| geometry.neighbours(c).intersects(&fb))
}

/// The clique-neighbourhood test underlying both "dead by simplicial
/// neighbourhood" and "vulnerable by presimplicial neighbourhood" (this
/// consolidates what the literature treats as three separate clique-cutset
/// families; see DESIGN.md).
///
/// For an empty cell `p`, collapse its neighbours into distinct nodes (one
/// per stone group touching it, one per empty neighbour). If every pair of
/// nodes already touches each other, `p` adds no new connectivity and is
/// dead. If exactly one pair is missing an edge and one side of that pair is
/// an empty cell, playing that cell (the killer) completes the clique, so
/// `p` is vulnerable to it.
pub(super) fn find_dead_and_vulnerable(
    board: &StoneBoard,
    groups: &Groups,
    find_all_pattern_killers: bool,
) -> (Bitset, HashMap<HexPoint, Vec<Witness>>) {
    let geometry = board.geometry();
    let mut dead = Bitset::default();
    let mut vulnerable: HashMap<HexPoint, Vec<Witness>> = HashMap::new();

    for p in geometry.interior_cells() {
        if !board.is_empty(p) {
            continue;
        }

        let mut nodes: Vec<Node> = Vec::new();
        let mut seen_captains: Bitset = Bitset::default();
        for q in geometry.neighbours(p).iter() {
            match board.color_at(q) {
                Color::Empty => nodes.push(Node::Empty(q)),
                Color::Dead => {}
                _ => {
                    // Edge-anchored groups are excluded from clique
                    // membership: an edge already guarantees connectivity
                    // on its own side, so it should never be the thing that
                    // makes a neighbouring empty cell provably dead.
                    if let Some(g) = groups.group_at(q) {
                        if !geometry.is_edge(g.captain) && !seen_captains.contains(g.captain) {
                            seen_captains.insert(g.captain);
                            nodes.push(Node::Group(g.captain));
                        }
                    }
                }
            }
        }

        if nodes.len() < 2 {
            continue;
        }

        let mut missing: Vec<(usize, usize)> = Vec::new();
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                if !touches(nodes[i], nodes[j], geometry, groups) {
                    missing.push((i, j));
                }
            }
        }

        if missing.is_empty() {
            dead.insert(p);
            continue;
        }

        if missing.len() == 1 {
            let (i, j) = missing[0];
            let empties_in_pair: Vec<HexPoint> = [nodes[i], nodes[j]]
                .into_iter()
                .filter_map(|n| if let Node::Empty(c) = n { Some(c) } else { None })
                .collect();
            if empties_in_pair.is_empty() {
                continue;
            }

            let other_empties: Bitset = nodes
                .iter()
                .filter_map(|n| if let Node::Empty(c) = n { Some(*c) } else { None })
                .filter(|c| !empties_in_pair.contains(c))
                .collect();

            let killers = if find_all_pattern_killers { &empties_in_pair[..] } else { &empties_in_pair[..1] };
            for &killer in killers {
                vulnerable.entry(p).or_default().push(Witness { killer, carrier: other_empties });
            }
        }
    }

    (dead, vulnerable)
}

/// An empty cell is useless to a colour unless it lies on some path
/// connecting that colour's two edges through empty-or-own cells. A cell
/// useless to both colours is dead. Opponent stones and already-dead cells
/// block travel for both colours.
fn reachable_both_edges(board: &StoneBoard, color: Color) -> Bitset {
    let geometry = board.geometry();
    let (e1, e2) = geometry.edges_of(color);

    let passable = |p: HexPoint| {
        let c = board.color_at(p);
        c == Color::Empty || c == color
    };

    let bfs_from = |start: HexPoint| -> Bitset {
        let mut visited = Bitset::default();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);
        while let Some(p) = queue.pop_front() {
            for q in geometry.neighbours(p).iter() {
                if !visited.contains(q) && passable(q) {
                    visited.insert(q);
                    queue.push_back(q);
                }
            }
        }
        visited
    };

    bfs_from(e1).intersect(&bfs_from(e2))
}

pub(super) fn dead_by_unreachability(board: &StoneBoard) -> Bitset {
    let useful = reachable_both_edges(board, Color::Black).union(&reachable_both_edges(board, Color::White));
    board.empty().difference(&useful)
}

/// Plays the opponent into every empty cell in turn, reruns fillin on that
/// hypothetical, and records any cell that comes out dead (other than the
/// hypothetical move itself) as vulnerable to it pre-move: if the opponent
/// playing there would kill it anyway, the mover should never be the one to
/// spend a move filling it in. The nested fillin runs with
/// `backup_opponent_dead` forced off, so this stays one level deep rather
/// than recursing through every empty cell again for each hypothetical.
pub(super) fn backup_opponent_dead(ice: &Ice, board: &StoneBoard, to_play: Color, inf: &mut InferiorCells) {
    let opponent = -to_play;
    let geometry = board.geometry().clone();

    let mut nested_config = *ice.config();
    nested_config.backup_opponent_dead = false;
    let nested_ice = Ice::new(nested_config);

    for m in geometry.interior_cells() {
        if !board.is_empty(m) {
            continue;
        }

        let mut hypothetical = board.clone();
        hypothetical.set(m, opponent);
        let post = nested_ice.compute_fillin(&mut hypothetical, to_play);

        for dead_cell in post.dead.iter() {
            if dead_cell == m || inf.dead.contains(dead_cell) || !board.is_empty(dead_cell) {
                continue;
            }
            inf.vulnerable.entry(dead_cell).or_default().push(Witness { killer: m, carrier: Bitset::default() });
        }
    }
}
