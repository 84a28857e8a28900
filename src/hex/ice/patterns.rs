use crate::hex::board::{PatternState, StoneBoard};
use crate::hex::consts::Color;
use crate::hex::coords::{Geometry, HexPoint};
use crate::hex::sets::{Bitset, SetOps};

use super::InferiorCells;

/// What a single ring slot demands of the neighbour sitting there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Req {
    /// The neighbour must be empty.
    Empty,
    /// The neighbour must be a stone of this colour, or neutral: an edge
    /// sentinel (boundary, never disqualifies either colour) or a DEAD cell
    /// (already inert, contributes to neither side).
    StoneOrWild(Color),
}

/// The pattern classes a compiled pattern can resolve to. `Dead` regions are
/// detected by a separate aggregate scan (see `scan_dead_via_enclosure`):
/// "touches both colours, or only DEAD cells" isn't expressible as a single
/// fixed-Req ring, since it's an OR across which colour appears, not a fixed
/// requirement per slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PatternKind {
    Captured(Color),
}

/// A pattern compiled once at `Ice::new` time: a tagged kind plus a ring of
/// (direction, requirement) pairs tried against every rotation of the six
/// canonical directions. Matching tries all six rotations even where, as for
/// the patterns built below, every slot carries the same requirement and
/// rotation is a no-op — the mechanism is meant to generalize to patterns
/// whose ring isn't rotationally symmetric.
#[derive(Clone, Debug)]
pub(super) struct CompiledPattern {
    kind: PatternKind,
    ring: Vec<(usize, Req)>,
    /// At least one ring slot must match a genuine stone, not just a
    /// boundary/DEAD wildcard, or the pattern is vacuously satisfied by an
    /// all-wildcard neighbourhood (e.g. a 1x1 board) and proves nothing.
    requires_real_stone: bool,
}

impl CompiledPattern {
    fn matches(&self, board: &StoneBoard, geometry: &Geometry, p: HexPoint) -> bool {
        for rotation in 0..6 {
            let mut any_real_stone = false;
            let mut ok = true;

            for &(dir, req) in &self.ring {
                let actual_dir = (dir + rotation) % 6;
                let q = geometry.directional_neighbour(p, actual_dir);

                match req {
                    Req::Empty => {
                        if board.color_at(q) != Color::Empty {
                            ok = false;
                            break;
                        }
                    }
                    Req::StoneOrWild(c) => {
                        if geometry.is_edge(q) {
                            // boundary: neutral, matches either colour's pattern.
                        } else {
                            match board.color_at(q) {
                                Color::Empty => {
                                    ok = false;
                                    break;
                                }
                                Color::Dead => {} // inert, neutral
                                stone if stone == c => any_real_stone = true,
                                _ => {
                                    ok = false;
                                    break;
                                }
                            }
                        }
                    }
                }
            }

            if ok && (!self.requires_real_stone || any_real_stone) {
                return true;
            }
        }
        false
    }
}

/// Builds the pattern table once per `Ice::new`: a handful of canonical
/// short-fuse patterns recognizing a cell that adds nothing beyond what its
/// ring of neighbours already decides. Currently two entries, one per
/// colour: a cell fully ringed by that colour's stones (and/or boundary
/// and/or already-dead cells) is equivalent to already being that colour's
/// stone.
pub(super) fn build_pattern_table() -> Vec<CompiledPattern> {
    vec![
        CompiledPattern {
            kind: PatternKind::Captured(Color::Black),
            ring: (0..6).map(|d| (d, Req::StoneOrWild(Color::Black))).collect(),
            requires_real_stone: true,
        },
        CompiledPattern {
            kind: PatternKind::Captured(Color::White),
            ring: (0..6).map(|d| (d, Req::StoneOrWild(Color::White))).collect(),
            requires_real_stone: true,
        },
    ]
}

fn color_idx(c: Color) -> usize {
    match c {
        Color::Black => 0,
        Color::White => 1,
        _ => panic!("only BLACK and WHITE index pattern-table results"),
    }
}

/// Runs the compiled pattern table against every empty interior cell,
/// returning the cells captured for each colour.
pub(super) fn scan_captured(board: &StoneBoard, table: &[CompiledPattern]) -> [Bitset; 2] {
    let geometry = board.geometry();
    let mut captured = [Bitset::default(), Bitset::default()];

    for p in geometry.interior_cells() {
        if !board.is_empty(p) {
            continue;
        }
        for pattern in table {
            if pattern.matches(board, geometry, p) {
                let PatternKind::Captured(color) = pattern.kind;
                captured[color_idx(color)].insert(p);
                break;
            }
        }
    }

    captured
}

/// An empty cell with no empty *interior* neighbours, and whose neighbours
/// include both colours (or only DEAD cells), contributes nothing to either
/// side: it is dead. This is the aggregate half of the old "fully
/// surrounded" check that the compiled pattern table above cannot express,
/// since it's a disjunction over which colour is present rather than a fixed
/// per-slot requirement. Edge sentinels are excluded from this check: cells
/// along the border always touch their own edge colour (and, on very small
/// boards, can touch both), which is a fact about board topology, not about
/// being boxed in by played stones.
pub(super) fn scan_dead_via_enclosure(board: &StoneBoard, pattern_state: &PatternState) -> Bitset {
    let geometry = pattern_state.geometry();
    let mut dead = Bitset::default();

    for p in geometry.interior_cells() {
        if !board.is_empty(p) {
            continue;
        }

        let mut saw_empty = false;
        let mut saw_black = false;
        let mut saw_white = false;
        let mut saw_any_stone = false;
        for &(q, color) in pattern_state.neighbor_colors(p) {
            if geometry.is_edge(q) {
                continue;
            }
            match color {
                Color::Empty => saw_empty = true,
                Color::Black => {
                    saw_black = true;
                    saw_any_stone = true;
                }
                Color::White => {
                    saw_white = true;
                    saw_any_stone = true;
                }
                Color::Dead => saw_any_stone = true,
            }
        }

        if saw_empty || !saw_any_stone {
            continue;
        }

        if (saw_black && saw_white) || (!saw_black && !saw_white) {
            // every neighbour is either both colours, or every neighbour is
            // DEAD: the cell is walled off from both colours just as surely.
            dead.insert(p);
        }
    }

    dead
}

/// Finds dominated and reversible cells among what remains empty once the
/// fixpoint settles. A cell `p` is dominated by an adjacent empty cell `q`
/// when every stone neighbour `p` touches, `q` also touches (and possibly
/// more): `q` is never a worse reply than `p`. A cell dominated by exactly
/// one alternative is additionally recorded as reversible to it, folding
/// the two relations together rather than re-deriving reversibility from
/// scratch (see DESIGN.md).
pub(super) fn find_reversible_dominated(board: &StoneBoard, pattern_state: &PatternState, inf: &mut InferiorCells) {
    let geometry = pattern_state.geometry();
    let empties: Vec<_> = geometry.interior_cells().filter(|&p| board.is_empty(p)).collect();

    let stone_neighbors = |p: usize| -> Bitset {
        pattern_state
            .neighbor_colors(p)
            .iter()
            .filter(|(_, c)| *c != Color::Empty)
            .map(|(q, _)| *q)
            .collect()
    };

    for &p in &empties {
        let p_touches = stone_neighbors(p);
        if p_touches.is_empty() {
            continue;
        }
        for &q in &empties {
            if p == q || !geometry.neighbours(p).contains(q) {
                continue;
            }
            let q_touches = stone_neighbors(q);
            if q_touches != p_touches && q_touches.intersect(&p_touches) == p_touches {
                inf.dominated.entry(p).or_default().push(q);
            }
        }
    }

    let reversible_targets: Vec<(usize, usize)> = inf
        .dominated
        .iter()
        .filter(|(_, doms)| doms.len() == 1)
        .map(|(&p, doms)| (p, doms[0]))
        .collect();
    for (p, q) in reversible_targets {
        inf.reversible.entry(p).or_default().push(q);
    }
}
