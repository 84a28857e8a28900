mod graph;
mod patterns;

use crate::hex::board::{Groups, PatternState, StoneBoard};
use crate::hex::consts::Color;
use crate::hex::coords::HexPoint;
use crate::hex::sets::{Bitset, SetOps};
use crate::utils::prelude::*;

fn color_idx(c: Color) -> usize {
    match c {
        Color::Black => 0,
        Color::White => 1,
        _ => panic!("only BLACK and WHITE index inferior-cell tables"),
    }
}

/// A witness that an empty cell is vulnerable: playing it is never better
/// than playing `killer` instead, provided `carrier` stays empty.
#[derive(Clone, Debug)]
pub struct Witness {
    pub killer: HexPoint,
    pub carrier: Bitset,
}

/// The accumulated simplifications ICE has proven about the current
/// position. See SPEC_FULL.md §3 for the invariants this upholds.
#[derive(Clone, Debug, Default)]
pub struct InferiorCells {
    pub dead: Bitset,
    pub captured: [Bitset; 2],
    pub perm_inf: [Bitset; 2],
    pub perm_inf_carrier: [Bitset; 2],
    pub vulnerable: HashMap<HexPoint, Vec<Witness>>,
    pub reversible: HashMap<HexPoint, Vec<HexPoint>>,
    pub dominated: HashMap<HexPoint, Vec<HexPoint>>,
}

impl InferiorCells {
    pub fn captured_by(&self, color: Color) -> Bitset {
        self.captured[color_idx(color)]
    }

    pub fn perm_inf_by(&self, color: Color) -> Bitset {
        self.perm_inf[color_idx(color)]
    }

    /// Every cell ICE considers equivalent to already being filled in, of
    /// any colour, dead or otherwise.
    pub fn all_filled(&self) -> Bitset {
        self.dead
            .union(&self.captured[0])
            .union(&self.captured[1])
            .union(&self.perm_inf[0])
            .union(&self.perm_inf[1])
    }

    /// Cells the mustplay computation should still consider: empty, and not
    /// already proven dead/captured/permanently-inferior. Vulnerable cells
    /// remain playable (they are merely dominated by a better reply), per
    /// the invariant that only dead/captured/perm-inf cells are removed from
    /// play outright.
    pub fn playable(&self, empties: &Bitset) -> Bitset {
        empties.difference(&self.all_filled())
    }
}

/// Configuration flags for the inferior cell engine, settable independently
/// of the DFS solver's own parameters (`param_solver_ice` on the control
/// surface, see SPEC_FULL.md §6).
#[derive(Clone, Copy, Debug)]
pub struct IceConfig {
    pub find_permanently_inferior: bool,
    pub find_all_pattern_killers: bool,
    pub backup_opponent_dead: bool,
    pub iterative_dead_regions: bool,
}

impl Default for IceConfig {
    fn default() -> Self {
        IceConfig {
            find_permanently_inferior: true,
            find_all_pattern_killers: false,
            backup_opponent_dead: false,
            iterative_dead_regions: true,
        }
    }
}

/// The inferior cell engine. Beyond its configuration, holds only the
/// pattern table compiled once at construction time; every call to
/// `compute_fillin` clears its own accumulator and recomputes from scratch,
/// per the "ICE never fails" contract.
#[derive(Clone, Debug)]
pub struct Ice {
    config: IceConfig,
    pattern_table: Vec<patterns::CompiledPattern>,
}

impl Ice {
    pub fn new(config: IceConfig) -> Ice {
        Ice { config, pattern_table: patterns::build_pattern_table() }
    }

    pub fn config(&self) -> &IceConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: IceConfig) {
        self.config = config;
    }

    /// Runs the fixpoint loop described in SPEC_FULL.md §4.1, mutating
    /// `board` in place with every dead/captured/permanently-inferior fillin
    /// it proves, and returning the full InferiorCells record (including the
    /// vulnerable/reversible/dominated annotations on the cells that remain
    /// empty).
    pub fn compute_fillin(&self, board: &mut StoneBoard, to_play: Color) -> InferiorCells {
        let mut inf = InferiorCells::default();

        // Corner cells are dead regardless of stones; a geometric fact, not
        // a pattern, so it is applied once up front.
        for corner in graph::corner_dead_cells(board.geometry()) {
            if board.is_empty(corner) {
                board.set(corner, Color::Dead);
                inf.dead.insert(corner);
            }
        }

        loop {
            let mut changed = false;

            let pattern_state = PatternState::rebuild(board);
            let dead = patterns::scan_dead_via_enclosure(board, &pattern_state);
            let captured = patterns::scan_captured(board, &self.pattern_table);
            for cell in dead.iter() {
                if board.is_empty(cell) {
                    board.set(cell, Color::Dead);
                    inf.dead.insert(cell);
                    changed = true;
                }
            }
            for (idx, color) in [Color::Black, Color::White].into_iter().enumerate() {
                for cell in captured[idx].iter() {
                    if board.is_empty(cell) {
                        board.set(cell, color);
                        inf.captured[idx].insert(cell);
                        changed = true;
                    }
                }
            }

            if changed {
                continue;
            }

            if self.config.find_permanently_inferior {
                let groups = Groups::rebuild(board);
                for color in [Color::Black, Color::White] {
                    let (cells, carrier) = graph::find_permanently_inferior(board, &groups, color);
                    let idx = color_idx(color);
                    for c in cells.iter() {
                        if board.is_empty(c) && !inf.perm_inf[idx].contains(c) {
                            inf.perm_inf[idx].insert(c);
                            inf.perm_inf_carrier[idx].union_inplace(&carrier);
                        }
                    }
                }
            }

            let groups = Groups::rebuild(board);
            let (clique_dead, vulnerable) =
                graph::find_dead_and_vulnerable(board, &groups, self.config.find_all_pattern_killers);
            for cell in clique_dead.iter() {
                if board.is_empty(cell) {
                    board.set(cell, Color::Dead);
                    inf.dead.insert(cell);
                    changed = true;
                }
            }
            for (cell, witnesses) in vulnerable {
                if board.is_empty(cell) {
                    // A vulnerable cell whose killer is itself already dead
                    // is simply dead: the reply is free, so the cell never
                    // contributes (consolidated mutual-capture rule, see
                    // DESIGN.md).
                    if witnesses.iter().any(|w| inf.dead.contains(w.killer)) {
                        board.set(cell, Color::Dead);
                        inf.dead.insert(cell);
                        inf.vulnerable.remove(&cell);
                        changed = true;
                    } else {
                        inf.vulnerable.entry(cell).or_default().extend(witnesses);
                    }
                }
            }

            if self.config.iterative_dead_regions {
                let region_dead = graph::dead_by_unreachability(board);
                for cell in region_dead.iter() {
                    if board.is_empty(cell) && !inf.dead.contains(cell) {
                        board.set(cell, Color::Dead);
                        inf.dead.insert(cell);
                        changed = true;
                    }
                }
            }

            if !changed {
                break;
            }
        }

        let pattern_state = PatternState::rebuild(board);
        patterns::find_reversible_dominated(board, &pattern_state, &mut inf);

        if self.config.backup_opponent_dead {
            graph::backup_opponent_dead(self, board, to_play, &mut inf);
        }

        inf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::coords::Geometry;
    use std::rc::Rc;

    #[test]
    fn fillin_is_confluent_on_repeated_calls() {
        let g = Rc::new(Geometry::new(5, 5));
        let mut board = StoneBoard::new(g.clone());
        board.set(g.cell(2, 2), Color::Black);

        let ice = Ice::new(IceConfig::default());
        let first = ice.compute_fillin(&mut board, Color::Black);
        let mut board_again = board.clone();
        let second = ice.compute_fillin(&mut board_again, Color::Black);

        assert_eq!(first.all_filled().len(), second.all_filled().len());
        assert_eq!(board.hash(), board_again.hash());
    }

    #[test]
    fn dead_and_captured_sets_are_disjoint() {
        let g = Rc::new(Geometry::new(5, 5));
        let mut board = StoneBoard::new(g.clone());
        board.set(g.cell(2, 2), Color::Black);
        board.set(g.cell(2, 1), Color::White);

        let ice = Ice::new(IceConfig::default());
        let inf = ice.compute_fillin(&mut board, Color::Black);

        assert!(!inf.dead.intersects(&inf.captured[0]));
        assert!(!inf.dead.intersects(&inf.captured[1]));
        assert!(!inf.captured[0].intersects(&inf.captured[1]));
    }

    #[test]
    fn acute_corners_are_always_dead() {
        let g = Rc::new(Geometry::new(6, 7));
        let mut board = StoneBoard::new(g.clone());
        let ice = Ice::new(IceConfig::default());
        let inf = ice.compute_fillin(&mut board, Color::Black);
        assert!(inf.dead.contains(g.cell(0, 0)));
        assert!(inf.dead.contains(g.cell(g.height - 1, g.width - 1)));
    }
}
