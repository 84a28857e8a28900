use std::rc::Rc;

use crate::hex::consts::Color;
use crate::hex::coords::{Geometry, HexPoint};
use crate::hex::ice::{Ice, IceConfig, InferiorCells};
use crate::hex::sets::{Bitset, SetOps};
use crate::hex::vc::{SimpleVcBuilder, VcBuilder};

use super::{Groups, PatternState, StoneBoard};

fn color_idx(c: Color) -> usize {
    match c {
        Color::Black => 0,
        Color::White => 1,
        _ => panic!("only BLACK and WHITE index per-colour board state"),
    }
}

struct HistoryFrame {
    board: StoneBoard,
    inferior: InferiorCells,
    to_play: Color,
    last_played: Option<HexPoint>,
}

/// The composed position: a StoneBoard plus every piece of derived state
/// (groups, pattern snapshot, inferior cells, virtual connections) kept
/// consistent across moves and undos. This is what the solver actually
/// searches over.
pub struct HexBoard {
    geometry: Rc<Geometry>,
    ice: Ice,
    board: StoneBoard,
    groups: Groups,
    pattern_state: PatternState,
    inferior: InferiorCells,
    vc: [SimpleVcBuilder; 2],
    to_play: Color,
    last_played: Option<HexPoint>,
    history: Vec<HistoryFrame>,
    backup_ice_info: bool,
}

impl HexBoard {
    pub fn new(geometry: Rc<Geometry>, ice_config: IceConfig) -> HexBoard {
        let board = StoneBoard::new(geometry.clone());
        let groups = Groups::rebuild(&board);
        let pattern_state = PatternState::rebuild(&board);
        HexBoard {
            geometry,
            ice: Ice::new(ice_config),
            board,
            groups,
            pattern_state,
            inferior: InferiorCells::default(),
            vc: [SimpleVcBuilder::new(), SimpleVcBuilder::new()],
            to_play: Color::Black,
            last_played: None,
            history: Vec::new(),
            backup_ice_info: false,
        }
    }

    pub fn set_backup_ice_info(&mut self, enabled: bool) {
        self.backup_ice_info = enabled;
    }

    pub fn ice_config(&self) -> &IceConfig {
        self.ice.config()
    }

    pub fn set_ice_config(&mut self, config: IceConfig) {
        self.ice.set_config(config);
    }

    pub fn geometry(&self) -> &Rc<Geometry> {
        &self.geometry
    }

    pub fn board(&self) -> &StoneBoard {
        &self.board
    }

    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    pub fn pattern_state(&self) -> &PatternState {
        &self.pattern_state
    }

    pub fn inferior(&self) -> &InferiorCells {
        &self.inferior
    }

    pub fn vc(&self, color: Color) -> &SimpleVcBuilder {
        &self.vc[color_idx(color)]
    }

    pub fn to_play(&self) -> Color {
        self.to_play
    }

    pub fn last_played(&self) -> Option<HexPoint> {
        self.last_played
    }

    /// Empty cells that are still worth considering a move on: not dead,
    /// captured, or permanently inferior.
    pub fn playable_cells(&self) -> Bitset {
        self.inferior.playable(&self.board.empty())
    }

    fn resync_derived(&mut self) {
        self.groups = Groups::rebuild(&self.board);
        self.pattern_state = PatternState::rebuild(&self.board);
    }

    fn rebuild_vcs_from_scratch(&mut self) {
        for color in [Color::Black, Color::White] {
            self.vc[color_idx(color)].build(&self.board, &self.groups, color);
        }
    }

    /// Clears history, recomputes ICE, and rebuilds both colours' VCs from
    /// scratch. The entry point for setting up a fresh position.
    pub fn compute_all(&mut self, color_to_play: Color) {
        self.history.clear();
        self.to_play = color_to_play;
        self.last_played = None;
        self.inferior = self.ice.compute_fillin(&mut self.board, color_to_play);
        self.resync_derived();
        self.rebuild_vcs_from_scratch();
    }

    /// Plays a single stone, pushing a history frame so it can be undone.
    pub fn play_move(&mut self, color: Color, cell: HexPoint) {
        self.history.push(HistoryFrame {
            board: self.board.clone(),
            inferior: self.inferior.clone(),
            to_play: self.to_play,
            last_played: self.last_played,
        });

        self.board.set(cell, color);
        self.to_play = -color;
        self.last_played = Some(cell);

        self.inferior = self.ice.compute_fillin(&mut self.board, self.to_play);
        self.resync_derived();

        let filled: Bitset = std::iter::once(cell).chain(self.inferior.all_filled()).collect();
        for c in [Color::Black, Color::White] {
            self.vc[color_idx(c)].add_filled(&self.board, &self.groups, c, &filled);
        }
    }

    /// Plays a batch of stones for decomposition side-solving. Does not
    /// touch the Zobrist hash's role as a transposition key for the parent
    /// search (the hash still changes, since StoneBoard::set always
    /// updates it, but callers solving a decomposed side are expected to
    /// use a dedicated, scoped table rather than the parent's).
    pub fn play_stones(&mut self, color: Color, stones: &Bitset, color_to_play_next: Color) {
        self.history.push(HistoryFrame {
            board: self.board.clone(),
            inferior: self.inferior.clone(),
            to_play: self.to_play,
            last_played: self.last_played,
        });

        for cell in stones.iter() {
            if self.board.is_empty(cell) {
                self.board.set(cell, color);
            }
        }
        self.to_play = color_to_play_next;
        self.last_played = None;

        self.inferior = self.ice.compute_fillin(&mut self.board, self.to_play);
        self.resync_derived();

        let filled: Bitset = stones.union(&self.inferior.all_filled());
        for c in [Color::Black, Color::White] {
            self.vc[color_idx(c)].add_filled(&self.board, &self.groups, c, &filled);
        }
    }

    /// Adds fill-in stones without pushing a new history frame; they are
    /// attached to whatever frame is currently on top (or considered part
    /// of the initial position if history is empty).
    pub fn add_stones(&mut self, color: Color, stones: &Bitset, color_to_play_next: Color) {
        for cell in stones.iter() {
            if self.board.is_empty(cell) {
                self.board.set(cell, color);
            }
        }
        self.to_play = color_to_play_next;

        self.inferior = self.ice.compute_fillin(&mut self.board, self.to_play);
        self.resync_derived();

        for c in [Color::Black, Color::White] {
            self.vc[color_idx(c)].recompute_in_place(&self.board, &self.groups, c);
        }
    }

    /// Pops the most recent history frame, restoring the board and
    /// inferior-cell state exactly as they were. With `backup_ice_info`
    /// enabled, the InferiorCells proven since that frame are merged back
    /// in rather than discarded, on the assumption they remain valid after
    /// removing a stone (sound because ICE's proofs only get weaker, never
    /// invalid, when cells are un-played closer to empty).
    pub fn undo_move(&mut self) -> bool {
        let Some(frame) = self.history.pop() else {
            return false;
        };

        let popped_inferior = std::mem::replace(&mut self.inferior, frame.inferior);
        self.board = frame.board;
        self.to_play = frame.to_play;
        self.last_played = frame.last_played;

        if self.backup_ice_info {
            self.inferior.dead.union_inplace(&popped_inferior.dead.intersect(&self.board.empty()));
        }

        self.resync_derived();
        for color in [Color::Black, Color::White] {
            self.vc[color_idx(color)].revert();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_then_undo_restores_the_board() {
        let g = Rc::new(Geometry::new(5, 5));
        let mut hb = HexBoard::new(g.clone(), IceConfig::default());
        hb.compute_all(Color::Black);
        let before_hash = hb.board().hash();

        hb.play_move(Color::Black, g.cell(2, 2));
        assert_ne!(hb.board().hash(), before_hash);

        assert!(hb.undo_move());
        assert_eq!(hb.board().hash(), before_hash);
        assert_eq!(hb.to_play(), Color::Black);
    }

    #[test]
    fn playable_cells_excludes_corners() {
        let g = Rc::new(Geometry::new(5, 5));
        let mut hb = HexBoard::new(g.clone(), IceConfig::default());
        hb.compute_all(Color::Black);
        let playable = hb.playable_cells();
        assert!(!playable.contains(g.cell(0, 0)));
    }

    #[test]
    fn undo_with_no_history_is_a_no_op() {
        let g = Rc::new(Geometry::new(5, 5));
        let mut hb = HexBoard::new(g.clone(), IceConfig::default());
        hb.compute_all(Color::Black);
        assert!(!hb.undo_move());
    }
}
