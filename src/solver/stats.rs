/// Per-solve counters, logged at `log::info!` on exit for diagnostics.
/// Histogrammed-by-depth tracking is intentionally left out: the counters
/// below are what the shell's `solve-state` command reports, and per-depth
/// breakdowns are a natural follow-up if a caller needs them.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stats {
    pub states: u64,
    pub explored: u64,
    pub expanded: u64,
    /// The perfect-ordering lower bound: how many children a node would
    /// have had to expand if move ordering always tried the refuting (or
    /// winning) move first. A Win-resolving node contributes 1 (only the
    /// move that was found to win is ever necessary); a Loss-resolving node
    /// contributes its full candidate count (every reply must be refuted
    /// regardless of order). Comparing this against `expanded` measures how
    /// much the real move ordering cost over the theoretical best case.
    pub minimal: u64,
    pub decompositions: u64,
    pub decompositions_won: u64,
    pub moves_to_consider: u64,
    pub winning_expanded: u64,
    /// The number of candidates actually tried at nodes that resolved as a
    /// win, winner included: 1 plus however many losing orderings were tried
    /// before it. Always `<= expanded` restricted to winning nodes; equal to
    /// it only when the node's win was found on the last candidate tried.
    pub branches_to_win: u64,
    pub pruned: u64,
    pub shrunk: u64,
    pub cells_removed: u64,
}

impl Stats {
    pub fn merge(&mut self, other: &Stats) {
        self.states += other.states;
        self.explored += other.explored;
        self.expanded += other.expanded;
        self.minimal += other.minimal;
        self.decompositions += other.decompositions;
        self.decompositions_won += other.decompositions_won;
        self.moves_to_consider += other.moves_to_consider;
        self.winning_expanded += other.winning_expanded;
        self.branches_to_win += other.branches_to_win;
        self.pruned += other.pruned;
        self.shrunk += other.shrunk;
        self.cells_removed += other.cells_removed;
    }

    pub fn log_summary(&self, label: &str) {
        log::info!(
            "{label}: states={} explored={} expanded={} minimal={} branches_to_win={} decomp={}/{} pruned={} shrunk={} cells_removed={}",
            self.states,
            self.explored,
            self.expanded,
            self.minimal,
            self.branches_to_win,
            self.decompositions_won,
            self.decompositions,
            self.pruned,
            self.shrunk,
            self.cells_removed,
        );
    }
}
