/*
 *  The search layer: solver configuration, transposition/position-db
 *  memoization, move ordering, proof shrinking, and the mustplay-restricted
 *  DFS itself.
 */

mod config;
mod dfs;
mod ordering;
mod positiondb;
mod proof;
mod stats;
mod transposition;

pub mod prelude {
    pub use super::config::{order_flags, SolverConfig};
    pub use super::dfs::{DfsSolver, SolveOutcome, SolveResult};
    pub use super::ordering::{rank_by_center_and_resistance, resistance_score};
    pub use super::positiondb::PositionDb;
    pub use super::proof::shrink_proof;
    pub use super::stats::Stats;
    pub use super::transposition::{DfsData, TransTable};
}
