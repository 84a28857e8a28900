use clap::Parser;

use crate::solver::prelude::SolverConfig;

#[derive(Clone, Debug, Parser)]
pub struct HexShellOptions {
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Initial board size as `<width>x<height>`, e.g. `11x11`.
    #[arg(short, long, default_value = "11x11")]
    pub board_size: String,

    /// Path to a position database file; omit to run without persistence.
    #[arg(long)]
    pub db_path: Option<String>,

    /// Transposition table size in slots (rounded up to a power of two).
    #[arg(long)]
    pub tt_size: Option<usize>,

    /// Per-solve wall-clock budget in milliseconds; 0 (default) is unlimited.
    #[arg(short, long, default_value_t = 0)]
    pub time_limit: u64,

    #[arg(long, default_value_t = false)]
    pub no_decompositions: bool,

    #[arg(long, default_value_t = false)]
    pub no_shrink_proofs: bool,
}

impl HexShellOptions {
    pub fn solver_config(&self) -> SolverConfig {
        let mut config = SolverConfig::default();
        config.time_limit_ms = self.time_limit;
        if self.no_decompositions {
            config.use_decompositions = false;
        }
        if self.no_shrink_proofs {
            config.shrink_proofs = false;
        }
        config
    }

    /// Parses `board_size` into `(width, height)`, defaulting to 11x11 if
    /// the string isn't in `<w>x<h>` form.
    pub fn parse_board_size(&self) -> (usize, usize) {
        self.board_size
            .split_once(['x', 'X'])
            .and_then(|(w, h)| Some((w.trim().parse().ok()?, h.trim().parse().ok()?)))
            .unwrap_or((11, 11))
    }
}
