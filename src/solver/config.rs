use crate::hex::ice::IceConfig;

/// Move-ordering bitflags, settable independently via `param_solver
/// move_ordering <mask>`.
pub mod order_flags {
    pub const FROM_CENTER: u32 = 1 << 0;
    pub const WITH_RESIST: u32 = 1 << 1;
    pub const WITH_MUSTPLAY: u32 = 1 << 2;
}

/// Every tunable the solver core reads, replacing the teacher's global
/// namespace of constants with a single value threaded through every
/// constructor (HexBoard, Ice, DfsSolver, VCBuilder).
#[derive(Clone, Copy, Debug)]
pub struct SolverConfig {
    pub ice: IceConfig,

    pub use_decompositions: bool,
    pub shrink_proofs: bool,
    pub backup_ice_info: bool,
    pub move_ordering: u32,

    /// How often (in nodes) to emit a progress log line.
    pub progress_depth: u32,
    /// How often (in nodes) to refresh the TT with partial work, in case of
    /// an abort mid-search.
    pub update_depth: u32,
    /// Maximum recursion depth; 0 means unlimited.
    pub depth_limit: u32,
    /// Wall-clock budget in milliseconds; 0 means unlimited.
    pub time_limit_ms: u64,

    /// If true, re-solve the root even when the TT already has an entry
    /// for it (used for timing experiments).
    pub root_resolve: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            ice: IceConfig::default(),
            use_decompositions: true,
            shrink_proofs: true,
            backup_ice_info: false,
            move_ordering: order_flags::FROM_CENTER | order_flags::WITH_RESIST | order_flags::WITH_MUSTPLAY,
            progress_depth: 0,
            update_depth: 0,
            depth_limit: 0,
            time_limit_ms: 0,
            root_resolve: false,
        }
    }
}

impl SolverConfig {
    /// Applies a `param_solver_ice <key> <value>` command, returning an
    /// error for an unrecognized key rather than silently ignoring it.
    pub fn set_ice_param(&mut self, key: &str, value: &str) -> crate::utils::prelude::Result<()> {
        let on = parse_bool(value)?;
        match key {
            "find_permanently_inferior" => self.ice.find_permanently_inferior = on,
            "find_all_pattern_killers" => self.ice.find_all_pattern_killers = on,
            "backup_opponent_dead" => self.ice.backup_opponent_dead = on,
            "iterative_dead_regions" => self.ice.iterative_dead_regions = on,
            other => return Err(crate::utils::prelude::anyhow!("unknown ICE parameter {other}")),
        }
        Ok(())
    }

    /// Applies a `param_solver <key> <value>` command.
    pub fn set_solver_param(&mut self, key: &str, value: &str) -> crate::utils::prelude::Result<()> {
        match key {
            "use_decompositions" => self.use_decompositions = parse_bool(value)?,
            "shrink_proofs" => self.shrink_proofs = parse_bool(value)?,
            "backup_ice_info" => self.backup_ice_info = parse_bool(value)?,
            "move_ordering" => {
                self.move_ordering = value
                    .parse()
                    .map_err(|_| crate::utils::prelude::anyhow!("move_ordering expects an integer bitmask"))?
            }
            "progress_depth" => self.progress_depth = parse_u32(value)?,
            "update_depth" => self.update_depth = parse_u32(value)?,
            "depth_limit" => self.depth_limit = parse_u32(value)?,
            "time_limit" => self.time_limit_ms = value.parse().map_err(|_| crate::utils::prelude::anyhow!("time_limit expects milliseconds"))?,
            other => return Err(crate::utils::prelude::anyhow!("unknown solver parameter {other}")),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> crate::utils::prelude::Result<bool> {
    match value {
        "0" | "false" | "off" => Ok(false),
        "1" | "true" | "on" => Ok(true),
        other => Err(crate::utils::prelude::anyhow!("expected a boolean, got {other}")),
    }
}

fn parse_u32(value: &str) -> crate::utils::prelude::Result<u32> {
    value.parse().map_err(|_| crate::utils::prelude::anyhow!("expected an integer, got {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ice_param_roundtrip() {
        let mut config = SolverConfig::default();
        config.set_ice_param("find_permanently_inferior", "0").unwrap();
        assert!(!config.ice.find_permanently_inferior);
        config.set_ice_param("find_permanently_inferior", "1").unwrap();
        assert!(config.ice.find_permanently_inferior);
    }

    #[test]
    fn unknown_param_is_an_error() {
        let mut config = SolverConfig::default();
        assert!(config.set_solver_param("not_a_real_param", "1").is_err());
    }
}
