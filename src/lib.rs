#![allow(dead_code)]

pub mod hex;
pub mod solver;
pub mod shell;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;

        pub use std::collections::{BTreeSet, HashMap, HashSet};
    }
}

pub mod prelude {
    pub use super::hex::prelude::*;
    pub use super::shell::*;
    pub use super::solver::prelude::*;
    pub use super::utils::prelude::*;
}
