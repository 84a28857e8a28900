/*
 *  Core Hex position model: geometry, the stone board, group structure,
 *  the inferior cell engine, virtual connections, and the composed HexBoard.
 */

pub mod board;
pub mod consts;
pub mod coords;
pub mod ice;
pub mod sets;
pub mod vc;

pub mod prelude {
    pub(crate) use crate::utils::prelude::*;

    pub use super::board::{Groups, HexBoard, PatternState, StoneBoard};
    pub use super::consts::*;
    pub use super::coords::{Geometry, HexPoint};
    pub use super::ice::{Ice, IceConfig, InferiorCells, Witness};
    pub use super::sets::{Bitset, SetOps};
    pub use super::vc::{SimpleVcBuilder, VcBuilder, VcSet};
}
