use std::ops::Neg;

use crate::utils::prelude::*;

/// The largest board this engine is prepared to allocate bitsets for.
///
/// Real play happens on boards up to 11x11; we budget headroom to 19x19
/// (the largest size commonly discussed in the Hex literature) plus the
/// four edge sentinels.
pub const MAX_DIM: usize = 19;
pub const MAX_CELLS: usize = MAX_DIM * MAX_DIM + 4;

/// A player colour. BLACK connects north-south, WHITE connects east-west.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    Black = 0,
    White = 1,
    Empty = 2,
    Dead = 3,
}

impl Color {
    /// Notates the colour using the conventional single-letter shorthand.
    pub fn notate(&self) -> &'static str {
        match self {
            Color::Black => "b",
            Color::White => "w",
            Color::Empty => ".",
            Color::Dead => "d",
        }
    }

    /// Parses a colour from its shorthand.
    pub fn parse(s: &str) -> Result<Color> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Color::Black),
            "w" | "white" => Ok(Color::White),
            _ => Err(anyhow!("invalid notation {s} for colour")),
        }
    }

    /// Whether this colour is one of the two players (not EMPTY/DEAD).
    pub fn is_player(&self) -> bool {
        matches!(self, Color::Black | Color::White)
    }
}

impl Neg for Color {
    type Output = Color;
    fn neg(self) -> Self::Output {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
            other => other,
        }
    }
}

/// The four edge sentinels, in a fixed order relative to the end of the interior grid.
#[repr(usize)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeSlot {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
}

pub const NUM_EDGES: usize = 4;
