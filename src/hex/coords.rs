use crate::hex::consts::*;
use crate::hex::sets::Bitset;
use crate::utils::prelude::*;

/// A dense integer index identifying either an interior (row, col) cell or
/// one of the four edge sentinels. Cheap to copy, cheap to use as a bitset
/// index.
pub type HexPoint = usize;

/// Axial offsets for a hex grid laid out as rows of a rhombus, in the fixed
/// canonical order the pattern ring matcher rotates through.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 6] = [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0)];

/// Precomputed geometry for a width x height board: row/col <-> HexPoint
/// mapping, the edge sentinel indices, and the full neighbour table.
///
/// Built once per board size and shared (by value, it is cheap: a handful
/// of Vecs) by every component that needs adjacency.
#[derive(Clone, Debug)]
pub struct Geometry {
    pub width: usize,
    pub height: usize,
    pub num_cells: usize,
    neighbours: Vec<Bitset>,
    rc: Vec<(usize, usize)>,
}

impl Geometry {
    /// Builds the geometry for a width x height board. Panics if the board
    /// would not fit inside MAX_CELLS; the caller is expected to validate
    /// user-supplied sizes before construction.
    pub fn new(width: usize, height: usize) -> Geometry {
        assert!(width >= 1 && height >= 1, "board must have positive dimensions");
        assert!(
            width * height + NUM_EDGES <= MAX_CELLS,
            "board {width}x{height} exceeds the compiled-in MAX_CELLS budget"
        );

        let num_cells = width * height + NUM_EDGES;
        let mut rc = vec![(0usize, 0usize); num_cells];
        for r in 0..height {
            for c in 0..width {
                rc[r * width + c] = (r, c);
            }
        }

        let mut geometry = Geometry {
            width,
            height,
            num_cells,
            neighbours: vec![Bitset::default(); num_cells],
            rc,
        };
        geometry.build_neighbours();
        geometry
    }

    pub fn north(&self) -> HexPoint {
        self.width * self.height + EdgeSlot::North as usize
    }
    pub fn south(&self) -> HexPoint {
        self.width * self.height + EdgeSlot::South as usize
    }
    pub fn east(&self) -> HexPoint {
        self.width * self.height + EdgeSlot::East as usize
    }
    pub fn west(&self) -> HexPoint {
        self.width * self.height + EdgeSlot::West as usize
    }

    /// The pair of edges owned by a given colour (BLACK: north/south, WHITE: east/west).
    pub fn edges_of(&self, color: Color) -> (HexPoint, HexPoint) {
        match color {
            Color::Black => (self.north(), self.south()),
            Color::White => (self.east(), self.west()),
            _ => panic!("only BLACK and WHITE own edges"),
        }
    }

    pub fn is_edge(&self, p: HexPoint) -> bool {
        p >= self.width * self.height
    }

    pub fn cell(&self, row: usize, col: usize) -> HexPoint {
        debug_assert!(row < self.height && col < self.width);
        row * self.width + col
    }

    pub fn row_col(&self, p: HexPoint) -> Option<(usize, usize)> {
        if self.is_edge(p) {
            None
        } else {
            Some(self.rc[p])
        }
    }

    /// All interior (non-edge) cells, in row-major order.
    pub fn interior_cells(&self) -> impl Iterator<Item = HexPoint> + '_ {
        0..(self.width * self.height)
    }

    /// All cells, including edges.
    pub fn all_cells(&self) -> impl Iterator<Item = HexPoint> {
        0..self.num_cells
    }

    pub fn neighbours(&self, p: HexPoint) -> &Bitset {
        &self.neighbours[p]
    }

    /// The neighbour of `p` in canonical direction `dir` (0..6, same order
    /// as `NEIGHBOR_OFFSETS`), resolving off-board offsets to whichever edge
    /// sentinel they fall past. Only defined for interior cells: the ring
    /// matcher never walks outward from an edge sentinel.
    pub fn directional_neighbour(&self, p: HexPoint, dir: usize) -> HexPoint {
        let Some((r, c)) = self.row_col(p) else {
            panic!("directional_neighbour is only defined for interior cells");
        };
        let (dr, dc) = NEIGHBOR_OFFSETS[dir];
        let nr = r as isize + dr;
        let nc = c as isize + dc;
        if nr >= 0 && nc >= 0 && (nr as usize) < self.height && (nc as usize) < self.width {
            return self.cell(nr as usize, nc as usize);
        }
        if nr < 0 {
            self.north()
        } else if nr as usize >= self.height {
            self.south()
        } else if nc < 0 {
            self.west()
        } else {
            self.east()
        }
    }

    /// Squared Euclidean distance from the board centre; used for the
    /// centre-distance move-ordering tiebreak.
    pub fn squared_distance_from_center(&self, p: HexPoint) -> i64 {
        let Some((r, c)) = self.row_col(p) else {
            return i64::MAX;
        };
        let cr = (self.height as f64 - 1.0) / 2.0;
        let cc = (self.width as f64 - 1.0) / 2.0;
        let dr = r as f64 - cr;
        let dc = c as f64 - cc;
        ((dr * dr + dc * dc) * 1000.0) as i64
    }

    /// Notates a cell in the conventional `<letter-column><1-based row>` form,
    /// e.g. a1, c3, k11. Edge sentinels notate as their slot name.
    pub fn notate(&self, p: HexPoint) -> String {
        if let Some((r, c)) = self.row_col(p) {
            format!("{}{}", column_letters(c), r + 1)
        } else if p == self.north() {
            "north".to_owned()
        } else if p == self.south() {
            "south".to_owned()
        } else if p == self.east() {
            "east".to_owned()
        } else {
            "west".to_owned()
        }
    }

    /// Parses a cell in `<letters><digits>` notation.
    pub fn parse(&self, s: &str) -> Result<HexPoint> {
        let split_at = s.find(|ch: char| ch.is_ascii_digit()).ok_or_else(|| {
            anyhow!("invalid cell notation {s}: expected a column letter followed by a row number")
        })?;
        let (letters, digits) = s.split_at(split_at);
        let col = parse_column_letters(letters)?;
        let row: usize = digits
            .parse::<usize>()
            .map_err(|_| anyhow!("invalid row number in {s}"))?;
        if row == 0 {
            return Err(anyhow!("row numbers are 1-based, received 0 in {s}"));
        }
        let row = row - 1;
        if row >= self.height || col >= self.width {
            return Err(anyhow!("cell {s} out of bounds for a {}x{} board", self.width, self.height));
        }
        Ok(self.cell(row, col))
    }

    fn build_neighbours(&mut self) {
        // Each interior cell has up to six neighbours, one per canonical
        // direction.
        for r in 0..self.height {
            for c in 0..self.width {
                let p = self.cell(r, c);
                let mut set = Bitset::default();
                for (dr, dc) in NEIGHBOR_OFFSETS {
                    let nr = r as isize + dr;
                    let nc = c as isize + dc;
                    if nr >= 0 && nc >= 0 && (nr as usize) < self.height && (nc as usize) < self.width {
                        set.insert(self.cell(nr as usize, nc as usize));
                    }
                }
                if r == 0 {
                    set.insert(self.north());
                }
                if r == self.height - 1 {
                    set.insert(self.south());
                }
                if c == 0 {
                    set.insert(self.west());
                }
                if c == self.width - 1 {
                    set.insert(self.east());
                }
                self.neighbours[p] = set;
            }
        }

        // Each edge sentinel neighbours every interior cell along its border.
        let mut north_set = Bitset::default();
        let mut south_set = Bitset::default();
        for c in 0..self.width {
            north_set.insert(self.cell(0, c));
            south_set.insert(self.cell(self.height - 1, c));
        }
        let mut east_set = Bitset::default();
        let mut west_set = Bitset::default();
        for r in 0..self.height {
            east_set.insert(self.cell(r, self.width - 1));
            west_set.insert(self.cell(r, 0));
        }
        self.neighbours[self.north()] = north_set;
        self.neighbours[self.south()] = south_set;
        self.neighbours[self.east()] = east_set;
        self.neighbours[self.west()] = west_set;
    }
}

/// 0 -> a, 1 -> b, ..., 25 -> z, 26 -> aa, ...
fn column_letters(mut col: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'a' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn parse_column_letters(s: &str) -> Result<usize> {
    if s.is_empty() || !s.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(anyhow!("invalid column letters {s}"));
    }
    let mut col = 0usize;
    for ch in s.chars() {
        let digit = (ch.to_ascii_lowercase() as u8 - b'a') as usize + 1;
        col = col * 26 + digit;
    }
    Ok(col - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notates_round_trip() {
        let g = Geometry::new(11, 11);
        for p in g.interior_cells() {
            let notated = g.notate(p);
            let parsed = g.parse(&notated).unwrap();
            assert_eq!(p, parsed);
        }
    }

    #[test]
    fn edges_border_the_right_rows_and_cols() {
        let g = Geometry::new(6, 7);
        assert!(g.neighbours(g.north()).contains(g.cell(0, 0)));
        assert!(!g.neighbours(g.north()).contains(g.cell(1, 0)));
        assert!(g.neighbours(g.west()).contains(g.cell(3, 0)));
        assert!(g.neighbours(g.east()).contains(g.cell(3, g.width - 1)));
    }

    #[test]
    fn interior_cell_has_up_to_six_neighbours() {
        let g = Geometry::new(11, 11);
        let center = g.cell(5, 5);
        assert_eq!(g.neighbours(center).len(), 6);
    }
}
