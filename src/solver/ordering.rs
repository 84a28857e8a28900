use std::collections::VecDeque;

use crate::hex::board::StoneBoard;
use crate::hex::consts::Color;
use crate::hex::coords::HexPoint;
use crate::hex::sets::{Bitset, SetOps};

use super::config::{order_flags, SolverConfig};

/// Hop-distance from `start` to every cell reachable through empty-or-own
/// cells, stopping travel at opponent stones (not at DEAD, since a dead
/// cell still marks physical distance even though it can't be played).
fn hop_distances(board: &StoneBoard, start: HexPoint, color: Color) -> Vec<Option<u32>> {
    let geometry = board.geometry();
    let mut dist = vec![None; geometry.num_cells];
    let mut queue = VecDeque::new();
    dist[start] = Some(0);
    queue.push_back(start);
    while let Some(p) = queue.pop_front() {
        let d = dist[p].unwrap();
        for q in geometry.neighbours(p).iter() {
            if dist[q].is_some() {
                continue;
            }
            let blocked = board.color_at(q) == -color;
            if !blocked {
                dist[q] = Some(d + 1);
                queue.push_back(q);
            }
        }
    }
    dist
}

/// A cheap proxy for electrical resistance: the inverse hop-distance from a
/// cell to each of `color`'s two edges, combined multiplicatively. Higher
/// is better. This stands in for a full linear-system resistance solve
/// (see SPEC_FULL.md §4.6).
pub fn resistance_score(board: &StoneBoard, cell: HexPoint, color: Color) -> f64 {
    let (e1, e2) = board.geometry().edges_of(color);
    let d1 = hop_distances(board, e1, color)[cell];
    let d2 = hop_distances(board, e2, color)[cell];
    match (d1, d2) {
        (Some(d1), Some(d2)) => 1.0 / ((d1 as f64 + 1.0) * (d2 as f64 + 1.0)),
        _ => 0.0,
    }
}

/// Ranks candidates by the static (non-recursive) part of move ordering:
/// resistance first if enabled, then center distance, both as
/// higher/closer-is-better tiebreaks. The mustplay-probing refinement
/// (`ORDER_WITH_MUSTPLAY`) requires playing and undoing moves against a
/// live board and TT, so it lives in `dfs::order_moves` instead.
pub fn rank_by_center_and_resistance(board: &StoneBoard, config: &SolverConfig, candidates: &Bitset, mover: Color) -> Vec<HexPoint> {
    let geometry = board.geometry();
    let mut scored: Vec<(HexPoint, f64, i64)> = candidates
        .iter()
        .map(|p| {
            let resist = if config.move_ordering & order_flags::WITH_RESIST != 0 {
                resistance_score(board, p, mover)
            } else {
                0.0
            };
            let center = if config.move_ordering & order_flags::FROM_CENTER != 0 {
                -geometry.squared_distance_from_center(p)
            } else {
                0
            };
            (p, resist, center)
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then(b.2.cmp(&a.2)).then(a.0.cmp(&b.0)));
    scored.into_iter().map(|(p, _, _)| p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::coords::Geometry;
    use std::rc::Rc;

    #[test]
    fn resistance_favors_cells_closer_to_both_edges() {
        let g = Rc::new(Geometry::new(7, 7));
        let board = StoneBoard::new(g.clone());
        let center = g.cell(3, 3);
        let corner = g.cell(0, 0);
        assert!(resistance_score(&board, center, Color::Black) >= resistance_score(&board, corner, Color::Black));
    }

    #[test]
    fn ranking_is_stable_and_covers_every_candidate() {
        let g = Rc::new(Geometry::new(5, 5));
        let board = StoneBoard::new(g.clone());
        let config = SolverConfig::default();
        let candidates: Bitset = g.interior_cells().collect();
        let ranked = rank_by_center_and_resistance(&board, &config, &candidates, Color::Black);
        assert_eq!(ranked.len(), candidates.len());
    }
}
