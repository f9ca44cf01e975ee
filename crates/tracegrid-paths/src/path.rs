//! Path reconstruction from a predecessor map.
//!
//! The same walk serves the final path of a run and "ghost" paths: routes
//! from the start to any other node the run reached, read straight out of
//! that run's predecessor map without searching again.

use tracegrid_core::{Grid, Pos, WeightGrid};

use crate::heuristic::Heuristic;
use crate::neighbors::Movement;
use crate::node::SearchWeights;

/// One node of a reconstructed path, ordered start → target.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathEntry {
    pub pos: Pos,
    /// The previous node on the path; `None` for the first entry.
    pub prev: Option<Pos>,
    /// Index along the path, 0 at the start.
    pub step: usize,
    /// Cost of entering this cell from `prev`: its weight times the move
    /// multiplier. For the first entry, the cell's own weight.
    pub edge_cost: f64,
    pub g: f64,
    pub h: f64,
    pub f: f64,
}

/// Inputs shared by every reconstruction from one search run.
pub struct PathContext<'a, H: ?Sized> {
    pub predecessors: &'a Grid<Option<Pos>>,
    pub costs: &'a Grid<f64>,
    pub weights_grid: &'a WeightGrid,
    pub heuristic: &'a H,
    pub goal: Pos,
    pub weights: SearchWeights,
    pub movement: Movement,
}

/// Walk the predecessor map back from `target` and return the path in
/// start → target order.
///
/// The walk stops at the first position without a predecessor. A target
/// outside the grid yields an empty path.
///
/// # Panics
///
/// Panics if the predecessor map contains a cycle, which a search run never
/// produces.
pub fn reconstruct_path<H: Heuristic + ?Sized>(
    target: Pos,
    ctx: &PathContext<'_, H>,
) -> Vec<PathEntry> {
    if !ctx.predecessors.contains(target) {
        return Vec::new();
    }

    let mut chain = vec![target];
    let mut cur = target;
    while let Some(&Some(prev)) = ctx.predecessors.at(cur) {
        assert!(
            chain.len() <= ctx.predecessors.len(),
            "predecessor cycle through ({cur})"
        );
        chain.push(prev);
        cur = prev;
    }
    chain.reverse();

    let mut path = Vec::with_capacity(chain.len());
    let mut prev = None;
    for (step, &pos) in chain.iter().enumerate() {
        let g = ctx.costs.at(pos).copied().unwrap_or(f64::INFINITY);
        let h = ctx.heuristic.estimate(pos, ctx.goal);
        let weight = ctx.weights_grid.weight(pos).unwrap_or(0.0);
        let multiplier = prev.map_or(1.0, |from| ctx.movement.step_multiplier(from, pos));
        path.push(PathEntry {
            pos,
            prev,
            step,
            edge_cost: weight * multiplier,
            g,
            h,
            f: ctx.weights.f_cost(g, h),
        });
        prev = Some(pos);
    }
    path
}

/// Sum of the step costs along a path. For a path produced by a search run
/// this equals the target's `g`.
pub fn path_cost(path: &[PathEntry]) -> f64 {
    path.iter().map(|e| e.edge_cost).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::manhattan;
    use crate::neighbors::CornerCutting;
    use tracegrid_core::parse_weights;

    /// A 1x4 corridor searched from (0,0), with hand-built bookkeeping.
    fn corridor() -> (WeightGrid, Grid<Option<Pos>>, Grid<f64>) {
        let grid = parse_weights("1 2 3 4").unwrap();
        let mut preds = Grid::new(1, 4, None);
        let mut costs = Grid::new(1, 4, f64::INFINITY);
        costs.set(Pos::new(0, 0), 1.0);
        for c in 1..4 {
            preds.set(Pos::new(0, c), Some(Pos::new(0, c - 1)));
            costs.set(Pos::new(0, c), costs[Pos::new(0, c - 1)] + f64::from(c + 1));
        }
        (grid, preds, costs)
    }

    #[test]
    fn walks_back_to_start() {
        let (grid, preds, costs) = corridor();
        let ctx = PathContext {
            predecessors: &preds,
            costs: &costs,
            weights_grid: &grid,
            heuristic: &manhattan,
            goal: Pos::new(0, 3),
            weights: SearchWeights::astar(),
            movement: Movement::cardinal(),
        };
        let path = reconstruct_path(Pos::new(0, 3), &ctx);
        let cells: Vec<Pos> = path.iter().map(|e| e.pos).collect();
        assert_eq!(
            cells,
            vec![Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2), Pos::new(0, 3)]
        );
        assert_eq!(path[0].prev, None);
        assert_eq!(path[0].step, 0);
        assert_eq!(path[2].prev, Some(Pos::new(0, 1)));
        assert_eq!(path[3].step, 3);
        assert_eq!(path[3].g, 10.0);
        assert_eq!(path[3].h, 0.0);
        assert_eq!(path[1].h, 2.0);
        assert_eq!(path[1].f, 5.0);
        assert_eq!(path_cost(&path), 10.0);
    }

    #[test]
    fn ghost_path_to_intermediate_node() {
        let (grid, preds, costs) = corridor();
        let ctx = PathContext {
            predecessors: &preds,
            costs: &costs,
            weights_grid: &grid,
            heuristic: &manhattan,
            goal: Pos::new(0, 3),
            weights: SearchWeights::dijkstra(),
            movement: Movement::cardinal(),
        };
        let path = reconstruct_path(Pos::new(0, 1), &ctx);
        assert_eq!(path.len(), 2);
        assert_eq!(path[1].g, 3.0);
        assert_eq!(path[1].f, 3.0);
    }

    #[test]
    fn start_alone_and_out_of_bounds() {
        let (grid, preds, costs) = corridor();
        let ctx = PathContext {
            predecessors: &preds,
            costs: &costs,
            weights_grid: &grid,
            heuristic: &manhattan,
            goal: Pos::new(0, 3),
            weights: SearchWeights::astar(),
            movement: Movement::cardinal(),
        };
        assert_eq!(reconstruct_path(Pos::new(0, 0), &ctx).len(), 1);
        assert!(reconstruct_path(Pos::new(3, 3), &ctx).is_empty());
    }

    #[test]
    fn diagonal_steps_carry_multiplier() {
        let grid = parse_weights("2 1\n1 3").unwrap();
        let mut preds = Grid::new(2, 2, None);
        preds.set(Pos::new(1, 1), Some(Pos::new(0, 0)));
        let mut costs = Grid::new(2, 2, f64::INFINITY);
        costs.set(Pos::new(0, 0), 2.0);
        costs.set(Pos::new(1, 1), 2.0 + 3.0 * 1.5);
        let ctx = PathContext {
            predecessors: &preds,
            costs: &costs,
            weights_grid: &grid,
            heuristic: &manhattan,
            goal: Pos::new(1, 1),
            weights: SearchWeights::astar(),
            movement: Movement::diagonal(CornerCutting::Lax).with_multiplier(1.5),
        };
        let path = reconstruct_path(Pos::new(1, 1), &ctx);
        assert_eq!(path[0].edge_cost, 2.0);
        assert_eq!(path[1].edge_cost, 4.5);
        assert_eq!(path_cost(&path), path[1].g);
    }

    #[test]
    #[should_panic(expected = "predecessor cycle")]
    fn cycle_panics() {
        let grid = parse_weights("1 1").unwrap();
        let mut preds = Grid::new(1, 2, None);
        preds.set(Pos::new(0, 0), Some(Pos::new(0, 1)));
        preds.set(Pos::new(0, 1), Some(Pos::new(0, 0)));
        let costs = Grid::new(1, 2, 1.0);
        let ctx = PathContext {
            predecessors: &preds,
            costs: &costs,
            weights_grid: &grid,
            heuristic: &manhattan,
            goal: Pos::new(0, 1),
            weights: SearchWeights::astar(),
            movement: Movement::cardinal(),
        };
        reconstruct_path(Pos::new(0, 1), &ctx);
    }
}
