//! Generalized best-first search with a full replay record.
//!
//! One engine covers BFS, Dijkstra, greedy best-first and A*: nodes are
//! ranked by `f = g_weight * g + h_weight * h` (see [`SearchWeights`]).
//! Besides the final path, a run records every expansion in order, the
//! sorted open set before each expansion, and every cost improvement per
//! cell, enough to replay the search at any point.

use std::fmt;

use tracegrid_core::{Grid, GridError, Pos, WeightGrid};

use crate::heap::HeapEntry;
use crate::heuristic::Heuristic;
use crate::neighbors::{Movement, Neighbors};
use crate::node::{SearchNode, SearchWeights};
use crate::path::{PathContext, PathEntry, reconstruct_path};
use crate::queue::PriorityQueue;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Caller-tunable search settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    pub weights: SearchWeights,
    pub movement: Movement,
}

impl SearchConfig {
    /// Create a config.
    pub const fn new(weights: SearchWeights, movement: Movement) -> Self {
        Self { weights, movement }
    }

    /// Check the weights and diagonal multiplier.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.weights.is_valid() {
            return Err(SearchError::InvalidWeights {
                g_weight: self.weights.g_weight,
                h_weight: self.weights.h_weight,
            });
        }
        if let Some(rule) = self.movement.diagonal {
            if !(rule.multiplier.is_finite() && rule.multiplier > 0.0) {
                return Err(SearchError::InvalidMultiplier(rule.multiplier));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Which end of the search a position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Goal => f.write_str("goal"),
        }
    }
}

/// Reasons a search run could not produce a result.
///
/// An unreachable goal is not an error: it yields a [`SearchResult`] with
/// `goal_found == false` and a fallback target.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Both weights are zero, or one is negative or not finite.
    InvalidWeights { g_weight: f64, h_weight: f64 },
    /// The diagonal multiplier is not a positive finite number.
    InvalidMultiplier(f64),
    /// The weight grid is empty or holds a negative or non-finite weight.
    InvalidGrid(GridError),
    /// An endpoint lies outside the grid.
    OutOfBounds { endpoint: Endpoint, pos: Pos },
    /// An endpoint lies on a wall.
    Impassable { endpoint: Endpoint, pos: Pos },
    /// The engine broke one of its own invariants. This is a defect, not a
    /// caller mistake.
    Invariant(&'static str),
}

impl SearchError {
    /// Whether the error was caused by the caller's input.
    pub fn is_config(&self) -> bool {
        !matches!(self, Self::Invariant(_))
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWeights { g_weight, h_weight } => write!(
                f,
                "search: invalid weights g={g_weight} h={h_weight} (need non-negative, not both zero)"
            ),
            Self::InvalidMultiplier(m) => {
                write!(f, "search: invalid diagonal multiplier {m}")
            }
            Self::InvalidGrid(err) => write!(f, "search: {err}"),
            Self::OutOfBounds { endpoint, pos } => {
                write!(f, "search: {endpoint} ({pos}) is outside the grid")
            }
            Self::Impassable { endpoint, pos } => {
                write!(f, "search: {endpoint} ({pos}) is a wall")
            }
            Self::Invariant(what) => write!(f, "search: internal invariant violated: {what}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidGrid(err) => Some(err),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Result bundle
// ---------------------------------------------------------------------------

/// One improvement of a cell's best known cost.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostUpdate {
    /// Number of expansions performed when the improvement was found
    /// (1 for neighbours of the start).
    pub step: usize,
    pub g: f64,
}

/// Everything a search run produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    pub start: Pos,
    pub goal: Pos,
    pub weights: SearchWeights,
    pub movement: Movement,
    pub goal_found: bool,
    /// Path to the goal, or to the fallback when the goal was not reached.
    pub path: Vec<PathEntry>,
    /// Nodes in expansion order.
    pub visited: Vec<SearchNode>,
    /// Sorted open set taken just before each expansion; parallel to
    /// `visited`, so each snapshot includes the node about to be expanded.
    pub frontier_history: Vec<Vec<SearchNode>>,
    /// Best known cost per cell, infinite where never reached (`null` once
    /// serialized).
    #[cfg_attr(feature = "serde", serde(with = "unreached_as_null"))]
    pub costs: Grid<f64>,
    /// Every improvement of each cell's cost, oldest first.
    pub cost_history: Grid<Vec<CostUpdate>>,
    /// Relaxations performed while expanding `visited[i]`.
    pub update_counts: Vec<usize>,
    /// Substitute target chosen when the goal was not reached.
    pub fallback: Option<Pos>,
    /// The node that last improved each cell's cost.
    pub predecessors: Grid<Option<Pos>>,
    pub total_cost: f64,
}

impl SearchResult {
    /// Number of expansions.
    #[inline]
    pub fn steps(&self) -> usize {
        self.visited.len()
    }

    /// The node the path leads to: the goal, or the fallback.
    pub fn target(&self) -> Pos {
        self.fallback.unwrap_or(self.goal)
    }

    /// Cost improvements recorded for `p`, oldest first.
    pub fn cost_history_at(&self, p: Pos) -> &[CostUpdate] {
        self.cost_history.at(p).map_or(&[], Vec::as_slice)
    }

    /// Path from the start to `target` as discovered by this run.
    ///
    /// Returns an empty path if `target` was never reached.
    pub fn ghost_path<H: Heuristic + ?Sized>(
        &self,
        grid: &WeightGrid,
        target: Pos,
        heuristic: &H,
    ) -> Vec<PathEntry> {
        if !self.costs.at(target).is_some_and(|g| g.is_finite()) {
            return Vec::new();
        }
        reconstruct_path(
            target,
            &PathContext {
                predecessors: &self.predecessors,
                costs: &self.costs,
                weights_grid: grid,
                heuristic,
                goal: self.goal,
                weights: self.weights,
                movement: self.movement,
            },
        )
    }
}

/// JSON has no infinity, so unreached costs travel as `null`.
#[cfg(feature = "serde")]
mod unreached_as_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use tracegrid_core::Grid;

    pub fn serialize<S: Serializer>(costs: &Grid<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        costs
            .map(|&g| g.is_finite().then_some(g))
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Grid<f64>, D::Error> {
        let costs = Grid::<Option<f64>>::deserialize(deserializer)?;
        Ok(costs.map(|g| g.unwrap_or(f64::INFINITY)))
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

fn check_endpoint(grid: &WeightGrid, pos: Pos, endpoint: Endpoint) -> Result<(), SearchError> {
    if !grid.contains(pos) {
        return Err(SearchError::OutOfBounds { endpoint, pos });
    }
    if !grid.is_passable(pos) {
        return Err(SearchError::Impassable { endpoint, pos });
    }
    Ok(())
}

/// Substitute target when the goal was not reached: the visited node
/// closest to the goal by heuristic (earliest wins ties), or the last one
/// visited if the heuristic carries no weight.
fn select_fallback<H: Heuristic + ?Sized>(
    visited: &[SearchNode],
    heuristic: &H,
    goal: Pos,
    weights: SearchWeights,
) -> Option<Pos> {
    if weights.h_weight <= 0.0 {
        return visited.last().map(|n| n.pos);
    }
    let mut best: Option<(Pos, f64)> = None;
    for n in visited {
        let h = heuristic.estimate(n.pos, goal);
        if best.is_none_or(|(_, bh)| h < bh) {
            best = Some((n.pos, h));
        }
    }
    best.map(|(p, _)| p)
}

/// Run a best-first search from `start` to `goal`.
///
/// Configuration problems are reported before any search work. If the goal
/// cannot be reached the result carries `goal_found == false` and a path to
/// the fallback target instead.
pub fn search<H: Heuristic + ?Sized>(
    grid: &WeightGrid,
    start: Pos,
    goal: Pos,
    heuristic: &H,
    config: &SearchConfig,
) -> Result<SearchResult, SearchError> {
    let validated = config
        .validate()
        .and_then(|()| grid.validate_weights().map_err(SearchError::InvalidGrid))
        .and_then(|()| check_endpoint(grid, start, Endpoint::Start))
        .and_then(|()| check_endpoint(grid, goal, Endpoint::Goal));
    if let Err(err) = validated {
        log::debug!("search rejected: {err}");
        return Err(err);
    }

    let weights = config.weights;
    let (height, width) = (grid.height(), grid.width());
    log::debug!(
        "search {height}x{width} from ({start}) to ({goal}), g_weight={} h_weight={}",
        weights.g_weight,
        weights.h_weight
    );

    let mut costs = Grid::new(height, width, f64::INFINITY);
    let mut cost_history: Grid<Vec<CostUpdate>> = Grid::new(height, width, Vec::new());
    let mut predecessors: Grid<Option<Pos>> = Grid::new(height, width, None);

    let start_node = SearchNode::new(start, grid[start], heuristic.estimate(start, goal), weights);
    costs[start] = start_node.g;

    if start == goal {
        let path = vec![PathEntry {
            pos: start,
            prev: None,
            step: 0,
            edge_cost: grid[start],
            g: start_node.g,
            h: start_node.h,
            f: start_node.f,
        }];
        return Ok(SearchResult {
            start,
            goal,
            weights,
            movement: config.movement,
            goal_found: true,
            path,
            visited: Vec::new(),
            frontier_history: Vec::new(),
            costs,
            cost_history,
            update_counts: Vec::new(),
            fallback: None,
            predecessors,
            total_cost: start_node.g,
        });
    }

    let mut open: PriorityQueue<SearchNode, Pos> = PriorityQueue::new();
    open.enqueue(start_node, start_node.f, start);

    let mut visited = Vec::new();
    let mut frontier_history = Vec::new();
    let mut update_counts = Vec::new();
    let mut nbuf = Neighbors::new();
    let mut step = 0usize;

    let goal_found = 'search: loop {
        if open.is_empty() {
            break 'search false;
        }
        frontier_history.push(
            open.to_sorted_vec()
                .into_iter()
                .map(|e| e.value)
                .collect::<Vec<_>>(),
        );

        let Some(HeapEntry { value: current, .. }) = open.dequeue() else {
            return Err(SearchError::Invariant("open set yielded nothing while non-empty"));
        };
        visited.push(current);
        step += 1;
        log::trace!("step {step}: expand ({}) g={} f={}", current.pos, current.g, current.f);

        if current.pos == goal {
            update_counts.push(0);
            break 'search true;
        }

        let mut updates = 0;
        for &(np, multiplier) in nbuf.expand(grid, current.pos, &config.movement) {
            let tentative = current.g + grid[np] * multiplier;
            if tentative >= costs[np] {
                continue;
            }
            costs[np] = tentative;
            cost_history[np].push(CostUpdate {
                step,
                g: tentative,
            });
            predecessors[np] = Some(current.pos);

            let node = SearchNode::new(np, tentative, heuristic.estimate(np, goal), weights);
            if open.contains(&np) {
                open.update_node(HeapEntry::new(node, node.f, np));
            } else {
                open.enqueue(node, node.f, np);
            }
            updates += 1;
        }
        update_counts.push(updates);
    };

    let fallback = if goal_found {
        None
    } else {
        let fb = select_fallback(&visited, heuristic, goal, weights)
            .ok_or(SearchError::Invariant("no visited node to fall back to"))?;
        log::debug!("goal ({goal}) unreachable, falling back to ({fb})");
        Some(fb)
    };
    let target = fallback.unwrap_or(goal);

    let path = reconstruct_path(
        target,
        &PathContext {
            predecessors: &predecessors,
            costs: &costs,
            weights_grid: grid,
            heuristic,
            goal,
            weights,
            movement: config.movement,
        },
    );
    let total_cost = costs[target];
    log::debug!(
        "search done: goal_found={goal_found} steps={} path_len={} cost={total_cost}",
        visited.len(),
        path.len()
    );

    Ok(SearchResult {
        start,
        goal,
        weights,
        movement: config.movement,
        goal_found,
        path,
        visited,
        frontier_history,
        costs,
        cost_history,
        update_counts,
        fallback,
        predecessors,
        total_cost,
    })
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use crate::neighbors::CornerCutting;

    #[test]
    fn config_round_trip() {
        let cfg = SearchConfig::new(
            SearchWeights::weighted_astar(2.0),
            Movement::diagonal(CornerCutting::Lax).with_multiplier(1.5),
        );
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains(r#""corner_cutting":"lax""#));
        let back: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn result_with_unreached_cells_round_trips() {
        let g = parse_weights("1 1 # 1\n1 2 # 1").unwrap();
        let r = search(
            &g,
            Pos::new(0, 0),
            Pos::new(0, 3),
            &crate::heuristic::manhattan,
            &SearchConfig::default(),
        )
        .unwrap();
        assert!(!r.goal_found);
        assert!(r.costs[Pos::new(0, 3)].is_infinite());

        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("null"));
        let back: SearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
        assert!(back.costs[Pos::new(1, 3)].is_infinite());
        assert_eq!(back.costs[Pos::new(1, 1)], 4.0);
    }

    #[test]
    fn cardinal_config_from_json() {
        let json = r#"{"weights":{"g_weight":1.0,"h_weight":0.0},"movement":{"diagonal":null}}"#;
        let cfg: SearchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            cfg,
            SearchConfig::new(SearchWeights::dijkstra(), Movement::cardinal())
        );
    }
}
