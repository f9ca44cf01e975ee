use tracegrid_core::Pos;

/// Relative weighting of cost-so-far and heuristic estimate.
///
/// `f = g_weight * g + h_weight * h`. The presets cover the classic
/// algorithms: Dijkstra `(1, 0)`, greedy best-first `(0, 1)` and A* `(1, 1)`.
/// Breadth-first search is Dijkstra over a grid of uniform weights.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchWeights {
    pub g_weight: f64,
    pub h_weight: f64,
}

impl Default for SearchWeights {
    fn default() -> Self {
        Self::astar()
    }
}

impl SearchWeights {
    /// Create a weight pair.
    pub const fn new(g_weight: f64, h_weight: f64) -> Self {
        Self { g_weight, h_weight }
    }

    /// Cost-only search.
    pub const fn dijkstra() -> Self {
        Self::new(1.0, 0.0)
    }

    /// Heuristic-only search.
    pub const fn greedy() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Balanced A*.
    pub const fn astar() -> Self {
        Self::new(1.0, 1.0)
    }

    /// A* with an inflated heuristic.
    pub const fn weighted_astar(h_weight: f64) -> Self {
        Self::new(1.0, h_weight)
    }

    /// Combined priority for a node.
    #[inline]
    pub fn f_cost(self, g: f64, h: f64) -> f64 {
        self.g_weight * g + self.h_weight * h
    }

    /// Whether the pair can rank nodes: both finite, non-negative and not
    /// both zero.
    pub fn is_valid(self) -> bool {
        let ok = |w: f64| w.is_finite() && w >= 0.0;
        ok(self.g_weight) && ok(self.h_weight) && (self.g_weight > 0.0 || self.h_weight > 0.0)
    }
}

/// A node of the search: position plus its cost breakdown.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchNode {
    pub pos: Pos,
    /// Cost so far.
    pub g: f64,
    /// Heuristic estimate to the goal.
    pub h: f64,
    /// Combined priority.
    pub f: f64,
}

impl SearchNode {
    /// Build a node, computing `f` from the weights.
    pub fn new(pos: Pos, g: f64, h: f64, weights: SearchWeights) -> Self {
        Self {
            pos,
            g,
            h,
            f: weights.f_cost(g, h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f_cost_formula() {
        let w = SearchWeights::new(0.5, 2.0);
        assert_eq!(w.f_cost(2.0, 5.0), 11.0);
        assert_eq!(w.f_cost(0.0, 0.0), 0.0);
        assert_eq!(SearchWeights::dijkstra().f_cost(3.0, 100.0), 3.0);
        assert_eq!(SearchWeights::greedy().f_cost(3.0, 100.0), 100.0);
    }

    #[test]
    fn node_computes_f() {
        let n = SearchNode::new(Pos::new(1, 1), 2.0, 5.0, SearchWeights::new(0.5, 2.0));
        assert_eq!(n.f, 11.0);
    }

    #[test]
    fn weight_validity() {
        assert!(SearchWeights::astar().is_valid());
        assert!(SearchWeights::dijkstra().is_valid());
        assert!(SearchWeights::greedy().is_valid());
        assert!(!SearchWeights::new(0.0, 0.0).is_valid());
        assert!(!SearchWeights::new(-1.0, 1.0).is_valid());
        assert!(!SearchWeights::new(1.0, f64::NAN).is_valid());
    }
}
