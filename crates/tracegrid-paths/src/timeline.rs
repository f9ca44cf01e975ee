//! Replayable search timelines.
//!
//! A finished [`SearchResult`] is turned into an ordered list of
//! [`Snapshot`]s (frontier, visited, frontier, visited, ..., then the path),
//! and optionally flattened into one [`TimelineStep`] per node so a viewer
//! can animate the run one cell at a time.

use tracegrid_core::Pos;

use crate::node::SearchNode;
use crate::path::PathEntry;
use crate::search::SearchResult;

/// Kind of a timeline entry, shared by snapshots and flattened steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StepKind {
    Frontier,
    Visited,
    Path,
}

/// One coarse timeline entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "data", rename_all = "snake_case")
)]
pub enum Snapshot {
    /// The sorted open set just before an expansion.
    Frontier(Vec<SearchNode>),
    /// The node expanded.
    Visited(SearchNode),
    /// One entry of the final path.
    Path(PathEntry),
}

impl Snapshot {
    pub fn kind(&self) -> StepKind {
        match self {
            Self::Frontier(_) => StepKind::Frontier,
            Self::Visited(_) => StepKind::Visited,
            Self::Path(_) => StepKind::Path,
        }
    }
}

/// One fine-grained timeline entry.
///
/// `step` is the number of expansions that happened before this entry, so
/// the frontier shown before expansion `i` and the node expanded there both
/// carry `step == i`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum TimelineStep {
    Frontier { node: SearchNode, step: usize },
    Visited { node: SearchNode, step: usize },
    Path(PathEntry),
}

impl TimelineStep {
    pub fn kind(&self) -> StepKind {
        match self {
            Self::Frontier { .. } => StepKind::Frontier,
            Self::Visited { .. } => StepKind::Visited,
            Self::Path(_) => StepKind::Path,
        }
    }

    /// Expansion index, `None` for path entries.
    pub fn step(&self) -> Option<usize> {
        match self {
            Self::Frontier { step, .. } | Self::Visited { step, .. } => Some(*step),
            Self::Path(_) => None,
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            Self::Frontier { node, .. } | Self::Visited { node, .. } => node.pos,
            Self::Path(e) => e.pos,
        }
    }
}

/// Interleave frontier and visited records, then append the path.
///
/// # Panics
///
/// Panics if `visited` and `frontier_history` differ in length.
pub fn build_snapshots(
    visited: &[SearchNode],
    frontier_history: &[Vec<SearchNode>],
    path: &[PathEntry],
) -> Vec<Snapshot> {
    assert_eq!(
        visited.len(),
        frontier_history.len(),
        "visited and frontier histories differ in length"
    );
    let mut out = Vec::with_capacity(2 * visited.len() + path.len());
    for (node, frontier) in visited.iter().zip(frontier_history) {
        out.push(Snapshot::Frontier(frontier.clone()));
        out.push(Snapshot::Visited(*node));
    }
    out.extend(path.iter().copied().map(Snapshot::Path));
    out
}

/// Expand snapshots into one entry per node.
pub fn flatten(snapshots: &[Snapshot]) -> Vec<TimelineStep> {
    let mut out = Vec::new();
    let mut step = 0;
    for snap in snapshots {
        match snap {
            Snapshot::Frontier(nodes) => {
                out.extend(
                    nodes
                        .iter()
                        .map(|&node| TimelineStep::Frontier { node, step }),
                );
            }
            Snapshot::Visited(node) => {
                out.push(TimelineStep::Visited { node: *node, step });
                step += 1;
            }
            Snapshot::Path(e) => out.push(TimelineStep::Path(*e)),
        }
    }
    out
}

/// Both timeline views of one run, with lookups for a replay cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    snapshots: Vec<Snapshot>,
    steps: Vec<TimelineStep>,
    /// Flat index of each visited entry.
    visit_index: Vec<usize>,
}

impl Timeline {
    /// Build the timeline of a finished run.
    pub fn new(result: &SearchResult) -> Self {
        Self::from_parts(&result.visited, &result.frontier_history, &result.path)
    }

    /// Build a timeline from raw records. Panics like [`build_snapshots`].
    pub fn from_parts(
        visited: &[SearchNode],
        frontier_history: &[Vec<SearchNode>],
        path: &[PathEntry],
    ) -> Self {
        let snapshots = build_snapshots(visited, frontier_history, path);
        let steps = flatten(&snapshots);
        let visit_index = steps
            .iter()
            .enumerate()
            .filter(|(_, s)| s.kind() == StepKind::Visited)
            .map(|(i, _)| i)
            .collect();
        Self {
            snapshots,
            steps,
            visit_index,
        }
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn steps(&self) -> &[TimelineStep] {
        &self.steps
    }

    /// Number of expansions in the run.
    pub fn visited_count(&self) -> usize {
        self.visit_index.len()
    }

    /// The open set shown before expansion `step`.
    pub fn frontier_at(&self, step: usize) -> Option<&[SearchNode]> {
        if step >= self.visited_count() {
            return None;
        }
        match self.snapshots.get(2 * step) {
            Some(Snapshot::Frontier(nodes)) => Some(nodes),
            _ => None,
        }
    }

    /// Position in [`steps`](Self::steps) of expansion `step`.
    pub fn flat_index_of_visit(&self, step: usize) -> Option<usize> {
        self.visit_index.get(step).copied()
    }

    pub fn path_len(&self) -> usize {
        self.steps
            .iter()
            .rev()
            .take_while(|s| s.kind() == StepKind::Path)
            .count()
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use crate::heuristic::Metric;
    use crate::search::{SearchConfig, search};
    use tracegrid_core::parse_weights;

    #[test]
    fn timeline_steps_round_trip() {
        let g = parse_weights("1 1\n1 1").unwrap();
        let r = search(
            &g,
            Pos::new(0, 0),
            Pos::new(1, 1),
            &Metric::Manhattan,
            &SearchConfig::default(),
        )
        .unwrap();
        let tl = Timeline::new(&r);

        let json = serde_json::to_string(tl.steps()).unwrap();
        assert!(json.contains(r#""kind":"visited""#));
        let back: Vec<TimelineStep> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_slice(), tl.steps());

        let json = serde_json::to_string(tl.snapshots()).unwrap();
        assert!(json.contains(r#""kind":"frontier","data":["#));
        let back: Vec<Snapshot> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_slice(), tl.snapshots());
    }
}
