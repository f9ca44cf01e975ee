//! Instrumented best-first search on weighted 2D grids.
//!
//! A single engine, [`search`], covers the classic algorithms by weighting
//! path cost against the heuristic estimate:
//!
//! | Algorithm | [`SearchWeights`] | Heuristic |
//! |---|---|---|
//! | BFS (unit weights) / Dijkstra | [`SearchWeights::dijkstra`] | ignored |
//! | Greedy best-first | [`SearchWeights::greedy`] | any |
//! | A\* | [`SearchWeights::astar`] | admissible, e.g. [`manhattan`] |
//! | Weighted A\* | [`SearchWeights::weighted_astar`] | any |
//!
//! Every run records its expansion order, the sorted open set before each
//! expansion and the full cost history of every cell. [`Timeline`] turns
//! that record into a replayable sequence of steps, and
//! [`SearchResult::ghost_path`] recovers the route to any reached cell.
//!
//! ```
//! use tracegrid_core::{Pos, parse_weights};
//! use tracegrid_paths::{SearchConfig, Timeline, manhattan, search};
//!
//! let grid = parse_weights("1 1 1\n# # 1\n1 1 1").unwrap();
//! let result = search(
//!     &grid,
//!     Pos::new(0, 0),
//!     Pos::new(2, 0),
//!     &manhattan,
//!     &SearchConfig::default(),
//! )
//! .unwrap();
//! assert!(result.goal_found);
//! assert_eq!(result.total_cost, 7.0);
//!
//! let timeline = Timeline::new(&result);
//! assert_eq!(timeline.visited_count(), result.steps());
//! ```

mod heap;
mod heuristic;
mod neighbors;
mod node;
mod path;
mod queue;
mod search;
mod timeline;

pub use heap::{Comparator, HeapEntry, IndexedHeap, by_priority};
pub use heuristic::{Composite, Heuristic, Metric, chebyshev, euclidean, manhattan, octile};
pub use neighbors::{CornerCutting, DiagonalRule, Movement, Neighbors};
pub use node::{SearchNode, SearchWeights};
pub use path::{PathContext, PathEntry, path_cost, reconstruct_path};
pub use queue::PriorityQueue;
pub use search::{CostUpdate, Endpoint, SearchConfig, SearchError, SearchResult, search};
pub use timeline::{Snapshot, StepKind, Timeline, TimelineStep, build_snapshots, flatten};
