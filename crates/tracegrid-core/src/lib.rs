//! **tracegrid-core**: geometry and grid storage for the *tracegrid*
//! search engine.
//!
//! This crate provides the value types shared across the workspace: grid
//! positions, rectangular ranges, and dense row-major grids including the
//! validated [`WeightGrid`] that search runs consume.

pub mod geom;
pub mod grid;

pub use geom::{ParsePosError, Pos, Range};
pub use grid::{Grid, GridError, WALL, WeightGrid, parse_weights};
