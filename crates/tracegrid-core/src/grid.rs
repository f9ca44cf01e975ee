//! Dense rectangular grids.
//!
//! [`Grid`] stores one value per cell in row-major order and is addressed by
//! [`Pos`]. A [`WeightGrid`] is a `Grid<f64>` of traversal costs where `0`
//! marks a wall; the search engine also returns its cost grid, predecessor
//! map and cost history as parallel grids of the same shape.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::geom::{Pos, Range};

/// A grid of traversal costs. `0` is impassable, any finite value `> 0` is
/// the cost of entering the cell.
pub type WeightGrid = Grid<f64>;

/// Weight used for wall cells.
pub const WALL: f64 = 0.0;

/// A dense rectangular 2D grid.
///
/// With the `serde` feature, deserialization rejects a cell count that does
/// not match `width * height`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Grid<T> {
    cells: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Clone> Grid<T> {
    /// Create a `height` × `width` grid filled with `value`.
    pub fn new(height: usize, width: usize, value: T) -> Self {
        Self {
            cells: vec![value; width * height],
            width,
            height,
        }
    }

    /// Fill the entire grid with the given value.
    pub fn fill(&mut self, value: T) {
        for c in self.cells.iter_mut() {
            *c = value.clone();
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid from nested rows. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(width * height);
        for (row, r) in rows.into_iter().enumerate() {
            if r.len() != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    found: r.len(),
                });
            }
            cells.extend(r);
        }
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// The bounding range of this grid, anchored at the origin.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::sized(self.height, self.width)
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `p` lies inside the grid.
    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        p.row >= 0 && p.col >= 0 && (p.row as usize) < self.height && (p.col as usize) < self.width
    }

    /// Flat row-major index of `p`, or `None` if out of bounds.
    #[inline]
    pub fn index_of(&self, p: Pos) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some(p.row as usize * self.width + p.col as usize)
    }

    /// Position of a flat row-major index.
    #[inline]
    pub fn pos_of(&self, idx: usize) -> Pos {
        Pos::new((idx / self.width) as i32, (idx % self.width) as i32)
    }

    /// The value at `p`, or `None` if out of bounds.
    #[inline]
    pub fn at(&self, p: Pos) -> Option<&T> {
        self.index_of(p).map(|i| &self.cells[i])
    }

    /// Mutable access to the value at `p`, or `None` if out of bounds.
    #[inline]
    pub fn at_mut(&mut self, p: Pos) -> Option<&mut T> {
        self.index_of(p).map(|i| &mut self.cells[i])
    }

    /// Set the value at `p`. Does nothing if out of bounds.
    pub fn set(&mut self, p: Pos, value: T) {
        if let Some(c) = self.at_mut(p) {
            *c = value;
        }
    }

    /// Row-major iterator over `(position, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &T)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, v)| (self.pos_of(i), v))
    }

    /// Iterator over the rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        // chunks(0) panics; an empty grid simply has no rows.
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    /// Build a grid of the same shape by mapping every cell.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            cells: self.cells.iter().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// The underlying row-major cell storage.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }
}

impl<T> Index<Pos> for Grid<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `p` is out of bounds.
    fn index(&self, p: Pos) -> &T {
        match self.index_of(p) {
            Some(i) => &self.cells[i],
            None => panic!(
                "position {p} out of bounds for {}x{} grid",
                self.height, self.width
            ),
        }
    }
}

impl<T> IndexMut<Pos> for Grid<T> {
    fn index_mut(&mut self, p: Pos) -> &mut T {
        match self.index_of(p) {
            Some(i) => &mut self.cells[i],
            None => panic!(
                "position {p} out of bounds for {}x{} grid",
                self.height, self.width
            ),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Grid<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(rename = "Grid")]
        struct Raw<T> {
            cells: Vec<T>,
            width: usize,
            height: usize,
        }

        let Raw {
            cells,
            width,
            height,
        } = <Raw<T> as serde::Deserialize>::deserialize(deserializer)?;
        if width.checked_mul(height) != Some(cells.len()) {
            return Err(serde::de::Error::custom(GridError::Shape {
                width,
                height,
                cells: cells.len(),
            }));
        }
        Ok(Self {
            cells,
            width,
            height,
        })
    }
}

// ---------------------------------------------------------------------------
// Weight grids
// ---------------------------------------------------------------------------

impl Grid<f64> {
    /// Build a validated weight grid from nested rows.
    ///
    /// Rows must be non-empty and of equal length, and every weight must be
    /// finite and non-negative.
    pub fn weights(rows: Vec<Vec<f64>>) -> Result<Self, GridError> {
        let g = Self::from_rows(rows)?;
        g.validate_weights()?;
        Ok(g)
    }

    /// Check the weight-grid invariants on an existing grid.
    pub fn validate_weights(&self) -> Result<(), GridError> {
        if self.is_empty() {
            return Err(GridError::Empty);
        }
        for (pos, &w) in self.iter() {
            if !w.is_finite() || w < 0.0 {
                return Err(GridError::InvalidWeight { pos, weight: w });
            }
        }
        Ok(())
    }

    /// The weight at `p`, or `None` if out of bounds.
    #[inline]
    pub fn weight(&self, p: Pos) -> Option<f64> {
        self.at(p).copied()
    }

    /// Whether `p` is in bounds and not a wall.
    #[inline]
    pub fn is_passable(&self, p: Pos) -> bool {
        self.weight(p).is_some_and(|w| w.is_finite() && w > 0.0)
    }

    /// Whether `p` is in bounds and a wall.
    #[inline]
    pub fn is_wall(&self, p: Pos) -> bool {
        self.weight(p).is_some_and(|w| !(w.is_finite() && w > 0.0))
    }
}

/// Parse a weight grid from text.
///
/// Each non-empty line is a row of whitespace-separated numbers. A `#`
/// token is a wall (weight 0). Leading and trailing blank lines are ignored.
///
/// ```
/// use tracegrid_core::{Pos, parse_weights};
///
/// let g = parse_weights("1 1 #\n1 5 1").unwrap();
/// assert_eq!(g.height(), 2);
/// assert!(g.is_wall(Pos::new(0, 2)));
/// assert_eq!(g.weight(Pos::new(1, 1)), Some(5.0));
/// ```
pub fn parse_weights(s: &str) -> Result<WeightGrid, GridError> {
    let mut rows = Vec::new();
    for (row, line) in s.trim().lines().enumerate() {
        let mut r = Vec::new();
        for (col, tok) in line.split_whitespace().enumerate() {
            let w = if tok == "#" {
                WALL
            } else {
                tok.parse::<f64>().map_err(|_| GridError::InvalidToken {
                    pos: Pos::new(row as i32, col as i32),
                    token: tok.to_string(),
                })?
            };
            r.push(w);
        }
        rows.push(r);
    }
    Grid::weights(rows)
}

/// Errors that can occur when building a grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// The grid has no cells.
    Empty,
    /// A row's length differs from the first row's.
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A weight is negative, NaN or infinite.
    InvalidWeight { pos: Pos, weight: f64 },
    /// A token in textual input is not a number or `#`.
    InvalidToken { pos: Pos, token: String },
    /// Stored cells do not fill the declared dimensions.
    Shape {
        width: usize,
        height: usize,
        cells: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "grid: no cells"),
            Self::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "grid: row {row} has {found} cells, expected {expected}"
            ),
            Self::InvalidWeight { pos, weight } => {
                write!(f, "grid: invalid weight {weight} at ({pos})")
            }
            Self::InvalidToken { pos, token } => {
                write!(f, "grid: invalid token \u{201c}{token}\u{201d} at ({pos})")
            }
            Self::Shape {
                width,
                height,
                cells,
            } => write!(f, "grid: {cells} cells do not fill {height}x{width}"),
        }
    }
}

impl std::error::Error for GridError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_access() {
        let mut g = Grid::new(2, 3, 0u8);
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 2);
        assert_eq!(g.len(), 6);
        g.set(Pos::new(1, 2), 9);
        assert_eq!(g.at(Pos::new(1, 2)), Some(&9));
        assert_eq!(g[Pos::new(1, 2)], 9);
        assert_eq!(g.at(Pos::new(2, 0)), None);
        assert_eq!(g.at(Pos::new(0, -1)), None);
    }

    #[test]
    fn set_out_of_bounds_is_ignored() {
        let mut g = Grid::new(2, 2, 1);
        g.set(Pos::new(5, 5), 7);
        assert!(g.as_slice().iter().all(|&v| v == 1));
    }

    #[test]
    fn index_round_trip() {
        let g = Grid::new(3, 4, ());
        for p in g.bounds().iter() {
            let i = g.index_of(p).unwrap();
            assert_eq!(g.pos_of(i), p);
        }
        assert_eq!(g.index_of(Pos::new(1, 2)), Some(6));
    }

    #[test]
    fn from_rows_rejects_ragged() {
        let err = Grid::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn rows_and_map() {
        let g = Grid::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let rows: Vec<&[i32]> = g.rows().collect();
        assert_eq!(rows, vec![&[1, 2][..], &[3, 4][..]]);
        let doubled = g.map(|v| v * 2);
        assert_eq!(doubled[Pos::new(1, 1)], 8);
    }

    #[test]
    fn fill_overwrites() {
        let mut g = Grid::new(2, 2, 0);
        g.fill(3);
        assert!(g.iter().all(|(_, &v)| v == 3));
    }

    #[test]
    fn weights_validation() {
        assert_eq!(Grid::weights(vec![]).unwrap_err(), GridError::Empty);
        assert!(matches!(
            Grid::weights(vec![vec![1.0, -1.0]]),
            Err(GridError::InvalidWeight { .. })
        ));
        assert!(matches!(
            Grid::weights(vec![vec![1.0, f64::INFINITY]]),
            Err(GridError::InvalidWeight { .. })
        ));
        assert!(matches!(
            Grid::weights(vec![vec![f64::NAN]]),
            Err(GridError::InvalidWeight { .. })
        ));
        assert!(Grid::weights(vec![vec![0.0, 2.5]]).is_ok());
    }

    #[test]
    fn passability() {
        let g = Grid::weights(vec![vec![1.0, 0.0, 0.5]]).unwrap();
        assert!(g.is_passable(Pos::new(0, 0)));
        assert!(!g.is_passable(Pos::new(0, 1)));
        assert!(g.is_wall(Pos::new(0, 1)));
        assert!(g.is_passable(Pos::new(0, 2)));
        assert!(!g.is_passable(Pos::new(0, 3)));
        assert!(!g.is_wall(Pos::new(0, 3)));
    }

    #[test]
    fn parse_text() {
        let g = parse_weights(
            "
            1 2 #
            3 # 4.5
            ",
        )
        .unwrap();
        assert_eq!(g.height(), 2);
        assert_eq!(g.width(), 3);
        assert_eq!(g.weight(Pos::new(0, 1)), Some(2.0));
        assert_eq!(g.weight(Pos::new(1, 2)), Some(4.5));
        assert!(g.is_wall(Pos::new(0, 2)));
        assert!(g.is_wall(Pos::new(1, 1)));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            parse_weights("1 x"),
            Err(GridError::InvalidToken { .. })
        ));
        assert!(matches!(
            parse_weights("1 1\n1"),
            Err(GridError::Ragged { row: 1, .. })
        ));
        assert_eq!(parse_weights("   "), Err(GridError::Empty));
    }
}
