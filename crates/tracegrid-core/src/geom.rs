//! Geometry primitives: [`Pos`] and [`Range`].
//!
//! A [`Pos`] is the sole identity of a grid cell throughout the search
//! engine. Its canonical text form is `"row,col"`.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Pos
// ---------------------------------------------------------------------------

/// A grid position. Rows grow downward, columns grow rightward.
///
/// Positions inside a grid are always non-negative; signed coordinates only
/// exist so that neighbour offsets can step outside the grid and be rejected
/// by a bounds check.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { row: 0, col: 0 };

    /// Create a new position.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Return a position shifted by (drow, dcol).
    #[inline]
    pub const fn shift(self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// Whether the position is inside the half-open range.
    #[inline]
    pub fn in_range(self, r: &Range) -> bool {
        r.contains(self)
    }

    /// The four cardinal neighbours (up, down, left, right).
    #[inline]
    pub fn neighbors_4(self) -> [Pos; 4] {
        [
            self.shift(-1, 0),
            self.shift(1, 0),
            self.shift(0, -1),
            self.shift(0, 1),
        ]
    }

    /// The four diagonal neighbours (up-left, up-right, down-left, down-right).
    #[inline]
    pub fn neighbors_diagonal(self) -> [Pos; 4] {
        [
            self.shift(-1, -1),
            self.shift(-1, 1),
            self.shift(1, -1),
            self.shift(1, 1),
        ]
    }

    /// Canonical `"row,col"` key.
    pub fn key(self) -> String {
        self.to_string()
    }

    /// Parse a canonical `"row,col"` key.
    pub fn from_key(key: &str) -> Option<Self> {
        key.parse().ok()
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Error returned when a `"row,col"` key cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePosError(String);

impl fmt::Display for ParsePosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid position key \u{201c}{}\u{201d}", self.0)
    }
}

impl std::error::Error for ParsePosError {}

impl FromStr for Pos {
    type Err = ParsePosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePosError(s.to_string());
        let (row, col) = s.split_once(',').ok_or_else(err)?;
        let row = row.trim().parse().map_err(|_| err())?;
        let col = col.trim().parse().map_err(|_| err())?;
        Ok(Self::new(row, col))
    }
}

impl Add for Pos {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Pos {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.row - rhs.row, self.col - rhs.col)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open rectangle \[min, max). `min` is inclusive, `max` is exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Pos,
    pub max: Pos,
}

impl Range {
    /// Create a new range from two corners and canonicalize so that
    /// `min` ≤ `max` on each axis.
    #[inline]
    pub fn new(row0: i32, col0: i32, row1: i32, col1: i32) -> Self {
        Self {
            min: Pos::new(row0.min(row1), col0.min(col1)),
            max: Pos::new(row0.max(row1), col0.max(col1)),
        }
    }

    /// A range anchored at the origin spanning `height` rows and `width` columns.
    #[inline]
    pub fn sized(height: usize, width: usize) -> Self {
        Self::new(0, 0, height as i32, width as i32)
    }

    /// Number of columns.
    #[inline]
    pub fn width(self) -> i32 {
        self.max.col - self.min.col
    }

    /// Number of rows.
    #[inline]
    pub fn height(self) -> i32 {
        self.max.row - self.min.row
    }

    /// Total number of cells in the range.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.width() as usize) * (self.height() as usize)
    }

    /// Whether the range has zero or negative area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.row >= self.max.row || self.min.col >= self.max.col
    }

    /// Whether `p` is inside the half-open range.
    #[inline]
    pub fn contains(self, p: Pos) -> bool {
        p.row >= self.min.row && p.row < self.max.row && p.col >= self.min.col && p.col < self.max.col
    }

    /// Row-major iterator over every position in the range.
    pub fn iter(self) -> impl Iterator<Item = Pos> {
        let cols = self.min.col..self.max.col;
        (self.min.row..self.max.row)
            .flat_map(move |row| cols.clone().map(move |col| Pos::new(row, col)))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[({})-({}))", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn pos_arithmetic() {
        let a = Pos::new(1, 2);
        let b = Pos::new(3, 4);
        assert_eq!(a + b, Pos::new(4, 6));
        assert_eq!(b - a, Pos::new(2, 2));
        assert_eq!(a.shift(-1, 1), Pos::new(0, 3));
    }

    #[test]
    fn pos_key_round_trip() {
        let p = Pos::new(12, 7);
        assert_eq!(p.key(), "12,7");
        assert_eq!(Pos::from_key("12,7"), Some(p));
        assert_eq!(Pos::from_key(" 3 , 4 "), Some(Pos::new(3, 4)));
    }

    #[test]
    fn pos_key_rejects_garbage() {
        assert_eq!(Pos::from_key("12"), None);
        assert_eq!(Pos::from_key("a,b"), None);
        assert_eq!(Pos::from_key("1,2,3"), None);
        assert!("".parse::<Pos>().is_err());
    }

    #[test]
    fn pos_identity_is_row_and_col() {
        let mut set = HashSet::new();
        set.insert(Pos::new(1, 2));
        assert!(set.contains(&Pos::new(1, 2)));
        assert!(!set.contains(&Pos::new(2, 1)));
    }

    #[test]
    fn pos_orders_row_major() {
        let mut v = vec![Pos::new(1, 0), Pos::new(0, 5), Pos::new(0, 1)];
        v.sort();
        assert_eq!(v, vec![Pos::new(0, 1), Pos::new(0, 5), Pos::new(1, 0)]);
    }

    #[test]
    fn neighbor_helpers() {
        let p = Pos::new(5, 5);
        assert!(p.neighbors_4().contains(&Pos::new(4, 5)));
        assert!(p.neighbors_4().contains(&Pos::new(5, 6)));
        assert!(p.neighbors_diagonal().contains(&Pos::new(6, 6)));
        assert!(!p.neighbors_diagonal().contains(&Pos::new(5, 6)));
    }

    #[test]
    fn range_basics() {
        let r = Range::sized(2, 3);
        assert_eq!(r.height(), 2);
        assert_eq!(r.width(), 3);
        assert_eq!(r.len(), 6);
        assert!(r.contains(Pos::new(0, 0)));
        assert!(r.contains(Pos::new(1, 2)));
        assert!(!r.contains(Pos::new(2, 0)));
        assert!(!r.contains(Pos::new(0, 3)));
        assert!(!r.contains(Pos::new(-1, 0)));
    }

    #[test]
    fn range_auto_canonicalize() {
        let r = Range::new(3, 2, 0, 0);
        assert_eq!(r.min, Pos::new(0, 0));
        assert_eq!(r.max, Pos::new(3, 2));
    }

    #[test]
    fn range_iter_row_major() {
        let r = Range::sized(2, 3);
        let pts: Vec<_> = r.iter().collect();
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], Pos::new(0, 0));
        assert_eq!(pts[1], Pos::new(0, 1));
        assert_eq!(pts[5], Pos::new(1, 2));
        assert_eq!(r.iter().count(), r.len());
    }

    #[test]
    fn empty_range_iter() {
        let r = Range::sized(0, 4);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.iter().count(), 0);
        assert_eq!(Range::new(2, 5, 4, 5).iter().count(), 0);
    }

    #[test]
    fn offset_range_iter() {
        let pts: Vec<_> = Range::new(1, 2, 3, 4).iter().collect();
        assert_eq!(
            pts,
            vec![Pos::new(1, 2), Pos::new(1, 3), Pos::new(2, 2), Pos::new(2, 3)]
        );
    }
}
