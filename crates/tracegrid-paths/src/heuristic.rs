//! Distance estimates between grid positions.
//!
//! The engine accepts any [`Heuristic`]; closures `Fn(Pos, Pos) -> f64` work
//! directly. No admissibility check is performed.

use std::f64::consts::SQRT_2;

use tracegrid_core::Pos;

/// Estimated cost of travelling from `from` to `to`. Must be non-negative.
pub trait Heuristic {
    fn estimate(&self, from: Pos, to: Pos) -> f64;
}

impl<F: Fn(Pos, Pos) -> f64> Heuristic for F {
    #[inline]
    fn estimate(&self, from: Pos, to: Pos) -> f64 {
        self(from, to)
    }
}

#[inline]
fn deltas(a: Pos, b: Pos) -> (f64, f64) {
    (
        f64::from((a.row - b.row).abs()),
        f64::from((a.col - b.col).abs()),
    )
}

/// Manhattan (L1) distance.
#[inline]
pub fn manhattan(a: Pos, b: Pos) -> f64 {
    let (dr, dc) = deltas(a, b);
    dr + dc
}

/// Euclidean (L2) distance.
#[inline]
pub fn euclidean(a: Pos, b: Pos) -> f64 {
    let (dr, dc) = deltas(a, b);
    dr.hypot(dc)
}

/// Octile distance: straight steps cost 1, diagonal steps cost √2.
#[inline]
pub fn octile(a: Pos, b: Pos) -> f64 {
    let (dr, dc) = deltas(a, b);
    dr.max(dc) + (SQRT_2 - 1.0) * dr.min(dc)
}

/// Chebyshev (L∞) distance.
#[inline]
pub fn chebyshev(a: Pos, b: Pos) -> f64 {
    let (dr, dc) = deltas(a, b);
    dr.max(dc)
}

/// The built-in distance metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Metric {
    #[default]
    Manhattan,
    Euclidean,
    Octile,
    Chebyshev,
}

impl Metric {
    /// Every metric, in declaration order.
    pub const ALL: [Metric; 4] = [
        Metric::Manhattan,
        Metric::Euclidean,
        Metric::Octile,
        Metric::Chebyshev,
    ];

    /// Distance between two positions under this metric.
    #[inline]
    pub fn distance(self, a: Pos, b: Pos) -> f64 {
        match self {
            Metric::Manhattan => manhattan(a, b),
            Metric::Euclidean => euclidean(a, b),
            Metric::Octile => octile(a, b),
            Metric::Chebyshev => chebyshev(a, b),
        }
    }
}

impl Heuristic for Metric {
    #[inline]
    fn estimate(&self, from: Pos, to: Pos) -> f64 {
        self.distance(from, to)
    }
}

/// A weighted sum of metrics.
///
/// ```
/// use tracegrid_core::Pos;
/// use tracegrid_paths::{Composite, Heuristic, Metric};
///
/// let h = Composite::new()
///     .with(Metric::Manhattan, 0.5)
///     .with(Metric::Chebyshev, 0.5);
/// assert_eq!(h.estimate(Pos::new(0, 0), Pos::new(3, 1)), 3.5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Composite {
    terms: Vec<(Metric, f64)>,
}

impl Composite {
    /// An empty composite, estimating 0 everywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a metric with the given weight.
    pub fn with(mut self, metric: Metric, weight: f64) -> Self {
        self.terms.push((metric, weight));
        self
    }

    /// The `(metric, weight)` terms.
    pub fn terms(&self) -> &[(Metric, f64)] {
        &self.terms
    }
}

impl Heuristic for Composite {
    fn estimate(&self, from: Pos, to: Pos) -> f64 {
        self.terms
            .iter()
            .map(|&(m, w)| w * m.distance(from, to))
            .sum()
    }
}
