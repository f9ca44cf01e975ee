use std::f64::consts::SQRT_2;

use tracegrid_core::{Pos, WeightGrid};

/// Cardinal offsets: up, down, left, right.
const CARDINAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Diagonal offsets: up-left, up-right, down-left, down-right.
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Whether a diagonal step may squeeze past blocked corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CornerCutting {
    /// Blocked if either flanking cell is a wall (or off the grid).
    #[default]
    Strict,
    /// Blocked only if both flanking cells are walls.
    Lax,
}

/// Diagonal movement settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagonalRule {
    pub corner_cutting: CornerCutting,
    /// Factor applied to the entered cell's weight for a diagonal step.
    pub multiplier: f64,
}

impl Default for DiagonalRule {
    fn default() -> Self {
        Self {
            corner_cutting: CornerCutting::Strict,
            multiplier: SQRT_2,
        }
    }
}

/// Movement rule: 4-connected, optionally extended to 8-connected.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Movement {
    pub diagonal: Option<DiagonalRule>,
}

impl Movement {
    /// Cardinal steps only.
    pub const fn cardinal() -> Self {
        Self { diagonal: None }
    }

    /// Cardinal and diagonal steps with the default √2 multiplier.
    pub fn diagonal(corner_cutting: CornerCutting) -> Self {
        Self {
            diagonal: Some(DiagonalRule {
                corner_cutting,
                ..DiagonalRule::default()
            }),
        }
    }

    /// Factor applied to the entered cell's weight when stepping from `from`
    /// to the adjacent `to`: the diagonal multiplier for a diagonal step
    /// under diagonal movement, 1 otherwise.
    pub fn step_multiplier(&self, from: Pos, to: Pos) -> f64 {
        match self.diagonal {
            Some(rule) if from.row != to.row && from.col != to.col => rule.multiplier,
            _ => 1.0,
        }
    }

    /// Replace the diagonal multiplier. No effect on cardinal movement.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        if let Some(rule) = self.diagonal.as_mut() {
            rule.multiplier = multiplier;
        }
        self
    }
}

/// Reusable neighbour enumeration buffer.
///
/// Yields `(neighbour, move_multiplier)` pairs for every passable cell
/// reachable from a position under a [`Movement`] rule.
pub struct Neighbors {
    buf: Vec<(Pos, f64)>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    /// Create a new `Neighbors` helper.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Passable neighbours of `p`, cardinal ones first.
    pub fn expand(&mut self, grid: &WeightGrid, p: Pos, movement: &Movement) -> &[(Pos, f64)] {
        self.buf.clear();
        for (dr, dc) in CARDINAL {
            let n = p.shift(dr, dc);
            if grid.is_passable(n) {
                self.buf.push((n, 1.0));
            }
        }
        let Some(rule) = movement.diagonal else {
            return &self.buf;
        };
        for (dr, dc) in DIAGONAL {
            let side_a = p.shift(dr, 0);
            let side_b = p.shift(0, dc);
            if !grid.contains(side_a) && !grid.contains(side_b) {
                continue;
            }
            let n = p.shift(dr, dc);
            if !grid.is_passable(n) {
                continue;
            }
            // Off-grid sides count as walls.
            let a_blocked = !grid.is_passable(side_a);
            let b_blocked = !grid.is_passable(side_b);
            let blocked = match rule.corner_cutting {
                CornerCutting::Strict => a_blocked || b_blocked,
                CornerCutting::Lax => a_blocked && b_blocked,
            };
            if !blocked {
                self.buf.push((n, rule.multiplier));
            }
        }
        &self.buf
    }
}
