//! Grid bookkeeping: cell coordinates, visited-cell records and the walked path.

use std::fmt;

use crate::direction::Direction;

/// Identifies a maze cell. The grid is unbounded from the solver's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoordinate {
    pub x: i32,
    pub y: i32,
}

impl GridCoordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell one step toward `dir`.
    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// `max(|Δx|, |Δy|)`.
    #[inline]
    pub fn chebyshev(self, other: GridCoordinate) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Chebyshev distance to the closest of `targets`, or `None` when empty.
    pub fn chebyshev_to_nearest(self, targets: &[GridCoordinate]) -> Option<u32> {
        targets.iter().map(|t| self.chebyshev(*t)).min()
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridCoordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Memory entry for a cell the robot has left safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitedSquare {
    pub coordinate: GridCoordinate,
    pub is_dead_end: bool,
}

impl VisitedSquare {
    pub const fn new(coordinate: GridCoordinate) -> Self {
        Self {
            coordinate,
            is_dead_end: false,
        }
    }

    pub const fn dead_end(coordinate: GridCoordinate) -> Self {
        Self {
            coordinate,
            is_dead_end: true,
        }
    }
}

/// Ordered history of cells the robot has moved out of.
#[derive(Debug, Clone, Default)]
pub struct WalkedPath {
    cells: Vec<GridCoordinate>,
}

impl WalkedPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cell: GridCoordinate) {
        self.cells.push(cell);
    }

    pub fn last(&self) -> Option<GridCoordinate> {
        self.cells.last().copied()
    }

    /// Cell recorded `n` steps before the latest one (`0` is the latest).
    pub fn steps_back(&self, n: usize) -> Option<GridCoordinate> {
        let len = self.cells.len();
        if n >= len {
            return None;
        }
        self.cells.get(len - 1 - n).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCoordinate> {
        self.cells.iter()
    }
}
