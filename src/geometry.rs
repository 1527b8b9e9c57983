//! Grid geometry shared by every engine stage.
//!
//! Positions are integer cells on a square grid `[0, side) × [0, side)`.
//! Distances are Manhattan distances since agents only move along the
//! four cardinal directions.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single cell on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position.
    pub fn manhattan_to(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Signed vector `(dx, dy)` from `self` toward `target`.
    pub fn delta_to(&self, target: &Position) -> (i32, i32) {
        (target.x - self.x, target.y - self.y)
    }

    /// The neighbouring cell in `direction`. Not bounds-checked.
    pub fn offset(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.offset();
        Position::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal move direction. Diagonal moves do not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    West,
    South,
    North,
}

impl Direction {
    /// All four directions, in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    /// Returns the `(dx, dy)` offset for this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::South => (0, 1),
            Direction::North => (0, -1),
        }
    }
}

/// Square grid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    side: i32,
}

impl Grid {
    /// Creates a grid of `side × side` cells.
    ///
    /// Sides larger than `i32::MAX` are saturated.
    pub fn new(side: u32) -> Self {
        Self {
            side: i32::try_from(side).unwrap_or(i32::MAX),
        }
    }

    /// Side length in cells.
    pub fn side(&self) -> i32 {
        self.side
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        let side = self.side.max(0) as usize;
        side * side
    }

    /// Returns true if `pos` lies within `[0, side) × [0, side)`.
    pub fn contains(&self, pos: &Position) -> bool {
        (0..self.side).contains(&pos.x) && (0..self.side).contains(&pos.y)
    }

    /// Clamps `pos` into the grid. The grid must be non-empty.
    pub fn clamp(&self, pos: Position) -> Position {
        let max = (self.side - 1).max(0);
        Position::new(pos.x.clamp(0, max), pos.y.clamp(0, max))
    }

    /// Iterates every cell, x outer, y inner.
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let side = self.side;
        (0..side).flat_map(move |x| (0..side).map(move |y| Position::new(x, y)))
    }

    /// Iterates the square window of half-width `radius` around `center`,
    /// clipped to the grid, x outer, y inner.
    pub fn neighborhood(&self, center: Position, radius: i32) -> impl Iterator<Item = Position> {
        let grid = *self;
        let radius = radius.max(0);
        (-radius..=radius).flat_map(move |dx| {
            (-radius..=radius).filter_map(move |dy| {
                let cell = Position::new(center.x + dx, center.y + dy);
                grid.contains(&cell).then_some(cell)
            })
        })
    }
}
