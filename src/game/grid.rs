use serde::{Deserialize, Serialize};

use super::state::Position;

/// Side length of one grid cell, in frame units
pub const CELL_SIZE: i32 = 10;

/// Frame geometry of the playing field
///
/// Positions are expressed in frame units and always sit on multiples of
/// [`CELL_SIZE`]. The grid has no state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridWorld {
    /// Frame width in units
    pub width: i32,
    /// Frame height in units
    pub height: i32,
}

impl GridWorld {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Number of cell columns
    pub fn cols(&self) -> usize {
        (self.width / CELL_SIZE) as usize
    }

    /// Number of cell rows
    pub fn rows(&self) -> usize {
        (self.height / CELL_SIZE) as usize
    }

    /// Largest valid x coordinate
    pub fn max_x(&self) -> i32 {
        self.width - CELL_SIZE
    }

    /// Largest valid y coordinate
    pub fn max_y(&self) -> i32 {
        self.height - CELL_SIZE
    }

    /// Check whether a position lies inside `[0, frame - cell]` on both axes
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x <= self.max_x() && pos.y >= 0 && pos.y <= self.max_y()
    }

    /// Manhattan distance between two positions, in frame units
    pub fn dist(a: Position, b: Position) -> i32 {
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }

    /// Cell position snapped to the grid nearest the frame centre
    pub fn center(&self) -> Position {
        Position::new(
            (self.width / 2 / CELL_SIZE) * CELL_SIZE,
            (self.height / 2 / CELL_SIZE) * CELL_SIZE,
        )
    }

    /// (row, col) of an in-bounds position
    pub fn cell_of(&self, pos: Position) -> Option<(usize, usize)> {
        if self.in_bounds(pos) {
            Some(((pos.y / CELL_SIZE) as usize, (pos.x / CELL_SIZE) as usize))
        } else {
            None
        }
    }

    /// Iterate every cell position, row-major
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows()).flat_map(move |row| {
            (0..self.cols())
                .map(move |col| Position::new(col as i32 * CELL_SIZE, row as i32 * CELL_SIZE))
        })
    }
}
