//! Toroidal grid geometry and the mapping from cells to surface pixels.

use super::action::Direction;
use super::state::Position;

/// A continuous 2D point, in cells or in pixels depending on context
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel dimensions of the drawing surface for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Side of a square cell that fits the whole grid on this surface
    pub fn cell_size(&self, grid: &Grid) -> f64 {
        let by_width = self.width / grid.cols as f64;
        let by_height = self.height / grid.rows as f64;
        by_width.min(by_height).floor().max(0.0)
    }
}

/// Fixed-size grid whose edges wrap around
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub cols: usize,
    pub rows: usize,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    /// Wrap a coordinate back into the grid, independently per axis
    pub fn wrap(&self, pos: Position) -> Position {
        Position::new(
            pos.x.rem_euclid(self.cols as i32),
            pos.y.rem_euclid(self.rows as i32),
        )
    }

    /// The neighbouring cell in a direction, wrapping at the edges
    pub fn step(&self, pos: Position, direction: Direction) -> Position {
        self.wrap(pos.moved_in_direction(direction))
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.cols as i32 && pos.y >= 0 && pos.y < self.rows as i32
    }

    /// Pixel center of `cell` shifted by a fractional cell `offset`
    pub fn to_pixel(&self, cell: Position, offset: Point, cell_size: f64) -> Point {
        Point::new(
            (cell.x as f64 + offset.x + 0.5) * cell_size,
            (cell.y as f64 + offset.y + 0.5) * cell_size,
        )
    }

    /// Pixel position of a continuous point expressed in cell units
    pub fn cells_to_pixels(&self, point: Point, cell_size: f64) -> Point {
        Point::new(point.x * cell_size, point.y * cell_size)
    }

    /// Shortest signed per-axis offset from `from` to `to` on the torus
    pub fn toroidal_delta(&self, from: Position, to: Position) -> (i32, i32) {
        (
            shortest(to.x - from.x, self.cols as i32),
            shortest(to.y - from.y, self.rows as i32),
        )
    }
}

fn shortest(delta: i32, size: i32) -> i32 {
    let delta = delta.rem_euclid(size);
    if delta * 2 > size { delta - size } else { delta }
}
