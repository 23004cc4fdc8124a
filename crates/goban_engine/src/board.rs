//! Board data structure and chain/liberty queries.
//!
//! The board is pure spatial data: it knows nothing about turns, ko, or
//! outcomes. Group and liberty computation live here because they are
//! properties of the position alone.

use crate::action::MoveError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Stone color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Black (moves first).
    Black,
    /// White (moves second).
    White,
}

impl Color {
    /// Returns the opposing color.
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty intersection.
    Empty,
    /// Intersection occupied by a stone.
    Stone(Color),
}

/// A board coordinate. `x` is the column, `y` the row, both zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Column, 0-based from the left.
    pub x: usize,
    /// Row, 0-based from the top.
    pub y: usize,
}

impl Point {
    /// Creates a point from column and row.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Square grid of cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board with the given side length.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Checks whether a point lies on the board.
    pub fn contains(&self, point: Point) -> bool {
        point.x < self.size && point.y < self.size
    }

    fn index(&self, point: Point) -> usize {
        point.y * self.size + point.x
    }

    /// Returns the cell at `point`.
    pub fn get(&self, point: Point) -> Result<Cell, MoveError> {
        if !self.contains(point) {
            return Err(MoveError::OutOfBounds(point));
        }
        Ok(self.cells[self.index(point)])
    }

    /// Sets the cell at `point`.
    pub fn set(&mut self, point: Point, cell: Cell) -> Result<(), MoveError> {
        if !self.contains(point) {
            return Err(MoveError::OutOfBounds(point));
        }
        let idx = self.index(point);
        self.cells[idx] = cell;
        Ok(())
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells as rows, for snapshots handed to a presentation layer.
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.size).map(<[Cell]>::to_vec).collect()
    }

    /// Checks if every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// On-board orthogonal neighbors of `point`.
    pub fn neighbors(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        const OFFSETS: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
        OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            let nx = point.x.checked_add_signed(dx)?;
            let ny = point.y.checked_add_signed(dy)?;
            let n = Point::new(nx, ny);
            self.contains(n).then_some(n)
        })
    }

    /// Returns the maximal chain of same-colored stones connected to the
    /// stone at `point` via 4-directional adjacency.
    ///
    /// Returns an empty vector if the cell is empty or off the board.
    /// Traversal order is deterministic.
    pub fn group_of(&self, point: Point) -> Vec<Point> {
        let color = match self.get(point) {
            Ok(Cell::Stone(color)) => color,
            _ => return Vec::new(),
        };

        let mut group = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![point];
        visited.insert(point);

        while let Some(current) = stack.pop() {
            group.push(current);
            for neighbor in self.neighbors(current) {
                if self.cells[self.index(neighbor)] == Cell::Stone(color)
                    && visited.insert(neighbor)
                {
                    stack.push(neighbor);
                }
            }
        }
        group
    }

    /// Counts the distinct empty cells adjacent to any stone in `group`.
    pub fn liberties_of(&self, group: &[Point]) -> usize {
        let mut liberties = HashSet::new();
        for &stone in group {
            for neighbor in self.neighbors(stone) {
                if self.cells[self.index(neighbor)] == Cell::Empty {
                    liberties.insert(neighbor);
                }
            }
        }
        liberties.len()
    }

    /// Clears every cell in `group` to empty. Used for captures.
    pub fn remove_group(&mut self, group: &[Point]) {
        for &stone in group {
            if self.contains(stone) {
                let idx = self.index(stone);
                self.cells[idx] = Cell::Empty;
            }
        }
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in self.cells.chunks(self.size) {
            for (i, cell) in row.iter().enumerate() {
                let symbol = match cell {
                    Cell::Empty => '.',
                    Cell::Stone(Color::Black) => 'X',
                    Cell::Stone(Color::White) => 'O',
                };
                result.push(symbol);
                if i + 1 < self.size {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        result
    }
}
