//! Game board representation

use ratatui::style::Color;
use serde::Serialize;

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// The game board
///
/// Stored row-major as `rows[y][x]`; row 0 is the top of the field and
/// x grows to the right. The dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<Cell>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board with the standard dimensions
    pub fn new() -> Self {
        Self::with_size(BOARD_WIDTH, BOARD_HEIGHT)
    }

    /// Create a new empty board of `width` columns and `height` rows
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![Cell::Empty; width]; height],
        }
    }

    /// Rebuild a board from rows that already have the right shape
    pub(crate) fn from_rows(width: usize, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == width));
        Self {
            width,
            height: rows.len(),
            rows,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the cell at column `x`, row `y`
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        let (x, y) = self.index(x, y)?;
        Some(self.rows[y][x])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some((x, y)) => {
                self.rows[y][x] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether an in-bounds cell is filled; out-of-bounds cells never are
    pub fn is_filled(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|cell| cell.is_filled())
    }

    /// All rows, top to bottom
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_filled()))
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Number of filled cells on the whole board
    pub fn filled_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_filled())
            .count()
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then_some((x, y))
    }
}
