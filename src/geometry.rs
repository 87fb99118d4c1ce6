//! Shape matrices and the pure geometry the session is built on
//!
//! Everything here is a total function: rotation, collision testing,
//! merging a piece into a board and compositing a display overlay.
//! None of them mutate their inputs.

use crate::board::{Board, Cell};
use ratatui::style::Color;
use serde::Serialize;

/// Board coordinate of a shape's top-left matrix cell
///
/// `x` is the column offset, `y` the row offset (row 0 is the top).
/// `y` may be negative while a piece pokes out above the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A rectangular occupancy matrix
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Shape {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Shape {
    /// Build a shape from 0/1 rows, top to bottom
    ///
    /// Ragged input is padded with empty cells to the widest row.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let cols = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        let mut cells = vec![false; rows.len() * cols];
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                cells[r * cols + c] = value != 0;
            }
        }
        Self {
            rows: rows.len(),
            cols,
            cells,
        }
    }

    /// (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn width(&self) -> usize {
        self.cols
    }

    pub fn height(&self) -> usize {
        self.rows
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    /// (row, col) of every occupied sub-cell, row-major
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &filled)| filled)
            .map(|(i, _)| (i / self.cols, i % self.cols))
    }

    /// Rows of 0/1, for display and debugging
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.rows)
            .map(|r| (0..self.cols).map(|c| self.is_occupied(r, c) as u8).collect())
            .collect()
    }

    /// 90° clockwise about the shape's own bounding box
    ///
    /// Source cell (r, c) of an R×C matrix lands on (c, R-1-r) of the C×R result.
    pub fn rotate_clockwise(&self) -> Shape {
        let mut cells = vec![false; self.cells.len()];
        let new_cols = self.rows;
        for (r, c) in self.occupied() {
            cells[c * new_cols + (self.rows - 1 - r)] = true;
        }
        Shape {
            rows: self.cols,
            cols: new_cols,
            cells,
        }
    }

    /// Board coordinates of every occupied sub-cell at `pos`
    fn board_cells(&self, pos: Position) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.occupied()
            .map(move |(r, c)| (pos.x + c as i32, pos.y + r as i32))
    }
}

/// Rotate a shape 90° clockwise
pub fn rotate_clockwise(shape: &Shape) -> Shape {
    shape.rotate_clockwise()
}

/// Whether `shape` placed at `pos` leaves the field or overlaps the stack
///
/// Sides and floor are walls. Cells above row 0 never collide and are
/// not checked against the board.
pub fn check_collision(shape: &Shape, pos: Position, board: &Board) -> bool {
    let width = board.width() as i32;
    let height = board.height() as i32;
    shape.board_cells(pos).any(|(x, y)| {
        if x < 0 || x >= width || y >= height {
            return true;
        }
        y >= 0 && board.is_filled(x, y)
    })
}

/// A new board with `shape` stamped in at `pos`
///
/// Sub-cells above the field are dropped.
pub fn merge_piece(board: &Board, shape: &Shape, color: Color, pos: Position) -> Board {
    composite(board, shape, color, pos)
}

/// The board as it should be drawn with the falling piece on top
///
/// Only sub-cells inside the visible field are drawn.
pub fn render_overlay(board: &Board, shape: &Shape, color: Color, pos: Position) -> Board {
    composite(board, shape, color, pos)
}

fn composite(board: &Board, shape: &Shape, color: Color, pos: Position) -> Board {
    let mut out = board.clone();
    for (x, y) in shape.board_cells(pos) {
        // out-of-field cells are skipped by `set`
        out.set(x, y, Cell::Filled(color));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
    use crate::tetromino::TetrominoType;

    fn filled(color: Color) -> Cell {
        Cell::Filled(color)
    }

    #[test]
    fn test_rotate_transposes_dimensions() {
        let shape = TetrominoType::I.shape();
        let rotated = rotate_clockwise(&shape);
        assert_eq!(rotated.dimensions(), (4, 1));
        assert_eq!(rotated.occupied().count(), 4);
    }

    #[test]
    fn test_rotate_t_clockwise() {
        // .#.      #.
        // ###  ->  ##
        //          #.
        let rotated = TetrominoType::T.shape().rotate_clockwise();
        assert_eq!(rotated.to_rows(), vec![vec![1, 0], vec![1, 1], vec![1, 0]]);
    }

    #[test]
    fn test_rotate_j_clockwise() {
        // #..      ##
        // ###  ->  #.
        //          #.
        let rotated = TetrominoType::J.shape().rotate_clockwise();
        assert_eq!(rotated.to_rows(), vec![vec![1, 1], vec![1, 0], vec![1, 0]]);
    }

    #[test]
    fn test_four_rotations_are_identity() {
        let mut shapes: Vec<Shape> = TetrominoType::ALL.iter().map(|k| k.shape()).collect();
        shapes.push(Shape::from_rows(&[&[1, 0, 0, 1], &[0, 1, 1, 0], &[1, 1, 0, 0]]));
        for shape in shapes {
            let turned = shape
                .rotate_clockwise()
                .rotate_clockwise()
                .rotate_clockwise()
                .rotate_clockwise();
            assert_eq!(turned, shape);
        }
    }

    #[test]
    fn test_rotate_empty_shape() {
        let empty = Shape::from_rows(&[]);
        assert_eq!(empty.rotate_clockwise().dimensions(), (0, 0));
    }

    #[test]
    fn test_collision_walls_and_floor() {
        let board = Board::new();
        let shape = TetrominoType::O.shape();
        assert!(!check_collision(&shape, Position::new(0, 0), &board));
        assert!(!check_collision(&shape, Position::new(8, 18), &board));
        assert!(check_collision(&shape, Position::new(-1, 0), &board));
        assert!(check_collision(&shape, Position::new(9, 0), &board));
        assert!(check_collision(&shape, Position::new(0, 19), &board));
    }

    #[test]
    fn test_cells_above_field_never_collide() {
        let mut board = Board::new();
        for x in 0..BOARD_WIDTH as i32 {
            board.set(x, 0, filled(Color::Red));
        }
        let shape = TetrominoType::I.shape().rotate_clockwise();
        // rows -4..-1 are all above the field
        assert!(!check_collision(&shape, Position::new(3, -4), &board));
        // reaching row 0 hits the stack
        assert!(check_collision(&shape, Position::new(3, -3), &board));
        // but walls still apply above the field
        assert!(check_collision(&shape, Position::new(-1, -4), &board));
    }

    #[test]
    fn test_collision_ignores_empty_subcells() {
        let mut board = Board::new();
        // T at (0,0) leaves (0,0) and (2,0) uncovered
        board.set(0, 0, filled(Color::Red));
        board.set(2, 0, filled(Color::Red));
        let shape = TetrominoType::T.shape();
        assert!(!check_collision(&shape, Position::new(0, 0), &board));
        board.set(1, 1, filled(Color::Red));
        assert!(check_collision(&shape, Position::new(0, 0), &board));
    }

    #[test]
    fn test_merge_only_touches_footprint() {
        let mut board = Board::new();
        board.set(0, 19, filled(Color::Red));
        let shape = TetrominoType::S.shape();
        let color = TetrominoType::S.color();
        let merged = merge_piece(&board, &shape, color, Position::new(4, 10));

        let footprint: Vec<(i32, i32)> = shape
            .occupied()
            .map(|(r, c)| (4 + c as i32, 10 + r as i32))
            .collect();

        assert_eq!(merged.filled_count(), board.filled_count() + 4);
        for y in 0..BOARD_HEIGHT as i32 {
            for x in 0..BOARD_WIDTH as i32 {
                if footprint.contains(&(x, y)) {
                    assert_eq!(merged.get(x, y), Some(filled(color)));
                } else {
                    assert_eq!(merged.get(x, y), board.get(x, y));
                }
            }
        }
        // input untouched
        assert_eq!(board.filled_count(), 1);
    }

    #[test]
    fn test_merge_drops_cells_above_field() {
        let board = Board::new();
        let shape = TetrominoType::T.shape();
        let merged = merge_piece(&board, &shape, Color::Magenta, Position::new(0, -1));
        // only the bottom row of the T lands
        assert_eq!(merged.filled_count(), 3);
        assert!(merged.is_filled(0, 0) && merged.is_filled(1, 0) && merged.is_filled(2, 0));
    }

    #[test]
    fn test_overlay_clips_to_field() {
        let board = Board::new();
        let shape = TetrominoType::I.shape();
        let display = render_overlay(&board, &shape, Color::Cyan, Position::new(8, 0));
        assert_eq!(display.filled_count(), 2);
        assert!(board.is_empty());
    }
}
