//! Active falling piece logic

use crate::board::Board;
use crate::geometry::{Position, Shape, check_collision};
use crate::tetromino::TetrominoType;
use ratatui::style::Color;

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub piece_type: TetrominoType,
    /// Working shape; starts as the canonical matrix and changes on rotation
    pub shape: Shape,
    /// Board position of the shape's top-left corner
    pub position: Position,
}

impl Piece {
    /// Create a new piece at its spawn position on a board `board_width` wide
    pub fn new(piece_type: TetrominoType, board_width: usize) -> Self {
        let shape = piece_type.shape();
        let position = spawn_position(&shape, board_width);
        Self {
            piece_type,
            shape,
            position,
        }
    }

    pub fn color(&self) -> Color {
        self.piece_type.color()
    }

    /// Whether the piece overlaps the stack or leaves the field where it is
    pub fn collides(&self, board: &Board) -> bool {
        check_collision(&self.shape, self.position, board)
    }

    /// Try to shift by (dx, dy), returns true if successful
    ///
    /// A blocked move leaves the piece where it was.
    pub fn try_move(&mut self, dx: i32, dy: i32, board: &Board) -> bool {
        let target = self.position.offset(dx, dy);
        if check_collision(&self.shape, target, board) {
            return false;
        }
        self.position = target;
        true
    }

    /// Try to rotate clockwise in place; no kicks are attempted
    pub fn rotate(&mut self, board: &Board) -> bool {
        let rotated = self.shape.rotate_clockwise();
        if check_collision(&rotated, self.position, board) {
            return false;
        }
        self.shape = rotated;
        true
    }

    /// Row the piece would come to rest on if dropped straight down
    pub fn landing_row(&self, board: &Board) -> i32 {
        let mut y = self.position.y;
        while !check_collision(&self.shape, Position::new(self.position.x, y + 1), board) {
            y += 1;
        }
        y
    }

    /// Hard drop - move down as far as possible and return distance dropped
    pub fn hard_drop(&mut self, board: &Board) -> i32 {
        let landing = self.landing_row(board);
        let distance = landing - self.position.y;
        self.position.y = landing;
        distance
    }
}

/// Centered on the top row: x = W/2 - shape_width/2, y = 0
pub fn spawn_position(shape: &Shape, board_width: usize) -> Position {
    let x = (board_width / 2) as i32 - (shape.width() / 2) as i32;
    Position::new(x, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    #[test]
    fn test_spawn_position() {
        assert_eq!(Piece::new(TetrominoType::O, 10).position, Position::new(4, 0));
        assert_eq!(Piece::new(TetrominoType::I, 10).position, Position::new(3, 0));
        assert_eq!(Piece::new(TetrominoType::T, 10).position, Position::new(4, 0));
        assert_eq!(Piece::new(TetrominoType::T, 7).position, Position::new(2, 0));
    }

    #[test]
    fn test_move_down() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::T, board.width());
        assert!(piece.try_move(0, 1, &board));
        assert_eq!(piece.position, Position::new(4, 1));
    }

    #[test]
    fn test_blocked_move_is_not_applied() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::O, board.width());
        piece.position = Position::new(0, 0);
        assert!(!piece.try_move(-1, 0, &board));
        assert_eq!(piece.position, Position::new(0, 0));
    }

    #[test]
    fn test_rotation_against_wall_fails() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::I, board.width());
        piece.rotate(&board);
        // vertical I hugging the right wall cannot lie flat again
        piece.position = Position::new(9, 5);
        let before = piece.clone();
        assert!(!piece.rotate(&board));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_hard_drop() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::I, board.width());
        let distance = piece.hard_drop(&board);
        assert_eq!(distance, 19);
        assert_eq!(piece.position.y, 19);
        assert!(!piece.collides(&board));
    }

    #[test]
    fn test_landing_row_stops_on_stack() {
        let mut board = Board::new();
        board.set(4, 15, Cell::Filled(ratatui::style::Color::Red));
        let piece = Piece::new(TetrominoType::O, board.width());
        assert_eq!(piece.landing_row(&board), 13);
    }
}
