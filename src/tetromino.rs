//! Tetromino definitions: the read-only piece catalog
//!
//! Each of the 7 kinds maps to one canonical occupancy matrix and a color.
//! The catalog hands out fresh copies, so rotating a falling piece can never
//! change what future spawns of the same kind look like.

use crate::geometry::Shape;
use ratatui::style::Color;
use serde::Serialize;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TetrominoType {
    I, // Cyan - long bar
    O, // Yellow - square
    T, // Purple - T-shape
    S, // Green - S-shape
    Z, // Red - Z-shape
    J, // Blue - J-shape
    L, // Orange - L-shape
}

impl TetrominoType {
    /// Every kind, in catalog order
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::O,
        TetrominoType::T,
        TetrominoType::S,
        TetrominoType::Z,
        TetrominoType::J,
        TetrominoType::L,
    ];

    /// Get the color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::Rgb(0x5d, 0xe7, 0xe7),
            TetrominoType::O => Color::Rgb(0xdf, 0xdf, 0x4d),
            TetrominoType::T => Color::Rgb(0xb0, 0x51, 0xe0),
            TetrominoType::S => Color::Rgb(0x69, 0xd3, 0x69),
            TetrominoType::Z => Color::Rgb(0xe0, 0x66, 0x66),
            TetrominoType::J => Color::Rgb(0x4c, 0x4c, 0xe0),
            TetrominoType::L => Color::Rgb(0xeb, 0xb7, 0x4f),
        }
    }

    /// Canonical spawn matrix, rows top to bottom
    pub fn matrix(&self) -> &'static [&'static [u8]] {
        match self {
            TetrominoType::I => &[&[1, 1, 1, 1]],
            TetrominoType::O => &[&[1, 1], &[1, 1]],
            TetrominoType::T => &[&[0, 1, 0], &[1, 1, 1]],
            TetrominoType::S => &[&[0, 1, 1], &[1, 1, 0]],
            TetrominoType::Z => &[&[1, 1, 0], &[0, 1, 1]],
            TetrominoType::J => &[&[1, 0, 0], &[1, 1, 1]],
            TetrominoType::L => &[&[0, 0, 1], &[1, 1, 1]],
        }
    }

    /// A fresh working copy of the canonical shape
    pub fn shape(&self) -> Shape {
        Shape::from_rows(self.matrix())
    }

    /// Every cell color the catalog can produce
    pub fn palette() -> [Color; 7] {
        Self::ALL.map(|kind| kind.color())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_piece_has_four_cells() {
        for kind in TetrominoType::ALL {
            assert_eq!(kind.shape().occupied().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_canonical_dimensions() {
        assert_eq!(TetrominoType::I.shape().dimensions(), (1, 4));
        assert_eq!(TetrominoType::O.shape().dimensions(), (2, 2));
        for kind in [
            TetrominoType::T,
            TetrominoType::S,
            TetrominoType::Z,
            TetrominoType::J,
            TetrominoType::L,
        ] {
            assert_eq!(kind.shape().dimensions(), (2, 3), "{kind:?}");
        }
    }

    #[test]
    fn test_colors_are_distinct() {
        let colors: HashSet<_> = TetrominoType::palette().into_iter().collect();
        assert_eq!(colors.len(), 7);
    }

    #[test]
    fn test_shape_is_a_copy() {
        let working = TetrominoType::T.shape().rotate_clockwise();
        assert_ne!(working, TetrominoType::T.shape());
        assert_eq!(TetrominoType::T.shape(), Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]));
    }
}
