//! Read-only view of a session for renderers

use crate::board::Board;
use crate::geometry::{Position, Shape};
use crate::tetromino::TetrominoType;
use ratatui::style::Color;
use serde::Serialize;

/// The falling piece as a renderer needs it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSnapshot {
    pub kind: TetrominoType,
    /// Working shape, including any rotation applied so far
    pub shape: Shape,
    pub color: Color,
    pub position: Position,
}

/// Everything needed to draw the field, the next-piece preview and the HUD
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Locked cells only
    pub board: Board,
    /// Locked cells with the falling piece composited on top
    pub display: Board,
    pub active: Option<ActiveSnapshot>,
    pub next: Option<TetrominoType>,
    /// Canonical shape of `next`, for the preview box
    pub next_shape: Option<Shape>,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    pub game_over: bool,
    pub paused: bool,
    pub soft_drop: bool,
}
