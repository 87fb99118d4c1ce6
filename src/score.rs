//! Line clearing and scoring

use crate::board::{Board, Cell};
use crate::settings::GameConfig;

/// Outcome of removing full rows from a board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClear {
    /// The compacted board, same height as before
    pub board: Board,
    /// Number of full rows removed
    pub lines: usize,
    /// Points earned: table[lines] * level
    pub score_delta: u64,
}

/// Remove every full row, shifting the rows above down
///
/// Surviving rows keep their relative order and the removed rows come back
/// as empty rows at the top, so the height never changes.
pub fn clear_lines(board: &Board, level: u32, config: &GameConfig) -> LineClear {
    let width = board.width();
    let height = board.height();

    let survivors: Vec<Vec<Cell>> = board
        .rows()
        .iter()
        .enumerate()
        .filter(|&(y, _)| !board.is_row_full(y))
        .map(|(_, row)| row.clone())
        .collect();
    let lines = height - survivors.len();

    let mut rows = vec![vec![Cell::Empty; width]; lines];
    rows.extend(survivors);

    LineClear {
        board: Board::from_rows(width, rows),
        lines,
        score_delta: config.line_score(lines, level),
    }
}

/// Scoring calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
        }
    }

    /// Fold a line clear into the totals and recompute the level
    /// Returns true if the level went up
    pub fn add_clear(&mut self, clear: &LineClear, config: &GameConfig) -> bool {
        if clear.lines == 0 {
            return false;
        }

        self.points = self.points.saturating_add(clear.score_delta);
        self.lines += clear.lines as u32;

        let previous = self.level;
        self.level = config.level_for(self.lines);
        self.level > previous
    }
}
