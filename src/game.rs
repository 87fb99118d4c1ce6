//! Core game state and logic
//!
//! `Game` owns the board, the falling piece, the queued next piece and the
//! score, and is the only thing that mutates them. Every transition either
//! applies completely or leaves the state untouched.

use crate::board::Board;
use crate::error::ConfigError;
use crate::geometry::{merge_piece, render_overlay};
use crate::piece::Piece;
use crate::randomizer::{PieceSource, Randomizer};
use crate::score::{Score, clear_lines};
use crate::settings::GameConfig;
use crate::snapshot::{ActiveSnapshot, Snapshot};
use crate::tetromino::TetrominoType;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    GameOver,
}

/// Decoded player intents and clock stimuli the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    /// Soft drop held (true) or released (false)
    SoftDrop(bool),
    HardDrop,
    TogglePause,
    Reset,
    /// One step of automatic descent
    Tick,
    Spawn,
}

/// The main game struct
pub struct Game {
    config: GameConfig,
    /// Locked cells
    board: Board,
    /// Current falling piece; None between a lock and the next spawn
    current_piece: Option<Piece>,
    /// Queued piece shown in the preview
    next_piece: Option<TetrominoType>,
    source: Box<dyn PieceSource>,
    score: Score,
    state: GameState,
    soft_drop: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Standard rules with an entropy-seeded randomizer
    pub fn new() -> Self {
        Self::from_parts(GameConfig::default(), Box::new(Randomizer::new()))
    }

    /// Standard rules with a reproducible piece sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::from_parts(GameConfig::default(), Box::new(Randomizer::with_seed(seed)))
    }

    /// Custom rules and piece source; the config is validated here
    pub fn with_config(
        config: GameConfig,
        source: Box<dyn PieceSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, source))
    }

    fn from_parts(config: GameConfig, mut source: Box<dyn PieceSource>) -> Self {
        let next_piece = Some(source.next_piece());
        Self {
            board: Board::with_size(config.board.width, config.board.height),
            config,
            current_piece: None,
            next_piece,
            source,
            score: Score::new(),
            state: GameState::Playing,
            soft_drop: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    pub fn next_piece(&self) -> Option<TetrominoType> {
        self.next_piece
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.state == GameState::Paused
    }

    pub fn soft_drop_active(&self) -> bool {
        self.soft_drop
    }

    /// Process an action
    /// Returns true if the game state changed
    pub fn process_action(&mut self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_piece(-1, 0),
            Action::MoveRight => self.move_piece(1, 0),
            Action::MoveDown => self.move_piece(0, 1),
            Action::Rotate => self.rotate(),
            Action::SoftDrop(active) => self.set_soft_drop(active),
            Action::HardDrop => self.hard_drop(),
            Action::TogglePause => self.toggle_pause(),
            Action::Reset => {
                self.reset();
                true
            }
            Action::Tick => self.tick(),
            Action::Spawn => self.spawn(),
        }
    }

    /// Bring the queued piece into play at the top of the field
    ///
    /// Does nothing while a piece is already falling or after game over.
    /// If the spawn position is blocked the game ends and nothing else changes.
    pub fn spawn(&mut self) -> bool {
        if self.is_game_over() || self.current_piece.is_some() {
            return false;
        }

        let kind = *self
            .next_piece
            .get_or_insert_with(|| self.source.next_piece());
        let piece = Piece::new(kind, self.board.width());

        if piece.collides(&self.board) {
            info!(
                "Game over: {:?} blocked at spawn, score={} lines={} level={}",
                kind, self.score.points, self.score.lines, self.score.level
            );
            self.state = GameState::GameOver;
            return true;
        }

        debug!("Spawned {:?} at ({}, {})", kind, piece.position.x, piece.position.y);
        self.current_piece = Some(piece);
        self.next_piece = Some(self.source.next_piece());
        true
    }

    fn can_act(&self) -> bool {
        self.state == GameState::Playing && self.current_piece.is_some()
    }

    /// Shift the falling piece by (dx, dy); rejected moves change nothing
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = &mut self.current_piece else {
            return false;
        };

        let moved = piece.try_move(dx, dy, &self.board);
        if !moved {
            trace!("Move ({}, {}) blocked", dx, dy);
        }
        moved
    }

    /// Rotate the falling piece clockwise in place
    pub fn rotate(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = &mut self.current_piece else {
            return false;
        };

        let rotated = piece.rotate(&self.board);
        if !rotated {
            trace!("Rotation of {:?} blocked", piece.piece_type);
        }
        rotated
    }

    /// Hold or release soft drop; only the descent cadence depends on it
    pub fn set_soft_drop(&mut self, active: bool) -> bool {
        let changed = self.soft_drop != active;
        self.soft_drop = active;
        changed
    }

    /// One step of automatic descent
    ///
    /// Moves the piece down a row, or locks it if it cannot fall. With no
    /// piece in play this spawns one instead.
    pub fn tick(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        if self.current_piece.is_none() {
            return self.spawn();
        }
        if self.move_piece(0, 1) {
            return true;
        }
        self.lock_piece()
    }

    /// Drop the piece as far as it goes and lock it in the same step
    pub fn hard_drop(&mut self) -> bool {
        if self.drop_to_floor().is_none() {
            return false;
        }
        self.lock_piece()
    }

    /// Move the piece to its landing row without locking it
    /// Returns the number of rows dropped
    pub fn drop_to_floor(&mut self) -> Option<i32> {
        if !self.can_act() {
            return None;
        }
        let piece = self.current_piece.as_mut()?;
        Some(piece.hard_drop(&self.board))
    }

    /// Lock the current piece, clear lines and spawn the next one
    pub(crate) fn lock_piece(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = self.current_piece.take() else {
            return false;
        };

        let merged = merge_piece(&self.board, &piece.shape, piece.color(), piece.position);
        let clear = clear_lines(&merged, self.score.level, &self.config);
        let leveled_up = self.score.add_clear(&clear, &self.config);
        self.board = clear.board;

        debug!(
            "Locked {:?} at ({}, {}), cleared {} (+{})",
            piece.piece_type, piece.position.x, piece.position.y, clear.lines, clear.score_delta
        );
        if leveled_up {
            info!("Level up: {} ({} lines)", self.score.level, self.score.lines);
        }

        self.spawn();
        true
    }

    /// Pause or resume; has no effect after game over
    pub fn toggle_pause(&mut self) -> bool {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            GameState::GameOver => return false,
        };
        debug!("Pause toggled: {:?}", self.state);
        true
    }

    /// Start over with an empty board; the next spawn brings in a new piece
    pub fn reset(&mut self) {
        info!(
            "Reset after score={} lines={} level={}",
            self.score.points, self.score.lines, self.score.level
        );
        self.board = Board::with_size(self.config.board.width, self.config.board.height);
        self.current_piece = None;
        self.next_piece = Some(self.source.next_piece());
        self.score = Score::new();
        self.state = GameState::Playing;
        self.soft_drop = false;
    }

    /// How long until the next automatic descent, or None while the clock is stopped
    pub fn tick_interval(&self) -> Option<Duration> {
        if self.state != GameState::Playing {
            return None;
        }
        if self.soft_drop {
            Some(self.config.soft_drop_interval())
        } else {
            Some(self.config.drop_interval(self.score.level))
        }
    }

    /// The board with the falling piece drawn in
    pub fn display_board(&self) -> Board {
        match &self.current_piece {
            Some(piece) => render_overlay(&self.board, &piece.shape, piece.color(), piece.position),
            None => self.board.clone(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            display: self.display_board(),
            active: self.current_piece.as_ref().map(|piece| ActiveSnapshot {
                kind: piece.piece_type,
                shape: piece.shape.clone(),
                color: piece.color(),
                position: piece.position,
            }),
            next: self.next_piece,
            next_shape: self.next_piece.map(|kind| kind.shape()),
            score: self.score.points,
            lines: self.score.lines,
            level: self.score.level,
            game_over: self.is_game_over(),
            paused: self.is_paused(),
            soft_drop: self.soft_drop,
        }
    }
}
