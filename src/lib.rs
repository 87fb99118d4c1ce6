//! TETRS engine - the rules of a falling-block puzzle, without the screen
//!
//! A fixed 10×20 field (configurable), the seven classic pieces with naive
//! clockwise rotation, line clears scored from a level-scaled table, and a
//! descent clock that speeds up every ten lines.
//!
//! - [`game::Game`] is the state machine. Feed it [`game::Action`]s and read
//!   [`snapshot::Snapshot`]s back; nothing in it blocks or touches I/O.
//! - [`driver::SessionHandle`] runs a `Game` on tokio as a single-writer loop
//!   with the automatic descent timer, for hosts that want the timing too.
//! - [`geometry`] and [`score`] hold the pure functions both are built from.
//!
//! ```
//! use tetrs_engine::{Action, Game};
//!
//! let mut game = Game::with_seed(7);
//! game.process_action(Action::Spawn);
//! game.process_action(Action::MoveLeft);
//! game.process_action(Action::HardDrop);
//!
//! let snap = game.snapshot();
//! assert_eq!(snap.board.filled_count(), 4);
//! assert!(snap.active.is_some());
//! ```

pub mod board;
pub mod driver;
pub mod error;
pub mod game;
pub mod geometry;
pub mod logging;
pub mod piece;
pub mod randomizer;
pub mod score;
pub mod settings;
pub mod snapshot;
pub mod tetromino;

pub use board::{BOARD_HEIGHT, BOARD_WIDTH, Board, Cell};
pub use driver::SessionHandle;
pub use error::{ConfigError, SessionClosed};
pub use game::{Action, Game, GameState};
pub use geometry::{Position, Shape, check_collision, merge_piece, render_overlay, rotate_clockwise};
pub use randomizer::{PieceSource, Randomizer};
pub use score::{LineClear, Score, clear_lines};
pub use settings::GameConfig;
pub use snapshot::{ActiveSnapshot, Snapshot};
pub use tetromino::TetrominoType;
