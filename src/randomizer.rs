//! Piece generation
//!
//! Every kind is drawn independently and uniformly; there is no bag, so
//! repeats and droughts are possible.

use crate::tetromino::TetrominoType;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Where the session gets its upcoming pieces from
pub trait PieceSource: Send {
    fn next_piece(&mut self) -> TetrominoType;
}

/// Uniform i.i.d. randomizer
#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: ChaCha8Rng,
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Randomizer {
    /// Seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Same seed, same piece sequence
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl PieceSource for Randomizer {
    fn next_piece(&mut self) -> TetrominoType {
        TetrominoType::ALL[self.rng.gen_range(0..TetrominoType::ALL.len())]
    }
}

/// Deals a fixed list of pieces in order, cycling when it runs out
#[cfg(test)]
pub(crate) struct Sequence {
    pieces: Vec<TetrominoType>,
    next: usize,
}

#[cfg(test)]
impl Sequence {
    pub(crate) fn new(pieces: &[TetrominoType]) -> Self {
        assert!(!pieces.is_empty());
        Self {
            pieces: pieces.to_vec(),
            next: 0,
        }
    }
}

#[cfg(test)]
impl PieceSource for Sequence {
    fn next_piece(&mut self) -> TetrominoType {
        let piece = self.pieces[self.next % self.pieces.len()];
        self.next += 1;
        piece
    }
}
