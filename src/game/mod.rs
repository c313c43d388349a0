//! Game state: the board model, clue sampling and the load lifecycle.

pub mod board;
pub mod lifecycle;
pub mod sampler;

pub use board::{Board, BoardError, Category, Clue, RevealOutcome, RevealState};
pub use lifecycle::Lifecycle;
