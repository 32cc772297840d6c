//! Pure tic-tac-toe game logic.
//!
//! - [`BoardState`]: nine squares plus the player to move
//! - [`rules::detect`]: win/draw detection over any board
//! - [`search::best_move`]: exhaustive depth-scored minimax
//! - [`DifficultyPolicy`]: minimax mixed with random moves to stay beatable
//!
//! No I/O and no async; the session layer lives in the `paidplay` crate.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod difficulty;
mod position;
pub mod rules;
pub mod search;
mod types;

pub use difficulty::{
    DifficultyPolicy, RANDOM_MOVE_CHANCE, RandomSource, RngSource, ScriptedSource,
};
pub use position::Position;
pub use rules::{RoundOutcome, WinningLine, detect};
pub use search::best_move;
pub use types::{Board, BoardState, MoveError, Player, Square};
