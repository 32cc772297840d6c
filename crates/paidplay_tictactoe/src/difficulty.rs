//! Computer move selection with a randomized skill mix.
//!
//! The computer plays the minimax move most of the time and a uniformly random
//! legal move otherwise. The coin is flipped on every computer turn.

use crate::rules::detect;
use crate::search::best_move;
use crate::{BoardState, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Chance that the computer plays a random legal move instead of searching.
pub const RANDOM_MOVE_CHANCE: f64 = 0.4;

/// Source of randomness for move selection.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `[0, len)`. `len` is never zero.
    fn next_index(&mut self, len: usize) -> usize;
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wraps a generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// OS-seeded generator.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Deterministic generator for reproducible sessions.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Replays scripted draws, for deterministic tests.
///
/// Once a queue runs dry, unit draws return `0.99` (never the random branch)
/// and index draws return `0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    units: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl ScriptedSource {
    /// Creates a source from unit draws and index draws.
    pub fn new(
        units: impl IntoIterator<Item = f64>,
        indices: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            units: units.into_iter().collect(),
            indices: indices.into_iter().collect(),
        }
    }

    /// Unit and index draws still queued.
    pub fn remaining(&self) -> (usize, usize) {
        (self.units.len(), self.indices.len())
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(0.99)
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.indices.pop_front().unwrap_or(0) % len
    }
}

/// How the computer picks its move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyPolicy {
    random_move_chance: f64,
}

impl DifficultyPolicy {
    /// The shipped mix: [`RANDOM_MOVE_CHANCE`] random, otherwise minimax.
    pub fn new() -> Self {
        Self {
            random_move_chance: RANDOM_MOVE_CHANCE,
        }
    }

    /// Minimax on every turn. Still draws one unit per turn.
    pub fn search_only() -> Self {
        Self {
            random_move_chance: 0.0,
        }
    }

    /// Probability of the random branch.
    pub fn random_move_chance(&self) -> f64 {
        self.random_move_chance
    }

    /// Picks a move for the player to move.
    ///
    /// Consumes one unit draw; the random branch also consumes one index draw.
    /// Returns `None` only on a terminal board.
    #[instrument(skip(self, state, rng), fields(to_move = %state.to_move()))]
    pub fn choose_move(&self, state: &BoardState, rng: &mut dyn RandomSource) -> Option<Position> {
        if detect(state.board()).is_terminal() {
            return None;
        }
        let open = state.valid_moves();

        let roll = rng.next_unit();
        if roll < self.random_move_chance {
            let pick = open[rng.next_index(open.len())];
            debug!(roll, position = %pick, "Random move");
            return Some(pick);
        }

        let pick = best_move(state);
        debug!(roll, position = ?pick, "Search move");
        pick
    }
}

impl Default for DifficultyPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, Square};

    fn blocking_state() -> BoardState {
        let mut squares = [Square::Empty; 9];
        squares[0] = Square::Occupied(Player::X);
        squares[1] = Square::Occupied(Player::X);
        BoardState::from_squares(squares, Player::O)
    }

    #[test]
    fn test_low_roll_takes_random_branch() {
        let state = blocking_state();
        // Open squares are 2..=8; index 3 is position 5.
        let mut rng = ScriptedSource::new([0.1], [3]);
        let pick = DifficultyPolicy::new().choose_move(&state, &mut rng);
        assert_eq!(pick, Some(Position::MiddleRight));
        assert_eq!(rng.remaining(), (0, 0));
    }

    #[test]
    fn test_high_roll_searches() {
        let state = blocking_state();
        let mut rng = ScriptedSource::new([0.4], [6]);
        let pick = DifficultyPolicy::new().choose_move(&state, &mut rng);
        assert_eq!(pick, Some(Position::TopRight));
        // Index draw untouched on the search branch.
        assert_eq!(rng.remaining(), (0, 1));
    }

    #[test]
    fn test_search_only_ignores_low_rolls() {
        let state = blocking_state();
        let mut rng = ScriptedSource::new([0.0], std::iter::empty());
        let pick = DifficultyPolicy::search_only().choose_move(&state, &mut rng);
        assert_eq!(pick, Some(Position::TopRight));
    }

    #[test]
    fn test_roll_repeats_every_turn() {
        let mut state = BoardState::new();
        let mut rng = ScriptedSource::new([0.99, 0.0], [0]);
        let policy = DifficultyPolicy::new();

        state.place(Position::Center).unwrap();
        let first = policy.choose_move(&state, &mut rng).unwrap();
        assert_eq!(first, Position::TopLeft);
        state.place(first).unwrap();

        state.place(Position::BottomRight).unwrap();
        let second = policy.choose_move(&state, &mut rng).unwrap();
        assert_eq!(second, Position::TopCenter);
        assert_eq!(rng.remaining(), (0, 0));
    }

    #[test]
    fn test_rng_source_stays_in_range() {
        let mut rng = RngSource::seeded(7);
        for _ in 0..100 {
            let unit = rng.next_unit();
            assert!((0.0..1.0).contains(&unit));
            assert!(rng.next_index(3) < 3);
        }
    }

    #[test]
    fn test_random_branch_only_picks_empty_squares() {
        let state = blocking_state();
        let mut rng = RngSource::seeded(42);
        let policy = DifficultyPolicy::new();
        for _ in 0..50 {
            let pick = policy.choose_move(&state, &mut rng).unwrap();
            assert!(state.board().is_empty(pick));
        }
    }
}
