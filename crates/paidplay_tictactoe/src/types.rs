//! Core domain types for tic-tac-toe.

use crate::position::Position;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Player in the game.
///
/// The assignment is fixed: X is always the human and always moves first,
/// O is always the computer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Player {
    /// Player X, the human (goes first).
    X,
    /// Player O, the computer (goes second).
    O,
}

impl Player {
    /// The human player.
    pub const HUMAN: Player = Player::X;

    /// The computer player.
    pub const COMPUTER: Player = Player::O;

    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Returns true for the human player.
    pub fn is_human(self) -> bool {
        self == Self::HUMAN
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Creates a board from raw squares.
    ///
    /// No turn invariants are checked, so hypothetical boards can be built.
    pub fn from_squares(squares: [Square; 9]) -> Self {
        Self { squares }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Number of occupied squares.
    pub fn occupied_count(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty squares show their index (0-8) so the grid doubles as a move prompt.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => pos.to_string(),
                    Square::Occupied(player) => player.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Error that can occur when placing a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The round already has a winner or the board is full.
    #[display("Round is already over")]
    RoundOver,
}

impl std::error::Error for MoveError {}

/// Board plus whose turn it is.
///
/// States built through [`BoardState::place`] always alternate turns starting
/// with X, so the occupied count equals the number of moves played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    board: Board,
    to_move: Player,
    history: Vec<Position>,
}

impl BoardState {
    /// Creates an empty board with the human to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Player::HUMAN,
            history: Vec::new(),
        }
    }

    /// Builds a hypothetical state from raw squares.
    ///
    /// History is reconstructed in index order and carries no ordering meaning.
    pub fn from_squares(squares: [Square; 9], to_move: Player) -> Self {
        let board = Board::from_squares(squares);
        let history = Position::ALL
            .iter()
            .copied()
            .filter(|pos| !board.is_empty(*pos))
            .collect();
        Self {
            board,
            to_move,
            history,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player whose turn it is.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Positions played, oldest first.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Number of moves played so far.
    pub fn moves_played(&self) -> usize {
        self.history.len()
    }

    /// Returns the empty positions in index order.
    pub fn valid_moves(&self) -> Vec<Position> {
        Position::valid_moves(&self.board)
    }

    /// Places the mark of the player to move and passes the turn.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::RoundOver`] on a terminal board and
    /// [`MoveError::SquareOccupied`] if the square is taken.
    #[instrument(skip(self), fields(player = %self.to_move))]
    pub fn place(&mut self, pos: Position) -> Result<Player, MoveError> {
        if crate::rules::detect(&self.board).is_terminal() {
            return Err(MoveError::RoundOver);
        }
        if !self.board.is_empty(pos) {
            return Err(MoveError::SquareOccupied(pos));
        }

        let player = self.to_move;
        self.board.set(pos, Square::Occupied(player));
        self.history.push(pos);
        self.to_move = player.opponent();
        Ok(player)
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}
