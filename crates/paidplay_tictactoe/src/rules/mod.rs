//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. They accept any nine squares, including
//! hypothetical boards that break turn alternation, so the search can use them.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{WinningLine, check_winner, completed_lines};

use crate::{Board, Player};
use serde::{Deserialize, Serialize};

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// No line completed and at least one empty square.
    Ongoing,
    /// A player completed a line.
    Win {
        /// The player owning the line.
        player: Player,
        /// The completed line.
        line: WinningLine,
    },
    /// Full board with no completed line.
    Draw,
}

impl RoundOutcome {
    /// Returns true for `Win` and `Draw`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RoundOutcome::Ongoing)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            RoundOutcome::Win { player, .. } => Some(*player),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundOutcome::Ongoing => write!(f, "In progress"),
            RoundOutcome::Win { player, line } => write!(f, "Player {} wins ({:?})", player, line),
            RoundOutcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Evaluates the board: a completed line wins, else a full board draws.
pub fn detect(board: &Board) -> RoundOutcome {
    if let Some((player, line)) = check_winner(board) {
        return RoundOutcome::Win { player, line };
    }
    if is_full(board) {
        return RoundOutcome::Draw;
    }
    RoundOutcome::Ongoing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Position, Square};

    fn board_from(marks: &str) -> Board {
        let mut squares = [Square::Empty; 9];
        for (i, c) in marks.chars().enumerate() {
            squares[i] = match c {
                'X' => Square::Occupied(Player::X),
                'O' => Square::Occupied(Player::O),
                _ => Square::Empty,
            };
        }
        Board::from_squares(squares)
    }

    #[test]
    fn test_detect_ongoing() {
        assert_eq!(detect(&Board::new()), RoundOutcome::Ongoing);
        assert_eq!(detect(&board_from("XO_______")), RoundOutcome::Ongoing);
    }

    #[test]
    fn test_detect_draw() {
        // X O X / O X X / O X O
        let outcome = detect(&board_from("XOXOXXOXO"));
        assert_eq!(outcome, RoundOutcome::Draw);
        assert!(outcome.is_terminal());
        assert_eq!(outcome.winner(), None);
    }

    #[test]
    fn test_detect_win_on_full_board_is_win() {
        let outcome = detect(&board_from("XXXOOXXOO"));
        assert_eq!(
            outcome,
            RoundOutcome::Win {
                player: Player::X,
                line: WinningLine::TopRow
            }
        );
    }

    #[test]
    fn test_detect_column_win() {
        let mut board = Board::new();
        for pos in [Position::TopRight, Position::MiddleRight, Position::BottomRight] {
            board.set(pos, Square::Occupied(Player::O));
        }
        assert_eq!(detect(&board).winner(), Some(Player::O));
    }
}
