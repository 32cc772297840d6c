//! Draw detection logic for tic-tac-toe.

use crate::{Board, Square};

/// Checks if the board is full (all squares occupied).
///
/// A full board with no winner is a draw.
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, Position};

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new();
        board.set(Position::Center, Square::Occupied(Player::X));
        assert!(!is_full(&board));
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for pos in Position::ALL {
            board.set(pos, Square::Occupied(Player::X));
        }
        assert!(is_full(&board));
    }
}
