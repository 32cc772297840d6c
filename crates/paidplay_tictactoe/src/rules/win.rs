//! Win detection logic for tic-tac-toe.

use crate::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};

/// One of the eight three-in-a-row lines.
///
/// [`WinningLine::ALL`] fixes the scan order: rows, then columns, then diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum WinningLine {
    /// Positions 0, 1, 2.
    TopRow,
    /// Positions 3, 4, 5.
    MiddleRow,
    /// Positions 6, 7, 8.
    BottomRow,
    /// Positions 0, 3, 6.
    LeftColumn,
    /// Positions 1, 4, 7.
    CenterColumn,
    /// Positions 2, 5, 8.
    RightColumn,
    /// Positions 0, 4, 8.
    MainDiagonal,
    /// Positions 2, 4, 6.
    AntiDiagonal,
}

impl WinningLine {
    /// All lines in scan order.
    pub const ALL: [WinningLine; 8] = [
        WinningLine::TopRow,
        WinningLine::MiddleRow,
        WinningLine::BottomRow,
        WinningLine::LeftColumn,
        WinningLine::CenterColumn,
        WinningLine::RightColumn,
        WinningLine::MainDiagonal,
        WinningLine::AntiDiagonal,
    ];

    /// The three positions on this line.
    pub fn positions(self) -> [Position; 3] {
        use Position::*;
        match self {
            WinningLine::TopRow => [TopLeft, TopCenter, TopRight],
            WinningLine::MiddleRow => [MiddleLeft, Center, MiddleRight],
            WinningLine::BottomRow => [BottomLeft, BottomCenter, BottomRight],
            WinningLine::LeftColumn => [TopLeft, MiddleLeft, BottomLeft],
            WinningLine::CenterColumn => [TopCenter, Center, BottomCenter],
            WinningLine::RightColumn => [TopRight, MiddleRight, BottomRight],
            WinningLine::MainDiagonal => [TopLeft, Center, BottomRight],
            WinningLine::AntiDiagonal => [TopRight, Center, BottomLeft],
        }
    }

    /// Returns the owner if all three squares hold the same mark.
    pub fn owner(self, board: &Board) -> Option<Player> {
        let [a, b, c] = self.positions();
        match board.get(a) {
            Square::Occupied(player)
                if board.get(b) == board.get(a) && board.get(c) == board.get(a) =>
            {
                Some(player)
            }
            _ => None,
        }
    }
}

/// Checks if there is a winner on the board.
///
/// Returns the first completed line in [`WinningLine::ALL`] order.
pub fn check_winner(board: &Board) -> Option<(Player, WinningLine)> {
    WinningLine::ALL
        .iter()
        .find_map(|line| line.owner(board).map(|player| (player, *line)))
}

/// Every completed line on the board.
///
/// Legal play never completes lines for both players; this exists to check that.
pub fn completed_lines(board: &Board) -> Vec<(Player, WinningLine)> {
    WinningLine::ALL
        .iter()
        .filter_map(|line| line.owner(board).map(|player| (player, *line)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(player: Player, positions: &[Position]) -> Board {
        let mut board = Board::new();
        for pos in positions {
            board.set(*pos, Square::Occupied(player));
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board = board_with(
            Player::X,
            &[Position::TopLeft, Position::TopCenter, Position::TopRight],
        );
        assert_eq!(check_winner(&board), Some((Player::X, WinningLine::TopRow)));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = board_with(
            Player::O,
            &[Position::TopRight, Position::Center, Position::BottomLeft],
        );
        assert_eq!(
            check_winner(&board),
            Some((Player::O, WinningLine::AntiDiagonal))
        );
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = board_with(Player::X, &[Position::TopLeft, Position::TopCenter]);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_first_line_in_scan_order_wins_tie() {
        // Illegal board with two lines: top row and left column.
        let board = board_with(
            Player::X,
            &[
                Position::TopLeft,
                Position::TopCenter,
                Position::TopRight,
                Position::MiddleLeft,
                Position::BottomLeft,
            ],
        );
        assert_eq!(check_winner(&board), Some((Player::X, WinningLine::TopRow)));
        assert_eq!(completed_lines(&board).len(), 2);
    }
}
