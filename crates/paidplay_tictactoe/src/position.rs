//! Board positions for tic-tac-toe moves.

use crate::types::Board;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A position on the tic-tac-toe board (0-8, row-major).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
pub enum Position {
    /// Top-left (position 0)
    TopLeft,
    /// Top-center (position 1)
    TopCenter,
    /// Top-right (position 2)
    TopRight,
    /// Middle-left (position 3)
    MiddleLeft,
    /// Center (position 4)
    Center,
    /// Middle-right (position 5)
    MiddleRight,
    /// Bottom-left (position 6)
    BottomLeft,
    /// Bottom-center (position 7)
    BottomCenter,
    /// Bottom-right (position 8)
    BottomRight,
}

impl Position {
    /// All 9 positions in index order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Get label for this position (for display).
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Parse from an index (0-8) or a label.
    ///
    /// Labels match case-insensitively and ignore hyphens, so `"top left"`
    /// and `"TopLeft"` both resolve to [`Position::TopLeft`].
    #[instrument]
    pub fn from_label_or_number(s: &str) -> Option<Position> {
        let s = s.trim();
        if let Ok(num) = s.parse::<usize>() {
            return Self::from_index(num);
        }

        let wanted = normalize(s);
        if wanted.is_empty() {
            return None;
        }
        <Position as strum::IntoEnumIterator>::iter().find(|pos| normalize(pos.label()) == wanted)
    }

    /// Converts position to board index (0-8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Creates position from board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Filters positions by board state - returns only empty squares, in index order.
    pub fn valid_moves(board: &Board) -> Vec<Position> {
        Self::ALL
            .iter()
            .copied()
            .filter(|pos| board.is_empty(*pos))
            .collect()
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip_is_row_major() {
        for (i, pos) in Position::ALL.iter().enumerate() {
            assert_eq!(pos.to_index(), i);
            assert_eq!(Position::from_index(i), Some(*pos));
        }
        assert_eq!(Position::from_index(9), None);
    }

    #[test]
    fn test_parse_labels_and_numbers() {
        assert_eq!(Position::from_label_or_number("4"), Some(Position::Center));
        assert_eq!(Position::from_label_or_number(" 8 "), Some(Position::BottomRight));
        assert_eq!(Position::from_label_or_number("top left"), Some(Position::TopLeft));
        assert_eq!(
            Position::from_label_or_number("Middle-Right"),
            Some(Position::MiddleRight)
        );
        assert_eq!(Position::from_label_or_number("12"), None);
        assert_eq!(Position::from_label_or_number("nowhere"), None);
        assert_eq!(Position::from_label_or_number(""), None);
    }
}
