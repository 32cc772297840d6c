//! Exhaustive minimax search.
//!
//! The tree is at most nine plies deep, so no pruning is needed. Terminal
//! scores are depth-adjusted: a win scores `10 - depth`, a loss `depth - 10`,
//! a draw `0`, where depth counts plies from the searched board. The root
//! therefore prefers the fastest win and the slowest loss.

use crate::rules::{RoundOutcome, detect};
use crate::{Board, BoardState, Player, Position, Square};
use tracing::{debug, instrument};

const WIN_SCORE: i32 = 10;

/// Returns the best move for the player to move.
///
/// Positions are tried in index order and only a strictly greater score
/// replaces the current best, so ties go to the lowest index.
///
/// Returns `None` on a terminal board. Callers only ask on a live board.
#[instrument(skip(state), fields(to_move = %state.to_move(), moves = state.moves_played()))]
pub fn best_move(state: &BoardState) -> Option<Position> {
    let mut best: Option<(Position, i32)> = None;
    for (pos, score) in score_moves(state) {
        debug!(position = %pos, score, "Scored candidate move");
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((pos, score));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Scores every empty position for the player to move, in index order.
///
/// Empty on a terminal board.
pub fn score_moves(state: &BoardState) -> Vec<(Position, i32)> {
    let me = state.to_move();
    let mut board = *state.board();
    if detect(&board).is_terminal() {
        return Vec::new();
    }

    Position::ALL
        .iter()
        .copied()
        .filter(|pos| state.board().is_empty(*pos))
        .map(|pos| {
            board.set(pos, Square::Occupied(me));
            let score = minimax(&mut board, me, me.opponent(), 1);
            board.set(pos, Square::Empty);
            (pos, score)
        })
        .collect()
}

/// Scores `board` from `me`'s perspective with `turn` about to move.
fn minimax(board: &mut Board, me: Player, turn: Player, depth: i32) -> i32 {
    match detect(board) {
        RoundOutcome::Win { player, .. } if player == me => return WIN_SCORE - depth,
        RoundOutcome::Win { .. } => return depth - WIN_SCORE,
        RoundOutcome::Draw => return 0,
        RoundOutcome::Ongoing => {}
    }

    let maximizing = turn == me;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for pos in Position::ALL {
        if !board.is_empty(pos) {
            continue;
        }
        board.set(pos, Square::Occupied(turn));
        let score = minimax(board, me, turn.opponent(), depth + 1);
        board.set(pos, Square::Empty);

        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_from(marks: &str, to_move: Player) -> BoardState {
        let mut squares = [Square::Empty; 9];
        for (i, c) in marks.chars().enumerate() {
            squares[i] = match c {
                'X' => Square::Occupied(Player::X),
                'O' => Square::Occupied(Player::O),
                _ => Square::Empty,
            };
        }
        BoardState::from_squares(squares, to_move)
    }

    #[test]
    fn test_blocks_open_row() {
        let state = state_from("XX_______", Player::O);
        assert_eq!(best_move(&state), Some(Position::TopRight));
    }

    #[test]
    fn test_prefers_fastest_win() {
        // Blocking at 2 still wins later; completing the row at 5 wins now.
        let state = state_from("XX_OO__X_", Player::O);
        let scores = score_moves(&state);
        assert!(scores.contains(&(Position::TopRight, WIN_SCORE - 3)));
        assert!(scores.contains(&(Position::MiddleRight, WIN_SCORE - 1)));
        assert_eq!(best_move(&state), Some(Position::MiddleRight));
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        // Every reply to a lone center X draws except the edges, which lose.
        let state = state_from("____X____", Player::O);
        let scores = score_moves(&state);
        let best = scores.iter().map(|(_, s)| *s).max().unwrap();
        let first_best = scores.iter().find(|(_, s)| *s == best).unwrap().0;
        assert_eq!(best, 0);
        assert_eq!(best_move(&state), Some(first_best));
        assert_eq!(first_best, Position::TopLeft);
    }

    #[test]
    fn test_terminal_board_has_no_move() {
        assert_eq!(best_move(&state_from("XXXOO____", Player::O)), None);
        assert_eq!(best_move(&state_from("XOXOXXOXO", Player::O)), None);
        assert!(score_moves(&state_from("XOXOXXOXO", Player::O)).is_empty());
    }

    #[test]
    fn test_delays_unavoidable_loss() {
        // X owns the main diagonal threat and a fork; every reply loses,
        // but blocking at 8 loses two plies later.
        let state = state_from("XO__X____", Player::O);
        let scores = score_moves(&state);
        assert!(scores.iter().all(|(_, s)| *s < 0));
        assert!(scores.contains(&(Position::BottomRight, -6)));
        assert_eq!(best_move(&state), Some(Position::BottomRight));
    }
}
