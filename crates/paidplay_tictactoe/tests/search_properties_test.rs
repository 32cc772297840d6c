//! Exhaustive properties of the search and the outcome detector.

use paidplay_tictactoe::rules::completed_lines;
use paidplay_tictactoe::{
    BoardState, DifficultyPolicy, Player, Position, RoundOutcome, ScriptedSource, best_move, detect,
};

/// Plays every legal reply for `opponent`, and the search move for the other
/// side, collecting each final outcome.
fn explore(state: &BoardState, searcher: Player, outcomes: &mut Vec<RoundOutcome>) {
    let outcome = detect(state.board());
    if outcome.is_terminal() {
        outcomes.push(outcome);
        return;
    }

    if state.to_move() == searcher {
        let mut rng = ScriptedSource::default();
        let pos = DifficultyPolicy::search_only()
            .choose_move(state, &mut rng)
            .expect("live board has a move");
        let mut next = state.clone();
        next.place(pos).expect("search move is legal");
        explore(&next, searcher, outcomes);
    } else {
        for pos in state.valid_moves() {
            let mut next = state.clone();
            next.place(pos).expect("valid move is legal");
            explore(&next, searcher, outcomes);
        }
    }
}

#[test]
fn test_search_never_loses_as_second_player() {
    let mut outcomes = Vec::new();
    explore(&BoardState::new(), Player::O, &mut outcomes);
    assert!(!outcomes.is_empty());
    assert!(
        outcomes.iter().all(|o| o.winner() != Some(Player::X)),
        "human found a winning line against search"
    );
}

#[test]
fn test_search_never_loses_as_first_player() {
    let mut outcomes = Vec::new();
    explore(&BoardState::new(), Player::X, &mut outcomes);
    assert!(outcomes.iter().all(|o| o.winner() != Some(Player::O)));
}

#[test]
fn test_search_against_search_draws() {
    let mut state = BoardState::new();
    while !detect(state.board()).is_terminal() {
        let pos = best_move(&state).expect("live board has a move");
        state.place(pos).unwrap();
    }
    assert_eq!(detect(state.board()), RoundOutcome::Draw);
    assert_eq!(state.moves_played(), 9);
}

fn visit_all(state: &BoardState, visited: &mut usize) {
    *visited += 1;
    let lines = completed_lines(state.board());
    match detect(state.board()) {
        RoundOutcome::Win { player, line } => {
            assert!(lines.iter().all(|(p, _)| *p == player), "both players completed a line");
            assert_eq!(lines[0], (player, line));
            return;
        }
        RoundOutcome::Draw => {
            assert!(lines.is_empty());
            return;
        }
        RoundOutcome::Ongoing => assert!(lines.is_empty()),
    }

    for pos in state.valid_moves() {
        let mut next = state.clone();
        let mover = next.place(pos).unwrap();
        assert_eq!(mover, state.to_move());
        assert_eq!(next.to_move(), mover.opponent());
        assert_eq!(next.board().occupied_count(), next.moves_played());
        visit_all(&next, visited);
    }
}

#[test]
fn test_reachable_boards_never_have_two_winners() {
    let mut visited = 0;
    visit_all(&BoardState::new(), &mut visited);
    // Every legal game prefix, counted with multiplicity.
    assert_eq!(visited, 549_946);
}

#[test]
fn test_search_answers_corner_opening() {
    let mut state = BoardState::new();
    state.place(Position::TopLeft).unwrap();
    // Only the center holds the draw against a corner opening.
    assert_eq!(best_move(&state), Some(Position::Center));
}
