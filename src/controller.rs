//! Turn orchestration for one round.

use crate::gate::SessionState;
use paidplay_tictactoe::{
    BoardState, DifficultyPolicy, MoveError, Player, Position, RandomSource, RoundOutcome, detect,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Where the round is within an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerPhase {
    /// The human may move.
    WaitingForHumanMove,
    /// The computer's move is scheduled; human moves are refused.
    ComputerThinking,
    /// The board is terminal.
    RoundFinished(RoundOutcome),
}

/// Why a move request was refused. None of these change any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveRejection {
    /// Moves are only accepted while the session is active.
    #[display("Session is {}", _0)]
    SessionInactive(SessionState),
    /// The controller is not waiting for the human.
    #[display("Not the human's turn ({:?})", _0)]
    OutOfTurn(ControllerPhase),
    /// Index outside 0-8.
    #[display("Position {} is off the board", _0)]
    OffBoard(usize),
    /// The square is taken.
    #[display("{}", _0)]
    Illegal(MoveError),
    /// The computer was asked to move on a board with no move left.
    #[display("No legal move available")]
    NoLegalMove,
}

impl std::error::Error for MoveRejection {}

impl From<MoveError> for MoveRejection {
    fn from(err: MoveError) -> Self {
        MoveRejection::Illegal(err)
    }
}

/// A move that was placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMove {
    /// Where the mark went.
    pub position: Position,
    /// Who placed it.
    pub player: Player,
    /// Board evaluation right after the move.
    pub outcome: RoundOutcome,
}

/// Drives one round: human move, computer move, repeat until terminal.
///
/// Owns the [`BoardState`]; reads the session state only to decide whether a
/// human move is accepted.
pub struct GameController {
    board: BoardState,
    phase: ControllerPhase,
    policy: DifficultyPolicy,
    rng: Box<dyn RandomSource + Send>,
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("board", &self.board)
            .field("phase", &self.phase)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl GameController {
    /// Creates a controller on an empty board.
    #[instrument(skip(rng))]
    pub fn new(policy: DifficultyPolicy, rng: Box<dyn RandomSource + Send>) -> Self {
        Self {
            board: BoardState::new(),
            phase: ControllerPhase::WaitingForHumanMove,
            policy,
            rng,
        }
    }

    /// Current board.
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Current phase.
    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    /// Places the human's mark at `index` if everything allows it.
    ///
    /// On success the phase becomes `ComputerThinking`, or `RoundFinished`
    /// when the move ends the round.
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn request_move(
        &mut self,
        index: usize,
        session: SessionState,
    ) -> Result<AppliedMove, MoveRejection> {
        if session != SessionState::Active {
            return Err(MoveRejection::SessionInactive(session));
        }
        if self.phase != ControllerPhase::WaitingForHumanMove {
            return Err(MoveRejection::OutOfTurn(self.phase));
        }
        let position = Position::from_index(index).ok_or(MoveRejection::OffBoard(index))?;

        let applied = self.apply(position)?;
        self.phase = match applied.outcome {
            RoundOutcome::Ongoing => ControllerPhase::ComputerThinking,
            outcome => ControllerPhase::RoundFinished(outcome),
        };
        debug!(phase = ?self.phase, "Human move applied");
        Ok(applied)
    }

    /// Completes the computer's scheduled turn.
    ///
    /// Only valid in `ComputerThinking`. The difficulty coin is flipped anew
    /// on every call.
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn play_computer_turn(&mut self) -> Result<AppliedMove, MoveRejection> {
        if self.phase != ControllerPhase::ComputerThinking {
            return Err(MoveRejection::OutOfTurn(self.phase));
        }
        let position = self
            .policy
            .choose_move(&self.board, self.rng.as_mut())
            .ok_or(MoveRejection::NoLegalMove)?;

        let applied = self.apply(position)?;
        self.phase = match applied.outcome {
            RoundOutcome::Ongoing => ControllerPhase::WaitingForHumanMove,
            outcome => ControllerPhase::RoundFinished(outcome),
        };
        debug!(phase = ?self.phase, "Computer move applied");
        Ok(applied)
    }

    /// Fresh board, human to move. Refused while the computer is thinking.
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn reset(&mut self) -> Result<(), MoveRejection> {
        if self.phase == ControllerPhase::ComputerThinking {
            return Err(MoveRejection::OutOfTurn(self.phase));
        }
        self.board = BoardState::new();
        self.phase = ControllerPhase::WaitingForHumanMove;
        Ok(())
    }

    fn apply(&mut self, position: Position) -> Result<AppliedMove, MoveRejection> {
        let player = self.board.place(position)?;
        let outcome = detect(self.board.board());
        info!(position = %position, player = %player, outcome = %outcome, "Move applied");
        Ok(AppliedMove {
            position,
            player,
            outcome,
        })
    }
}
