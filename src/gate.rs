//! Payment gate in front of each round.
//!
//! ```text
//! Idle --request_start--> AwaitingPayment --confirmed--> Active --outcome--> RoundOver
//!  ^                          |                                                 |
//!  +--------failed------------+                                                 |
//!  +------------------------------------reset-----------------------------------+
//! ```

use paidplay_tictactoe::RoundOutcome;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Lifecycle of one paid round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No round requested.
    #[default]
    Idle,
    /// Waiting for the payment collaborator to confirm or fail.
    AwaitingPayment,
    /// Paid; moves are accepted.
    Active,
    /// The round ended; a new payment is needed to play again.
    RoundOver(RoundOutcome),
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::AwaitingPayment => write!(f, "awaiting payment"),
            SessionState::Active => write!(f, "active"),
            SessionState::RoundOver(outcome) => write!(f, "round over ({})", outcome),
        }
    }
}

/// A transition was requested from a state that does not allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Cannot {} while {}", action, state)]
pub struct TransitionError {
    /// The rejected operation.
    pub action: &'static str,
    /// State at the time of the request.
    pub state: SessionState,
}

/// Owns the [`SessionState`]. Everything else only reads it.
#[derive(Debug, Clone, Default)]
pub struct SessionGate {
    state: SessionState,
}

impl SessionGate {
    /// Creates a gate in [`SessionState::Idle`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while moves are accepted.
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    fn reject(&self, action: &'static str) -> TransitionError {
        TransitionError {
            action,
            state: self.state,
        }
    }

    fn transition(&mut self, next: SessionState) -> SessionState {
        info!(from = %self.state, to = %next, "Session state changed");
        self.state = next;
        next
    }

    /// Idle → AwaitingPayment.
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn request_start(&mut self) -> Result<SessionState, TransitionError> {
        match self.state {
            SessionState::Idle => Ok(self.transition(SessionState::AwaitingPayment)),
            _ => Err(self.reject("start a session")),
        }
    }

    /// AwaitingPayment → Active.
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn on_payment_confirmed(&mut self) -> Result<SessionState, TransitionError> {
        match self.state {
            SessionState::AwaitingPayment => Ok(self.transition(SessionState::Active)),
            _ => Err(self.reject("confirm payment")),
        }
    }

    /// AwaitingPayment → Idle. The round never starts.
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn on_payment_failed(&mut self, reason: &str) -> Result<SessionState, TransitionError> {
        match self.state {
            SessionState::AwaitingPayment => {
                info!(reason, "Payment failed");
                Ok(self.transition(SessionState::Idle))
            }
            _ => Err(self.reject("fail payment")),
        }
    }

    /// Active → RoundOver. Only terminal outcomes close a round.
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn on_round_finished(
        &mut self,
        outcome: RoundOutcome,
    ) -> Result<SessionState, TransitionError> {
        match self.state {
            SessionState::Active if outcome.is_terminal() => {
                Ok(self.transition(SessionState::RoundOver(outcome)))
            }
            _ => Err(self.reject("finish a round")),
        }
    }

    /// Active or RoundOver → Idle; Idle stays Idle.
    ///
    /// A pending payment is only resolved by the payment collaborator.
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn reset(&mut self) -> Result<SessionState, TransitionError> {
        match self.state {
            SessionState::Idle => Ok(SessionState::Idle),
            SessionState::Active | SessionState::RoundOver(_) => {
                Ok(self.transition(SessionState::Idle))
            }
            SessionState::AwaitingPayment => Err(self.reject("reset")),
        }
    }
}
