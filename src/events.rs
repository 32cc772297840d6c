//! Outbound notifications for presentation and audio layers.

use crate::gate::SessionState;
use crate::ledger::ScoreTally;
use crate::payment::PaymentRequest;
use paidplay_tictactoe::{Player, Position, RoundOutcome};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// Something observable happened in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "event", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameEvent {
    /// A mark was placed.
    MoveApplied {
        /// Where.
        position: Position,
        /// By whom.
        player: Player,
    },
    /// The round reached a terminal outcome.
    RoundFinished {
        /// Win or draw.
        outcome: RoundOutcome,
    },
    /// The session gate moved.
    SessionStateChanged {
        /// New state.
        state: SessionState,
    },
    /// The ledger changed.
    ScoreChanged {
        /// New counters.
        tally: ScoreTally,
    },
    /// The payment collaborator should submit a transaction.
    PaymentRequested {
        /// What to charge.
        request: PaymentRequest,
    },
    /// The payment collaborator reported a failure; the round did not start.
    PaymentRejected {
        /// Collaborator-supplied reason.
        reason: String,
    },
}

/// Sender half handed to a [`Session`](crate::Session).
pub type EventSender = mpsc::UnboundedSender<GameEvent>;

/// Receiver half for subscribers.
pub type EventReceiver = mpsc::UnboundedReceiver<GameEvent>;

/// Creates a connected sender/receiver pair.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Sends an event; a dropped subscriber is not an error for the game.
pub(crate) fn emit(tx: &EventSender, event: GameEvent) {
    if let Err(e) = tx.send(event) {
        debug!(event = ?e.0, "No subscriber for event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = GameEvent::MoveApplied {
            position: Position::Center,
            player: Player::X,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"event": "move_applied", "position": "Center", "player": "X"})
        );
    }

    #[test]
    fn test_event_kind_matches_tag() {
        let event = GameEvent::ScoreChanged {
            tally: ScoreTally::default(),
        };
        let kind: &'static str = (&event).into();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(kind, "score_changed");
        assert_eq!(json["event"], kind);
    }

    #[test]
    fn test_emit_without_subscriber_is_silent() {
        let (tx, rx) = event_channel();
        drop(rx);
        emit(
            &tx,
            GameEvent::PaymentRejected {
                reason: "gone".to_string(),
            },
        );
    }
}
