//! One payment-gated game table: gate, controller and ledger together.

use crate::controller::{AppliedMove, ControllerPhase, GameController};
use crate::events::{EventSender, GameEvent, emit};
use crate::gate::{SessionGate, SessionState};
use crate::ledger::{ScoreLedger, ScoreTally};
use crate::payment::{DEFAULT_ENTRY_FEE_USD, PaymentRequest};
use paidplay_tictactoe::{BoardState, DifficultyPolicy, RandomSource, RngSource, RoundOutcome};
use tracing::{debug, info, instrument, warn};

/// Payment-gated session for a single human against the computer.
///
/// Every inbound request either applies fully and emits events, or is
/// rejected with no state change and no events. Instances share nothing, so
/// any number can coexist.
#[derive(Debug)]
pub struct Session {
    gate: SessionGate,
    controller: GameController,
    ledger: ScoreLedger,
    entry_fee_usd: f64,
    events: EventSender,
}

impl Session {
    /// Creates an idle session.
    #[instrument(skip(rng, events))]
    pub fn new(
        entry_fee_usd: f64,
        policy: DifficultyPolicy,
        rng: Box<dyn RandomSource + Send>,
        events: EventSender,
    ) -> Self {
        info!("Creating session");
        Self {
            gate: SessionGate::new(),
            controller: GameController::new(policy, rng),
            ledger: ScoreLedger::new(),
            entry_fee_usd,
            events,
        }
    }

    /// Default fee, shipped difficulty mix, OS-seeded randomness.
    pub fn with_defaults(events: EventSender) -> Self {
        Self::new(
            DEFAULT_ENTRY_FEE_USD,
            DifficultyPolicy::new(),
            Box::new(RngSource::from_entropy()),
            events,
        )
    }

    /// Gate state.
    pub fn state(&self) -> SessionState {
        self.gate.state()
    }

    /// Controller phase.
    pub fn phase(&self) -> ControllerPhase {
        self.controller.phase()
    }

    /// Current board.
    pub fn board(&self) -> &BoardState {
        self.controller.board()
    }

    /// Current score.
    pub fn tally(&self) -> ScoreTally {
        self.ledger.tally()
    }

    /// Fee charged per round, in USD.
    pub fn entry_fee_usd(&self) -> f64 {
        self.entry_fee_usd
    }

    /// Human move at board index 0-8.
    #[instrument(skip(self), fields(state = %self.gate.state()))]
    pub fn request_move(&mut self, index: usize) -> Option<AppliedMove> {
        match self.controller.request_move(index, self.gate.state()) {
            Ok(applied) => {
                self.after_move(applied);
                Some(applied)
            }
            Err(e) => {
                debug!(reason = %e, "Move rejected");
                None
            }
        }
    }

    /// Completes the computer's thinking suspension.
    #[instrument(skip(self))]
    pub fn play_computer_turn(&mut self) -> Option<AppliedMove> {
        match self.controller.play_computer_turn() {
            Ok(applied) => {
                self.after_move(applied);
                Some(applied)
            }
            Err(e) => {
                warn!(reason = %e, "Computer turn skipped");
                None
            }
        }
    }

    /// Asks to play a round. Returns the charge the payment collaborator
    /// must submit, or `None` if a round is already underway.
    #[instrument(skip(self))]
    pub fn request_start_session(&mut self) -> Option<PaymentRequest> {
        match self.gate.request_start() {
            Ok(state) => {
                let request = PaymentRequest {
                    usd_amount: self.entry_fee_usd,
                };
                self.emit(GameEvent::SessionStateChanged { state });
                self.emit(GameEvent::PaymentRequested { request });
                Some(request)
            }
            Err(e) => {
                warn!(reason = %e, "Start rejected");
                None
            }
        }
    }

    /// The entry transaction confirmed; the round starts on a fresh board.
    #[instrument(skip(self))]
    pub fn notify_payment_confirmed(&mut self) -> bool {
        match self.gate.on_payment_confirmed() {
            Ok(state) => {
                if let Err(e) = self.controller.reset() {
                    warn!(reason = %e, "Controller was not idle at round start");
                }
                self.emit(GameEvent::SessionStateChanged { state });
                true
            }
            Err(e) => {
                warn!(reason = %e, "Payment confirmation ignored");
                false
            }
        }
    }

    /// The entry transaction failed; back to idle, score untouched.
    #[instrument(skip(self))]
    pub fn notify_payment_failed(&mut self, reason: &str) -> bool {
        match self.gate.on_payment_failed(reason) {
            Ok(state) => {
                self.emit(GameEvent::PaymentRejected {
                    reason: reason.to_string(),
                });
                self.emit(GameEvent::SessionStateChanged { state });
                true
            }
            Err(e) => {
                warn!(reason = %e, "Payment failure ignored");
                false
            }
        }
    }

    /// Clears the board and returns the gate to idle.
    ///
    /// Refused while the computer is thinking or a payment is pending.
    /// Repeating it is harmless.
    #[instrument(skip(self), fields(state = %self.gate.state(), phase = ?self.controller.phase()))]
    pub fn request_reset(&mut self) -> bool {
        if self.controller.phase() == ControllerPhase::ComputerThinking {
            debug!("Reset rejected while computer is thinking");
            return false;
        }
        let before = self.gate.state();
        let state = match self.gate.reset() {
            Ok(state) => state,
            Err(e) => {
                debug!(reason = %e, "Reset rejected");
                return false;
            }
        };
        if let Err(e) = self.controller.reset() {
            warn!(reason = %e, "Controller reset failed");
        }
        if state != before {
            self.emit(GameEvent::SessionStateChanged { state });
        }
        true
    }

    /// Zeroes the score. Board and session are untouched.
    #[instrument(skip(self))]
    pub fn request_score_reset(&mut self) {
        self.ledger.reset();
        self.emit(GameEvent::ScoreChanged {
            tally: self.ledger.tally(),
        });
    }

    fn after_move(&mut self, applied: AppliedMove) {
        self.emit(GameEvent::MoveApplied {
            position: applied.position,
            player: applied.player,
        });
        if applied.outcome.is_terminal() {
            self.finish_round(applied.outcome);
        }
    }

    fn finish_round(&mut self, outcome: RoundOutcome) {
        let state = match self.gate.on_round_finished(outcome) {
            Ok(state) => state,
            Err(e) => {
                warn!(reason = %e, "Outcome outside an active round not recorded");
                return;
            }
        };
        info!(outcome = %outcome, "Round finished");
        self.emit(GameEvent::RoundFinished { outcome });
        self.emit(GameEvent::SessionStateChanged { state });
        if self.ledger.record(outcome) {
            self.emit(GameEvent::ScoreChanged {
                tally: self.ledger.tally(),
            });
        }
    }

    fn emit(&self, event: GameEvent) {
        emit(&self.events, event);
    }
}
